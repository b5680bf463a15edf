use crate::error::{PackError, PackResult};
use crate::manifest::{package_dir, PackageManifest};
use luma_core::{AssetId, AssetKind, AssetMap, AssetRecord, SettingsBlob};
use rand::Rng;
use std::fs::OpenOptions;
use std::path::Path;

/// Ids used by [`sample_records`], in id order
pub fn sample_ids() -> [AssetId; 3] {
    [
        AssetId::from_u128(0x1000),
        AssetId::from_u128(0x2000),
        AssetId::from_u128(0x3000),
    ]
}

/// Texture, scene and audio records with no addresses or groups
pub fn sample_records() -> AssetMap {
    let [t, s, a] = sample_ids();
    [
        AssetRecord::new(t, "Assets/Textures/hero.png", AssetKind::Texture)
            .with_file_hash("a3f1c9e2")
            .with_settings(SettingsBlob::from_raw(br#"{"filter":"point"}"#.to_vec())),
        AssetRecord::new(s, "Assets/Scenes/level1.scene", AssetKind::Scene)
            .with_file_hash("0b7d4e11"),
        AssetRecord::new(a, "Assets/Audio/theme.ogg", AssetKind::Audio)
            .with_file_hash("77c2aa90"),
    ]
    .into_iter()
    .map(|record| (record.id, record))
    .collect()
}

/// Records with addresses and groups
///
/// - `ui/button` and `ui/panel` are in group `ui`
/// - `music/theme` is in groups `audio` and `preload`
/// - `ui/button` is also in `preload`
/// - one record has no address
pub fn addressable_records() -> AssetMap {
    [
        AssetRecord::new(AssetId::from_u128(11), "Assets/UI/button.png", AssetKind::Texture)
            .with_address("ui/button")
            .with_group("ui")
            .with_group("preload"),
        AssetRecord::new(AssetId::from_u128(12), "Assets/UI/panel.prefab", AssetKind::Prefab)
            .with_address("ui\\panel")
            .with_group("ui"),
        AssetRecord::new(AssetId::from_u128(13), "Assets/Audio/theme.ogg", AssetKind::Audio)
            .with_address("music/theme")
            .with_group("audio")
            .with_group("preload"),
        AssetRecord::new(AssetId::from_u128(14), "Assets/Shaders/lit.shader", AssetKind::Shader),
    ]
    .into_iter()
    .map(|record| (record.id, record))
    .collect()
}

/// `count` random records with unique ids and paths
pub fn generated_records<R: Rng>(rng: &mut R, count: usize) -> AssetMap {
    let mut records = AssetMap::new();
    while records.len() < count {
        let id = AssetId::from_bytes(rng.gen());
        let n = records.len();
        let kind = AssetKind::ALL[rng.gen_range(0..AssetKind::ALL.len())];
        let mut record = AssetRecord::new(id, format!("Assets/generated/{}_{}.bin", n, kind), kind)
            .with_file_hash(format!("{:016x}", rng.gen::<u64>()));
        if rng.gen_bool(0.5) {
            record = record.with_address(format!("gen/{}", n));
        }
        for g in 0..rng.gen_range(0..3) {
            record = record.with_group(format!("group{}", g));
        }
        if rng.gen_bool(0.3) {
            let len = rng.gen_range(0..64);
            record = record.with_settings(SettingsBlob::from_raw(
                (0..len).map(|_| rng.gen()).collect(),
            ));
        }
        records.insert(id, record);
    }
    records
}

/// Drop the final byte of the last chunk of a package
pub fn truncate_last_chunk(manifest_path: &Path) -> PackResult<()> {
    let manifest = PackageManifest::read(manifest_path)?;
    let last = manifest
        .chunks()
        .last()
        .ok_or_else(|| PackError::not_found("package has no chunks"))?;
    let path = package_dir(manifest_path).join(last);
    let file = OpenOptions::new()
        .write(true)
        .open(&path)
        .map_err(|e| PackError::io(&path, e))?;
    let len = file.metadata().map_err(|e| PackError::io(&path, e))?.len();
    file.set_len(len.saturating_sub(1))
        .map_err(|e| PackError::io(&path, e))
}
