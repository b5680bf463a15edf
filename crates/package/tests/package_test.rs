//! End-to-end pack/unpack tests
//!
//! - Round trip through a keyed encryptor
//! - Texture/scene/audio scenario with a four-chunk limit
//! - Empty database
//! - Manifest ordering and chunk layout on disk

use luma_package::testing::{addressable_records, sample_ids, sample_records, XorEncryptor};
use luma_package::{
    paths, AddressablesIndex, AssetMap, BinaryCodec, ChunkJoiner, Encryptor, IdentityEncryptor,
    PackConfig, PackageManifest, PackageReader, PackageWriter, CHUNK_EXTENSION,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn writer_and_reader(
    config: PackConfig,
    encryptor: Arc<dyn Encryptor>,
) -> (PackageWriter, PackageReader) {
    (
        PackageWriter::new(config.clone(), Arc::clone(&encryptor)).unwrap(),
        PackageReader::new(config, encryptor).unwrap(),
    )
}

#[test]
fn test_roundtrip_with_keyed_encryptor() {
    let temp_dir = TempDir::new().unwrap();
    let (writer, reader) = writer_and_reader(
        PackConfig::for_testing(),
        Arc::new(XorEncryptor::new(b"roundtrip")),
    );

    let records = addressable_records();
    let report = writer.pack(&records, temp_dir.path()).unwrap();
    let restored = reader.unpack(&report.manifest_path).unwrap();

    assert_eq!(restored, records);
    assert_eq!(report.record_count, records.len());
    assert_eq!(report.address_count, 3);
    assert_eq!(report.group_count, 3);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_ciphertext_on_disk_differs_from_plaintext() {
    let temp_dir = TempDir::new().unwrap();
    let (writer, reader) = writer_and_reader(
        PackConfig::for_testing().with_max_chunks(1),
        Arc::new(XorEncryptor::new(b"k")),
    );

    let records = sample_records();
    let report = writer.pack(&records, temp_dir.path()).unwrap();
    let on_disk = fs::read(temp_dir.path().join(&report.chunk_names[0])).unwrap();
    let plaintext = reader.read_payload(&report.manifest_path).unwrap();

    assert_ne!(on_disk, plaintext);
    assert_eq!(plaintext, BinaryCodec::encode_all(&records).unwrap());
}

#[test]
fn test_texture_scene_audio_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let (writer, reader) = writer_and_reader(
        PackConfig::for_testing().with_max_chunks(4),
        Arc::new(XorEncryptor::new(b"scenario")),
    );

    let records = sample_records();
    let report = writer.pack(&records, temp_dir.path()).unwrap();

    // Manifest lists 1-4 chunk names, all present on disk
    let manifest = reader.read_manifest(&report.manifest_path).unwrap();
    assert!((1..=4).contains(&manifest.len()));
    for name in manifest.chunks() {
        assert!(name.ends_with(&format!(".{}", CHUNK_EXTENSION)));
        assert!(temp_dir.path().join(name).is_file());
    }

    // All three records come back unchanged
    let restored = reader.unpack(&report.manifest_path).unwrap();
    assert_eq!(restored.len(), 3);
    assert_eq!(restored, records);

    // Index has exactly the three ids
    let index = reader.load_index(&report.manifest_path).unwrap();
    let mut indexed: Vec<_> = index.iter().map(|e| e.id).collect();
    indexed.sort();
    assert_eq!(indexed, sample_ids().to_vec());

    // No record had an address
    let addressables = reader
        .try_load_addressables(&report.manifest_path)
        .unwrap()
        .unwrap();
    assert!(addressables.addresses.is_empty());
    assert!(addressables.groups.is_empty());
}

#[test]
fn test_empty_database() {
    let temp_dir = TempDir::new().unwrap();
    let (writer, reader) = writer_and_reader(
        PackConfig::for_testing(),
        Arc::new(XorEncryptor::new(b"empty")),
    );

    let report = writer.pack(&AssetMap::new(), temp_dir.path()).unwrap();
    assert!(report.chunk_names.is_empty());
    assert!(report.manifest_path.exists());

    assert!(reader.unpack(&report.manifest_path).unwrap().is_empty());
    assert!(reader.load_index(&report.manifest_path).unwrap().is_empty());
    let addressables = reader
        .try_load_addressables(&report.manifest_path)
        .unwrap()
        .unwrap();
    assert!(addressables.is_empty());

    let info = reader.verify(&report.manifest_path).unwrap();
    assert_eq!(info.chunk_count, 0);
    assert_eq!(info.record_count, 0);
}

#[test]
fn test_single_byte_payload_is_one_chunk() {
    let temp_dir = TempDir::new().unwrap();
    let splitter = luma_package::ChunkSplitter::new(8);
    let manifest = splitter
        .write(&[0x5a], temp_dir.path(), &mut StdRng::seed_from_u64(1))
        .unwrap();
    assert_eq!(manifest.len(), 1);

    let joined = ChunkJoiner::new(4).join(temp_dir.path(), &manifest).unwrap();
    assert_eq!(joined, vec![0x5a]);
}

#[test]
fn test_chunks_join_in_manifest_order() {
    let temp_dir = TempDir::new().unwrap();
    let (writer, reader) = writer_and_reader(
        PackConfig::for_testing().with_max_chunks(8),
        Arc::new(IdentityEncryptor),
    );

    let records = addressable_records();
    let mut rng = StdRng::seed_from_u64(42);
    let mut report = writer
        .pack_with_rng(&records, temp_dir.path(), &mut rng)
        .unwrap();
    while report.chunk_names.len() < 2 {
        report = writer
            .pack_with_rng(&records, &temp_dir.path().join("retry"), &mut rng)
            .unwrap();
    }

    let (_, ciphertext) = reader.read_ciphertext(&report.manifest_path).unwrap();
    let by_hand: Vec<u8> = report
        .chunk_names
        .iter()
        .flat_map(|name| {
            let dir = report.manifest_path.parent().unwrap();
            fs::read(dir.join(name)).unwrap()
        })
        .collect();
    assert_eq!(ciphertext, by_hand);
    assert_eq!(ciphertext, BinaryCodec::encode_all(&records).unwrap());
}

#[test]
fn test_repack_is_deterministic_except_for_chunks() {
    let records = addressable_records();
    let (a, b) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    let (writer, reader) =
        writer_and_reader(PackConfig::for_testing(), Arc::new(IdentityEncryptor));

    let ra = writer.pack(&records, a.path()).unwrap();
    let rb = writer.pack(&records, b.path()).unwrap();

    assert_eq!(ra.payload_checksum, rb.payload_checksum);
    assert_eq!(
        fs::read(a.path().join(paths::ADDRESSABLES)).unwrap(),
        fs::read(b.path().join(paths::ADDRESSABLES)).unwrap()
    );
    assert_eq!(
        reader.load_index(&ra.manifest_path).unwrap(),
        reader.load_index(&rb.manifest_path).unwrap()
    );
}

#[test]
fn test_addressables_file_matches_builder() {
    let temp_dir = TempDir::new().unwrap();
    let (writer, reader) =
        writer_and_reader(PackConfig::for_testing(), Arc::new(IdentityEncryptor));

    let records = addressable_records();
    let report = writer.pack(&records, temp_dir.path()).unwrap();
    let (expected, _) = AddressablesIndex::build(&records);
    let loaded = reader
        .try_load_addressables(&report.manifest_path)
        .unwrap()
        .unwrap();
    assert_eq!(loaded, expected);
}

#[test]
fn test_manifest_file_is_plain_text() {
    let temp_dir = TempDir::new().unwrap();
    let (writer, _) = writer_and_reader(PackConfig::for_testing(), Arc::new(IdentityEncryptor));
    let report = writer.pack(&sample_records(), temp_dir.path()).unwrap();

    let text = fs::read_to_string(&report.manifest_path).unwrap();
    let parsed = PackageManifest::parse(&text).unwrap();
    assert_eq!(parsed.chunks(), report.chunk_names.as_slice());
}
