//! Corruption detection tests
//!
//! A damaged package must fail to load. It must never come back as a
//! database that is silently missing records.

use luma_package::testing::{sample_ids, sample_records, truncate_last_chunk, XorEncryptor};
use luma_package::{
    paths, Encryptor, IdentityEncryptor, PackConfig, PackError, PackReport, PackageReader,
    PackageWriter, SingleAssetLoader,
};
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn pack(dir: &Path, encryptor: Arc<dyn Encryptor>) -> PackReport {
    PackageWriter::new(PackConfig::for_testing(), encryptor)
        .unwrap()
        .pack(&sample_records(), dir)
        .unwrap()
}

fn reader(encryptor: Arc<dyn Encryptor>) -> PackageReader {
    PackageReader::new(PackConfig::for_testing(), encryptor).unwrap()
}

fn flip_byte(path: &Path, offset: u64) {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .unwrap();
    file.seek(SeekFrom::Start(offset)).unwrap();
    let mut buf = [0u8; 1];
    file.read_exact(&mut buf).unwrap();
    buf[0] ^= 0xFF;
    file.seek(SeekFrom::Start(offset)).unwrap();
    file.write_all(&buf).unwrap();
}

#[test]
fn test_truncated_last_chunk_keyed_encryptor() {
    let temp_dir = TempDir::new().unwrap();
    let encryptor: Arc<dyn Encryptor> = Arc::new(XorEncryptor::new(b"trunc"));
    let report = pack(temp_dir.path(), Arc::clone(&encryptor));

    truncate_last_chunk(&report.manifest_path).unwrap();

    let err = reader(encryptor).unpack(&report.manifest_path).unwrap_err();
    assert!(err.is_crypto() || err.is_format(), "unexpected error: {}", err);
}

#[test]
fn test_truncated_last_chunk_identity_encryptor() {
    let temp_dir = TempDir::new().unwrap();
    let encryptor: Arc<dyn Encryptor> = Arc::new(IdentityEncryptor);
    let report = pack(temp_dir.path(), Arc::clone(&encryptor));

    truncate_last_chunk(&report.manifest_path).unwrap();

    // Nothing checks the ciphertext, so the frame checks must catch it
    let err = reader(encryptor).unpack(&report.manifest_path).unwrap_err();
    assert!(err.is_format(), "unexpected error: {}", err);
}

#[test]
fn test_bit_flip_in_payload_detected() {
    let temp_dir = TempDir::new().unwrap();
    let encryptor: Arc<dyn Encryptor> = Arc::new(IdentityEncryptor);
    let report = pack(temp_dir.path(), Arc::clone(&encryptor));

    let first = temp_dir.path().join(&report.chunk_names[0]);
    let len = fs::metadata(&first).unwrap().len();
    flip_byte(&first, len / 2);

    let result = reader(encryptor).unpack(&report.manifest_path);
    assert!(result.is_err());
}

#[test]
fn test_missing_chunk_file() {
    let temp_dir = TempDir::new().unwrap();
    let encryptor: Arc<dyn Encryptor> = Arc::new(IdentityEncryptor);
    let report = pack(temp_dir.path(), Arc::clone(&encryptor));

    fs::remove_file(temp_dir.path().join(&report.chunk_names[0])).unwrap();

    let err = reader(encryptor).unpack(&report.manifest_path).unwrap_err();
    assert!(matches!(err, PackError::MissingFile(_)));
    assert!(err.is_format());
}

#[test]
fn test_missing_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let encryptor: Arc<dyn Encryptor> = Arc::new(IdentityEncryptor);
    let report = pack(temp_dir.path(), Arc::clone(&encryptor));

    fs::remove_file(&report.manifest_path).unwrap();

    let err = reader(encryptor).unpack(&report.manifest_path).unwrap_err();
    assert!(err.is_format());
}

#[test]
fn test_malformed_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let encryptor: Arc<dyn Encryptor> = Arc::new(IdentityEncryptor);
    let report = pack(temp_dir.path(), Arc::clone(&encryptor));

    fs::write(&report.manifest_path, "../../etc/passwd\n").unwrap();

    let err = reader(encryptor).unpack(&report.manifest_path).unwrap_err();
    assert!(err.is_format());
}

#[test]
fn test_swapped_chunks_detected() {
    let temp_dir = TempDir::new().unwrap();
    let encryptor: Arc<dyn Encryptor> = Arc::new(XorEncryptor::new(b"order"));
    let writer = PackageWriter::new(PackConfig::for_testing(), Arc::clone(&encryptor)).unwrap();

    let mut attempt = 0;
    let report = loop {
        let dir = temp_dir.path().join(attempt.to_string());
        let report = writer.pack(&sample_records(), &dir).unwrap();
        if report.chunk_names.len() >= 2 {
            break report;
        }
        attempt += 1;
    };

    let mut names = report.chunk_names.clone();
    names.swap(0, 1);
    fs::write(&report.manifest_path, names.join("\n")).unwrap();

    assert!(reader(encryptor).unpack(&report.manifest_path).is_err());
}

#[test]
fn test_wrong_key_is_crypto_error() {
    let temp_dir = TempDir::new().unwrap();
    let report = pack(temp_dir.path(), Arc::new(XorEncryptor::new(b"right")));

    let err = reader(Arc::new(XorEncryptor::new(b"wrong")))
        .unpack(&report.manifest_path)
        .unwrap_err();
    assert!(err.is_crypto());
}

#[test]
fn test_corrupt_index_fails_single_load() {
    let temp_dir = TempDir::new().unwrap();
    let encryptor: Arc<dyn Encryptor> = Arc::new(XorEncryptor::new(b"idx"));
    let report = pack(temp_dir.path(), Arc::clone(&encryptor));

    flip_byte(&temp_dir.path().join(paths::INDEX), 3);

    let loader = SingleAssetLoader::new(PackConfig::for_testing(), encryptor).unwrap();
    assert!(loader
        .load_by_id(&report.manifest_path, sample_ids()[0])
        .is_err());
}

#[test]
fn test_truncated_chunk_fails_single_load() {
    let temp_dir = TempDir::new().unwrap();
    let encryptor: Arc<dyn Encryptor> = Arc::new(XorEncryptor::new(b"single"));
    let report = pack(temp_dir.path(), Arc::clone(&encryptor));

    truncate_last_chunk(&report.manifest_path).unwrap();

    let loader = SingleAssetLoader::new(PackConfig::for_testing(), encryptor).unwrap();
    let err = loader
        .load_by_id(&report.manifest_path, sample_ids()[2])
        .unwrap_err();
    assert!(err.is_crypto() || err.is_format());
    // Failed decrypts are not cached
    assert!(loader.cache().is_empty());
}
