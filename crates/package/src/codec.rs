//! Binary record codec and payload container
//!
//! Records are serialized with MessagePack in positional (array) form, field
//! order as declared on [`AssetRecord`]. The settings blob is already a
//! self-describing byte string, so the codec carries it as msgpack `bin`
//! without knowing its schema.
//!
//! ## Payload container
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ Header (12 bytes)                                               │
//! │   Magic: "LUMAPACK" (8 bytes)                                   │
//! │   Record Count: u32 (4 bytes, LE)                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ For each record, ascending id order:                            │
//! │   Length: u32 (4 bytes, LE)                                     │
//! │   Data: [u8; length] (msgpack AssetRecord)                      │
//! │   CRC32: u32 (4 bytes, LE, over Data)                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The payload is an exact concatenation of the per-record encodings plus
//! framing, so an [`IndexEntry`] offset/size addresses the record's `Data`
//! bytes directly in the decrypted payload.

use crate::error::{PackError, PackResult};
use crate::index::{IndexBuilder, IndexEntry};
use luma_core::{AssetMap, AssetRecord};

/// Magic bytes at the start of every decrypted payload
pub const PAYLOAD_MAGIC: &[u8; 8] = b"LUMAPACK";

/// Header size in bytes: magic (8) + count (4)
pub const PAYLOAD_HEADER_SIZE: usize = 12;

/// Bytes of framing around each record: length (4) + crc (4)
pub const FRAME_OVERHEAD: usize = 8;

/// One framed record inside a decrypted payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Offset of the record data within the payload
    pub offset: u64,
    /// Record data (msgpack)
    pub bytes: &'a [u8],
}

/// MessagePack codec for asset records
pub struct BinaryCodec;

impl BinaryCodec {
    /// Encode one record
    pub fn encode(record: &AssetRecord) -> PackResult<Vec<u8>> {
        Ok(rmp_serde::to_vec(record)?)
    }

    /// Decode one record
    pub fn decode(bytes: &[u8]) -> PackResult<AssetRecord> {
        rmp_serde::from_slice(bytes)
            .map_err(|e| PackError::format(format!("msgpack decode AssetRecord: {}", e)))
    }

    /// Encode a whole database into a payload container
    pub fn encode_all(records: &AssetMap) -> PackResult<Vec<u8>> {
        Self::encode_all_indexed(records).map(|(payload, _)| payload)
    }

    /// Encode a whole database and locate every record in the result
    ///
    /// Fails if a record is keyed under an id other than its own.
    pub fn encode_all_indexed(records: &AssetMap) -> PackResult<(Vec<u8>, Vec<IndexEntry>)> {
        let count = u32::try_from(records.len())
            .map_err(|_| PackError::format(format!("too many records: {}", records.len())))?;

        let mut payload = Vec::with_capacity(PAYLOAD_HEADER_SIZE + records.len() * 128);
        payload.extend_from_slice(PAYLOAD_MAGIC);
        payload.extend_from_slice(&count.to_le_bytes());

        let mut index = IndexBuilder::new(PAYLOAD_HEADER_SIZE as u64);
        for (key, record) in records {
            if *key != record.id {
                return Err(PackError::format(format!(
                    "record keyed under {} carries id {}",
                    key, record.id
                )));
            }

            let data = Self::encode(record)?;
            let len = u32::try_from(data.len()).map_err(|_| {
                PackError::format(format!("record {} too large: {} bytes", key, data.len()))
            })?;

            payload.extend_from_slice(&len.to_le_bytes());
            index.skip(4);
            index.push(record.id, data.len() as u64);
            payload.extend_from_slice(&data);
            payload.extend_from_slice(&crc32fast::hash(&data).to_le_bytes());
            index.skip(4);
        }

        Ok((payload, index.finish()))
    }

    /// Decode a whole payload container on the calling thread
    ///
    /// See [`crate::decode::ParallelDecoder`] for the multi-threaded path.
    pub fn decode_all(payload: &[u8]) -> PackResult<AssetMap> {
        let mut records = AssetMap::new();
        for frame in Self::frames(payload)? {
            let record = Self::decode(frame.bytes)?;
            let id = record.id;
            if records.insert(id, record).is_some() {
                return Err(PackError::format(format!("duplicate record id {}", id)));
            }
        }
        Ok(records)
    }

    /// Split a payload container into its record frames
    ///
    /// Validates the header, every length prefix and every CRC, and rejects
    /// trailing bytes. No record is decoded.
    pub fn frames(payload: &[u8]) -> PackResult<Vec<Frame<'_>>> {
        if payload.len() < PAYLOAD_HEADER_SIZE {
            return Err(PackError::format(format!(
                "payload too short for header: {} bytes",
                payload.len()
            )));
        }
        if &payload[..PAYLOAD_MAGIC.len()] != PAYLOAD_MAGIC {
            return Err(PackError::format("payload is not a record container"));
        }
        let count = read_u32(payload, PAYLOAD_MAGIC.len())? as usize;

        let mut frames = Vec::with_capacity(count.min(payload.len() / FRAME_OVERHEAD));
        let mut pos = PAYLOAD_HEADER_SIZE;
        for i in 0..count {
            let len = read_u32(payload, pos)
                .map_err(|_| PackError::format(format!("frame {} length truncated", i)))?
                as usize;
            let start = pos + 4;
            let end = start
                .checked_add(len)
                .filter(|end| *end <= payload.len().saturating_sub(4))
                .ok_or_else(|| {
                    PackError::format(format!(
                        "frame {} at offset {} overruns payload ({} bytes)",
                        i,
                        pos,
                        payload.len()
                    ))
                })?;
            let data = &payload[start..end];
            check_crc(data, read_u32(payload, end)?, start)?;
            frames.push(Frame {
                offset: start as u64,
                bytes: data,
            });
            pos = end + 4;
        }

        if pos != payload.len() {
            return Err(PackError::format(format!(
                "{} trailing bytes after {} records",
                payload.len() - pos,
                count
            )));
        }
        Ok(frames)
    }

    /// Extract one record's data by its index location
    ///
    /// Checks that `offset`/`size` land exactly on a frame: the length prefix
    /// must equal `size` and the trailing CRC must match.
    pub fn frame_at(payload: &[u8], offset: u64, size: u64) -> PackResult<&[u8]> {
        let out_of_range = || {
            PackError::format(format!(
                "index entry {}+{} outside payload of {} bytes",
                offset,
                size,
                payload.len()
            ))
        };
        let start = usize::try_from(offset).map_err(|_| out_of_range())?;
        let len = usize::try_from(size).map_err(|_| out_of_range())?;
        if start < PAYLOAD_HEADER_SIZE + 4 {
            return Err(out_of_range());
        }
        let end = start
            .checked_add(len)
            .filter(|end| *end <= payload.len().saturating_sub(4))
            .ok_or_else(out_of_range)?;

        let prefix = read_u32(payload, start - 4)? as usize;
        if prefix != len {
            return Err(PackError::format(format!(
                "index entry at {} says {} bytes, frame says {}",
                offset, len, prefix
            )));
        }
        let data = &payload[start..end];
        check_crc(data, read_u32(payload, end)?, start)?;
        Ok(data)
    }
}

fn read_u32(buf: &[u8], pos: usize) -> PackResult<u32> {
    buf.get(pos..pos + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| PackError::format(format!("truncated u32 at offset {}", pos)))
}

fn check_crc(data: &[u8], expected: u32, offset: usize) -> PackResult<()> {
    let actual = crc32fast::hash(data);
    if actual != expected {
        return Err(PackError::format(format!(
            "CRC mismatch for record at offset {}: expected {:08x}, got {:08x}",
            offset, expected, actual
        )));
    }
    Ok(())
}
