//! Versioned snapshot encoding for the metric tree.
//!
//! Layout (little-endian):
//!
//! ```text
//! magic     [u8; 4]   b"LXTS"
//! version   u32       SNAPSHOT_FORMAT_VERSION
//! checksum  u32       CRC-32 of the payload
//! length    u64       payload length in bytes
//! payload   [u8]      JSON { created_at, word_count, nodes }
//! ```
//!
//! Only structure is stored: words and edge labels. The distance metric is
//! never part of a snapshot and must be bound again after decoding.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LexitreeError, Result};
use crate::spelling::tree::{Node, TreeStructure};

pub const SNAPSHOT_MAGIC: [u8; 4] = *b"LXTS";
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;
pub const SNAPSHOT_HEADER_LEN: usize = 4 + 4 + 4 + 8;

#[derive(Serialize)]
struct SnapshotBodyRef<'a> {
    created_at: DateTime<Utc>,
    word_count: usize,
    nodes: &'a [Node],
}

#[derive(Deserialize)]
struct SnapshotBody {
    created_at: DateTime<Utc>,
    word_count: usize,
    nodes: Vec<Node>,
}

/// Fixed-size header preceding the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub version: u32,
    pub checksum: u32,
    pub payload_len: u64,
}

/// A decoded snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub created_at: DateTime<Utc>,
    pub structure: TreeStructure,
}

/// Encode a tree structure stamped with the current time.
pub fn encode(structure: &TreeStructure) -> Result<Vec<u8>> {
    encode_at(structure, Utc::now())
}

/// Encode a tree structure with an explicit creation time.
pub fn encode_at(structure: &TreeStructure, created_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let body = SnapshotBodyRef {
        created_at,
        word_count: structure.len(),
        nodes: structure.nodes(),
    };
    let payload = serde_json::to_vec(&body)
        .map_err(|e| LexitreeError::snapshot_write(format!("failed to encode snapshot: {e}")))?;

    let mut bytes = Vec::with_capacity(SNAPSHOT_HEADER_LEN + payload.len());
    bytes.extend_from_slice(&SNAPSHOT_MAGIC);
    bytes.write_u32::<LittleEndian>(SNAPSHOT_FORMAT_VERSION)?;
    bytes.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
    bytes.write_u64::<LittleEndian>(payload.len() as u64)?;
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Read and check the header, leaving `reader` at the start of the payload.
pub fn read_header<R: Read>(reader: &mut R) -> Result<SnapshotHeader> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).map_err(truncated)?;
    if magic != SNAPSHOT_MAGIC {
        return Err(LexitreeError::snapshot_read(format!(
            "unrecognized snapshot magic {magic:02x?}"
        )));
    }

    let version = reader.read_u32::<LittleEndian>().map_err(truncated)?;
    if version != SNAPSHOT_FORMAT_VERSION {
        return Err(LexitreeError::snapshot_read(format!(
            "unsupported snapshot version {version}, expected {SNAPSHOT_FORMAT_VERSION}"
        )));
    }

    let checksum = reader.read_u32::<LittleEndian>().map_err(truncated)?;
    let payload_len = reader.read_u64::<LittleEndian>().map_err(truncated)?;

    Ok(SnapshotHeader {
        version,
        checksum,
        payload_len,
    })
}

/// Decode a snapshot, rejecting anything that is not a complete, intact,
/// current-version tree.
pub fn decode(bytes: &[u8]) -> Result<Snapshot> {
    let mut payload = bytes;
    let header = read_header(&mut payload)?;

    if payload.len() as u64 != header.payload_len {
        return Err(LexitreeError::snapshot_read(format!(
            "payload length mismatch: header says {} bytes, found {}",
            header.payload_len,
            payload.len()
        )));
    }

    let checksum = crc32fast::hash(payload);
    if checksum != header.checksum {
        return Err(LexitreeError::snapshot_read(format!(
            "checksum mismatch: expected {:08x}, computed {checksum:08x}",
            header.checksum
        )));
    }

    let body: SnapshotBody = serde_json::from_slice(payload)
        .map_err(|e| LexitreeError::snapshot_read(format!("invalid snapshot payload: {e}")))?;

    if body.word_count != body.nodes.len() {
        return Err(LexitreeError::snapshot_read(format!(
            "snapshot declares {} words but holds {}",
            body.word_count,
            body.nodes.len()
        )));
    }

    Ok(Snapshot {
        created_at: body.created_at,
        structure: TreeStructure::from_nodes(body.nodes)?,
    })
}

fn truncated(e: std::io::Error) -> LexitreeError {
    LexitreeError::snapshot_read(format!("truncated snapshot header: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spelling::tree::MetricTree;

    fn sample_structure() -> TreeStructure {
        let mut tree: MetricTree = MetricTree::default();
        for word in ["cat", "cats", "bat", "bar"] {
            tree.insert(word);
        }
        tree.into_structure()
    }

    #[test]
    fn test_encode_decode() {
        let structure = sample_structure();
        let created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let bytes = encode_at(&structure, created_at).unwrap();
        assert_eq!(&bytes[..4], b"LXTS");

        let snapshot = decode(&bytes).unwrap();
        assert_eq!(snapshot.structure, structure);
        assert_eq!(snapshot.created_at, created_at);
    }

    #[test]
    fn test_empty_structure() {
        let bytes = encode(&TreeStructure::new()).unwrap();
        let snapshot = decode(&bytes).unwrap();
        assert!(snapshot.structure.is_empty());
    }

    #[test]
    fn test_header() {
        let bytes = encode(&sample_structure()).unwrap();
        let header = read_header(&mut &bytes[..]).unwrap();
        assert_eq!(header.version, SNAPSHOT_FORMAT_VERSION);
        assert_eq!(
            header.payload_len as usize,
            bytes.len() - SNAPSHOT_HEADER_LEN
        );
    }

    #[test]
    fn test_rejects_truncation() {
        let bytes = encode(&sample_structure()).unwrap();
        for len in [0, 3, SNAPSHOT_HEADER_LEN - 1, SNAPSHOT_HEADER_LEN, bytes.len() - 1] {
            assert!(
                matches!(decode(&bytes[..len]), Err(LexitreeError::SnapshotRead(_))),
                "accepted snapshot truncated to {len} bytes"
            );
        }
    }

    #[test]
    fn test_rejects_corruption() {
        let mut bytes = encode(&sample_structure()).unwrap();
        let last = bytes.len() - 2;
        bytes[last] ^= 0x20;
        assert!(matches!(decode(&bytes), Err(LexitreeError::SnapshotRead(_))));
    }

    #[test]
    fn test_rejects_unknown_magic_and_version() {
        let bytes = encode(&sample_structure()).unwrap();

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(decode(&bad_magic).is_err());

        let mut future = bytes.clone();
        future[4..8].copy_from_slice(&2u32.to_le_bytes());
        match decode(&future) {
            Err(LexitreeError::SnapshotRead(msg)) => assert!(msg.contains("version 2")),
            other => panic!("Expected snapshot read error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_foreign_payload_with_valid_envelope() {
        let payload = br#"{"spell_checker":{"bk_tree":[]}}"#;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&SNAPSHOT_MAGIC);
        bytes.extend_from_slice(&SNAPSHOT_FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
        bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
        bytes.extend_from_slice(payload);

        assert!(matches!(decode(&bytes), Err(LexitreeError::SnapshotRead(_))));
    }
}
