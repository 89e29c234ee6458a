//! Serialization utilities for simulation state.

use crate::error::SimResult;
use crate::terrain::TerrainSnapshot;
use crate::world::Snapshot;

/// Serialize a snapshot to JSON bytes.
pub fn snapshot_to_json(snapshot: &Snapshot) -> SimResult<Vec<u8>> {
    Ok(serde_json::to_vec(snapshot)?)
}

/// Serialize a snapshot to a JSON string.
pub fn snapshot_to_json_string(snapshot: &Snapshot) -> SimResult<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Deserialize a snapshot from JSON bytes.
pub fn snapshot_from_json(data: &[u8]) -> SimResult<Snapshot> {
    Ok(serde_json::from_slice(data)?)
}

/// Deserialize a snapshot from a JSON string.
pub fn snapshot_from_json_string(data: &str) -> SimResult<Snapshot> {
    Ok(serde_json::from_str(data)?)
}

pub fn terrain_to_json_string(terrain: &TerrainSnapshot) -> SimResult<String> {
    Ok(serde_json::to_string(terrain)?)
}

pub fn terrain_from_json_string(data: &str) -> SimResult<TerrainSnapshot> {
    Ok(serde_json::from_str(data)?)
}
