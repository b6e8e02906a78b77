//! Scene decoding: runs the compiled schema over the data chunk and
//! extracts the node-change list and blob table from the resulting object
//! graph. Field names shift across format versions, so extraction falls
//! back to shape-based scans when the conventional names are absent.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{BlobStore, NodeChange};
use crate::schema::CompiledSchema;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("data chunk does not decode: {0}")]
    Decode(String),
    #[error("decoded data is not an object")]
    NotAnObject,
    #[error("no node-change list found in decoded data")]
    NoNodeChanges,
}

/// The flat decode result: filtered (non-removed) change records plus the
/// blob table they reference.
#[derive(Debug, Default)]
pub struct DecodedScene {
    pub changes: Vec<NodeChange>,
    pub blobs: BlobStore,
}

/// Decode the data chunk against the compiled schema.
pub fn decode_scene_chunk(
    schema: &CompiledSchema,
    data: &[u8],
) -> Result<DecodedScene, SceneError> {
    let root_name = schema
        .root_message()
        .ok_or_else(|| SceneError::Decode("schema defines no message type".to_string()))?;
    let value = schema
        .decode_value(root_name, data)
        .map_err(|e| SceneError::Decode(e.to_string()))?;
    let Value::Object(mut root) = value else {
        return Err(SceneError::NotAnObject);
    };

    let blobs = extract_blobs(&root);
    let raw = extract_node_changes(&mut root)?;

    let total = raw.len();
    let mut changes = Vec::with_capacity(total);
    for record in raw {
        match serde_json::from_value::<NodeChange>(record) {
            Ok(change) => {
                if !change.is_removed() {
                    changes.push(change);
                }
            }
            Err(e) => warn!("skipping undecodable change record: {e}"),
        }
    }
    debug!(
        records = total,
        kept = changes.len(),
        blobs = blobs.len(),
        "scene decoded"
    );
    Ok(DecodedScene { changes, blobs })
}

/// Pull the change list out of the decoded root object: the conventional
/// `nodeChanges` field, or any top-level array whose first element carries
/// a guid-shaped member.
fn extract_node_changes(root: &mut Map<String, Value>) -> Result<Vec<Value>, SceneError> {
    let has_changes = matches!(root.get("nodeChanges"), Some(Value::Array(items)) if !items.is_empty());
    if has_changes
        && let Some(Value::Array(items)) = root.remove("nodeChanges")
    {
        return Ok(items);
    }

    let fallback_key = root.iter().find_map(|(key, value)| {
        if let Value::Array(items) = value
            && let Some(first) = items.first()
            && first.get("guid").is_some_and(Value::is_object)
        {
            Some(key.clone())
        } else {
            None
        }
    });
    if let Some(key) = fallback_key
        && let Some(Value::Array(items)) = root.remove(&key)
    {
        debug!(field = %key, "node changes found under non-standard field");
        return Ok(items);
    }
    Err(SceneError::NoNodeChanges)
}

/// Extract the blob table. Absent or malformed entries become empty byte
/// arrays rather than failing the decode.
fn extract_blobs(root: &Map<String, Value>) -> BlobStore {
    let Some(Value::Array(entries)) = root.get("blobs") else {
        return BlobStore::default();
    };
    BlobStore::new(entries.iter().map(blob_bytes).collect())
}

fn blob_bytes(entry: &Value) -> Vec<u8> {
    let payload = entry.get("bytes").unwrap_or(entry);
    match payload {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_u64)
            .map(|n| n as u8)
            .collect(),
        Value::String(s) => s.clone().into_bytes(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn extracts_conventional_node_changes() {
        let mut root = as_map(json!({
            "nodeChanges": [{"guid": {"sessionID": 0, "localID": 1}}]
        }));
        let items = extract_node_changes(&mut root).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn falls_back_to_guid_shaped_array() {
        let mut root = as_map(json!({
            "sceneGraphEntries": [
                {"guid": {"sessionID": 0, "localID": 1}, "type": "DOCUMENT"}
            ],
            "blobs": []
        }));
        let items = extract_node_changes(&mut root).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn missing_change_list_is_an_error() {
        let mut root = as_map(json!({"unrelated": [1, 2, 3]}));
        assert!(matches!(
            extract_node_changes(&mut root),
            Err(SceneError::NoNodeChanges)
        ));
    }

    #[test]
    fn malformed_blob_entries_become_empty() {
        let root = as_map(json!({
            "blobs": [
                {"bytes": [1, 2, 3]},
                {"bytes": "raw"},
                42,
                {"bytes": null}
            ]
        }));
        let blobs = extract_blobs(&root);
        assert_eq!(blobs.len(), 4);
        assert_eq!(blobs.bytes(0), Some(&[1u8, 2, 3][..]));
        assert_eq!(blobs.bytes(1), Some(&b"raw"[..]));
        assert_eq!(blobs.bytes(2), Some(&[][..]));
        assert_eq!(blobs.bytes(3), Some(&[][..]));
    }
}
