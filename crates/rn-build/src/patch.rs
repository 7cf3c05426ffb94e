//! JSON patch application: surveyed corrections layered over the compiled
//! network.
//!
//! The patch document groups corrections per entity type:
//!
//! ```json
//! { "nodes":     { "<id>": { "name": "..." } },
//!   "segments":  { "<id>": { "lane_count": 3, "speed_limit_mps": 15.6,
//!                            "lane_assignment": "left|through|through" } },
//!   "links":     { "<id>": { "speed_limit_mps": 13.4,
//!                            "dedicated_turn_length_m": 40.0 } },
//!   "movements": { "<id>": { "index": 5 } } }
//! ```
//!
//! Each entity type accepts a closed field set; unknown fields and wrongly
//! typed values are warned about and ignored, and ids that are not in the
//! network are skipped.  A patched movement index re-derives the turn
//! class.  Query caches are invalidated afterwards, since patches may run
//! after the first queries.

use serde_json::{Map, Value};
use rn_map::{LinkId, MovementId, Network, NodeId, SegmentId};

use crate::diagnostics::Diagnostics;
use crate::error::BuildResult;

pub(crate) fn apply_patch(
    network: &mut Network,
    patch: &str,
    diag: &mut Diagnostics,
) -> BuildResult<()> {
    let document: Value = serde_json::from_str(patch)?;

    for (id, fields) in entries(&document, "nodes", diag) {
        let node_id = NodeId::from(id.as_str());
        if !network.nodes.contains_key(&node_id) {
            continue;
        }
        for (key, value) in fields {
            match (key.as_str(), value) {
                ("name", Value::String(patched)) => {
                    if let Some(node) = network.nodes.get_mut(&node_id) {
                        let inferred = node.name.as_deref().unwrap_or("null");
                        node.name = Some(format!("{patched}:{inferred}"));
                    }
                }
                ("name", _) => diag.warn(format!("patch: node {id} name is not a string")),
                (other, _) => diag.warn(format!("patch: unknown node field {other:?}")),
            }
        }
    }

    for (id, fields) in entries(&document, "segments", diag) {
        let segment_id = SegmentId::from(id.as_str());
        let Some(segment) = network.segments.get_mut(&segment_id) else {
            continue;
        };
        for (key, value) in fields {
            match (key.as_str(), value) {
                ("lane_count", Value::Number(n)) if n.as_u64().is_some() => {
                    segment.lane_count = n.as_u64().unwrap_or_default() as u32;
                }
                ("speed_limit_mps", value) if value.as_f64().is_some() => {
                    segment.speed_limit_mps = value.as_f64().unwrap_or_default();
                }
                ("lane_assignment", Value::String(assignment)) => {
                    segment.lane_assignment = Some(assignment);
                }
                ("lane_count" | "speed_limit_mps" | "lane_assignment", _) => {
                    diag.warn(format!("patch: segment {id} field {key} has the wrong type"));
                }
                (other, _) => diag.warn(format!("patch: unknown segment field {other:?}")),
            }
        }
    }

    for (id, fields) in entries(&document, "links", diag) {
        let link_id = LinkId::from(id.as_str());
        let Some(link) = network.links.get_mut(&link_id) else {
            continue;
        };
        for (key, value) in fields {
            match (key.as_str(), value) {
                ("speed_limit_mps", value) if value.as_f64().is_some() => {
                    link.speed_limit_mps = value.as_f64().unwrap_or_default();
                }
                ("dedicated_turn_length_m", value) if value.as_f64().is_some() => {
                    link.dedicated_turn_length_m = value.as_f64().unwrap_or_default();
                }
                ("speed_limit_mps" | "dedicated_turn_length_m", _) => {
                    diag.warn(format!("patch: link {id} field {key} has the wrong type"));
                }
                (other, _) => diag.warn(format!("patch: unknown link field {other:?}")),
            }
        }
    }

    for (id, fields) in entries(&document, "movements", diag) {
        let movement_id = MovementId::from(id.as_str());
        let Some(movement) = network.movements.get_mut(&movement_id) else {
            continue;
        };
        for (key, value) in fields {
            match (key.as_str(), value) {
                ("index", Value::Number(n)) if n.as_u64().is_some_and(|v| v <= 16) => {
                    movement.index = Some(n.as_u64().unwrap_or_default() as u8);
                    movement.refresh_turn();
                }
                ("index", _) => {
                    diag.warn(format!("patch: movement {id} index is not a valid phase"));
                }
                (other, _) => diag.warn(format!("patch: unknown movement field {other:?}")),
            }
        }
    }

    network.invalidate_caches();
    Ok(())
}

/// Pull one per-type correction table out of the document.
fn entries(
    document: &Value,
    table: &str,
    diag: &mut Diagnostics,
) -> Vec<(String, Map<String, Value>)> {
    let Some(value) = document.get(table) else {
        return Vec::new();
    };
    let Some(object) = value.as_object() else {
        diag.warn(format!("patch: {table} is not an object"));
        return Vec::new();
    };
    object
        .iter()
        .filter_map(|(id, fields)| match fields.as_object() {
            Some(map) => Some((id.clone(), map.clone())),
            None => {
                diag.warn(format!("patch: {table} entry {id} is not an object"));
                None
            }
        })
        .collect()
}
