//! Directed segment generation from ways, and connector promotion.

use rn_map::{Network, NodeKind, Segment, SegmentDirection, SegmentId, WayId};

use crate::diagnostics::Diagnostics;

/// Turn every way into one or two directed segments and promote the
/// ordinary nodes they end at to connectors.
///
/// The forward segment always exists; the backward one only when the way
/// is not a oneway (`backward_lanes ≥ 0` — zero is anomalous but still
/// generated, with an error recorded).  Segments without a lane assignment
/// get `"all_through"` off intersections and `"null"` at them, for the
/// laneset stage to resolve.
pub(crate) fn generate_segments(network: &mut Network, diag: &mut Diagnostics) {
    let way_ids: Vec<WayId> = network.ways.keys().cloned().collect();
    for way_id in way_ids {
        let Some(way) = network.ways.get(&way_id).cloned() else {
            continue;
        };
        if way.backward_lanes >= 0 {
            if way.backward_lanes == 0 {
                diag.error(format!("way {way_id} backward direction has zero lanes"));
            }
            network.add_segment(Segment::from_way(&way, SegmentDirection::Backward));
        }
        network.add_segment(Segment::from_way(&way, SegmentDirection::Forward));
    }

    let segment_ids: Vec<SegmentId> = network.segments.keys().cloned().collect();
    for segment_id in &segment_ids {
        let Some(segment) = network.segments.get(segment_id) else {
            continue;
        };
        let upstream = segment.upstream_node.clone();
        let downstream = segment.downstream_node.clone();

        if segment.lane_assignment.is_none() {
            let at_intersection = network
                .nodes
                .get(&downstream)
                .is_some_and(|node| node.is_intersection());
            let assignment = if at_intersection { "null" } else { "all_through" };
            if let Some(segment) = network.segments.get_mut(segment_id) {
                segment.lane_assignment = Some(assignment.to_string());
            }
        }

        if let Some(node) = network.nodes.get_mut(&upstream) {
            node.downstream_segments.push(segment_id.clone());
        }
        if let Some(node) = network.nodes.get_mut(&downstream) {
            node.upstream_segments.push(segment_id.clone());
        }
    }

    // an ordinary node that ends a segment is a connector, not a shape point
    for node in network.nodes.values_mut() {
        if node.is_ordinary() && !node.upstream_segments.is_empty() {
            node.kind = NodeKind::Connector;
        }
    }
}
