//! Merge link-wise segment chains that carry identical lane profiles.

use rn_core::Polyline;
use rn_map::{LinkId, Network, NodeId, Segment, SegmentId};

/// Neighboring segments whose speed limits differ by no more than this are
/// merge candidates.
const SPEED_TOLERANCE_MPS: f64 = 0.1;

/// Collapse runs of consecutive same-profile segments inside every link.
///
/// Two neighbors merge when their lane counts are equal and their speed
/// limits are within [`SPEED_TOLERANCE_MPS`].  The merged segment keeps the
/// head's id and accumulates the run's source ways, length, nodes, and
/// geometry; it inherits the tail's downstream wiring.  Interior joint
/// nodes become unreferenced and are dropped from the arena, and the
/// segment arena is rebuilt from link membership so orphaned pieces
/// disappear too.
pub(crate) fn consolidate_segments(network: &mut Network) {
    let link_ids: Vec<LinkId> = network.links.keys().cloned().collect();
    for link_id in link_ids {
        let Some(link) = network.links.get(&link_id) else {
            continue;
        };
        let chain = link.segments.clone();

        let mut groups: Vec<Vec<SegmentId>> = Vec::new();
        for id in chain {
            let extend = groups.last().and_then(|g| g.last()).is_some_and(|previous| {
                match (network.segments.get(previous), network.segments.get(&id)) {
                    (Some(a), Some(b)) => {
                        a.lane_count == b.lane_count
                            && (a.speed_limit_mps - b.speed_limit_mps).abs()
                                <= SPEED_TOLERANCE_MPS
                    }
                    _ => false,
                }
            });
            if extend {
                if let Some(group) = groups.last_mut() {
                    group.push(id);
                }
            } else {
                groups.push(vec![id]);
            }
        }

        let mut merged_chain = Vec::with_capacity(groups.len());
        let mut dropped_joints: Vec<NodeId> = Vec::new();
        for group in groups {
            let (survivor, joints) = merge_group(network, &group);
            merged_chain.push(survivor);
            dropped_joints.extend(joints);
        }

        if let Some(link) = network.links.get_mut(&link_id) {
            link.segments = merged_chain;
            link.nodes.retain(|node| !dropped_joints.contains(node));
        }
    }

    let surviving: std::collections::BTreeMap<SegmentId, Segment> = network
        .links
        .values()
        .flat_map(|link| link.segments.iter())
        .filter_map(|id| network.segments.get(id).map(|s| (id.clone(), s.clone())))
        .collect();
    network.segments = surviving;
}

/// Merge one run into its head segment.  Returns the surviving id and the
/// joint nodes that dropped out of the arena.
fn merge_group(network: &mut Network, group: &[SegmentId]) -> (SegmentId, Vec<NodeId>) {
    let head_id = match group.first() {
        Some(id) => id.clone(),
        None => return (SegmentId::default(), Vec::new()),
    };
    if group.len() == 1 {
        return (head_id, Vec::new());
    }

    let members: Vec<Segment> = group
        .iter()
        .filter_map(|id| network.segments.get(id).cloned())
        .collect();
    let Some(last) = members.last().filter(|_| members.len() == group.len()) else {
        return (head_id, Vec::new());
    };

    let joints: Vec<NodeId> = members[..members.len() - 1]
        .iter()
        .map(|m| m.downstream_node.clone())
        .collect();

    let mut source_ways = Vec::new();
    let mut nodes: Vec<NodeId> = Vec::new();
    let mut geometry = Polyline::default();
    let mut length = 0.0;
    for (position, member) in members.iter().enumerate() {
        source_ways.extend(member.source_ways.iter().cloned());
        length += member.length_m;
        if position == 0 {
            nodes.extend(member.nodes.iter().cloned());
            geometry = member.geometry.clone();
        } else {
            nodes.extend(member.nodes.iter().skip(1).cloned());
            geometry.append(&member.geometry, true);
        }
    }
    nodes.retain(|node| !joints.contains(node));

    if let Some(head) = network.segments.get_mut(&head_id) {
        head.source_ways = source_ways;
        head.nodes = nodes;
        head.length_m = length;
        head.geometry = geometry;
        head.downstream_segments = last.downstream_segments.clone();
        head.downstream_turns = last.downstream_turns.clone();
        head.downstream_node = last.downstream_node.clone();
        head.lane_assignment = last.lane_assignment.clone();
    }

    if let Some(node) = network.nodes.get_mut(&last.downstream_node) {
        node.remove_upstream_segment(&last.id);
        if !node.upstream_segments.contains(&head_id) {
            node.upstream_segments.push(head_id.clone());
        }
    }
    // the tail's successors now follow the merged head
    for down_id in &last.downstream_segments {
        if let Some(down) = network.segments.get_mut(down_id) {
            for upstream in &mut down.upstream_segments {
                if *upstream == last.id {
                    *upstream = head_id.clone();
                }
            }
        }
    }
    for joint in &joints {
        network.nodes.remove(joint);
    }
    (head_id, joints)
}
