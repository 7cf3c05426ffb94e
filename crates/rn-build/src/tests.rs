//! End-to-end pipeline tests over small in-memory OSM extracts.

use rn_core::Turn;
use rn_map::NodeKind;

use crate::pipeline::{build_network, BuildMode, BuildOptions, BuildOutput};
use crate::Diagnostics;

// ── Fixture helpers ───────────────────────────────────────────────────────────

fn osm_node(id: &str, lat: f64, lon: f64, tags: &[(&str, &str)]) -> String {
    let tags: String = tags
        .iter()
        .map(|(k, v)| format!(r#"<tag k="{k}" v="{v}"/>"#))
        .collect();
    format!(r#"<node id="{id}" lat="{lat}" lon="{lon}">{tags}</node>"#)
}

fn osm_way(id: &str, refs: &[&str], tags: &[(&str, &str)]) -> String {
    let refs: String = refs.iter().map(|r| format!(r#"<nd ref="{r}"/>"#)).collect();
    let tags: String = tags
        .iter()
        .map(|(k, v)| format!(r#"<tag k="{k}" v="{v}"/>"#))
        .collect();
    format!(r#"<way id="{id}">{refs}{tags}</way>"#)
}

fn osm_doc(elements: &[String]) -> String {
    format!(
        r#"<osm version="0.6"><bounds minlat="44.99" minlon="-93.01" maxlat="45.01" maxlon="-92.99"/>{}</osm>"#,
        elements.concat()
    )
}

/// A signalized four-approach cross: node 1 in the middle, arm-end nodes
/// 2 (north), 3 (south), 4 (east), 5 (west), one two-way single-way arm
/// each.  North/south carry "Main St", east/west "Washington Ave".
fn cross_xml() -> String {
    let main = [("name", "Main St"), ("maxspeed", "30 mph")];
    let washington = [("name", "Washington Ave"), ("maxspeed", "30 mph")];
    osm_doc(&[
        osm_node("1", 45.000, -93.000, &[("highway", "traffic_signals")]),
        osm_node("2", 45.002, -93.000, &[]),
        osm_node("3", 44.998, -93.000, &[]),
        osm_node("4", 45.000, -92.997, &[]),
        osm_node("5", 45.000, -93.003, &[]),
        osm_node("99", 45.005, -93.005, &[]),
        osm_way(
            "10",
            &["2", "1"],
            &[
                ("name", "Main St"),
                ("maxspeed", "30 mph"),
                ("stopbar:1_8", "45.0001,-93.0001|45.0002,-93.0002"),
            ],
        ),
        osm_way("11", &["3", "1"], &[
            ("name", "Main St"),
            ("maxspeed", "30 mph"),
            ("clearance:1", "45.0,-93.0"),
        ]),
        osm_way("12", &["4", "1"], &washington),
        osm_way("13", &["5", "1"], &washington),
        osm_way("77", &["2"], &main),
    ])
}

fn build(xml: &str, mode: BuildMode) -> BuildOutput {
    let options = BuildOptions {
        mode,
        ..BuildOptions::new("test")
    };
    build_network(xml, &options).unwrap()
}

// ── Ingestion ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ingest {
    use super::*;

    #[test]
    fn document_entities_are_loaded() {
        let out = build(&cross_xml(), BuildMode::MapMatching);
        assert!(out.network.bounds.is_some());
        assert!(out.network.nodes.contains_key(&"1".into()));
        assert_eq!(out.network.nodes.len(), 5);
    }

    #[test]
    fn unreferenced_nodes_are_dropped() {
        let out = build(&cross_xml(), BuildMode::MapMatching);
        assert!(!out.network.nodes.contains_key(&"99".into()));
    }

    #[test]
    fn degenerate_ways_are_dropped() {
        let out = build(&cross_xml(), BuildMode::MapMatching);
        assert!(!out.network.ways.contains_key(&"77".into()));
    }

    #[test]
    fn malformed_node_is_skipped_with_warning() {
        let xml = r#"<osm version="0.6"><node id="8" lat="45.0"/></osm>"#;
        let out = build(xml, BuildMode::MapMatching);
        assert!(out.network.nodes.is_empty());
        assert!(!out.diagnostics.is_clean());
    }

    #[test]
    fn broken_xml_is_a_hard_error() {
        let options = BuildOptions::new("test");
        assert!(build_network("<osm><node", &options).is_err());
    }
}

// ── Node classification ───────────────────────────────────────────────────────

#[cfg(test)]
mod classify {
    use super::*;

    #[test]
    fn cross_center_is_signalized() {
        let out = build(&cross_xml(), BuildMode::MapMatching);
        assert_eq!(out.network.nodes[&"1".into()].kind, NodeKind::Signalized);
        assert_eq!(out.network.signalized_nodes, vec!["1".into()]);
        assert_eq!(out.network.end_nodes.len(), 4);
    }

    #[test]
    fn untagged_junction_is_unsignalized() {
        let xml = cross_xml().replace(r#"<tag k="highway" v="traffic_signals"/>"#, "");
        let out = build(&xml, BuildMode::MapMatching);
        assert_eq!(out.network.nodes[&"1".into()].kind, NodeKind::Unsignalized);
        assert_eq!(out.network.unsignalized_nodes, vec!["1".into()]);
    }

    #[test]
    fn degree_two_nodes_stay_ordinary_before_segments() {
        // a bare two-way chain has no intersections at all
        let xml = osm_doc(&[
            osm_node("1", 45.000, -93.000, &[]),
            osm_node("2", 45.001, -93.000, &[]),
            osm_node("3", 45.002, -93.000, &[]),
            osm_way("10", &["1", "2"], &[("lanes", "2")]),
            osm_way("11", &["2", "3"], &[("lanes", "2")]),
        ]);
        let out = build(&xml, BuildMode::MapMatching);
        assert!(out.network.signalized_nodes.is_empty());
        assert!(out.network.unsignalized_nodes.is_empty());
        assert_eq!(out.network.end_nodes.len(), 2);
    }
}

// ── Way splitting ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod split {
    use super::*;

    /// North-south road traverses the junction as one way; east and west
    /// arms terminate there.
    fn traversing_xml() -> String {
        osm_doc(&[
            osm_node("1", 45.000, -93.000, &[("highway", "traffic_signals")]),
            osm_node("2", 45.002, -93.000, &[]),
            osm_node("3", 44.998, -93.000, &[]),
            osm_node("4", 45.000, -92.997, &[]),
            osm_node("5", 45.000, -93.003, &[]),
            osm_way("10", &["2", "1", "3"], &[("name", "Main St")]),
            osm_way("12", &["4", "1"], &[("name", "Washington Ave")]),
            osm_way("13", &["5", "1"], &[("name", "Washington Ave")]),
        ])
    }

    #[test]
    fn traversed_way_is_cut_at_the_junction() {
        let out = build(&traversing_xml(), BuildMode::MapMatching);
        assert!(!out.network.ways.contains_key(&"10".into()));
        let north = &out.network.ways[&"100".into()];
        let south = &out.network.ways[&"101".into()];
        assert_eq!(north.nodes, vec!["2".into(), "1".into()]);
        assert_eq!(south.nodes, vec!["1".into(), "3".into()]);
    }

    #[test]
    fn pieces_inherit_parent_tags() {
        let out = build(&traversing_xml(), BuildMode::MapMatching);
        let piece = &out.network.ways[&"100".into()];
        assert_eq!(piece.name, "Main St");
    }

    #[test]
    fn untraversed_ways_are_left_alone() {
        let out = build(&traversing_xml(), BuildMode::MapMatching);
        assert!(out.network.ways.contains_key(&"12".into()));
        assert!(out.network.ways.contains_key(&"13".into()));
    }
}

// ── Segment generation ────────────────────────────────────────────────────────

#[cfg(test)]
mod segments {
    use super::*;

    #[test]
    fn two_way_arm_yields_both_directions() {
        let out = build(&cross_xml(), BuildMode::MapMatching);
        assert!(out.network.segments.contains_key(&"100".into()));
        assert!(out.network.segments.contains_key(&"101".into()));
    }

    #[test]
    fn oneway_arm_yields_forward_only() {
        let xml = cross_xml().replace(
            r#"<tag k="name" v="Washington Ave"/>"#,
            r#"<tag k="name" v="Washington Ave"/><tag k="oneway" v="yes"/>"#,
        );
        let out = build(&xml, BuildMode::MapMatching);
        assert!(out.network.segments.contains_key(&"120".into()));
        assert!(!out.network.segments.contains_key(&"121".into()));
    }

    #[test]
    fn intersection_approaches_start_unassigned() {
        let out = build(&cross_xml(), BuildMode::MapMatching);
        let approach = &out.network.segments[&"100".into()];
        assert_eq!(approach.lane_assignment.as_deref(), Some("null"));
    }

    #[test]
    fn map_matching_mode_stops_after_segments() {
        let out = build(&cross_xml(), BuildMode::MapMatching);
        assert!(!out.network.segments.is_empty());
        assert!(out.network.links.is_empty());
        assert!(out.network.movements.is_empty());
        assert!(out.network.lanesets.is_empty());
    }
}

// ── Links ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod links {
    use super::*;

    #[test]
    fn every_arm_becomes_a_link_pair() {
        let out = build(&cross_xml(), BuildMode::Movement);
        assert_eq!(out.network.links.len(), 8);
        let inbound = &out.network.links[&"2_1".into()];
        assert_eq!(inbound.upstream_node, "2".into());
        assert_eq!(inbound.downstream_node, "1".into());
        assert!(out.network.links.contains_key(&"1_2".into()));
    }

    #[test]
    fn links_never_repeat_a_segment() {
        let out = build(&cross_xml(), BuildMode::Movement);
        for link in out.network.links.values() {
            let mut seen = link.segments.clone();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), link.segments.len(), "link {}", link.id);
        }
    }

    #[test]
    fn segments_point_back_at_their_link() {
        let out = build(&cross_xml(), BuildMode::Movement);
        for (link_id, link) in &out.network.links {
            for segment_id in &link.segments {
                let segment = &out.network.segments[segment_id];
                assert_eq!(segment.link.as_ref(), Some(link_id));
            }
        }
    }

    #[test]
    fn chain_through_a_connector_aggregates() {
        let xml = osm_doc(&[
            osm_node("1", 45.000, -93.000, &[]),
            osm_node("2", 45.001, -93.000, &[]),
            osm_node("3", 45.002, -93.000, &[]),
            osm_way("10", &["1", "2"], &[("lanes", "2")]),
            osm_way("11", &["2", "3"], &[("lanes", "4")]),
        ]);
        let out = build(&xml, BuildMode::Movement);
        let link = &out.network.links[&"1_3".into()];
        assert_eq!(link.segments, vec!["100".into(), "110".into()]);
        // the shared middle node was separated per travel direction
        assert!(!out.network.nodes.contains_key(&"2".into()));
        assert_eq!(out.network.nodes[&"20".into()].kind, NodeKind::Connector);
        assert_eq!(out.network.nodes[&"21".into()].kind, NodeKind::Connector);
    }
}

// ── Movements ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movements {
    use super::*;

    #[test]
    fn cross_produces_the_full_turn_fan() {
        let out = build(&cross_xml(), BuildMode::Movement);
        assert_eq!(out.network.movements.len(), 16);
    }

    #[test]
    fn northern_approach_gets_standard_indices() {
        let out = build(&cross_xml(), BuildMode::Movement);
        let through = &out.network.movements[&"2_1_3".into()];
        assert_eq!(through.turn, Turn::Through);
        assert_eq!(through.index, Some(8));

        let left = &out.network.movements[&"2_1_4".into()];
        assert_eq!(left.turn, Turn::Left);
        assert_eq!(left.index, Some(3));

        let right = &out.network.movements[&"2_1_5".into()];
        assert_eq!(right.turn, Turn::Right);
        assert_eq!(right.index, Some(12));

        let back = &out.network.movements[&"2_1_2".into()];
        assert_eq!(back.turn, Turn::UTurn);
        assert_eq!(back.index, Some(13));
    }

    #[test]
    fn movements_are_cross_referenced() {
        let out = build(&cross_xml(), BuildMode::Movement);
        let node = &out.network.nodes[&"1".into()];
        assert_eq!(node.movements.len(), 16);
        let inbound = &out.network.links[&"2_1".into()];
        assert_eq!(inbound.movements.len(), 4);
        for movement_id in &inbound.movements {
            assert_eq!(
                out.network.movements[movement_id].upstream_link,
                "2_1".into()
            );
        }
    }

    #[test]
    fn movement_mode_stops_before_lanesets() {
        let out = build(&cross_xml(), BuildMode::Movement);
        assert!(!out.network.movements.is_empty());
        assert!(out.network.lanesets.is_empty());
        assert!(out.network.connectors.is_empty());
    }
}

// ── Consolidation ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod consolidate {
    use super::*;

    fn chain_xml(second_lanes: &str) -> String {
        osm_doc(&[
            osm_node("1", 45.000, -93.000, &[]),
            osm_node("2", 45.001, -93.000, &[]),
            osm_node("3", 45.002, -93.000, &[]),
            osm_way("10", &["1", "2"], &[("lanes", "2")]),
            osm_way("11", &["2", "3"], &[("lanes", second_lanes)]),
        ])
    }

    #[test]
    fn same_profile_runs_merge_into_the_head() {
        let out = build(&chain_xml("2"), BuildMode::Movement);
        let link = &out.network.links[&"1_3".into()];
        assert_eq!(link.segments, vec!["100".into()]);
        let merged = &out.network.segments[&"100".into()];
        assert_eq!(merged.downstream_node, "3".into());
        assert!((merged.length_m - link.length_m).abs() < 1e-6);
    }

    #[test]
    fn joint_nodes_leave_the_network() {
        let out = build(&chain_xml("2"), BuildMode::Movement);
        // "20"/"21" are the separated halves of the shared middle node
        assert!(!out.network.nodes.contains_key(&"20".into()));
        assert!(!out.network.nodes.contains_key(&"21".into()));
        for link in out.network.links.values() {
            assert!(!link.nodes.contains(&"20".into()), "link {}", link.id);
        }
    }

    #[test]
    fn differing_lane_counts_block_the_merge() {
        let out = build(&chain_xml("4"), BuildMode::Movement);
        let link = &out.network.links[&"1_3".into()];
        assert_eq!(link.segments.len(), 2);
        assert!(out.network.nodes.contains_key(&"20".into()));
    }
}

// ── Intersection naming ───────────────────────────────────────────────────────

#[cfg(test)]
mod names {
    use super::*;

    #[test]
    fn names_are_inferred_from_approach_ways() {
        let out = build(&cross_xml(), BuildMode::Movement);
        let node = &out.network.nodes[&"1".into()];
        assert_eq!(node.name.as_deref(), Some("Washington Ave/Main St"));
    }

    #[test]
    fn listing_keeps_only_the_last_name_component() {
        let mut out = build(&cross_xml(), BuildMode::Movement);
        crate::stages::names::load_intersection_names(
            &mut out.network,
            "node_id,name\n1,district 4:Main & Washington\n",
        );
        let node = &out.network.nodes[&"1".into()];
        assert_eq!(node.name.as_deref(), Some("Main & Washington"));
    }

    #[test]
    fn missing_axis_falls_back_to_null() {
        // T junction: no east arm, so no east/west through movement pair
        let xml = osm_doc(&[
            osm_node("1", 45.000, -93.000, &[]),
            osm_node("2", 45.002, -93.000, &[]),
            osm_node("3", 44.998, -93.000, &[]),
            osm_node("5", 45.000, -93.003, &[]),
            osm_way("10", &["2", "1"], &[]),
            osm_way("11", &["3", "1"], &[]),
            osm_way("13", &["5", "1"], &[("name", "Washington Ave")]),
        ]);
        let out = build(&xml, BuildMode::Movement);
        let node = &out.network.nodes[&"1".into()];
        assert_eq!(node.name.as_deref(), Some("Washington Ave/null"));
    }
}

// ── LaneSets ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lanesets {
    use super::*;

    fn wide_south_approach(extra: &[(&str, &str)]) -> String {
        let mut tags = vec![
            ("name", "Main St"),
            ("lanes", "6"),
            ("lanes:forward", "3"),
        ];
        tags.extend_from_slice(extra);
        osm_doc(&[
            osm_node("1", 45.000, -93.000, &[("highway", "traffic_signals")]),
            osm_node("2", 45.002, -93.000, &[]),
            osm_node("3", 44.998, -93.000, &[]),
            osm_node("4", 45.000, -92.997, &[]),
            osm_node("5", 45.000, -93.003, &[]),
            osm_way("10", &["2", "1"], &[("name", "Main St")]),
            osm_way("11", &["3", "1"], &tags),
            osm_way("12", &["4", "1"], &[("name", "Washington Ave")]),
            osm_way("13", &["5", "1"], &[("name", "Washington Ave")]),
        ])
    }

    #[test]
    fn off_intersection_segments_get_one_all_lane_laneset() {
        let out = build(&cross_xml(), BuildMode::Accurate);
        // backward segment of the north arm runs away from the junction
        let outbound = &out.network.segments[&"101".into()];
        assert_eq!(outbound.lanesets.len(), 1);
        let laneset = &out.network.lanesets[&outbound.lanesets[0]];
        assert_eq!(laneset.lane_count, outbound.lane_count);
        assert!(laneset.turns.is_empty());
    }

    #[test]
    fn heuristic_reserves_a_left_lane() {
        let out = build(&wide_south_approach(&[]), BuildMode::Accurate);
        let approach = &out.network.segments[&"110".into()];
        assert_eq!(approach.lanesets.len(), 2);

        let left = &out.network.lanesets[&"110_1".into()];
        assert_eq!(left.turns, "l");
        assert_eq!(left.lane_count, 1);
        assert_eq!(left.offset, 1);

        let rest = &out.network.lanesets[&"110_0".into()];
        assert_eq!(rest.lane_count, 2);
        assert!(rest.serves(Turn::Through));
        assert!(rest.serves(Turn::Right));
    }

    #[test]
    fn explicit_assignment_counts_dedicated_tokens() {
        let out = build(
            &wide_south_approach(&[("turn:lanes:forward", "left|through|through")]),
            BuildMode::Accurate,
        );
        let approach = &out.network.segments[&"110".into()];
        assert_eq!(approach.lanesets.len(), 2);

        let left = &out.network.lanesets[&"110_1".into()];
        assert_eq!(left.turns, "l");
        assert_eq!(left.lane_count, 1);
        assert_eq!(left.movements.len(), 1);

        let through = &out.network.lanesets[&"110_0".into()];
        assert_eq!(through.lane_count, 2);
        assert!(through.serves(Turn::Through));
    }

    #[test]
    fn laneset_lane_counts_cover_their_segment() {
        let out = build(&wide_south_approach(&[]), BuildMode::Accurate);
        for segment in out.network.segments.values() {
            if segment.lanesets.is_empty() {
                continue;
            }
            let total: u32 = segment
                .lanesets
                .iter()
                .map(|id| out.network.lanesets[id].lane_count)
                .sum();
            assert_eq!(total, segment.lane_count, "segment {}", segment.id);
        }
    }

    #[test]
    fn approach_lanesets_wire_into_single_laneset_targets() {
        let out = build(&cross_xml(), BuildMode::Accurate);
        let approach = &out.network.segments[&"100".into()];
        let laneset = &out.network.lanesets[&approach.lanesets[0]];
        // left, through, and right targets; the u-turn letter is skipped
        assert_eq!(laneset.downstream_lanesets.len(), 3);
        for down_id in &laneset.downstream_lanesets {
            let down = &out.network.lanesets[down_id];
            assert!(down.upstream_lanesets.contains(&laneset.id));
        }
    }
}

// ── Link and movement detail ──────────────────────────────────────────────────

#[cfg(test)]
mod details {
    use super::*;

    #[test]
    fn links_record_their_entry_laneset() {
        let out = build(&cross_xml(), BuildMode::Accurate);
        for link in out.network.links.values() {
            assert!(link.entry_laneset.is_some(), "link {}", link.id);
        }
    }

    #[test]
    fn movements_collect_their_lanesets() {
        let out = build(&cross_xml(), BuildMode::Accurate);
        let through = &out.network.movements[&"2_1_3".into()];
        assert_eq!(through.lanesets.len(), 1);
        let laneset = &out.network.lanesets[&through.lanesets[0]];
        assert!(laneset.serves(Turn::Through));
        assert!(!through.geometry.is_empty());
    }

    #[test]
    fn stopbar_and_clearance_points_are_parsed() {
        let out = build(&cross_xml(), BuildMode::Accurate);
        let through = &out.network.movements[&"2_1_3".into()];
        let stopbar = through.stopbar_points.as_ref().unwrap();
        assert_eq!(stopbar.len(), 2);
        assert!((stopbar[0].lat - 45.0001).abs() < 1e-9);
        let clearance = through.clearance_points.as_ref().unwrap();
        assert_eq!(clearance.len(), 1);
    }

    #[test]
    fn movements_without_surveyed_tags_stay_bare() {
        let out = build(&cross_xml(), BuildMode::Accurate);
        let left = &out.network.movements[&"2_1_4".into()];
        assert!(left.stopbar_points.is_none());
        assert!(left.clearance_points.is_none());
    }
}

// ── Connectors ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod connectors {
    use super::*;
    use rn_map::ConnectorKind;

    #[test]
    fn diverge_fans_split_the_flow_evenly() {
        let out = build(&cross_xml(), BuildMode::Accurate);
        let approach = &out.network.segments[&"100".into()];
        let laneset_id = &approach.lanesets[0];
        let fan: Vec<_> = out
            .network
            .connectors
            .values()
            .filter(|c| &c.upstream_laneset == laneset_id)
            .collect();
        assert_eq!(fan.len(), 3);
        for connector in fan {
            assert_eq!(connector.kind, ConnectorKind::Diverge);
            assert!((connector.diverge_proportion - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn single_successors_yield_ordinary_connectors() {
        let xml = osm_doc(&[
            osm_node("1", 45.000, -93.000, &[]),
            osm_node("2", 45.001, -93.000, &[]),
            osm_node("3", 45.002, -93.000, &[]),
            osm_way("10", &["1", "2"], &[("lanes", "2")]),
            osm_way("11", &["2", "3"], &[("lanes", "4")]),
        ]);
        let out = build(&xml, BuildMode::Accurate);
        assert_eq!(out.network.connectors.len(), 2);
        for connector in out.network.connectors.values() {
            assert_eq!(connector.kind, ConnectorKind::Ordinary);
            assert!((connector.diverge_proportion - 1.0).abs() < 1e-9);
        }
    }
}

// ── Patches ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod patch {
    use super::*;

    fn patched(document: &str) -> (BuildOutput, Diagnostics) {
        let mut out = build(&cross_xml(), BuildMode::Movement);
        let mut diag = Diagnostics::new("test");
        crate::patch::apply_patch(&mut out.network, document, &mut diag).unwrap();
        (out, diag)
    }

    #[test]
    fn node_name_patches_prefix_the_inferred_name() {
        let (out, diag) = patched(r#"{"nodes": {"1": {"name": "Central"}}}"#);
        let node = &out.network.nodes[&"1".into()];
        assert_eq!(node.name.as_deref(), Some("Central:Washington Ave/Main St"));
        assert!(diag.is_clean());
    }

    #[test]
    fn movement_index_patches_rederive_the_turn() {
        let (out, _) = patched(r#"{"movements": {"2_1_3": {"index": 3}}}"#);
        let movement = &out.network.movements[&"2_1_3".into()];
        assert_eq!(movement.index, Some(3));
        assert_eq!(movement.turn, Turn::Left);
    }

    #[test]
    fn segment_fields_are_updated() {
        let (out, diag) = patched(
            r#"{"segments": {"100": {"lane_count": 3, "speed_limit_mps": 15.6}}}"#,
        );
        let segment = &out.network.segments[&"100".into()];
        assert_eq!(segment.lane_count, 3);
        assert!((segment.speed_limit_mps - 15.6).abs() < 1e-9);
        assert!(diag.is_clean());
    }

    #[test]
    fn unknown_ids_are_skipped_silently() {
        let (_, diag) = patched(r#"{"links": {"no_such": {"speed_limit_mps": 9.0}}}"#);
        assert!(diag.is_clean());
    }

    #[test]
    fn unknown_fields_are_warned_about() {
        let (_, diag) = patched(r#"{"segments": {"100": {"color": "red"}}}"#);
        assert_eq!(diag.warnings().len(), 1);
        assert!(diag.warnings()[0].contains("unknown segment field"));
    }

    #[test]
    fn malformed_documents_are_hard_errors() {
        let mut out = build(&cross_xml(), BuildMode::Movement);
        let mut diag = Diagnostics::new("test");
        assert!(crate::patch::apply_patch(&mut out.network, "{ nope", &mut diag).is_err());
    }
}

// ── Query layer over a built network ──────────────────────────────────────────

#[cfg(test)]
mod queries {
    use super::*;
    use rn_map::{EdgeWeight, Granularity};

    #[test]
    fn shortest_path_crosses_the_junction() {
        let out = build(&cross_xml(), BuildMode::Accurate);
        let path = out
            .network
            .shortest_path_between_nodes(
                &"2".into(),
                &"3".into(),
                Granularity::Link,
                EdgeWeight::Length,
            )
            .unwrap();
        assert!(path.weight > 0.0);
        assert_eq!(path.nodes.first(), Some(&"2".into()));
        assert_eq!(path.nodes.last(), Some(&"3".into()));
    }

    #[test]
    fn unknown_endpoints_fail_cleanly() {
        let out = build(&cross_xml(), BuildMode::Accurate);
        assert!(out
            .network
            .shortest_path_between_nodes(
                &"2".into(),
                &"nope".into(),
                Granularity::Segment,
                EdgeWeight::FreeFlowTime,
            )
            .is_err());
    }
}

// ── Arterials ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod arterials {
    use super::*;
    use std::collections::BTreeMap;

    use rn_core::CompassDirection;
    use rn_map::{ArterialId, NodeId, Path};

    /// Main St running through two signals, with a side street at each.
    fn corridor_xml() -> String {
        osm_doc(&[
            osm_node("1", 45.000, -93.000, &[("highway", "traffic_signals")]),
            osm_node("2", 45.000, -92.996, &[("highway", "traffic_signals")]),
            osm_node("3", 45.000, -93.004, &[]),
            osm_node("4", 45.000, -92.992, &[]),
            osm_node("5", 45.002, -93.000, &[]),
            osm_node("6", 44.998, -93.000, &[]),
            osm_node("7", 45.002, -92.996, &[]),
            osm_node("8", 44.998, -92.996, &[]),
            osm_way("10", &["3", "1", "2", "4"], &[("name", "Main St"), ("lanes", "4")]),
            osm_way("11", &["5", "1", "6"], &[("name", "1st Ave"), ("lanes", "2")]),
            osm_way("12", &["7", "2", "8"], &[("name", "2nd Ave"), ("lanes", "2")]),
        ])
    }

    #[test]
    fn corridor_paths_chain_links_and_movements() {
        let out = build(&corridor_xml(), BuildMode::Accurate);
        let mut network = out.network;

        let routes = BTreeMap::from([(
            CompassDirection::West,
            vec![NodeId::new("3"), NodeId::new("2"), NodeId::new("4")],
        )]);
        network
            .build_arterial(ArterialId::new("main"), &routes)
            .unwrap();

        let arterial = &network.arterials[&"main".into()];
        let path = &arterial.oneways[&CompassDirection::West];
        assert_eq!(path.links, vec!["3_1".into(), "1_2".into(), "2_4".into()]);
        assert_eq!(path.movements, vec!["3_1_2".into(), "1_2_4".into()]);
        assert_eq!(
            arterial.oneway_name(CompassDirection::West),
            "main westbound"
        );

        let first_two = network.links[&"3_1".into()].length_m
            + network.links[&"1_2".into()].length_m;
        assert!((path.distance_by_link[&"1_2".into()] - first_two).abs() < 1e-6);
        assert!(network.links[&"1_2".into()].arterials.contains(&"main".into()));
    }

    #[test]
    fn a_single_stop_is_too_few() {
        let out = build(&corridor_xml(), BuildMode::Accurate);
        assert!(Path::through_nodes(&out.network, &[NodeId::new("3")]).is_err());
    }
}
