//! cross_town — smallest runnable demo of the road-network compiler.
//!
//! Compiles an embedded nine-node downtown extract (two signalized
//! intersections joined by a short arterial block) and answers a couple of
//! shortest-path queries over the result.  Swap the embedded XML for a real
//! OSM extract path to compile an actual city district.

use anyhow::Result;

use rn_build::{build_network, BuildMode, BuildOptions};
use rn_map::{EdgeWeight, Granularity, NodeId};

// ── Embedded extract ──────────────────────────────────────────────────────────

// Two Main St intersections 1 and 2, one block apart, each with a north and
// a south side street.  Main St carries 4 lanes with a dedicated left at
// both stop lines; the side streets are plain two-lane residentials.
const DOWNTOWN_OSM: &str = r#"<osm version="0.6">
  <bounds minlat="44.995" minlon="-93.010" maxlat="45.005" maxlon="-92.990"/>
  <node id="1" lat="45.000" lon="-93.000"><tag k="highway" v="traffic_signals"/></node>
  <node id="2" lat="45.000" lon="-92.996"><tag k="highway" v="traffic_signals"/></node>
  <node id="3" lat="45.000" lon="-93.004"/>
  <node id="4" lat="45.000" lon="-92.992"/>
  <node id="5" lat="45.002" lon="-93.000"/>
  <node id="6" lat="44.998" lon="-93.000"/>
  <node id="7" lat="45.002" lon="-92.996"/>
  <node id="8" lat="44.998" lon="-92.996"/>
  <way id="10">
    <nd ref="3"/><nd ref="1"/><nd ref="2"/><nd ref="4"/>
    <tag k="name" v="Main St"/>
    <tag k="lanes" v="4"/>
    <tag k="maxspeed" v="35 mph"/>
    <tag k="turn:lanes:forward" v="left|through"/>
    <tag k="turn:lanes:backward" v="left|through"/>
  </way>
  <way id="11">
    <nd ref="5"/><nd ref="1"/><nd ref="6"/>
    <tag k="name" v="1st Ave"/>
    <tag k="lanes" v="2"/>
    <tag k="maxspeed" v="25 mph"/>
  </way>
  <way id="12">
    <nd ref="7"/><nd ref="2"/><nd ref="8"/>
    <tag k="name" v="2nd Ave"/>
    <tag k="lanes" v="2"/>
    <tag k="maxspeed" v="25 mph"/>
  </way>
</osm>
"#;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== cross_town — road-network compiler demo ===");
    println!();

    let options = BuildOptions {
        mode: BuildMode::Accurate,
        ..BuildOptions::new("downtown")
    };
    let out = build_network(DOWNTOWN_OSM, &options)?;
    let network = &out.network;

    println!(
        "Compiled: {} nodes, {} segments, {} links, {} movements, {} lanesets, {} connectors",
        network.nodes.len(),
        network.segments.len(),
        network.links.len(),
        network.movements.len(),
        network.lanesets.len(),
        network.connectors.len(),
    );
    println!(
        "Diagnostics: {} warnings, {} errors",
        out.diagnostics.warnings().len(),
        out.diagnostics.errors().len(),
    );
    println!();

    println!("{:<20} {:<8} {:<10}", "Intersection", "Kind", "Name");
    println!("{}", "-".repeat(48));
    for node_id in &network.signalized_nodes {
        let node = &network.nodes[node_id];
        println!(
            "{:<20} {:<8} {:<10}",
            node.id,
            "signal",
            node.name.as_deref().unwrap_or("-"),
        );
    }
    println!();

    // west end of Main St to the 2nd Ave south stub, across both signals
    let from = NodeId::new("3");
    let to = NodeId::new("8");
    for (granularity, label) in [
        (Granularity::Segment, "segment"),
        (Granularity::Link, "link"),
        (Granularity::LaneSet, "laneset"),
    ] {
        let path = network.shortest_path_between_nodes(
            &from,
            &to,
            granularity,
            EdgeWeight::FreeFlowTime,
        )?;
        println!(
            "{from} -> {to} ({label:>7}): {:>6.1} s over {} edges",
            path.weight,
            path.edges.len(),
        );
    }

    Ok(())
}
