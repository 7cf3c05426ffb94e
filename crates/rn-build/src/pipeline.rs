//! The staged compile pipeline: OSM-XML in, queryable [`Network`] out.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rn_map::Network;

use crate::diagnostics::Diagnostics;
use crate::error::BuildResult;
use crate::stages;
use crate::{patch, xml};

/// How deep the pipeline runs.
///
/// Earlier exits leave the later entity layers empty but keep everything
/// built so far valid for queries at that granularity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuildMode {
    /// Stop after segment generation: node/segment geometry only.
    MapMatching,
    /// Stop after naming and patching: links and movements, no lanesets.
    Movement,
    /// Run every stage through connector generation.
    #[default]
    Accurate,
}

/// Inputs of one build.
#[derive(Clone, Debug, Default)]
pub struct BuildOptions {
    /// Region label, carried into the network and every log line.
    pub region: String,
    pub mode: BuildMode,
    /// Optional `node_id,name` listing applied before name inference.
    pub intersection_names: Option<PathBuf>,
    /// Optional JSON correction document applied after naming.
    pub patch: Option<PathBuf>,
}

impl BuildOptions {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }
}

/// A compiled network plus everything the stages complained about.
pub struct BuildOutput {
    pub network: Network,
    pub diagnostics: Diagnostics,
}

/// Compile one region from an OSM-XML document held in memory.
pub fn build_network(osm_xml: &str, options: &BuildOptions) -> BuildResult<BuildOutput> {
    let mut network = Network::new(options.region.clone());
    let mut diag = Diagnostics::new(&options.region);

    log::info!("[{}] parsing OSM document", options.region);
    xml::load_osm_document(&mut network, osm_xml, &mut diag)?;
    stages::ingest::link_ways_and_nodes(&mut network, &mut diag);

    log::info!("[{}] classifying nodes and splitting ways", options.region);
    stages::classify::classify_nodes(&mut network);
    stages::split::split_intersection_ways(&mut network, &mut diag);

    log::info!("[{}] generating segments", options.region);
    stages::segments::generate_segments(&mut network, &mut diag);
    if options.mode == BuildMode::MapMatching {
        return Ok(finish(network, diag));
    }

    log::info!("[{}] connecting segments", options.region);
    stages::connections::connect_segments(&mut network, &mut diag);
    stages::connections::separate_connector_nodes(&mut network);

    log::info!("[{}] building links and movements", options.region);
    stages::links::build_links(&mut network, &mut diag);
    stages::movements::generate_movements(&mut network);
    stages::consolidate::consolidate_segments(&mut network);

    log::info!("[{}] naming intersections", options.region);
    if let Some(path) = &options.intersection_names {
        let listing = std::fs::read_to_string(path)?;
        stages::names::load_intersection_names(&mut network, &listing);
    }
    stages::names::infer_intersection_names(&mut network);
    if let Some(path) = &options.patch {
        log::info!("[{}] applying patch", options.region);
        let document = std::fs::read_to_string(path)?;
        patch::apply_patch(&mut network, &document, &mut diag)?;
    }
    if options.mode == BuildMode::Movement {
        return Ok(finish(network, diag));
    }

    log::info!("[{}] generating lanesets", options.region);
    stages::lanesets::generate_lanesets(&mut network, &mut diag);
    stages::lanesets::connect_lanesets(&mut network, &mut diag);

    log::info!("[{}] filling in link and movement detail", options.region);
    stages::links::link_details(&mut network, &mut diag);
    stages::movements::movement_details(&mut network, &mut diag);
    stages::movements::collect_stopbar_clearance(&mut network);

    log::info!("[{}] generating connectors", options.region);
    stages::connectors::generate_connectors(&mut network);

    Ok(finish(network, diag))
}

/// Compile one region from an OSM-XML file on disk.
pub fn build_network_from_path(
    osm_path: impl AsRef<Path>,
    options: &BuildOptions,
) -> BuildResult<BuildOutput> {
    let osm_xml = std::fs::read_to_string(osm_path)?;
    build_network(&osm_xml, options)
}

/// Compile several regions in parallel.  Each entry pairs an OSM file with
/// its options; results come back in input order.
pub fn build_regions(
    inputs: &[(PathBuf, BuildOptions)],
) -> Vec<BuildResult<BuildOutput>> {
    inputs
        .par_iter()
        .map(|(path, options)| build_network_from_path(path, options))
        .collect()
}

fn finish(network: Network, diagnostics: Diagnostics) -> BuildOutput {
    log::info!(
        "[{}] build finished: {} nodes, {} segments, {} links, {} movements, \
         {} lanesets, {} connectors ({} warnings, {} errors)",
        network.region,
        network.nodes.len(),
        network.segments.len(),
        network.links.len(),
        network.movements.len(),
        network.lanesets.len(),
        network.connectors.len(),
        diagnostics.warnings().len(),
        diagnostics.errors().len(),
    );
    BuildOutput {
        network,
        diagnostics,
    }
}
