//! OSM-XML ingestion: `bounds`, `node`, and `way` elements.
//!
//! Only the three element kinds the pipeline consumes are read; relations
//! and metadata elements are ignored.  Elements missing required attributes
//! are skipped with a diagnostic rather than failing the whole document.

use std::collections::BTreeMap;

use roxmltree::{Document, Node as XmlNode};
use rn_core::{BoundingBox, GeoPoint};
use rn_map::{Network, Node, NodeId, Way, WayId};

use crate::diagnostics::Diagnostics;
use crate::error::BuildResult;

/// Parse an OSM extract into the network's node and way arenas.
///
/// Nodes carry their raw tags; ways get their derived tag facts (lane
/// counts, speed limit, directionality) computed at construction.  Geometry
/// is not resolved here — node coordinates are joined to ways by the
/// ingestion stage once the whole document is loaded.
pub(crate) fn load_osm_document(
    network: &mut Network,
    xml: &str,
    diag: &mut Diagnostics,
) -> BuildResult<()> {
    let document = Document::parse(xml)?;

    for element in document.root_element().children().filter(XmlNode::is_element) {
        match element.tag_name().name() {
            "bounds" => network.bounds = parse_bounds(&element),
            "node" => {
                if let Some(node) = parse_node(&element, diag) {
                    network.add_node(node);
                }
            }
            "way" => {
                if let Some(way) = parse_way(&element, diag) {
                    network.add_way(way);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_bounds(element: &XmlNode) -> Option<BoundingBox> {
    let attr = |name| element.attribute(name)?.parse::<f64>().ok();
    Some(BoundingBox::new(
        attr("minlon")?,
        attr("minlat")?,
        attr("maxlon")?,
        attr("maxlat")?,
    ))
}

fn parse_node(element: &XmlNode, diag: &mut Diagnostics) -> Option<Node> {
    let Some(id) = element.attribute("id") else {
        diag.warn("node element without an id, skipped");
        return None;
    };
    let coordinate = |name| element.attribute(name)?.parse::<f64>().ok();
    let (Some(lat), Some(lon)) = (coordinate("lat"), coordinate("lon")) else {
        diag.warn(format!("node {id} has no usable lat/lon, skipped"));
        return None;
    };
    Some(Node::new(
        NodeId::from(id),
        GeoPoint::new(lat, lon),
        collect_tags(element),
    ))
}

fn parse_way(element: &XmlNode, diag: &mut Diagnostics) -> Option<Way> {
    let Some(id) = element.attribute("id") else {
        diag.warn("way element without an id, skipped");
        return None;
    };
    let nodes: Vec<NodeId> = element
        .children()
        .filter(|child| child.is_element() && child.tag_name().name() == "nd")
        .filter_map(|child| child.attribute("ref").map(NodeId::from))
        .collect();
    Some(Way::from_tags(WayId::from(id), nodes, collect_tags(element)))
}

fn collect_tags(element: &XmlNode) -> BTreeMap<String, String> {
    element
        .children()
        .filter(|child| child.is_element() && child.tag_name().name() == "tag")
        .filter_map(|child| {
            let key = child.attribute("k")?;
            let value = child.attribute("v")?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
