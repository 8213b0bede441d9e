//! Whole-map assembly: every pass over every line, one layer per voltage
//! class.

use gridmap_core::{FlowOptions, GeoData, MapOptions, Network, build_composite_data};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::animate::FlowAnimator;
use crate::passes::{
    ArrowInstance, ArrowPass, DrawPass, ForkInstance, ForkPass, LabelInstance, LabelPass,
    LineBodyInstance, LineBodyPass, PassContext,
};
use crate::style::LineStyleProvider;

/// All render instances of one voltage class, drawn together and toggled
/// together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeLayer {
    /// Nominal voltage shared by the layer's lines, kV.
    pub nominal_v: f64,
    pub visible: bool,
    pub bodies: Vec<LineBodyInstance>,
    pub forks: Vec<ForkInstance>,
    pub arrows: Vec<ArrowInstance>,
    pub labels: Vec<LabelInstance>,
}

/// A fully built map view: voltage-class layers ordered highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkView {
    pub layers: Vec<CompositeLayer>,
}

impl NetworkView {
    /// Shows exactly the layers whose nominal voltage is listed; everything
    /// else is hidden.
    pub fn filter_nominal_voltages(&mut self, visible: &[f64]) {
        for layer in &mut self.layers {
            layer.visible = visible.contains(&layer.nominal_v);
        }
    }

    pub fn visible_layers(&self) -> impl Iterator<Item = &CompositeLayer> {
        self.layers.iter().filter(|layer| layer.visible)
    }
}

/// Runs all four passes over the whole network.
///
/// Lines the network no longer knows about are skipped; annotation tables
/// can briefly lag equipment updates without failing a rebuild.
pub fn build_network_view(
    network: &Network,
    geodata: &GeoData,
    map: &MapOptions,
    flow: &FlowOptions,
    style: &dyn LineStyleProvider,
    animator: &FlowAnimator,
) -> Result<NetworkView> {
    let composites = build_composite_data(network, geodata, map)?;
    let ctx = PassContext { network, geodata, map, flow };
    let body_pass = LineBodyPass { style };
    let fork_pass = ForkPass;
    let arrow_pass = ArrowPass { animator };
    let label_pass = LabelPass;

    let mut layers = Vec::with_capacity(composites.len());
    for composite in &composites {
        let mut layer = CompositeLayer {
            nominal_v: composite.nominal_v,
            visible: true,
            bodies: Vec::new(),
            forks: Vec::new(),
            arrows: Vec::new(),
            labels: Vec::new(),
        };
        for annotation in composite.annotations.values() {
            let Some(line) = network.line(&annotation.line_id) else {
                continue;
            };
            layer.bodies.extend(body_pass.build(&ctx, line, annotation)?);
            layer.forks.extend(fork_pass.build(&ctx, line, annotation)?);
            layer.arrows.extend(arrow_pass.build(&ctx, line, annotation)?);
            layer.labels.extend(label_pass.build(&ctx, line, annotation)?);
        }
        debug!(
            nominal_v = layer.nominal_v,
            bodies = layer.bodies.len(),
            arrows = layer.arrows.len(),
            "rebuilt composite layer"
        );
        layers.push(layer);
    }
    Ok(NetworkView { layers })
}
