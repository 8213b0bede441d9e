#![forbid(unsafe_code)]

//! `gridmap` is headless map geometry for geographic electrical networks.
//!
//! The default build re-exports `gridmap-core`: the equipment model, line
//! routing, parallel-corridor fan-out, anchor placement, flow-arrow
//! scheduling and color classification.
//!
//! # Features
//!
//! - `render`: enable draw-pass building (`gridmap::render`)

pub use gridmap_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use gridmap_render::{
        ArrowInstance, ArrowPass, CompositeLayer, DrawPass, FlowAnimator, ForkInstance, ForkPass,
        LabelInstance, LabelPass, LineBodyInstance, LineBodyPass, LineEnd, LineFacts,
        LineStyleProvider, LoadingZoneStyle, NetworkView, NominalVoltageStyle, OffsetModel,
        PassContext, PixelPoint, PixelVector, build_network_view, meters_per_pixel, pixel_point,
        pixel_vector, readable_text_angle,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Core(#[from] gridmap_core::Error),
        #[error(transparent)]
        Render(#[from] gridmap_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Builds a complete map view with voltage-class styling and an
    /// animation clock matching the flow options.
    ///
    /// Convenience wrapper for hosts that do not bring their own
    /// [`LineStyleProvider`]. For animated arrows, keep a [`FlowAnimator`]
    /// alive across frames and call [`build_network_view`] directly.
    ///
    /// ```no_run
    /// use gridmap::{FlowOptions, GeoData, MapOptions, Network};
    /// use gridmap::render::build_view;
    ///
    /// let network = Network::new(Vec::new(), Vec::new());
    /// let geodata = GeoData::new();
    ///
    /// let view = build_view(
    ///     &network,
    ///     &geodata,
    ///     &MapOptions::default(),
    ///     &FlowOptions::default(),
    /// )?;
    /// for layer in view.visible_layers() {
    ///     println!("{} kV: {} lines", layer.nominal_v, layer.bodies.len());
    /// }
    /// # Ok::<(), gridmap::render::HeadlessError>(())
    /// ```
    pub fn build_view(
        network: &gridmap_core::Network,
        geodata: &gridmap_core::GeoData,
        map: &gridmap_core::MapOptions,
        flow: &gridmap_core::FlowOptions,
    ) -> Result<NetworkView> {
        let style = NominalVoltageStyle::default();
        let animator = FlowAnimator::from_options(flow);
        Ok(gridmap_render::build_network_view(network, geodata, map, flow, &style, &animator)?)
    }
}
