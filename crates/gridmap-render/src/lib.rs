#![forbid(unsafe_code)]

//! Render-instance building on top of `gridmap-core`.
//!
//! Still no drawing here: the passes in this crate turn core annotations
//! into flat, serializable instance structs ([`LineBodyInstance`],
//! [`ForkInstance`], [`ArrowInstance`], [`LabelInstance`]) that map
//! straight onto instanced GPU layers or plain canvas calls. What the
//! crate adds over core is the per-frame machinery a host needs around
//! those instances: pluggable styling, zoom-stable pixel clamping of the
//! parallel spacing, and the arrow animation clock.
//!
//! [`build_network_view`] is the whole pipeline in one call; the
//! individual passes are public for hosts that rebuild layers selectively.

pub mod animate;
pub mod geom;
pub mod passes;
pub mod pixel;
pub mod style;
pub mod view;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] gridmap_core::Error),
    #[error("invalid parallel offset bounds: min {min_px} px, max {max_px} px")]
    InvalidOffsetBounds { min_px: f64, max_px: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;

pub use animate::FlowAnimator;
pub use geom::{PixelPoint, PixelVector, pixel_point, pixel_vector};
pub use passes::{
    ArrowInstance, ArrowPass, DrawPass, ForkInstance, ForkPass, LabelInstance, LabelPass,
    LineBodyInstance, LineBodyPass, LineEnd, PassContext, readable_text_angle,
};
pub use pixel::{OffsetModel, meters_per_pixel};
pub use style::{LineFacts, LineStyleProvider, LoadingZoneStyle, NominalVoltageStyle};
pub use view::{CompositeLayer, NetworkView, build_network_view};
