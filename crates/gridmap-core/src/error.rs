use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the geometry core.
///
/// Unknown equipment references fail fast: they are host wiring bugs, not
/// recoverable data conditions. Missing coordinates never error; they degrade
/// to sentinel geometry instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown voltage level: {id}")]
    UnknownVoltageLevel { id: String },

    #[error("unknown substation: {id}")]
    UnknownSubstation { id: String },

    #[error("position fraction out of range: {fraction} (expected 0 to 1)")]
    FractionOutOfRange { fraction: f64 },
}
