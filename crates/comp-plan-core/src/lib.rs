pub mod analysis;
pub mod error;
pub mod numeric;
pub mod plan;
pub mod types;

#[cfg(feature = "presets")]
pub mod presets;

#[cfg(feature = "sharing")]
pub mod sharing;

#[cfg(feature = "session")]
pub mod session;

pub use error::CompPlanError;
pub use types::*;

/// Standard result type for all comp-plan operations
pub type CompPlanResult<T> = Result<T, CompPlanError>;
