pub mod error;
pub mod types;

#[cfg(feature = "optimization")]
pub mod optimization;

#[cfg(feature = "projection")]
pub mod projection;

pub use error::MptError;
pub use types::*;

/// Standard result type for all mpt-core operations
pub type MptResult<T> = Result<T, MptError>;
