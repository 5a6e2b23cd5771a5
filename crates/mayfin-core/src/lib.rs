pub mod error;
pub mod policy;
pub mod statements;
pub mod types;

#[cfg(feature = "scoring")]
pub mod scoring;

#[cfg(feature = "recommendation")]
pub mod recommendation;

pub use error::MayfinError;
pub use types::*;

/// Standard result type for all mayfin operations
pub type MayfinResult<T> = Result<T, MayfinError>;
