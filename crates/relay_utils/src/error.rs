//! Error plumbing shared by the relay binaries.

/// Boxed error returned from the top of each service before it is logged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
