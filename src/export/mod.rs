//! PNG export of the finished report.

/// File naming and PNG encoding.
pub mod png;
