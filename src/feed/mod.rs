//! NEO feed access: one blocking fetch, then a best-effort flatten into typed records.

/// HTTP client, query construction and response decoding.
pub mod client;
/// Per-record validation and date span computation.
pub mod extract;
