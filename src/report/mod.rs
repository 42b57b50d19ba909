//! End-to-end report run: fetch, select, draw, export.

/// Stage ordering and the library entry point.
pub mod pipeline;
