//! Run configuration.
//!
//! Constants of the stock report (endpoint, resource names, layout coordinates) are held in an
//! explicit [`settings::Settings`] value that is passed to the fetcher and renderer.

/// Settings structure, defaults and validation.
pub mod settings;
