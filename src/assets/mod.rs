//! Bundled resources: decoded images, font bytes and text layout.
//!
//! All IO happens here, before drawing; render passes only see prepared values.

/// Image decoding and alpha conversion.
pub mod decode;
/// Report resource store and Parley text layout.
pub mod store;
