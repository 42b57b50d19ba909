//! CPU report renderer.
//!
//! Each pass is a `(canvas, data) -> canvas` function that renders onto a transparent
//! `vello_cpu` layer and composites it source-over onto the [`canvas::ReportCanvas`].

/// Owned premultiplied canvas and source-over compositing.
pub mod canvas;
/// `vello_cpu` layer, image and glyph drawing helpers.
pub mod cpu;
/// Ring geometry: icon scale, orbit angle/radius and placement.
pub mod layout;
/// Subtitle, asteroid and info passes.
pub mod passes;
