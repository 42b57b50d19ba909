//! NEO Situation renders a one-image report of the five closest asteroid approaches in a date
//! range.
//!
//! A run is a straight line of stages:
//!
//! - Fetch the NEO feed for the requested dates ([`FeedClient`])
//! - Flatten and validate records, then rank the five closest ([`select_from_feed`])
//! - Draw the subtitle, asteroid ring and info blocks over the background ([`render_report`])
//! - Write the PNG ([`export_png`])
//!
//! [`generate_report`] runs all of them from a [`Settings`] value.
#![forbid(unsafe_code)]

/// Bundled image/font resources and text layout.
pub mod assets;
/// Run configuration.
pub mod config;
/// PNG export.
pub mod export;
/// Feed access and record extraction.
pub mod feed;
mod foundation;
/// Closest-approach ranking.
pub mod rank;
/// Report drawing passes.
pub mod render;
/// End-to-end pipeline.
pub mod report;

pub use crate::foundation::core::{Affine, PixelOffset, PixelSize, Point, Rgba8, Vec2};
pub use crate::foundation::error::{NeoError, NeoResult};

pub use crate::assets::store::ReportAssets;
pub use crate::config::settings::{REPORT_SLOTS, Settings};
pub use crate::export::png::{export_file_name, export_png};
pub use crate::feed::client::{FeedClient, FeedRequest, RawFeed};
pub use crate::feed::extract::{DateSpan, NormalizedNeo, extract, normalize_record};
pub use crate::rank::table::{RankedAsteroid, rank_closest};
pub use crate::render::canvas::ReportCanvas;
pub use crate::render::passes::render_report;
pub use crate::report::pipeline::{
    ReportOutcome, Selection, compose_report, generate_report, select_from_feed,
};
