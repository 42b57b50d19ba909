use std::path::PathBuf;

use rand::Rng;

use crate::{
    assets::store::ReportAssets,
    config::settings::Settings,
    export::png::export_png,
    feed::{
        client::{FeedClient, FeedRequest, RawFeed},
        extract::{DateSpan, extract},
    },
    foundation::error::NeoResult,
    rank::table::{RankedAsteroid, rank_closest},
    render::passes::render_report,
};

/// The asteroids a report shows, with the span they were fetched for.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub span: DateSpan,
    pub asteroids: Vec<RankedAsteroid>,
    /// Raw records dropped during extraction.
    pub dropped: usize,
}

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportOutcome {
    pub path: PathBuf,
    pub span: DateSpan,
    pub asteroids: Vec<RankedAsteroid>,
}

/// Extract and rank a fetched feed. Performs no IO.
pub fn select_from_feed(raw: &RawFeed) -> NeoResult<Selection> {
    let extraction = extract(raw)?;
    let asteroids = rank_closest(&extraction.neos)?;
    Ok(Selection {
        span: extraction.span,
        asteroids,
        dropped: extraction.dropped,
    })
}

/// Draw and export a report for an already-made selection.
pub fn compose_report<R: Rng + ?Sized>(
    settings: &Settings,
    assets: &ReportAssets,
    selection: Selection,
    rng: &mut R,
) -> NeoResult<ReportOutcome> {
    let canvas = render_report(
        assets,
        &selection.span,
        &selection.asteroids,
        &settings.layout,
        rng,
    )?;
    let path = export_png(canvas, &settings.export, &selection.span)?;
    Ok(ReportOutcome {
        path,
        span: selection.span,
        asteroids: selection.asteroids,
    })
}

/// Run the whole report for `request`.
///
/// Resources and the API key are read before the network call, so a broken install fails
/// without spending a request. Any failure after the fetch discards the run.
#[tracing::instrument(skip(settings, rng), fields(start = %request.start_date))]
pub fn generate_report<R: Rng + ?Sized>(
    settings: &Settings,
    request: &FeedRequest,
    rng: &mut R,
) -> NeoResult<ReportOutcome> {
    settings.validate()?;
    let assets = ReportAssets::load(&settings.resources)?;
    let client = FeedClient::from_settings(&settings.feed)?;

    let raw = client.fetch(request)?;
    let selection = select_from_feed(&raw)?;
    tracing::info!(
        span = %selection.span.subtitle(),
        dropped = selection.dropped,
        "selected closest approaches"
    );

    compose_report(settings, &assets, selection, rng)
}

#[cfg(test)]
#[path = "../../tests/unit/report/pipeline.rs"]
mod tests;
