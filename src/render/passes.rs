use rand::Rng;

use crate::{
    assets::store::{PreparedImage, ReportAssets},
    config::settings::LayoutSettings,
    feed::extract::DateSpan,
    foundation::core::PixelOffset,
    foundation::error::{NeoError, NeoResult},
    rank::table::RankedAsteroid,
    render::{
        canvas::ReportCanvas,
        cpu::{TextPainter, fill_image, image_paint, render_layer},
        layout::{DiameterRange, icon_transform, place_icon, translate_to},
    },
};

/// Compose the full report on top of the background: subtitle, then icons, then info blocks.
#[tracing::instrument(skip_all, fields(asteroids = asteroids.len(), start = %span.start, end = %span.end))]
pub fn render_report<R: Rng + ?Sized>(
    assets: &ReportAssets,
    span: &DateSpan,
    asteroids: &[RankedAsteroid],
    layout: &LayoutSettings,
    rng: &mut R,
) -> NeoResult<ReportCanvas> {
    let mut text = TextPainter::new(&assets.font)?;
    tracing::debug!(family = text.family_name(), "registered report font");

    let canvas = ReportCanvas::from_image(&assets.background);
    let canvas = draw_subtitle(canvas, span, &mut text, layout)?;
    let canvas = draw_asteroids(canvas, asteroids, &assets.asteroid_icon, layout, rng)?;
    draw_info(canvas, asteroids, &mut text, layout)
}

/// Draw `from {start} to {end}` at the subtitle position.
#[tracing::instrument(skip_all)]
pub fn draw_subtitle(
    mut canvas: ReportCanvas,
    span: &DateSpan,
    text: &mut TextPainter,
    layout: &LayoutSettings,
) -> NeoResult<ReportCanvas> {
    let size = canvas.size();
    let layer = render_layer(size, |ctx| {
        text.draw(
            ctx,
            &span.subtitle(),
            layout.subtitle_size_px,
            layout.text_color,
            translate_to(layout.subtitle_pos),
        )
    })?;
    canvas.composite_at(&layer, size, PixelOffset::default())?;
    Ok(canvas)
}

/// Paste one randomly rotated, diameter-scaled icon per asteroid around the canvas center.
#[tracing::instrument(skip_all, fields(asteroids = asteroids.len()))]
pub fn draw_asteroids<R: Rng + ?Sized>(
    mut canvas: ReportCanvas,
    asteroids: &[RankedAsteroid],
    icon: &PreparedImage,
    layout: &LayoutSettings,
    rng: &mut R,
) -> NeoResult<ReportCanvas> {
    let range = DiameterRange::of(asteroids.iter().map(|a| a.avg_diam_m))
        .ok_or_else(|| NeoError::render("no asteroids to draw"))?;
    let paint = image_paint(icon)?;

    for a in asteroids {
        let scale = range.scale_for(a.avg_diam_m, layout.uniform_scale);
        let placement = place_icon(canvas.size(), icon.size, a.rank, scale, layout);
        let rotation_deg = f64::from(rng.gen_range(0u32..360));
        if placement.size.is_empty() {
            continue;
        }

        let transform = icon_transform(icon.size, &placement, rotation_deg);
        let layer = render_layer(placement.size, |ctx| {
            fill_image(ctx, &paint, icon.size, transform);
            Ok(())
        })?;
        canvas.composite_at(&layer, placement.size, placement.top_left)?;

        tracing::debug!(
            rank = a.rank,
            scale,
            rotation_deg,
            x = placement.top_left.x,
            y = placement.top_left.y,
            "placed asteroid icon"
        );
    }
    Ok(canvas)
}

/// Draw each asteroid's info block on its own panel and paste it at the rank's slot.
#[tracing::instrument(skip_all, fields(asteroids = asteroids.len()))]
pub fn draw_info(
    mut canvas: ReportCanvas,
    asteroids: &[RankedAsteroid],
    text: &mut TextPainter,
    layout: &LayoutSettings,
) -> NeoResult<ReportCanvas> {
    let panel = layout.info_panel;
    for a in asteroids {
        let at = layout.info_position(a.rank)?;
        let label = info_label(a);
        let layer = render_layer(panel, |ctx| {
            text.draw(
                ctx,
                &label,
                layout.info_size_px,
                layout.text_color,
                translate_to(layout.info_text_offset),
            )
        })?;
        canvas.composite_at(&layer, panel, at)?;
    }
    Ok(canvas)
}

/// Multi-line info block text for one asteroid.
pub fn info_label(a: &RankedAsteroid) -> String {
    format!(
        "Name:{}\nMiss distance: {} km\nApproach date: {}\nDiameter(min): {} m\nDiameter(max): {} m",
        a.neo.name,
        a.neo.miss_distance_km,
        a.neo.approach_date,
        decimal_text(a.neo.min_diam_m),
        decimal_text(a.neo.max_diam_m),
    )
}

// Whole values keep one decimal so every diameter reads as a measurement.
fn decimal_text(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/passes.rs"]
mod tests;
