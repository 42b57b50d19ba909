use std::path::PathBuf;

use anyhow::Context as _;

use crate::{
    config::settings::ExportSettings,
    feed::extract::DateSpan,
    foundation::error::{NeoError, NeoResult},
    render::canvas::ReportCanvas,
};

/// `{prefix}from{start}to{end}.png`, with no separators between the parts.
pub fn export_file_name(prefix: &str, span: &DateSpan) -> String {
    format!("{prefix}from{}to{}.png", span.start, span.end)
}

/// Write `canvas` as a straight-alpha RGBA PNG into `export.out_dir` and return its path.
///
/// An existing file with the same name is overwritten.
#[tracing::instrument(skip(canvas, export), fields(out_dir = %export.out_dir.display()))]
pub fn export_png(
    canvas: ReportCanvas,
    export: &ExportSettings,
    span: &DateSpan,
) -> NeoResult<PathBuf> {
    let path = export
        .out_dir
        .join(export_file_name(&export.file_prefix, span));

    if !export.out_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&export.out_dir)
            .with_context(|| format!("create output dir '{}'", export.out_dir.display()))?;
    }

    let (size, rgba8) = canvas.into_straight_rgba8();
    if size.is_empty() {
        return Err(NeoError::render("cannot export an empty canvas"));
    }

    image::save_buffer_with_format(
        &path,
        &rgba8,
        size.width,
        size.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;

    tracing::info!(path = %path.display(), width = size.width, height = size.height, "exported report");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
