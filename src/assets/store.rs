use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    assets::decode as assets_decode,
    config::settings::ResourceSettings,
    foundation::core::{PixelSize, Rgba8},
    foundation::error::{NeoError, NeoResult},
};

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Dimensions in pixels.
    pub size: PixelSize,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone)]
/// Raw font file bytes, shared between text layout and glyph rendering.
pub struct PreparedFont {
    pub bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for PreparedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedFont")
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Every resource the report draws with, loaded before any drawing starts.
#[derive(Clone, Debug)]
pub struct ReportAssets {
    pub background: PreparedImage,
    pub asteroid_icon: PreparedImage,
    pub font: PreparedFont,
}

impl ReportAssets {
    /// Load background, icon and font from the configured resource directory.
    #[tracing::instrument(skip(resources), fields(dir = %resources.dir.display()))]
    pub fn load(resources: &ResourceSettings) -> NeoResult<Self> {
        let background = read_bytes(&resources.background_path())?;
        let icon = read_bytes(&resources.asteroid_icon_path())?;
        let font = read_bytes(&resources.font_path())?;
        Self::from_bytes(&background, &icon, font)
    }

    pub fn from_bytes(background: &[u8], asteroid_icon: &[u8], font: Vec<u8>) -> NeoResult<Self> {
        let background = assets_decode::decode_image(background).context("decode background")?;
        let asteroid_icon =
            assets_decode::decode_image(asteroid_icon).context("decode asteroid icon")?;
        if background.size.is_empty() || asteroid_icon.size.is_empty() {
            return Err(NeoError::validation("report images must be non-empty"));
        }
        if font.is_empty() {
            return Err(NeoError::validation("font file is empty"));
        }
        tracing::debug!(
            background_w = background.size.width,
            background_h = background.size.height,
            icon_w = asteroid_icon.size.width,
            icon_h = asteroid_icon.size.height,
            font_bytes = font.len(),
            "loaded report assets"
        );
        Ok(Self {
            background,
            asteroid_icon,
            font: PreparedFont {
                bytes: Arc::new(font),
            },
        })
    }
}

fn read_bytes(path: &Path) -> NeoResult<Vec<u8>> {
    Ok(std::fs::read(path).with_context(|| format!("read resource '{}'", path.display()))?)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Builds Parley layouts for a single registered font.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family_name: String,
}

impl TextLayoutEngine {
    /// Register `font_bytes` and remember its primary family.
    pub fn new(font_bytes: &[u8]) -> NeoResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| NeoError::validation("no font families registered from font bytes"))?;

        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| NeoError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Shape and lay out plain text. `\n` starts a new line; there is no wrapping.
    pub fn layout_plain(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrush,
    ) -> NeoResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(NeoError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
