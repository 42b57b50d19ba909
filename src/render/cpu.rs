use std::sync::Arc;

use crate::{
    assets::store::{PreparedFont, PreparedImage, TextBrush, TextLayoutEngine},
    foundation::core::{Affine, PixelSize, Rgba8},
    foundation::error::{NeoError, NeoResult},
};

/// Render into a fresh transparent layer of `size` and return its premultiplied RGBA8 bytes.
///
/// `vello_cpu` renders into a fresh buffer, so passes draw here and composite the result onto
/// the report canvas.
pub fn render_layer<F>(size: PixelSize, draw: F) -> NeoResult<Vec<u8>>
where
    F: FnOnce(&mut vello_cpu::RenderContext) -> NeoResult<()>,
{
    let (w, h) = size_u16(size)?;
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx)?;
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

/// Fill `image` in its own pixel space under `transform`.
pub fn fill_image(
    ctx: &mut vello_cpu::RenderContext,
    image: &vello_cpu::Image,
    size: PixelSize,
    transform: Affine,
) {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(image.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(size.width),
        f64::from(size.height),
    ));
}

pub fn image_paint(image: &PreparedImage) -> NeoResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(image.rgba8_premul.as_slice(), image.size)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Lays out and draws text in the report font.
pub struct TextPainter {
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
}

impl TextPainter {
    pub fn new(font: &PreparedFont) -> NeoResult<Self> {
        let engine = TextLayoutEngine::new(font.bytes.as_slice())?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
            0,
        );
        Ok(Self { engine, font })
    }

    pub fn family_name(&self) -> &str {
        self.engine.family_name()
    }

    /// Draw `text` with its layout box's top-left corner mapped through `transform`.
    ///
    /// The first line's ascent sits below the anchor, so text never extends above it.
    pub fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        size_px: f32,
        color: Rgba8,
        transform: Affine,
    ) -> NeoResult<()> {
        let layout = self
            .engine
            .layout_plain(text, size_px, TextBrush::from(color))?;

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                // Positions are layout-absolute: run offset on x, line baseline on y.
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn size_u16(size: PixelSize) -> NeoResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| NeoError::render("layer width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| NeoError::render("layer height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(NeoError::render("layer must be non-empty"));
    }
    Ok((w, h))
}

fn pixmap_from_premul_bytes(bytes: &[u8], size: PixelSize) -> NeoResult<vello_cpu::Pixmap> {
    let (w, h) = size_u16(size)?;
    if bytes.len() != size.byte_len() {
        return Err(NeoError::render("prepared image byte length mismatch"));
    }
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity((size.width as usize) * (size.height as usize));
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
