use crate::{
    assets::{decode::unpremultiply_rgba8_in_place, store::PreparedImage},
    foundation::core::{PixelOffset, PixelSize},
    foundation::error::{NeoError, NeoResult},
};

/// Report image being composed, in premultiplied RGBA8.
///
/// Drawing passes take the canvas by value and hand it back, so each pass owns it exclusively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportCanvas {
    size: PixelSize,
    rgba8_premul: Vec<u8>,
}

impl ReportCanvas {
    pub fn from_image(image: &PreparedImage) -> Self {
        Self {
            size: image.size,
            rgba8_premul: image.rgba8_premul.as_ref().clone(),
        }
    }

    pub fn transparent(size: PixelSize) -> Self {
        Self {
            size,
            rgba8_premul: vec![0; size.byte_len()],
        }
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = (y as usize * self.size.width as usize + x as usize) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Source-over `layer` with its top-left corner at `at`. Parts outside the canvas are
    /// dropped; `at` may be negative.
    pub fn composite_at(
        &mut self,
        layer: &[u8],
        layer_size: PixelSize,
        at: PixelOffset,
    ) -> NeoResult<()> {
        if layer.len() != layer_size.byte_len() {
            return Err(NeoError::render(
                "composite_at expects a layer of width*height*4 bytes",
            ));
        }

        let cw = i64::from(self.size.width);
        let ch = i64::from(self.size.height);
        let x0 = i64::from(at.x).max(0);
        let y0 = i64::from(at.y).max(0);
        let x1 = (i64::from(at.x) + i64::from(layer_size.width)).min(cw);
        let y1 = (i64::from(at.y) + i64::from(layer_size.height)).min(ch);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let lw = layer_size.width as usize;
        for y in y0..y1 {
            let ly = (y - i64::from(at.y)) as usize;
            let lx0 = (x0 - i64::from(at.x)) as usize;
            let span = (x1 - x0) as usize;

            let src = &layer[(ly * lw + lx0) * 4..(ly * lw + lx0 + span) * 4];
            let d0 = (y as usize * cw as usize + x0 as usize) * 4;
            let dst = &mut self.rgba8_premul[d0..d0 + span * 4];
            over_in_place(dst, src)?;
        }
        Ok(())
    }

    /// Straight-alpha RGBA8 bytes for encoding.
    pub fn into_straight_rgba8(self) -> (PixelSize, Vec<u8>) {
        let mut data = self.rgba8_premul;
        unpremultiply_rgba8_in_place(&mut data);
        (self.size, data)
    }
}

/// Premultiplied source-over of one pixel.
pub fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);

    let mut out = [0u8; 4];
    out[3] = src[3].saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> NeoResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(NeoError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
