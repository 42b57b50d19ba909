//! Screen-space geometry of the asteroid ring.
//!
//! All coordinates are integer pixels with y pointing down. Rank `r` sits at angle
//! `angle_step * r` measured from "up", counter-clockwise towards the left, at radius
//! `min_distance + inter_distance * r`. The radius grows with rank, so the five icons trace a
//! spiral rather than a circle.

use crate::{
    config::settings::LayoutSettings,
    foundation::core::{Affine, PixelOffset, PixelSize, Point},
};

/// Smallest and largest report diameter among the ranked asteroids.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiameterRange {
    pub min: f64,
    pub max: f64,
}

impl DiameterRange {
    pub fn of(diams: impl IntoIterator<Item = f64>) -> Option<Self> {
        diams.into_iter().fold(None, |acc, d| {
            Some(match acc {
                None => Self { min: d, max: d },
                Some(r) => Self {
                    min: r.min.min(d),
                    max: r.max.max(d),
                },
            })
        })
    }

    /// Icon scale in `[0.5, 1.0]`: half size for the smallest, full size for the largest.
    ///
    /// When every diameter is equal there is no spread to scale by and `uniform` is returned.
    pub fn scale_for(&self, diam: f64, uniform: f64) -> f64 {
        let spread = self.max - self.min;
        if !spread.is_finite() || spread <= 0.0 {
            return uniform;
        }
        0.5 + 0.5 * (diam - self.min) / spread
    }
}

pub fn orbit_angle_rad(rank: usize, layout: &LayoutSettings) -> f64 {
    (layout.angle_step_deg * rank as f64).to_radians()
}

pub fn orbit_radius(rank: usize, layout: &LayoutSettings) -> f64 {
    layout.min_asteroid_distance + layout.inter_asteroid_distance * rank as f64
}

/// Where a scaled icon lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IconPlacement {
    /// Icon size after scaling, truncated to whole pixels.
    pub size: PixelSize,
    pub top_left: PixelOffset,
}

/// Place the icon for `rank` at `scale`.
///
/// The scaled icon is centered on its orbit point, then pushed back towards the ring by half of
/// the size it lost, so shrunken icons keep the same outer edge on the ring.
pub fn place_icon(
    canvas: PixelSize,
    icon: PixelSize,
    rank: usize,
    scale: f64,
    layout: &LayoutSettings,
) -> IconPlacement {
    let scaled_w = trunc(scale * f64::from(icon.width)).max(0);
    let scaled_h = trunc(scale * f64::from(icon.height)).max(0);
    let size_diff = (f64::from(icon.width) - f64::from(scaled_w)) / 2.0;

    let angle = orbit_angle_rad(rank, layout);
    let radius = orbit_radius(rank, layout);
    let (sin, cos) = angle.sin_cos();

    let cx = (canvas.width / 2) as i32;
    let cy = (canvas.height / 2) as i32;

    let x = cx - trunc(radius * sin) - scaled_w / 2 + trunc(size_diff * sin);
    let y = cy - trunc(radius * cos) - scaled_h / 2 + layout.vertical_bias_px
        + trunc(size_diff * cos);

    IconPlacement {
        size: PixelSize::new(scaled_w as u32, scaled_h as u32),
        top_left: PixelOffset::new(x, y),
    }
}

/// Maps icon-space pixels into a layer of `placement.size`: rotate about the icon center by
/// `rotation_deg` (counter-clockwise on screen), then scale to the placed size. The layer keeps
/// the placed footprint, so rotated corners are clipped.
pub fn icon_transform(icon: PixelSize, placement: &IconPlacement, rotation_deg: f64) -> Affine {
    let sx = f64::from(placement.size.width) / f64::from(icon.width.max(1));
    let sy = f64::from(placement.size.height) / f64::from(icon.height.max(1));
    let center = Point::new(f64::from(icon.width) / 2.0, f64::from(icon.height) / 2.0);
    Affine::scale_non_uniform(sx, sy) * Affine::rotate_about(-rotation_deg.to_radians(), center)
}

/// Translation that puts a layer's origin at `at`.
pub fn translate_to(at: PixelOffset) -> Affine {
    Affine::translate(at.to_point().to_vec2())
}

fn trunc(v: f64) -> i32 {
    v.trunc() as i32
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
