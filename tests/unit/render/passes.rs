use std::sync::Arc;

use rand::SeedableRng;

use super::*;
use crate::{
    assets::store::PreparedFont,
    feed::extract::NormalizedNeo,
    foundation::core::PixelSize,
    render::layout::IconPlacement,
};

const CANVAS: PixelSize = PixelSize::new(200, 200);
const ICON: PixelSize = PixelSize::new(8, 8);

fn small_layout() -> LayoutSettings {
    LayoutSettings {
        min_asteroid_distance: 40.0,
        inter_asteroid_distance: 10.0,
        vertical_bias_px: 0,
        ..LayoutSettings::default()
    }
}

fn icon() -> PreparedImage {
    PreparedImage {
        size: ICON,
        rgba8_premul: Arc::new([255u8, 255, 255, 255].repeat(64)),
    }
}

fn asteroid(rank: usize, min: f64, max: f64) -> RankedAsteroid {
    RankedAsteroid {
        neo: NormalizedNeo {
            name: format!("({rank} XY)"),
            id: rank.to_string(),
            min_diam_m: min,
            max_diam_m: max,
            speed_kmh: 1,
            miss_distance_km: 1_000 * rank as i64,
            approach_date: "2024-01-02".to_string(),
        },
        avg_diam_m: min + max / 2.0,
        rank,
    }
}

fn five(diams: [(f64, f64); 5]) -> Vec<RankedAsteroid> {
    diams
        .into_iter()
        .enumerate()
        .map(|(rank, (min, max))| asteroid(rank, min, max))
        .collect()
}

fn center_of(p: &IconPlacement) -> (u32, u32) {
    (
        (p.top_left.x + p.size.width as i32 / 2) as u32,
        (p.top_left.y + p.size.height as i32 / 2) as u32,
    )
}

#[test]
fn asteroid_pass_paints_each_placement() {
    let layout = small_layout();
    let asteroids = five([(1.0, 2.0), (4.0, 8.0), (2.0, 2.0), (10.0, 10.0), (3.0, 1.0)]);
    let mut rng = rand_pcg::Pcg32::seed_from_u64(7);

    let canvas = draw_asteroids(
        ReportCanvas::transparent(CANVAS),
        &asteroids,
        &icon(),
        &layout,
        &mut rng,
    )
    .unwrap();

    let range = DiameterRange::of(asteroids.iter().map(|a| a.avg_diam_m)).unwrap();
    for a in &asteroids {
        let p = place_icon(CANVAS, ICON, a.rank, range.scale_for(a.avg_diam_m, 1.0), &layout);
        let (x, y) = center_of(&p);
        let px = canvas.pixel(x, y).unwrap();
        assert!(px[3] > 200, "rank {} center {x},{y} = {px:?}", a.rank);
    }

    assert_eq!(canvas.pixel(100, 100), Some([0, 0, 0, 0]));
    assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn asteroid_pass_is_deterministic_per_seed() {
    let layout = small_layout();
    let asteroids = five([(1.0, 2.0), (4.0, 8.0), (2.0, 2.0), (10.0, 10.0), (3.0, 1.0)]);
    let run = |seed| {
        let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
        draw_asteroids(
            ReportCanvas::transparent(CANVAS),
            &asteroids,
            &icon(),
            &layout,
            &mut rng,
        )
        .unwrap()
    };
    assert_eq!(run(11), run(11));
}

#[test]
fn equal_diameters_draw_full_size_icons() {
    let layout = small_layout();
    let asteroids = five([(5.0, 10.0); 5]);
    let mut rng = rand_pcg::Pcg32::seed_from_u64(1);
    let canvas = draw_asteroids(
        ReportCanvas::transparent(CANVAS),
        &asteroids,
        &icon(),
        &layout,
        &mut rng,
    )
    .unwrap();

    let p = place_icon(CANVAS, ICON, 0, 1.0, &layout);
    assert_eq!(p.size, ICON);
    let (x, y) = center_of(&p);
    assert!(canvas.pixel(x, y).unwrap()[3] > 200);
}

#[test]
fn asteroid_pass_keeps_background_outside_icons() {
    let layout = small_layout();
    let bg = PreparedImage {
        size: CANVAS,
        rgba8_premul: Arc::new([10u8, 20, 30, 255].repeat(200 * 200)),
    };
    let asteroids = five([(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0), (5.0, 5.0)]);
    let mut rng = rand_pcg::Pcg32::seed_from_u64(3);
    let canvas = draw_asteroids(
        ReportCanvas::from_image(&bg),
        &asteroids,
        &icon(),
        &layout,
        &mut rng,
    )
    .unwrap();
    assert_eq!(canvas.pixel(5, 195), Some([10, 20, 30, 255]));
}

#[test]
fn asteroid_pass_without_asteroids_is_error() {
    let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
    let err = draw_asteroids(
        ReportCanvas::transparent(CANVAS),
        &[],
        &icon(),
        &small_layout(),
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(err, NeoError::Render(_)));
}

#[test]
fn info_label_lists_five_fields() {
    let a = asteroid(2, 101.23, 226.0);
    assert_eq!(
        info_label(&a),
        "Name:(2 XY)\nMiss distance: 2000 km\nApproach date: 2024-01-02\n\
         Diameter(min): 101.23 m\nDiameter(max): 226.0 m"
    );
    assert_eq!(info_label(&a).lines().count(), 5);
}

const FIXTURE_FONT: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/data/fonts/DejaVuSansMono.ttf"
));

fn fixture_painter() -> TextPainter {
    TextPainter::new(&PreparedFont {
        bytes: Arc::new(FIXTURE_FONT.to_vec()),
    })
    .unwrap()
}

/// `(min_x, min_y, max_x, max_y)` of inked pixels inside `[x0, x1) x [y0, y1)`.
fn ink_in(
    canvas: &ReportCanvas,
    (x0, y0, x1, y1): (u32, u32, u32, u32),
) -> Option<(u32, u32, u32, u32)> {
    let mut ext: Option<(u32, u32, u32, u32)> = None;
    for y in y0..y1 {
        for x in x0..x1 {
            if canvas.pixel(x, y).is_none_or(|px| px[3] == 0) {
                continue;
            }
            ext = Some(match ext {
                None => (x, y, x, y),
                Some((a, b, c, d)) => (a.min(x), b.min(y), c.max(x), d.max(y)),
            });
        }
    }
    ext
}

fn row_bands_in(canvas: &ReportCanvas, (x0, y0, x1, y1): (u32, u32, u32, u32)) -> usize {
    let mut bands = 0;
    let mut prev = false;
    for y in y0..y1 {
        let inked = (x0..x1).any(|x| canvas.pixel(x, y).is_some_and(|px| px[3] > 128));
        if inked && !prev {
            bands += 1;
        }
        prev = inked;
    }
    bands
}

fn span() -> DateSpan {
    DateSpan {
        start: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end: chrono::NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
    }
}

#[test]
fn subtitle_renders_below_anchor_in_text_color() {
    let layout = LayoutSettings::default();
    let mut text = fixture_painter();
    let canvas = draw_subtitle(
        ReportCanvas::transparent(PixelSize::new(800, 300)),
        &span(),
        &mut text,
        &layout,
    )
    .unwrap();

    let (x0, y0, x1, _) = ink_in(&canvas, (0, 0, 800, 300)).unwrap();
    assert!(x0 >= 50 && y0 >= 140, "subtitle starts at {x0},{y0}");
    assert!(x1 - x0 > 300, "subtitle spans x {x0}..{x1}");

    let mut solid = 0;
    for y in y0..y0 + 40 {
        for x in x0..=x1 {
            let px = canvas.pixel(x, y).unwrap();
            if px[3] == 255 {
                assert_eq!(px, [0, 172, 0, 255]);
                solid += 1;
            }
        }
    }
    assert!(solid > 0);
}

#[test]
fn info_blocks_land_in_rank_slots_with_five_lines() {
    let layout = LayoutSettings::default();
    let asteroids = five([(101.23, 226.0), (4.0, 8.0), (2.0, 2.0), (10.0, 10.0), (3.0, 1.0)]);
    let mut text = fixture_painter();
    let canvas = draw_info(
        ReportCanvas::transparent(PixelSize::new(1500, 1500)),
        &asteroids,
        &mut text,
        &layout,
    )
    .unwrap();

    for a in &asteroids {
        let slot = layout.info_position(a.rank).unwrap();
        let (sx, sy) = (slot.x as u32, slot.y as u32);
        // The widest label line is well under 300 px at 16 px; other slots stay clear of this box.
        let region = (sx, sy, sx + 300, (sy + 250).min(1500));

        let (x0, y0, x1, y1) = ink_in(&canvas, region).unwrap();
        assert!(x0 >= sx + 10 && y0 >= sy + 10, "rank {} starts at {x0},{y0}", a.rank);
        assert!(x1 - x0 > 100, "rank {} spans x {x0}..{x1}", a.rank);
        assert!(y1 - y0 > 4 * 16, "rank {} spans y {y0}..{y1}", a.rank);
        assert_eq!(row_bands_in(&canvas, region), 5, "rank {}", a.rank);
    }
}
