use std::io::Cursor;

use chrono::NaiveDate;
use rand::SeedableRng;
use serde_json::{Value, json};

use super::*;
use crate::foundation::error::NeoError;

fn record(name: &str, miss_km: &str, min_m: f64, max_m: f64) -> Value {
    json!({
        "id": name.len().to_string(),
        "name": name,
        "estimated_diameter": {
            "meters": { "estimated_diameter_min": min_m, "estimated_diameter_max": max_m }
        },
        "close_approach_data": [{
            "close_approach_date": "2024-03-02",
            "relative_velocity": { "kilometers_per_hour": "30000.4" },
            "miss_distance": { "kilometers": miss_km }
        }]
    })
}

fn sample_feed() -> RawFeed {
    let mut raw = RawFeed::new();
    raw.insert(
        "2024-03-02".to_string(),
        vec![
            record("B", "400", 10.0, 20.0),
            json!({ "name": "broken", "id": "0" }),
            record("C", "100", 1.0, 2.0),
        ],
    );
    raw.insert(
        "2024-03-01".to_string(),
        vec![
            record("A", "300", 5.0, 5.0),
            record("D", "100", 7.0, 9.0),
            record("E", "900", 3.0, 3.0),
            record("F", "50", 2.0, 4.0),
        ],
    );
    raw
}

#[test]
fn select_ranks_five_closest_across_dates() {
    let sel = select_from_feed(&sample_feed()).unwrap();

    assert_eq!(sel.dropped, 1);
    assert_eq!(sel.span.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(sel.span.end, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());

    let names: Vec<&str> = sel.asteroids.iter().map(|a| a.neo.name.as_str()).collect();
    // 2024-03-02 comes first in the document, so C precedes D on the tie.
    assert_eq!(names, ["F", "C", "D", "A", "B"]);
    let ranks: Vec<usize> = sel.asteroids.iter().map(|a| a.rank).collect();
    assert_eq!(ranks, [0, 1, 2, 3, 4]);
    assert!(
        sel.asteroids
            .windows(2)
            .all(|w| w[0].neo.miss_distance_km <= w[1].neo.miss_distance_km)
    );
}

#[test]
fn tie_across_dates_follows_response_order() {
    let miss = |name: &str, km: &str| record(name, km, 1.0, 2.0);
    let body = json!({
        "near_earth_objects": {
            "2024-01-05": [miss("first-in-body", "100")],
            "2024-01-01": [
                miss("second-in-body", "100"),
                miss("x", "500"),
                miss("y", "600"),
                miss("z", "700")
            ]
        }
    })
    .to_string();

    let raw = crate::feed::client::parse_feed(&body).unwrap();
    let sel = select_from_feed(&raw).unwrap();
    let names: Vec<&str> = sel.asteroids.iter().map(|a| a.neo.name.as_str()).collect();
    assert_eq!(names, ["first-in-body", "second-in-body", "x", "y", "z"]);
    assert_eq!(sel.span.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
}

#[test]
fn select_with_too_few_complete_records_fails() {
    let mut raw = sample_feed();
    raw.shift_remove("2024-03-01");
    let err = select_from_feed(&raw).unwrap_err();
    assert!(matches!(err, NeoError::Validation(_)));
    assert!(err.to_string().contains("found 2"), "{err}");
}

#[test]
fn select_from_empty_feed_fails() {
    assert!(matches!(
        select_from_feed(&RawFeed::new()),
        Err(NeoError::Validation(_))
    ));
}

#[test]
fn generate_fails_on_missing_resources_before_fetching() {
    let mut settings = Settings::default();
    settings.resources.dir =
        std::env::temp_dir().join(format!("neo-situation-no-resources-{}", std::process::id()));
    settings.feed.endpoint = "http://127.0.0.1:9/unreachable".to_string();

    let req = FeedRequest::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), None);
    let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
    let err = generate_report(&settings, &req, &mut rng).unwrap_err();
    assert!(err.to_string().contains("read resource"), "{err}");
}

#[test]
fn generate_rejects_invalid_settings() {
    let mut settings = Settings::default();
    settings.layout.info_positions.pop();

    let req = FeedRequest::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), None);
    let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
    assert!(matches!(
        generate_report(&settings, &req, &mut rng),
        Err(NeoError::Validation(_))
    ));
}

const FIXTURE_FONT: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/data/fonts/DejaVuSansMono.ttf"
));

fn png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn compose_writes_named_report_png() {
    let dir =
        std::env::temp_dir().join(format!("neo-situation-compose-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let mut settings = Settings::default();
    settings.export.out_dir = dir.clone();

    let assets = ReportAssets::from_bytes(
        &png(900, 900, [20, 20, 40, 255]),
        &png(144, 144, [200, 180, 160, 255]),
        FIXTURE_FONT.to_vec(),
    )
    .unwrap();
    let selection = select_from_feed(&sample_feed()).unwrap();
    let mut rng = rand_pcg::Pcg32::seed_from_u64(5);

    let outcome = compose_report(&settings, &assets, selection, &mut rng).unwrap();
    assert_eq!(
        outcome.path,
        dir.join("NEO-Situationfrom2024-03-01to2024-03-02.png")
    );
    assert_eq!(outcome.asteroids.len(), 5);

    let img = image::open(&outcome.path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (900, 900));
    let subtitle_ink = (140..190)
        .flat_map(|y| (50..800).map(move |x| (x, y)))
        .any(|(x, y)| img.get_pixel(x, y).0 == [0, 172, 0, 255]);
    assert!(subtitle_ink, "no subtitle pixels under the anchor");

    let _ = std::fs::remove_dir_all(&dir);
}
