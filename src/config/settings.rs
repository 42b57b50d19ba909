use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::{
    core::{PixelOffset, PixelSize, Rgba8},
    error::{NeoError, NeoResult},
};

/// Number of asteroids placed on the report; also the number of layout slots.
pub const REPORT_SLOTS: usize = 5;

/// NASA NeoWs feed endpoint.
pub const DEFAULT_FEED_ENDPOINT: &str = "https://api.nasa.gov/neo/rest/v1/feed";

/// Complete run configuration.
///
/// Every field has a default matching the stock report layout, so an empty JSON object (`{}`)
/// is a valid settings file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where and how to fetch the feed.
    pub feed: FeedSettings,
    /// Bundled image and font resources.
    pub resources: ResourceSettings,
    /// Fixed screen-space layout of the report.
    pub layout: LayoutSettings,
    /// Output file naming.
    pub export: ExportSettings,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub endpoint: String,
    /// Plaintext file holding the API key.
    pub api_key_path: PathBuf,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_FEED_ENDPOINT.to_string(),
            api_key_path: PathBuf::from("api_key.txt"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ResourceSettings {
    pub dir: PathBuf,
    pub background: String,
    pub asteroid_icon: String,
    pub font: String,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("Resources"),
            background: "complete_bg.png".to_string(),
            asteroid_icon: "asteroid_144.png".to_string(),
            font: "bitty_monospace.otf".to_string(),
        }
    }
}

impl ResourceSettings {
    pub fn background_path(&self) -> PathBuf {
        self.dir.join(&self.background)
    }

    pub fn asteroid_icon_path(&self) -> PathBuf {
        self.dir.join(&self.asteroid_icon)
    }

    pub fn font_path(&self) -> PathBuf {
        self.dir.join(&self.font)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub subtitle_pos: PixelOffset,
    pub subtitle_size_px: f32,
    pub text_color: Rgba8,
    pub info_size_px: f32,
    /// Transparent panel each info block is drawn on before pasting; clips the text.
    pub info_panel: PixelSize,
    pub info_text_offset: PixelOffset,
    /// Info panel top-left corner, indexed by rank.
    pub info_positions: Vec<PixelOffset>,
    /// Orbit radius of rank 0.
    pub min_asteroid_distance: f64,
    /// Extra orbit radius added per rank.
    pub inter_asteroid_distance: f64,
    /// Angular step between ranks, in degrees.
    pub angle_step_deg: f64,
    /// Downward shift of the orbit center relative to the canvas center.
    pub vertical_bias_px: i32,
    /// Icon scale used when every diameter is identical.
    pub uniform_scale: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            subtitle_pos: PixelOffset::new(50, 140),
            subtitle_size_px: 30.0,
            text_color: Rgba8::opaque(0, 172, 0),
            info_size_px: 16.0,
            info_panel: PixelSize::new(500, 250),
            info_text_offset: PixelOffset::new(10, 10),
            info_positions: vec![
                PixelOffset::new(500, 300),
                PixelOffset::new(50, 450),
                PixelOffset::new(50, 1200),
                PixelOffset::new(1000, 1200),
                PixelOffset::new(1000, 400),
            ],
            min_asteroid_distance: 250.0,
            inter_asteroid_distance: 50.0,
            angle_step_deg: 360.0 / REPORT_SLOTS as f64,
            vertical_bias_px: 72,
            uniform_scale: 1.0,
        }
    }
}

impl LayoutSettings {
    pub fn info_position(&self, rank: usize) -> NeoResult<PixelOffset> {
        self.info_positions.get(rank).copied().ok_or_else(|| {
            NeoError::validation(format!("no info position configured for rank {rank}"))
        })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub file_prefix: String,
    pub out_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_prefix: "NEO-Situation".to_string(),
            out_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> NeoResult<Self> {
        let f = File::open(path).with_context(|| format!("open settings '{}'", path.display()))?;
        let settings: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| NeoError::serde(format!("parse settings '{}': {e}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> NeoResult<()> {
        if self.feed.endpoint.trim().is_empty() {
            return Err(NeoError::validation("feed endpoint must be non-empty"));
        }
        let l = &self.layout;
        if l.info_positions.len() != REPORT_SLOTS {
            return Err(NeoError::validation(format!(
                "layout needs exactly {REPORT_SLOTS} info positions, got {}",
                l.info_positions.len()
            )));
        }
        for (name, size) in [
            ("subtitle_size_px", l.subtitle_size_px),
            ("info_size_px", l.info_size_px),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(NeoError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if l.info_panel.is_empty() {
            return Err(NeoError::validation("info_panel must be non-empty"));
        }
        if !l.uniform_scale.is_finite() || l.uniform_scale <= 0.0 {
            return Err(NeoError::validation("uniform_scale must be finite and > 0"));
        }
        if self.export.file_prefix.contains(['/', '\\']) {
            return Err(NeoError::validation(
                "export file_prefix must not contain path separators",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
