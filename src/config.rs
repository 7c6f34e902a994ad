use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::selection::BandLayout;

/// Viewer settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Height of one bar-chart row in band coordinates.
    pub band_height: f64,
    /// Fraction of each row left empty between bars.
    pub band_padding: f64,
    /// Continent shown in the bar chart at startup; `None` shows all.
    pub region: Option<String>,
    /// Countries left out of the bar chart at startup.
    pub excluded_countries: Vec<String>,
    /// Seconds between years while the bar chart animation plays.
    pub play_interval_secs: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            band_height: 20.0,
            band_padding: 0.1,
            region: Some("South America".to_string()),
            excluded_countries: vec!["Falkland Islands (Malvinas)".to_string()],
            play_interval_secs: 0.6,
        }
    }
}

impl ChartConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: ChartConfig = serde_json::from_str(&text).context("parsing config JSON")?;
        log::info!("Loaded chart config from {}", path.display());
        Ok(config.sanitized())
    }

    /// Replace band geometry that would produce empty or inverted bands.
    pub fn sanitized(mut self) -> Self {
        let defaults = ChartConfig::default();
        if !(self.band_height.is_finite() && self.band_height > 0.0) {
            log::warn!(
                "band_height {} must be positive, using {}",
                self.band_height,
                defaults.band_height
            );
            self.band_height = defaults.band_height;
        }
        if !self.band_padding.is_finite() {
            log::warn!(
                "band_padding {} is not a number, using {}",
                self.band_padding,
                defaults.band_padding
            );
            self.band_padding = defaults.band_padding;
        } else if !(0.0..1.0).contains(&self.band_padding) {
            let clamped = self.band_padding.clamp(0.0, 0.9);
            log::warn!("band_padding {} outside [0, 1), using {clamped}", self.band_padding);
            self.band_padding = clamped;
        }
        self
    }

    pub fn layout(&self) -> BandLayout {
        BandLayout {
            band_height: self.band_height,
            padding: self.band_padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{"band_height": 12.5, "region": null}"#).unwrap();

        let config = ChartConfig::from_file(&path).unwrap();
        assert_eq!(config.band_height, 12.5);
        assert_eq!(config.region, None);
        assert_eq!(config.band_padding, ChartConfig::default().band_padding);
        assert_eq!(config.layout().band_height, 12.5);
    }

    #[test]
    fn degenerate_band_geometry_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{"band_height": 0, "band_padding": 1.5}"#).unwrap();

        let config = ChartConfig::from_file(&path).unwrap();
        assert_eq!(config.band_height, ChartConfig::default().band_height);
        assert_eq!(config.band_padding, 0.9);

        let negative = ChartConfig {
            band_height: -4.0,
            band_padding: f64::NAN,
            ..ChartConfig::default()
        }
        .sanitized();
        assert_eq!(negative.band_height, 20.0);
        assert_eq!(negative.band_padding, 0.1);

        let fine = ChartConfig {
            band_height: 8.0,
            band_padding: 0.0,
            ..ChartConfig::default()
        };
        assert_eq!(fine.clone().sanitized(), fine);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ChartConfig::from_file(Path::new("/nonexistent/viewer.json")).is_err());
    }
}
