use std::fs;
use std::path::Path;

use egui::Color32;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::hit_testing::HIT_TOLERANCE;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for an editing session.
///
/// Every field has a default, so a config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Margin in model units for line-like and point-like hit tests
    pub hit_tolerance: f32,
    /// Divide the hit margin by the zoom so it stays constant on screen
    pub scale_tolerance_with_zoom: bool,
    pub default_text_size: f32,
    pub default_stroke_width: f32,
    /// Unmultiplied RGBA
    pub default_color: [u8; 4],
    /// Maximum number of undo steps kept; the oldest are evicted first
    pub history_limit: usize,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Edge length used when the host prepares a stamp without a size
    pub default_stamp_size: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: HIT_TOLERANCE,
            scale_tolerance_with_zoom: false,
            default_text_size: 48.0,
            default_stroke_width: 8.0,
            default_color: [0, 0, 0, 255],
            history_limit: 50,
            min_scale: 0.1,
            max_scale: 5.0,
            default_stamp_size: 200.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn default_color(&self) -> Color32 {
        let [r, g, b, a] = self.default_color;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    /// Clamp a zoom factor into the configured range.
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("hit_tolerance", self.hit_tolerance),
            ("default_text_size", self.default_text_size),
            ("default_stroke_width", self.default_stroke_width),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("default_stamp_size", self.default_stamp_size),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if self.min_scale > self.max_scale {
            return Err(ConfigError::InvalidValue(format!(
                "min_scale {} exceeds max_scale {}",
                self.min_scale, self.max_scale
            )));
        }

        if self.history_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "history_limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.hit_tolerance, 20.0);
        assert_eq!(config.default_text_size, 48.0);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.default_color(), Color32::BLACK);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = EditorConfig::from_json_str(r#"{ "history_limit": 5, "max_scale": 3.0 }"#).unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.max_scale, 3.0);
        assert_eq!(config.min_scale, 0.1);
        assert!(!config.scale_tolerance_with_zoom);
    }

    #[test]
    fn test_clamp_scale() {
        let config = EditorConfig::default();
        assert_eq!(config.clamp_scale(0.01), 0.1);
        assert_eq!(config.clamp_scale(12.0), 5.0);
        assert_eq!(config.clamp_scale(2.5), 2.5);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            EditorConfig::from_json_str(r#"{ "history_limit": 0 }"#),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            EditorConfig::from_json_str(r#"{ "min_scale": 4.0, "max_scale": 2.0 }"#),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            EditorConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = EditorConfig::from_file("/nonexistent/annotator.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_json_round_trip() {
        let config = EditorConfig {
            scale_tolerance_with_zoom: true,
            default_color: [255, 0, 0, 255],
            ..Default::default()
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(EditorConfig::from_json_str(&json).unwrap(), config);
    }
}
