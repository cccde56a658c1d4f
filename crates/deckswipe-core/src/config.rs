//! Swiper configuration: thresholds, curves, timings and layout.

use crate::geometry::{AxisThresholds, DisabledDirections, InterpolationTable};
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Viewport used by [`SwiperConfig::default`].
pub const DEFAULT_VIEWPORT: Size = Size::new(375.0, 667.0);

/// Number of samples in an opacity curve.
pub const OPACITY_TABLE_LEN: usize = 5;

/// Number of samples in the rotation curve.
pub const ROTATION_TABLE_LEN: usize = 3;

/// Configuration errors. All of them are raised when a swiper is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must be a finite non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value:?}")]
    NotFinite { name: &'static str, value: Vec2 },
    #[error("{name} table has {inputs} inputs but {outputs} outputs")]
    TableMismatch {
        name: &'static str,
        inputs: usize,
        outputs: usize,
    },
    #[error("{name} table needs {expected} samples, got {actual}")]
    TableLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{name} table inputs must be strictly increasing and finite")]
    TableNotIncreasing { name: &'static str },
    #[error("Config must be a JSON object")]
    NotAnObject,
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Immutable per-stack configuration.
///
/// Every field has a default derived from the viewport, so a JSON document
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwiperConfig {
    /// Horizontal distance past which a release commits.
    pub horizontal_threshold: f64,
    /// Vertical distance past which a release commits.
    pub vertical_threshold: f64,
    /// Horizontal distance past which the overlay label shows.
    /// Falls back to `horizontal_threshold` when unset.
    pub overlay_opacity_horizontal_threshold: Option<f64>,
    /// Vertical distance past which the overlay label shows.
    /// Falls back to `vertical_threshold` when unset.
    pub overlay_opacity_vertical_threshold: Option<f64>,
    /// Movement on either axis up to this radius still counts as a tap.
    pub tap_dead_zone: f64,
    /// Whether the card follows horizontal drags.
    pub horizontal_swipe: bool,
    /// Whether the card follows vertical drags.
    pub vertical_swipe: bool,
    /// Directions in which a release never commits.
    pub disabled: DisabledDirections,
    pub animate_card_opacity: bool,
    pub card_opacity_x: InterpolationTable,
    pub card_opacity_y: InterpolationTable,
    pub animate_overlay_labels_opacity: bool,
    pub overlay_labels_opacity_x: InterpolationTable,
    pub overlay_labels_opacity_y: InterpolationTable,
    /// Horizontal offset to tilt in degrees.
    pub rotation: InterpolationTable,
    /// Duration of the linear swipe-out tween.
    pub swipe_animation_duration_ms: u64,
    /// Carried for hosts that time the swipe-back themselves; the spring is friction driven.
    pub swipe_back_animation_duration_ms: u64,
    pub swipe_back_friction: f64,
    /// Carried for hosts that time the zoom themselves; the spring is friction driven.
    pub zoom_animation_duration_ms: u64,
    pub zoom_friction: f64,
    /// Resting offset of the previous card, off screen until swiped back.
    pub previous_card_initial_position: Vec2,
    /// Resting scale of the next card.
    pub second_card_zoom: f64,
    pub show_second_card: bool,
    pub swipe_back_card: bool,
    pub card_horizontal_margin: f64,
    pub card_vertical_margin: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Default for SwiperConfig {
    fn default() -> Self {
        Self::for_viewport(DEFAULT_VIEWPORT)
    }
}

impl SwiperConfig {
    /// Default configuration scaled to a viewport.
    pub fn for_viewport(viewport: Size) -> Self {
        let (w, h) = (viewport.width, viewport.height);
        Self {
            horizontal_threshold: w / 4.0,
            vertical_threshold: h / 5.0,
            overlay_opacity_horizontal_threshold: Some(w / 4.0),
            overlay_opacity_vertical_threshold: Some(h / 5.0),
            tap_dead_zone: 5.0,
            horizontal_swipe: true,
            vertical_swipe: true,
            disabled: DisabledDirections::NONE,
            animate_card_opacity: false,
            card_opacity_x: InterpolationTable::new(
                [-w / 2.0, -w / 3.0, 0.0, w / 3.0, w / 2.0],
                [0.8, 1.0, 1.0, 1.0, 0.8],
            ),
            card_opacity_y: InterpolationTable::new(
                [-h / 2.0, -h / 3.0, 0.0, h / 3.0, h / 2.0],
                [0.8, 1.0, 1.0, 1.0, 0.8],
            ),
            animate_overlay_labels_opacity: false,
            overlay_labels_opacity_x: InterpolationTable::new(
                [-w / 3.0, -w / 4.0, 0.0, w / 4.0, w / 3.0],
                [1.0, 0.0, 0.0, 0.0, 1.0],
            ),
            overlay_labels_opacity_y: InterpolationTable::new(
                [-h / 4.0, -h / 5.0, 0.0, h / 5.0, h / 4.0],
                [1.0, 0.0, 0.0, 0.0, 1.0],
            ),
            rotation: InterpolationTable::new([-w / 2.0, 0.0, w / 2.0], [-10.0, 0.0, 10.0]),
            swipe_animation_duration_ms: 350,
            swipe_back_animation_duration_ms: 600,
            swipe_back_friction: 11.0,
            zoom_animation_duration_ms: 100,
            zoom_friction: 7.0,
            previous_card_initial_position: Vec2::new(0.0, -h),
            second_card_zoom: 0.97,
            show_second_card: true,
            swipe_back_card: false,
            card_horizontal_margin: 20.0,
            card_vertical_margin: 60.0,
            margin_top: 0.0,
            margin_bottom: 0.0,
        }
    }

    /// Parse and validate a JSON config on top of the default viewport.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Self::from_json_str_for_viewport(json, DEFAULT_VIEWPORT)
    }

    /// Parse and validate a JSON config; fields it omits take the defaults for `viewport`.
    pub fn from_json_str_for_viewport(json: &str, viewport: Size) -> ConfigResult<Self> {
        let mut merged = serde_json::to_value(Self::for_viewport(viewport))?;
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let (Some(base), serde_json::Value::Object(overrides)) = (merged.as_object_mut(), overrides)
        else {
            return Err(ConfigError::NotAnObject);
        };
        for (key, value) in overrides {
            base.insert(key, value);
        }

        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the gesture and animation code cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        positive("horizontal_threshold", self.horizontal_threshold)?;
        positive("vertical_threshold", self.vertical_threshold)?;
        if let Some(value) = self.overlay_opacity_horizontal_threshold {
            non_negative("overlay_opacity_horizontal_threshold", value)?;
        }
        if let Some(value) = self.overlay_opacity_vertical_threshold {
            non_negative("overlay_opacity_vertical_threshold", value)?;
        }
        non_negative("tap_dead_zone", self.tap_dead_zone)?;

        check_table("card_opacity_x", &self.card_opacity_x, OPACITY_TABLE_LEN)?;
        check_table("card_opacity_y", &self.card_opacity_y, OPACITY_TABLE_LEN)?;
        check_table(
            "overlay_labels_opacity_x",
            &self.overlay_labels_opacity_x,
            OPACITY_TABLE_LEN,
        )?;
        check_table(
            "overlay_labels_opacity_y",
            &self.overlay_labels_opacity_y,
            OPACITY_TABLE_LEN,
        )?;
        check_table("rotation", &self.rotation, ROTATION_TABLE_LEN)?;

        positive("swipe_back_friction", self.swipe_back_friction)?;
        positive("zoom_friction", self.zoom_friction)?;
        positive("second_card_zoom", self.second_card_zoom)?;
        if !(self.previous_card_initial_position.x.is_finite()
            && self.previous_card_initial_position.y.is_finite())
        {
            return Err(ConfigError::NotFinite {
                name: "previous_card_initial_position",
                value: self.previous_card_initial_position,
            });
        }

        non_negative("card_horizontal_margin", self.card_horizontal_margin)?;
        non_negative("card_vertical_margin", self.card_vertical_margin)?;
        non_negative("margin_top", self.margin_top)?;
        non_negative("margin_bottom", self.margin_bottom)?;
        Ok(())
    }

    /// Distances a release must pass to commit.
    pub fn commit_thresholds(&self) -> AxisThresholds {
        AxisThresholds::new(self.horizontal_threshold, self.vertical_threshold)
    }

    /// Distances a drag must pass to show an overlay label.
    ///
    /// An unset or zero label threshold falls back to the commit threshold.
    pub fn label_thresholds(&self) -> AxisThresholds {
        AxisThresholds::new(
            self.overlay_opacity_horizontal_threshold
                .filter(|&threshold| threshold > 0.0)
                .unwrap_or(self.horizontal_threshold),
            self.overlay_opacity_vertical_threshold
                .filter(|&threshold| threshold > 0.0)
                .unwrap_or(self.vertical_threshold),
        )
    }
}

fn positive(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn check_table(
    name: &'static str,
    table: &InterpolationTable,
    expected: usize,
) -> ConfigResult<()> {
    if table.input.len() != table.output.len() {
        return Err(ConfigError::TableMismatch {
            name,
            inputs: table.input.len(),
            outputs: table.output.len(),
        });
    }
    if table.input.len() != expected {
        return Err(ConfigError::TableLength {
            name,
            expected,
            actual: table.input.len(),
        });
    }
    let increasing = table.input.iter().all(|v| v.is_finite())
        && table.input.windows(2).all(|pair| pair[0] < pair[1]);
    if !increasing {
        return Err(ConfigError::TableNotIncreasing { name });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_viewport() {
        let config = SwiperConfig::for_viewport(Size::new(400.0, 800.0));
        assert!((config.horizontal_threshold - 100.0).abs() < f64::EPSILON);
        assert!((config.vertical_threshold - 160.0).abs() < f64::EPSILON);
        assert_eq!(config.previous_card_initial_position, Vec2::new(0.0, -800.0));
        assert_eq!(config.rotation.input, vec![-200.0, 0.0, 200.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_is_valid() {
        assert!(SwiperConfig::default().validate().is_ok());
    }

    #[test]
    fn test_label_thresholds_fall_back_to_commit() {
        let mut config = SwiperConfig::default();
        config.horizontal_threshold = 100.0;
        config.vertical_threshold = 120.0;
        config.overlay_opacity_horizontal_threshold = None;
        config.overlay_opacity_vertical_threshold = Some(40.0);
        let labels = config.label_thresholds();
        assert!((labels.horizontal - 100.0).abs() < f64::EPSILON);
        assert!((labels.vertical - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_label_threshold_falls_back_to_commit() {
        let mut config = SwiperConfig::default();
        config.horizontal_threshold = 100.0;
        config.vertical_threshold = 120.0;
        config.overlay_opacity_horizontal_threshold = Some(0.0);
        config.overlay_opacity_vertical_threshold = Some(0.0);
        assert!(config.validate().is_ok());
        assert_eq!(config.label_thresholds(), AxisThresholds::new(100.0, 120.0));
    }

    #[test]
    fn test_json_overrides_subset() {
        let json = r#"{
            "horizontal_threshold": 80,
            "disabled": { "left": true },
            "overlay_opacity_vertical_threshold": null
        }"#;
        let config =
            SwiperConfig::from_json_str_for_viewport(json, Size::new(400.0, 800.0)).unwrap();
        assert!((config.horizontal_threshold - 80.0).abs() < f64::EPSILON);
        assert!((config.vertical_threshold - 160.0).abs() < f64::EPSILON);
        assert!(config.disabled.left);
        assert!(!config.disabled.right);
        assert_eq!(config.overlay_opacity_vertical_threshold, None);
    }

    #[test]
    fn test_json_rejects_unknown_field() {
        let err = SwiperConfig::from_json_str(r#"{ "horizontal_treshold": 80 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_json_rejects_non_object() {
        let err = SwiperConfig::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject));
    }

    #[test]
    fn test_table_length_mismatch_rejected() {
        let mut config = SwiperConfig::default();
        config.card_opacity_x = InterpolationTable::new([-1.0, 0.0, 1.0], [0.5, 1.0]);
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TableMismatch {
                name: "card_opacity_x",
                inputs: 3,
                outputs: 2
            }
        ));
    }

    #[test]
    fn test_table_wrong_size_rejected() {
        let mut config = SwiperConfig::default();
        config.rotation = InterpolationTable::new([-1.0, 1.0], [-10.0, 10.0]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TableLength {
                name: "rotation",
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_table_not_increasing_rejected() {
        let mut config = SwiperConfig::default();
        config.overlay_labels_opacity_y =
            InterpolationTable::new([0.0, -1.0, 2.0, 3.0, 4.0], [1.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TableNotIncreasing { .. })
        ));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = SwiperConfig::default();
        config.vertical_threshold = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "vertical_threshold",
                ..
            })
        ));

        let mut config = SwiperConfig::default();
        config.tap_dead_zone = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = SwiperConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back = SwiperConfig::from_json_str(&json).unwrap();
        assert!((back.horizontal_threshold - config.horizontal_threshold).abs() < 1e-9);
        assert_eq!(back.swipe_animation_duration_ms, 350);
        assert_eq!(back.disabled, config.disabled);
        assert_eq!(back.rotation.output, config.rotation.output);
    }
}
