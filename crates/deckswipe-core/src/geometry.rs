//! Drag geometry: direction dominance, commit checks and interpolation curves.
//!
//! Everything here is a pure function of the drag offset and configuration.
//! The overlay label, the release verdict and the callback that fires all go
//! through [`dominant_direction`], so the label a user sees can never disagree
//! with the direction that actually commits.

use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Factor applied to the release offset to compute where a swiped card exits.
pub const SWIPE_OUT_MULTIPLIER: f64 = 4.5;

/// A direction a card can leave the stack in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    /// All directions, horizontal first.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Top,
        Direction::Bottom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    /// Unit vector pointing the way a card travels when swiped in this direction.
    pub fn unit(self) -> Vec2 {
        match self {
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Top => Vec2::new(0.0, -1.0),
            Self::Bottom => Vec2::new(0.0, 1.0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Which overlay indicator (if any) is shown on the current card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelType {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
}

impl LabelType {
    /// The direction this label points at, `None` for [`LabelType::None`].
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::None => None,
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::Top => Some(Direction::Top),
            Self::Bottom => Some(Direction::Bottom),
        }
    }
}

impl From<Option<Direction>> for LabelType {
    fn from(direction: Option<Direction>) -> Self {
        match direction {
            None => Self::None,
            Some(Direction::Left) => Self::Left,
            Some(Direction::Right) => Self::Right,
            Some(Direction::Top) => Self::Top,
            Some(Direction::Bottom) => Self::Bottom,
        }
    }
}

/// A pair of per-axis distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisThresholds {
    pub horizontal: f64,
    pub vertical: f64,
}

impl AxisThresholds {
    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// The threshold that applies along the axis of `direction`.
    pub fn along(&self, direction: Direction) -> f64 {
        if direction.is_horizontal() {
            self.horizontal
        } else {
            self.vertical
        }
    }
}

/// Per-direction swipe disable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisabledDirections {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl DisabledDirections {
    /// Every direction enabled.
    pub const NONE: Self = Self {
        left: false,
        right: false,
        top: false,
        bottom: false,
    };

    /// Check whether swiping in `direction` is disabled.
    pub fn contains(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Top => self.top,
            Direction::Bottom => self.bottom,
        }
    }

    /// Return a copy with `direction` disabled.
    pub fn with(mut self, direction: Direction) -> Self {
        match direction {
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
            Direction::Top => self.top = true,
            Direction::Bottom => self.bottom = true,
        }
        self
    }
}

/// The direction whose axis strictly dominates the offset.
///
/// Equal magnitudes (including the origin) have no dominant direction.
pub fn dominant_direction(offset: Vec2) -> Option<Direction> {
    let (ax, ay) = (offset.x.abs(), offset.y.abs());
    if ax > ay {
        Some(if offset.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else if ay > ax {
        Some(if offset.y > 0.0 {
            Direction::Bottom
        } else {
            Direction::Top
        })
    } else {
        None
    }
}

/// Pick the overlay label for a drag offset.
///
/// The dominant axis must also exceed its own label threshold.
pub fn classify_label(offset: Vec2, label_thresholds: AxisThresholds) -> LabelType {
    dominant_direction(offset)
        .filter(|&direction| {
            let magnitude = if direction.is_horizontal() {
                offset.x.abs()
            } else {
                offset.y.abs()
            };
            magnitude > label_thresholds.along(direction)
        })
        .into()
}

/// True when either axis has travelled past its commit threshold.
pub fn is_commit(offset: Vec2, commit_thresholds: AxisThresholds) -> bool {
    offset.x.abs() > commit_thresholds.horizontal || offset.y.abs() > commit_thresholds.vertical
}

/// Decide which direction a release commits to, if any.
///
/// A release commits when [`is_commit`] holds and the dominant direction is
/// enabled. The dominant axis does not need to pass its own threshold: a
/// diagonal drag that crosses only the minor axis threshold still commits
/// along the major axis.
pub fn resolve_direction(
    offset: Vec2,
    commit_thresholds: AxisThresholds,
    disabled: DisabledDirections,
) -> Option<Direction> {
    if !is_commit(offset, commit_thresholds) {
        return None;
    }
    dominant_direction(offset).filter(|&direction| !disabled.contains(direction))
}

/// A piecewise-linear curve given as matching input/output samples.
///
/// Inputs must be strictly increasing; see
/// [`SwiperConfig::validate`](crate::config::SwiperConfig::validate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolationTable {
    pub input: Vec<f64>,
    pub output: Vec<f64>,
}

impl InterpolationTable {
    pub fn new(input: impl Into<Vec<f64>>, output: impl Into<Vec<f64>>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Evaluate the curve at `value`.
    pub fn sample(&self, value: f64) -> f64 {
        interpolate(value, &self.input, &self.output)
    }
}

/// Piecewise-linear interpolation, clamped to the end samples outside the domain.
pub fn interpolate(value: f64, input: &[f64], output: &[f64]) -> f64 {
    let len = input.len().min(output.len());
    if len == 0 {
        return value;
    }
    if len == 1 || value <= input[0] {
        return output[0];
    }
    if value >= input[len - 1] {
        return output[len - 1];
    }

    let segment = input[..len]
        .windows(2)
        .position(|pair| value <= pair[1])
        .unwrap_or(len - 2);
    let (in_lo, in_hi) = (input[segment], input[segment + 1]);
    let (out_lo, out_hi) = (output[segment], output[segment + 1]);
    let span = in_hi - in_lo;
    if span <= 0.0 {
        return out_hi;
    }
    out_lo + (out_hi - out_lo) * (value - in_lo) / span
}

/// An angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

/// Card tilt for a horizontal offset; the table's outputs are degrees.
pub fn interpolate_rotation(dx: f64, table: &InterpolationTable) -> Degrees {
    Degrees(table.sample(dx))
}

/// Sample the table of whichever axis currently dominates.
///
/// No blending happens between the two curves: ties go to the vertical table.
pub fn dominant_axis_sample(
    offset: Vec2,
    horizontal: &InterpolationTable,
    vertical: &InterpolationTable,
) -> f64 {
    if offset.x.abs() > offset.y.abs() {
        horizontal.sample(offset.x)
    } else {
        vertical.sample(offset.y)
    }
}
