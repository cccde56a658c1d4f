//! Scripted gesture sessions.
//!
//! ```json
//! {
//!   "viewport": { "width": 375, "height": 667 },
//!   "cards": ["a", "b", "c"],
//!   "steps": [
//!     { "action": "grant" },
//!     { "action": "move", "dx": 150, "dy": 0 },
//!     { "action": "release" },
//!     { "action": "wait", "ms": 500 },
//!     { "action": "swipe", "direction": "left" },
//!     { "action": "swipe_back" }
//!   ]
//! }
//! ```

use crate::error::{AppError, AppResult};
use deckswipe_core::{DEFAULT_VIEWPORT, Direction};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Nanoseconds between two frames at 60 fps.
pub const FRAME_NANOS: u64 = 16_666_667;

fn default_viewport() -> Size {
    DEFAULT_VIEWPORT
}

/// A deck of named cards and the input to replay against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default = "default_viewport")]
    pub viewport: Size,
    pub cards: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Finger down on the top card.
    Grant,
    /// Finger at `(dx, dy)` from where it went down.
    Move { dx: f64, dy: f64 },
    Release,
    /// The host takes the gesture away.
    Terminate,
    /// Let frames run without input.
    Wait { ms: u64 },
    Swipe {
        direction: Direction,
        #[serde(default)]
        must_decrement_index: bool,
    },
    SwipeBack,
}

impl Step {
    /// Frames that run after the step is applied.
    pub fn frames(&self) -> u64 {
        match *self {
            Self::Wait { ms } => ms.saturating_mul(1_000_000).div_ceil(FRAME_NANOS),
            _ => 1,
        }
    }
}

impl Script {
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let script: Self = serde_json::from_str(json)?;
        let Size { width, height } = script.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(AppError::Viewport(script.viewport));
        }
        Ok(script)
    }
}
