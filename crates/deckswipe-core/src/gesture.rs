//! Drag-session lifecycle for the top card.
//!
//! The tracker owns the per-session state (phase, drag vector, label, tap
//! dead zone) and writes drag samples into the shared card offset. It never
//! starts animations itself: [`GestureTracker::release`] returns a verdict
//! that the swiper hands to the orchestrator, and [`GestureTracker::finish`]
//! closes the session right after.

use crate::animation::AnimatedValue;
use crate::config::SwiperConfig;
use crate::geometry::{self, Direction, LabelType};
use kurbo::Vec2;

/// Where the current drag session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
    /// Release accepted as a swipe; the exit animation is being dispatched.
    CommitPending,
    /// Release rejected; the card is being sent back to center.
    CancelPending,
}

/// What a release should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseVerdict {
    /// Swipe the card out in this direction.
    Commit(Direction),
    /// Spring the card back to center.
    Cancel,
    /// The session ran while an exit animation held the lock; nothing to do.
    Absorbed,
}

/// Result of ending a drag session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub verdict: ReleaseVerdict,
    /// Whether the session never left the tap dead zone.
    pub tapped: bool,
    /// Card offset at the moment of release.
    pub offset: Vec2,
}

/// Tracks one drag session at a time.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    phase: GesturePhase,
    /// Cumulative displacement since grant, after axis gating.
    drag: Vec2,
    label: LabelType,
    dead_zone_crossed: bool,
    /// Set when the session began or continued under the session lock.
    absorbed: bool,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn drag(&self) -> Vec2 {
        self.drag
    }

    pub fn label(&self) -> LabelType {
        self.label
    }

    pub fn dead_zone_crossed(&self) -> bool {
        self.dead_zone_crossed
    }

    /// Start a session.
    ///
    /// Unlocked, the card's current position becomes the offset baseline so
    /// drag samples are relative to wherever the card is now. Locked, the
    /// card belongs to the exit animation and is left alone.
    pub fn grant(&mut self, pan: &mut AnimatedValue<Vec2>, locked: bool) {
        if self.phase != GesturePhase::Idle {
            log::warn!("Drag granted while {:?}; restarting session", self.phase);
        }

        self.drag = Vec2::ZERO;
        self.label = LabelType::None;
        self.dead_zone_crossed = false;
        self.absorbed = locked;

        if locked {
            log::debug!("Drag granted while locked; session absorbed");
        } else {
            let baseline = pan.get();
            pan.set_offset(baseline);
            pan.set_value(Vec2::ZERO);
            log::debug!("Drag granted, baseline {baseline:?}");
        }
        self.phase = GesturePhase::Dragging;
    }

    /// Apply a drag sample: `delta` is the cumulative movement since grant.
    pub fn drag_to(
        &mut self,
        delta: Vec2,
        pan: &mut AnimatedValue<Vec2>,
        config: &SwiperConfig,
        locked: bool,
    ) -> LabelType {
        if self.phase != GesturePhase::Dragging {
            log::warn!("Drag sample ignored while {:?}", self.phase);
            return self.label;
        }
        if locked || self.absorbed {
            self.absorbed = true;
            self.drag = Vec2::ZERO;
            self.label = LabelType::None;
            return self.label;
        }

        // A disabled axis never moves the card.
        self.drag = Vec2::new(
            if config.horizontal_swipe { delta.x } else { 0.0 },
            if config.vertical_swipe { delta.y } else { 0.0 },
        );
        pan.set_value(self.drag);

        let offset = pan.get();
        let label = geometry::classify_label(offset, config.label_thresholds());
        if label != self.label {
            log::trace!("Label {:?} -> {:?}", self.label, label);
        }
        self.label = label;

        if offset.x.abs() > config.tap_dead_zone || offset.y.abs() > config.tap_dead_zone {
            self.dead_zone_crossed = true;
        }
        self.label
    }

    /// End the session by lifting the finger.
    pub fn release(
        &mut self,
        pan: &AnimatedValue<Vec2>,
        config: &SwiperConfig,
        locked: bool,
    ) -> Option<Release> {
        self.end(pan, config, locked, false)
    }

    /// End the session because the host took the gesture away. Never commits.
    pub fn terminate(
        &mut self,
        pan: &AnimatedValue<Vec2>,
        config: &SwiperConfig,
        locked: bool,
    ) -> Option<Release> {
        self.end(pan, config, locked, true)
    }

    fn end(
        &mut self,
        pan: &AnimatedValue<Vec2>,
        config: &SwiperConfig,
        locked: bool,
        terminated: bool,
    ) -> Option<Release> {
        if self.phase != GesturePhase::Dragging {
            log::warn!("Release ignored while {:?}", self.phase);
            return None;
        }

        let offset = pan.get();
        if locked || self.absorbed {
            self.phase = GesturePhase::CancelPending;
            return Some(Release {
                verdict: ReleaseVerdict::Absorbed,
                tapped: false,
                offset,
            });
        }

        let tapped = !self.dead_zone_crossed;
        let direction = if terminated || tapped {
            None
        } else {
            geometry::resolve_direction(offset, config.commit_thresholds(), config.disabled)
        };

        let verdict = match direction {
            Some(direction) => {
                self.phase = GesturePhase::CommitPending;
                ReleaseVerdict::Commit(direction)
            }
            None => {
                self.phase = GesturePhase::CancelPending;
                ReleaseVerdict::Cancel
            }
        };
        log::debug!(
            "Drag {} at {offset:?}: {verdict:?}",
            if terminated { "terminated" } else { "released" }
        );
        Some(Release {
            verdict,
            tapped,
            offset,
        })
    }

    /// Close the session once the release has been dispatched.
    pub fn finish(&mut self) {
        self.phase = GesturePhase::Idle;
        self.label = LabelType::None;
        self.dead_zone_crossed = false;
        self.absorbed = false;
        self.drag = Vec2::ZERO;
    }
}
