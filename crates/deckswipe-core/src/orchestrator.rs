//! Coordinates the three animated quantities of a card stack.
//!
//! - the top card offset (`pan`), written by drags and driven by reset and exit animations
//! - the next card scale, zoomed to full size when a swipe begins
//! - the previous card offset, sprung back on screen by swipe-back

use crate::animation::{AnimatedValue, AnimationId, AnimationKind, SpringSpec, TweenSpec};
use crate::config::SwiperConfig;
use crate::geometry::{Direction, SWIPE_OUT_MULTIPLIER};
use kurbo::Vec2;

/// A committed swipe, reported to callbacks once its exit animation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swiped {
    /// Logical index of the card that left.
    pub index: usize,
    pub direction: Direction,
    /// Passed through for the cursor owner's bookkeeping.
    pub must_decrement_index: bool,
}

/// An exit animation that has ended.
///
/// Carries no card index: the index is read when the exit is reported, so
/// cursor updates made by earlier callbacks are already in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitEnded {
    pub direction: Direction,
    pub must_decrement_index: bool,
    /// False when another exit animation took over the card mid-flight.
    pub finished: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingExit {
    id: AnimationId,
    direction: Direction,
    must_decrement_index: bool,
}

/// Owns the animated values of the previous, current and next cards.
#[derive(Debug, Clone)]
pub struct CardAnimator {
    pan: AnimatedValue<Vec2>,
    scale: AnimatedValue<f64>,
    previous_card: AnimatedValue<Vec2>,
    exits: Vec<PendingExit>,
    swipe_out: TweenSpec,
    reset_spring: SpringSpec,
    zoom_spring: SpringSpec,
    swipe_back_spring: SpringSpec,
    resting_scale: f64,
    resting_previous: Vec2,
}

impl CardAnimator {
    pub fn new(config: &SwiperConfig) -> Self {
        Self {
            pan: AnimatedValue::new(Vec2::ZERO),
            scale: AnimatedValue::new(config.second_card_zoom),
            previous_card: AnimatedValue::new(config.previous_card_initial_position),
            exits: Vec::new(),
            swipe_out: TweenSpec::linear(config.swipe_animation_duration_ms),
            reset_spring: SpringSpec::default(),
            zoom_spring: SpringSpec::from_friction(config.zoom_friction),
            swipe_back_spring: SpringSpec::from_friction(config.swipe_back_friction),
            resting_scale: config.second_card_zoom,
            resting_previous: config.previous_card_initial_position,
        }
    }

    pub fn pan(&self) -> &AnimatedValue<Vec2> {
        &self.pan
    }

    pub fn pan_mut(&mut self) -> &mut AnimatedValue<Vec2> {
        &mut self.pan
    }

    pub fn scale(&self) -> &AnimatedValue<f64> {
        &self.scale
    }

    pub fn previous_card(&self) -> &AnimatedValue<Vec2> {
        &self.previous_card
    }

    /// Whether any of the three values is still moving.
    pub fn is_animating(&self) -> bool {
        self.pan.is_animating() || self.scale.is_animating() || self.previous_card.is_animating()
    }

    /// Whether an exit animation is in flight.
    pub fn has_pending_exit(&self) -> bool {
        !self.exits.is_empty()
    }

    /// Spring the top card back to center.
    ///
    /// The drag baseline is dropped at once while the spring eases the raw
    /// value home, so a card grabbed off-center jumps by its baseline first.
    pub fn reset(&mut self) {
        self.pan
            .animate_to(Vec2::ZERO, AnimationKind::Spring(self.reset_spring));
        self.pan.set_offset(Vec2::ZERO);
        log::debug!("Top card springing back to center");
    }

    /// Send the top card off screen along `release_offset` scaled by the swipe-out factor.
    pub fn commit(
        &mut self,
        direction: Direction,
        must_decrement_index: bool,
        release_offset: Vec2,
    ) {
        let target = release_offset * SWIPE_OUT_MULTIPLIER;
        let id = self
            .pan
            .animate_to(target, AnimationKind::Tween(self.swipe_out));
        self.exits.push(PendingExit {
            id,
            direction,
            must_decrement_index,
        });
        log::debug!("Top card leaving {} toward {target:?}", direction.as_str());
    }

    /// Grow the next card to full size.
    pub fn zoom_next(&mut self) {
        self.scale
            .animate_to(1.0, AnimationKind::Spring(self.zoom_spring));
    }

    /// Bring the previous card back on screen.
    pub fn swipe_back(&mut self) {
        self.previous_card
            .animate_to(Vec2::ZERO, AnimationKind::Spring(self.swipe_back_spring));
        log::debug!("Previous card swiping back");
    }

    /// Put every value back where a fresh top card expects it.
    pub fn rest_for_next_card(&mut self) {
        self.pan.set_value(Vec2::ZERO);
        self.pan.set_offset(Vec2::ZERO);
        self.scale.set_value(self.resting_scale);
        self.previous_card.set_value(self.resting_previous);
    }

    /// Advance all animations to `frame_time_nanos`.
    pub fn tick(&mut self, frame_time_nanos: u64) {
        self.pan.tick(frame_time_nanos);
        self.scale.tick(frame_time_nanos);
        self.previous_card.tick(frame_time_nanos);
    }

    /// Collect exit animations that ended since the last call, oldest first.
    pub fn take_ended_exits(&mut self) -> Vec<ExitEnded> {
        // Zoom and swipe-back have no continuation.
        self.scale.take_ended();
        self.previous_card.take_ended();

        let mut ended = Vec::new();
        for end in self.pan.take_ended() {
            if let Some(position) = self.exits.iter().position(|exit| exit.id == end.id) {
                let exit = self.exits.remove(position);
                ended.push(ExitEnded {
                    direction: exit.direction,
                    must_decrement_index: exit.must_decrement_index,
                    finished: end.finished,
                });
            }
        }
        ended
    }
}
