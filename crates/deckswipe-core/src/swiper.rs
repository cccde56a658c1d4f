//! The swipeable card stack: gesture input, programmatic swipes and callbacks.

use crate::config::{ConfigResult, SwiperConfig};
use crate::frame::{self, FrameInputs, StackFrame};
use crate::geometry::{Direction, LabelType};
use crate::gesture::{GesturePhase, GestureTracker, Release, ReleaseVerdict};
use crate::orchestrator::{CardAnimator, Swiped};
use kurbo::{Size, Vec2};
use std::fmt;

type IndexCallback = Box<dyn FnMut(usize)>;

/// Callbacks fired by a [`Swiper`]. All default to no-ops.
pub struct SwipeCallbacks {
    on_swiped: Box<dyn FnMut(&Swiped)>,
    on_swiped_left: IndexCallback,
    on_swiped_right: IndexCallback,
    on_swiped_top: IndexCallback,
    on_swiped_bottom: IndexCallback,
    on_tap_card: IndexCallback,
}

impl Default for SwipeCallbacks {
    fn default() -> Self {
        Self {
            on_swiped: Box::new(|_| {}),
            on_swiped_left: Box::new(|_| {}),
            on_swiped_right: Box::new(|_| {}),
            on_swiped_top: Box::new(|_| {}),
            on_swiped_bottom: Box::new(|_| {}),
            on_tap_card: Box::new(|_| {}),
        }
    }
}

impl fmt::Debug for SwipeCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeCallbacks").finish_non_exhaustive()
    }
}

impl SwipeCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired for every swipe, before the direction callback.
    pub fn on_swiped(mut self, callback: impl FnMut(&Swiped) + 'static) -> Self {
        self.on_swiped = Box::new(callback);
        self
    }

    pub fn on_swiped_left(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_swiped_left = Box::new(callback);
        self
    }

    pub fn on_swiped_right(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_swiped_right = Box::new(callback);
        self
    }

    pub fn on_swiped_top(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_swiped_top = Box::new(callback);
        self
    }

    pub fn on_swiped_bottom(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_swiped_bottom = Box::new(callback);
        self
    }

    pub fn on_tap_card(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_tap_card = Box::new(callback);
        self
    }

    fn swiped(&mut self, swiped: &Swiped) {
        (self.on_swiped)(swiped);
        let directional = match swiped.direction {
            Direction::Left => &mut self.on_swiped_left,
            Direction::Right => &mut self.on_swiped_right,
            Direction::Top => &mut self.on_swiped_top,
            Direction::Bottom => &mut self.on_swiped_bottom,
        };
        directional(swiped.index);
    }
}

/// One card stack instance.
///
/// Feed it gesture events and frame timestamps; it moves the cards and
/// reports swipes and taps through [`SwipeCallbacks`]. The logical card
/// index belongs to the caller and is updated with [`Swiper::set_card_index`].
#[derive(Debug)]
pub struct Swiper {
    config: SwiperConfig,
    viewport: Size,
    gesture: GestureTracker,
    animator: CardAnimator,
    /// Held while an exit animation owns the top card.
    locked: bool,
    card_index: usize,
    callbacks: SwipeCallbacks,
}

impl Swiper {
    /// Build a swiper, rejecting an invalid configuration.
    pub fn new(config: SwiperConfig, viewport: Size) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            animator: CardAnimator::new(&config),
            config,
            viewport,
            gesture: GestureTracker::new(),
            locked: false,
            card_index: 0,
            callbacks: SwipeCallbacks::default(),
        })
    }

    pub fn with_callbacks(mut self, callbacks: SwipeCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn set_callbacks(&mut self, callbacks: SwipeCallbacks) {
        self.callbacks = callbacks;
    }

    pub fn config(&self) -> &SwiperConfig {
        &self.config
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn card_index(&self) -> usize {
        self.card_index
    }

    /// Update the logical index of the top card.
    pub fn set_card_index(&mut self, index: usize) {
        self.card_index = index;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    pub fn label(&self) -> LabelType {
        self.gesture.label()
    }

    pub fn dead_zone_crossed(&self) -> bool {
        self.gesture.dead_zone_crossed()
    }

    /// Observable offset of the top card.
    pub fn pan_offset(&self) -> Vec2 {
        self.animator.pan().get()
    }

    /// Scale of the card underneath.
    pub fn next_card_scale(&self) -> f64 {
        self.animator.scale().get()
    }

    /// Offset of the previous card from its on-screen position.
    pub fn previous_card_offset(&self) -> Vec2 {
        self.animator.previous_card().get()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// A finger went down on the top card.
    pub fn on_grant(&mut self) {
        self.gesture.grant(self.animator.pan_mut(), self.locked);
    }

    /// The finger moved; `delta` is the total movement since grant.
    pub fn on_move(&mut self, delta: Vec2) -> LabelType {
        self.gesture
            .drag_to(delta, self.animator.pan_mut(), &self.config, self.locked)
    }

    /// The finger lifted.
    pub fn on_release(&mut self) {
        let release = self
            .gesture
            .release(self.animator.pan(), &self.config, self.locked);
        self.dispatch_release(release);
    }

    /// The host cancelled the gesture. Always springs the card back.
    pub fn on_terminate(&mut self) {
        let release = self
            .gesture
            .terminate(self.animator.pan(), &self.config, self.locked);
        self.dispatch_release(release);
    }

    fn dispatch_release(&mut self, release: Option<Release>) {
        let Some(release) = release else {
            return;
        };

        match release.verdict {
            ReleaseVerdict::Commit(direction) => {
                self.locked = true;
                self.animator.commit(direction, false, release.offset);
                self.animator.zoom_next();
            }
            ReleaseVerdict::Cancel => self.animator.reset(),
            ReleaseVerdict::Absorbed => {}
        }

        if release.tapped {
            log::debug!("Card {} tapped", self.card_index);
            (self.callbacks.on_tap_card)(self.card_index);
        }
        self.gesture.finish();
        self.dispatch_exits();
    }

    pub fn swipe_left(&mut self, must_decrement_index: bool) {
        self.swipe(Direction::Left, must_decrement_index);
    }

    pub fn swipe_right(&mut self, must_decrement_index: bool) {
        self.swipe(Direction::Right, must_decrement_index);
    }

    pub fn swipe_top(&mut self, must_decrement_index: bool) {
        self.swipe(Direction::Top, must_decrement_index);
    }

    pub fn swipe_bottom(&mut self, must_decrement_index: bool) {
        self.swipe(Direction::Bottom, must_decrement_index);
    }

    /// Swipe the top card out without a gesture.
    ///
    /// Works at any time, even mid-drag or while another card is leaving.
    /// Disabled directions are not consulted.
    pub fn swipe(&mut self, direction: Direction, must_decrement_index: bool) {
        let distance = self.config.commit_thresholds().along(direction);
        let forced = direction.unit() * distance;

        self.animator.zoom_next();
        self.locked = true;
        self.animator.commit(direction, must_decrement_index, forced);
        self.dispatch_exits();
    }

    /// Start growing the next card to full size, ahead of a programmatic swipe.
    pub fn zoom_next(&mut self) {
        self.animator.zoom_next();
    }

    /// Bring the previous card back on screen.
    pub fn swipe_back(&mut self) {
        self.animator.swipe_back();
    }

    /// Advance animations to `frame_time_nanos` and fire any due callbacks.
    pub fn advance(&mut self, frame_time_nanos: u64) {
        self.animator.tick(frame_time_nanos);
        self.dispatch_exits();
    }

    /// Run callbacks for exit animations that have ended.
    ///
    /// The reported index is the card index at the time the exit ends. An
    /// exit superseded by a newer one still reports its swipe, but the newer
    /// exit keeps the lock and the card until it completes.
    fn dispatch_exits(&mut self) {
        for ended in self.animator.take_ended_exits() {
            let swiped = Swiped {
                index: self.card_index,
                direction: ended.direction,
                must_decrement_index: ended.must_decrement_index,
            };
            self.callbacks.swiped(&swiped);
            if ended.finished || !self.animator.has_pending_exit() {
                self.locked = false;
                self.animator.rest_for_next_card();
            } else {
                log::debug!("Card {} exit superseded by a newer swipe", swiped.index);
            }
        }
    }

    /// Visual state of the stack right now.
    pub fn frame(&self) -> StackFrame {
        frame::compose(
            &self.config,
            self.viewport,
            FrameInputs {
                pan: self.pan_offset(),
                next_scale: self.next_card_scale(),
                previous_offset: self.previous_card_offset(),
                label: self.label(),
            },
        )
    }
}
