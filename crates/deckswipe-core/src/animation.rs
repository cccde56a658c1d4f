//! Frame-driven animated values with linear tweens and friction springs.
//!
//! An [`AnimatedValue`] holds a value plus an offset, and at most one running
//! animation. The host drives time by calling [`AnimatedValue::tick`] with a
//! monotonic frame timestamp. Starting a new animation, or setting the value
//! directly, stops the running one. Every animation reports exactly one
//! [`AnimationEnd`], which callers collect with [`AnimatedValue::take_ended`].

use kurbo::Vec2;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Longest stretch of time a single spring tick integrates over.
const MAX_SPRING_FRAME_SECS: f64 = 0.25;

/// Integration step for spring physics.
const SPRING_STEP_SECS: f64 = 0.001;

/// Values that can be tweened and sprung.
pub trait Animate: Copy + PartialEq + fmt::Debug {
    const ZERO: Self;

    fn lerp_to(self, target: Self, fraction: f64) -> Self;
    fn plus(self, other: Self) -> Self;
    fn minus(self, other: Self) -> Self;
    fn scaled(self, factor: f64) -> Self;
    fn magnitude(self) -> f64;
}

impl Animate for f64 {
    const ZERO: Self = 0.0;

    fn lerp_to(self, target: Self, fraction: f64) -> Self {
        self + (target - self) * fraction
    }

    fn plus(self, other: Self) -> Self {
        self + other
    }

    fn minus(self, other: Self) -> Self {
        self - other
    }

    fn scaled(self, factor: f64) -> Self {
        self * factor
    }

    fn magnitude(self) -> f64 {
        self.abs()
    }
}

impl Animate for Vec2 {
    const ZERO: Self = Vec2::ZERO;

    fn lerp_to(self, target: Self, fraction: f64) -> Self {
        Vec2::lerp(self, target, fraction)
    }

    fn plus(self, other: Self) -> Self {
        self + other
    }

    fn minus(self, other: Self) -> Self {
        self - other
    }

    fn scaled(self, factor: f64) -> Self {
        self * factor
    }

    fn magnitude(self) -> f64 {
        self.hypot()
    }
}

/// A linear tween over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub duration_ms: u64,
}

impl TweenSpec {
    pub fn linear(duration_ms: u64) -> Self {
        Self { duration_ms }
    }
}

/// A damped spring with unit mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    pub stiffness: f64,
    pub damping: f64,
    /// The spring settles once both displacement and speed fall below these.
    pub rest_displacement_threshold: f64,
    pub rest_speed_threshold: f64,
}

impl SpringSpec {
    /// Tension paired with every friction setting.
    pub const DEFAULT_TENSION: f64 = 40.0;
    /// Friction of a spring nobody configured.
    pub const DEFAULT_FRICTION: f64 = 7.0;

    /// A spring with the default tension and the given friction.
    pub fn from_friction(friction: f64) -> Self {
        Self::from_tension_friction(Self::DEFAULT_TENSION, friction)
    }

    /// Convert an Origami-style tension/friction pair into stiffness and damping.
    pub fn from_tension_friction(tension: f64, friction: f64) -> Self {
        Self {
            stiffness: (tension - 30.0) * 3.62 + 194.0,
            damping: (friction - 8.0) * 3.0 + 25.0,
            rest_displacement_threshold: 0.001,
            rest_speed_threshold: 0.001,
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::from_friction(Self::DEFAULT_FRICTION)
    }
}

/// How an animation moves toward its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationKind {
    Tween(TweenSpec),
    Spring(SpringSpec),
}

/// Identifies one started animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion notice for one animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationEnd {
    pub id: AnimationId,
    /// False when the animation was stopped before reaching its target.
    pub finished: bool,
}

#[derive(Debug, Clone, Copy)]
struct Running<T> {
    id: AnimationId,
    kind: AnimationKind,
    from: T,
    target: T,
    velocity: T,
    started_at: Option<u64>,
    last_frame: Option<u64>,
}

/// An animatable value with an additive offset.
///
/// The observable value is `value + offset`; animations drive `value` only.
#[derive(Debug, Clone)]
pub struct AnimatedValue<T: Animate> {
    value: T,
    offset: T,
    running: Option<Running<T>>,
    ended: Vec<AnimationEnd>,
}

impl<T: Animate> AnimatedValue<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            offset: T::ZERO,
            running: None,
            ended: Vec::new(),
        }
    }

    /// The observable value: animated value plus offset.
    pub fn get(&self) -> T {
        self.value.plus(self.offset)
    }

    /// The animated part, without the offset.
    pub fn raw_value(&self) -> T {
        self.value
    }

    pub fn offset(&self) -> T {
        self.offset
    }

    /// Jump to `value`, stopping any running animation.
    pub fn set_value(&mut self, value: T) {
        self.stop();
        self.value = value;
    }

    /// Replace the offset. Running animations keep going.
    pub fn set_offset(&mut self, offset: T) {
        self.offset = offset;
    }

    /// Stop the running animation where it is.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            log::trace!("Animation {} stopped before reaching its target", running.id);
            self.ended.push(AnimationEnd {
                id: running.id,
                finished: false,
            });
        }
    }

    /// Start animating toward `target`, replacing any running animation.
    pub fn animate_to(&mut self, target: T, kind: AnimationKind) -> AnimationId {
        self.stop();
        let id = AnimationId::next();
        log::trace!("Animation {id} started: {:?} -> {target:?}", self.value);
        self.running = Some(Running {
            id,
            kind,
            from: self.value,
            target,
            velocity: T::ZERO,
            started_at: None,
            last_frame: None,
        });
        id
    }

    pub fn is_animating(&self) -> bool {
        self.running.is_some()
    }

    /// Target of the running animation, if any.
    pub fn target(&self) -> Option<T> {
        self.running.as_ref().map(|running| running.target)
    }

    /// Drain completion notices recorded since the last call.
    pub fn take_ended(&mut self) -> Vec<AnimationEnd> {
        std::mem::take(&mut self.ended)
    }

    /// Advance the running animation to `frame_time_nanos`.
    pub fn tick(&mut self, frame_time_nanos: u64) {
        let Some(mut running) = self.running.take() else {
            return;
        };

        let settled = match running.kind {
            AnimationKind::Tween(spec) => {
                let started_at = *running.started_at.get_or_insert(frame_time_nanos);
                let elapsed_nanos = frame_time_nanos.saturating_sub(started_at);
                let duration_nanos = spec.duration_ms.saturating_mul(1_000_000);
                let progress = if duration_nanos == 0 {
                    1.0
                } else {
                    (elapsed_nanos as f64 / duration_nanos as f64).clamp(0.0, 1.0)
                };
                self.value = running.from.lerp_to(running.target, progress);
                progress >= 1.0
            }
            AnimationKind::Spring(spec) => {
                let last_frame = running.last_frame.replace(frame_time_nanos);
                if let Some(last_frame) = last_frame {
                    let dt = (frame_time_nanos.saturating_sub(last_frame) as f64 / 1e9)
                        .min(MAX_SPRING_FRAME_SECS);
                    let (value, velocity) =
                        integrate_spring(self.value, running.velocity, running.target, spec, dt);
                    self.value = value;
                    running.velocity = velocity;
                }
                running.velocity.magnitude() < spec.rest_speed_threshold
                    && self.value.minus(running.target).magnitude()
                        < spec.rest_displacement_threshold
            }
        };

        if settled {
            self.value = running.target;
            log::trace!("Animation {} finished at {:?}", running.id, running.target);
            self.ended.push(AnimationEnd {
                id: running.id,
                finished: true,
            });
        } else {
            self.running = Some(running);
        }
    }
}

/// Semi-implicit Euler over `dt` seconds in fixed steps.
fn integrate_spring<T: Animate>(
    mut value: T,
    mut velocity: T,
    target: T,
    spec: SpringSpec,
    dt: f64,
) -> (T, T) {
    let mut remaining = dt;
    while remaining > 0.0 {
        let step = remaining.min(SPRING_STEP_SECS);
        let displacement = value.minus(target);
        let force = displacement
            .scaled(-spec.stiffness)
            .minus(velocity.scaled(spec.damping));
        velocity = velocity.plus(force.scaled(step));
        value = value.plus(velocity.scaled(step));
        remaining -= step;
    }
    (value, velocity)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_NANOS: u64 = 16_666_667;

    fn run_frames<T: Animate>(value: &mut AnimatedValue<T>, start: u64, frames: u64) -> u64 {
        let mut now = start;
        for _ in 0..frames {
            now += FRAME_NANOS;
            value.tick(now);
        }
        now
    }

    #[test]
    fn test_offset_is_additive() {
        let mut value = AnimatedValue::new(Vec2::new(10.0, 0.0));
        value.set_offset(Vec2::new(5.0, -5.0));
        assert_eq!(value.get(), Vec2::new(15.0, -5.0));
        assert_eq!(value.raw_value(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_tween_is_linear_and_finishes() {
        let mut value = AnimatedValue::new(0.0);
        let id = value.animate_to(100.0, AnimationKind::Tween(TweenSpec::linear(100)));

        // First frame pins the start time.
        value.tick(1_000_000_000);
        assert!(value.get().abs() < f64::EPSILON);

        value.tick(1_050_000_000);
        assert!((value.get() - 50.0).abs() < 1e-9);
        assert!(value.is_animating());

        value.tick(1_100_000_000);
        assert!((value.get() - 100.0).abs() < f64::EPSILON);
        assert!(!value.is_animating());
        assert_eq!(value.take_ended(), vec![AnimationEnd { id, finished: true }]);
        assert!(value.take_ended().is_empty());
    }

    #[test]
    fn test_zero_duration_tween_finishes_on_first_frame() {
        let mut value = AnimatedValue::new(1.0);
        value.animate_to(3.0, AnimationKind::Tween(TweenSpec::linear(0)));
        value.tick(5);
        assert!((value.get() - 3.0).abs() < f64::EPSILON);
        assert_eq!(value.take_ended().len(), 1);
    }

    #[test]
    fn test_spring_settles_exactly_on_target() {
        let mut value = AnimatedValue::new(Vec2::new(150.0, -40.0));
        let id = value.animate_to(Vec2::ZERO, AnimationKind::Spring(SpringSpec::default()));
        run_frames(&mut value, 0, 240);
        assert_eq!(value.get(), Vec2::ZERO);
        assert!(!value.is_animating());
        assert_eq!(value.take_ended(), vec![AnimationEnd { id, finished: true }]);
    }

    #[test]
    fn test_spring_moves_toward_target() {
        let mut value = AnimatedValue::new(0.97);
        value.animate_to(1.0, AnimationKind::Spring(SpringSpec::from_friction(7.0)));
        let now = run_frames(&mut value, 0, 2);
        assert!(value.get() > 0.97);
        run_frames(&mut value, now, 120);
        assert!((value.get() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_spring_already_at_rest_finishes_immediately() {
        let mut value = AnimatedValue::new(0.0);
        value.animate_to(0.0, AnimationKind::Spring(SpringSpec::from_friction(11.0)));
        value.tick(10);
        assert!(!value.is_animating());
        assert_eq!(value.take_ended().len(), 1);
    }

    #[test]
    fn test_replacing_animation_reports_interruption() {
        let mut value = AnimatedValue::new(0.0);
        let first = value.animate_to(10.0, AnimationKind::Tween(TweenSpec::linear(100)));
        value.tick(0);
        value.tick(50_000_000);
        let second = value.animate_to(-10.0, AnimationKind::Tween(TweenSpec::linear(100)));
        assert_eq!(
            value.take_ended(),
            vec![AnimationEnd {
                id: first,
                finished: false
            }]
        );
        assert_eq!(value.target(), Some(-10.0));
        assert_ne!(first, second);
    }

    #[test]
    fn test_set_value_stops_animation() {
        let mut value = AnimatedValue::new(Vec2::ZERO);
        value.animate_to(Vec2::new(1.0, 1.0), AnimationKind::Tween(TweenSpec::linear(100)));
        value.set_value(Vec2::new(3.0, 4.0));
        assert!(!value.is_animating());
        assert_eq!(value.get(), Vec2::new(3.0, 4.0));
        assert_eq!(value.take_ended().len(), 1);
    }

    #[test]
    fn test_origami_conversion() {
        let spring = SpringSpec::from_friction(7.0);
        assert!((spring.stiffness - 230.2).abs() < 1e-9);
        assert!((spring.damping - 22.0).abs() < 1e-9);
    }
}
