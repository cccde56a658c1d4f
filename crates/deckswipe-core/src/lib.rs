//! Deckswipe Core Library
//!
//! Platform-agnostic gesture, geometry and animation logic for a stack of
//! swipeable cards. Hosts feed pointer events and frame timestamps into a
//! [`Swiper`] and draw the [`StackFrame`] it produces.

pub mod animation;
pub mod config;
pub mod deck;
pub mod frame;
pub mod geometry;
pub mod gesture;
pub mod orchestrator;
pub mod swiper;

pub use animation::{
    AnimatedValue, AnimationEnd, AnimationId, AnimationKind, SpringSpec, TweenSpec,
};
pub use config::{ConfigError, ConfigResult, SwiperConfig, DEFAULT_VIEWPORT};
pub use deck::{CardDeck, CardSlots, DeckEvent, RenderedCard};
pub use frame::{CardSlot, CardVisual, OverlayLabel, StackFrame};
pub use geometry::{
    AxisThresholds, Degrees, Direction, DisabledDirections, InterpolationTable, LabelType,
};
pub use gesture::{GesturePhase, GestureTracker, Release, ReleaseVerdict};
pub use orchestrator::{CardAnimator, ExitEnded, Swiped};
pub use swiper::{SwipeCallbacks, Swiper};
