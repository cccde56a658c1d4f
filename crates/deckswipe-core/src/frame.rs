//! Per-frame visual state of the stack: card layout, transforms, opacity and overlay label.

use crate::config::SwiperConfig;
use crate::geometry::{self, Direction, LabelType};
use kurbo::{Affine, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Paint order of the previous card, above everything else.
pub const PREVIOUS_CARD_Z: i32 = 4;
/// Paint order of the top card.
pub const CURRENT_CARD_Z: i32 = 3;
/// Paint order of the card waiting underneath.
pub const NEXT_CARD_Z: i32 = 1;

/// The three logical positions of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSlot {
    Previous,
    Current,
    Next,
}

/// How one card should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardVisual {
    pub slot: CardSlot,
    /// Maps the card's resting frame to where it is drawn.
    pub transform: Affine,
    pub opacity: f64,
    pub z_index: i32,
}

/// The indicator drawn over the top card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLabel {
    pub direction: Direction,
    pub opacity: f64,
}

/// Snapshot of everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StackFrame {
    /// Resting frame shared by all cards.
    pub card_frame: Rect,
    pub current: CardVisual,
    pub next: Option<CardVisual>,
    pub previous: Option<CardVisual>,
    pub overlay: Option<OverlayLabel>,
}

impl StackFrame {
    /// Visible cards, back to front.
    pub fn paint_order(&self) -> Vec<CardVisual> {
        let mut cards: Vec<CardVisual> = [self.next, Some(self.current), self.previous]
            .into_iter()
            .flatten()
            .collect();
        cards.sort_by_key(|card| card.z_index);
        cards
    }
}

/// Resting frame of a card inside `viewport`.
pub fn card_frame(config: &SwiperConfig, viewport: Size) -> Rect {
    let width = viewport.width - config.card_horizontal_margin * 2.0;
    let height = viewport.height
        - config.card_vertical_margin * 2.0
        - config.margin_top
        - config.margin_bottom;
    Rect::from_origin_size(
        (config.card_horizontal_margin, config.card_vertical_margin),
        (width.max(0.0), height.max(0.0)),
    )
}

/// Animated inputs sampled at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    pub pan: Vec2,
    pub next_scale: f64,
    pub previous_offset: Vec2,
    pub label: LabelType,
}

/// Build the frame for the given animated state.
pub fn compose(config: &SwiperConfig, viewport: Size, inputs: FrameInputs) -> StackFrame {
    let frame = card_frame(config, viewport);
    let center = frame.center();

    let rotation = geometry::interpolate_rotation(inputs.pan.x, &config.rotation);
    let current = CardVisual {
        slot: CardSlot::Current,
        transform: Affine::translate(inputs.pan)
            * Affine::rotate_about(rotation.to_radians(), center),
        opacity: if config.animate_card_opacity {
            geometry::dominant_axis_sample(
                inputs.pan,
                &config.card_opacity_x,
                &config.card_opacity_y,
            )
        } else {
            1.0
        },
        z_index: CURRENT_CARD_Z,
    };

    let next = config.show_second_card.then(|| CardVisual {
        slot: CardSlot::Next,
        transform: Affine::scale_about(inputs.next_scale, center),
        opacity: 1.0,
        z_index: NEXT_CARD_Z,
    });

    let previous = config.swipe_back_card.then(|| CardVisual {
        slot: CardSlot::Previous,
        transform: Affine::translate(inputs.previous_offset),
        opacity: 1.0,
        z_index: PREVIOUS_CARD_Z,
    });

    let overlay = inputs
        .label
        .direction()
        .filter(|&direction| !config.disabled.contains(direction))
        .map(|direction| OverlayLabel {
            direction,
            opacity: if config.animate_overlay_labels_opacity {
                geometry::dominant_axis_sample(
                    inputs.pan,
                    &config.overlay_labels_opacity_x,
                    &config.overlay_labels_opacity_y,
                )
            } else {
                1.0
            },
        });

    StackFrame {
        card_frame: frame,
        current,
        next,
        previous,
        overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    const VIEWPORT: Size = Size::new(400.0, 800.0);

    fn resting() -> FrameInputs {
        FrameInputs {
            pan: Vec2::ZERO,
            next_scale: 0.97,
            previous_offset: Vec2::new(0.0, -800.0),
            label: LabelType::None,
        }
    }

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn test_card_frame_uses_margins() {
        let mut config = SwiperConfig::for_viewport(VIEWPORT);
        config.margin_top = 10.0;
        config.margin_bottom = 30.0;
        let frame = card_frame(&config, VIEWPORT);
        assert_eq!(frame, Rect::new(20.0, 60.0, 380.0, 700.0));
    }

    #[test]
    fn test_resting_frame() {
        let config = SwiperConfig::for_viewport(VIEWPORT);
        let frame = compose(&config, VIEWPORT, resting());
        let corner = frame.card_frame.origin();
        assert!(close(frame.current.transform * corner, corner));
        assert!((frame.current.opacity - 1.0).abs() < f64::EPSILON);
        assert!(frame.next.is_some());
        assert!(frame.previous.is_none());
        assert!(frame.overlay.is_none());
    }

    #[test]
    fn test_current_card_translates_and_tilts() {
        let config = SwiperConfig::for_viewport(VIEWPORT);
        let inputs = FrameInputs {
            pan: Vec2::new(100.0, 0.0),
            ..resting()
        };
        let frame = compose(&config, VIEWPORT, inputs);
        let center = frame.card_frame.center();
        // The center only translates; rotation happens around it.
        assert!(close(frame.current.transform * center, center + Vec2::new(100.0, 0.0)));
        let corner = frame.card_frame.origin();
        assert!(!close(frame.current.transform * corner, corner + Vec2::new(100.0, 0.0)));
    }

    #[test]
    fn test_card_opacity_follows_dominant_axis() {
        let mut config = SwiperConfig::for_viewport(VIEWPORT);
        config.animate_card_opacity = true;
        let inputs = FrameInputs {
            pan: Vec2::new(0.0, 500.0),
            ..resting()
        };
        let frame = compose(&config, VIEWPORT, inputs);
        assert!((frame.current.opacity - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_overlay_hidden_for_disabled_direction() {
        let mut config = SwiperConfig::for_viewport(VIEWPORT);
        config.disabled.left = true;
        let inputs = FrameInputs {
            pan: Vec2::new(-150.0, 0.0),
            label: LabelType::Left,
            ..resting()
        };
        assert!(compose(&config, VIEWPORT, inputs).overlay.is_none());

        let inputs = FrameInputs {
            pan: Vec2::new(150.0, 0.0),
            label: LabelType::Right,
            ..resting()
        };
        let overlay = compose(&config, VIEWPORT, inputs).overlay.unwrap();
        assert_eq!(overlay.direction, Direction::Right);
        assert!((overlay.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overlay_opacity_animates() {
        let mut config = SwiperConfig::for_viewport(VIEWPORT);
        config.animate_overlay_labels_opacity = true;
        // Overlay X curve: [-133.3, -100, 0, 100, 133.3] -> [1, 0, 0, 0, 1]
        let inputs = FrameInputs {
            pan: Vec2::new(200.0, 0.0),
            label: LabelType::Right,
            ..resting()
        };
        let overlay = compose(&config, VIEWPORT, inputs).overlay.unwrap();
        assert!((overlay.opacity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_paint_order() {
        let mut config = SwiperConfig::for_viewport(VIEWPORT);
        config.swipe_back_card = true;
        let frame = compose(&config, VIEWPORT, resting());
        let slots: Vec<_> = frame.paint_order().iter().map(|card| card.slot).collect();
        assert_eq!(slots, vec![CardSlot::Next, CardSlot::Current, CardSlot::Previous]);
        let previous = frame.previous.unwrap();
        assert_eq!(previous.transform, Affine::translate(Vec2::new(0.0, -800.0)));
    }
}
