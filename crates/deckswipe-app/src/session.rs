//! Replays a [`Script`] against a swiper and a deck of named cards.

use crate::error::{AppError, AppResult};
use crate::script::{FRAME_NANOS, Script, Step};
use deckswipe_core::{
    CardDeck, DeckEvent, Direction, SwipeCallbacks, Swiped, Swiper, SwiperConfig,
};
use kurbo::Vec2;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Upper bound on frames spent waiting for animations after the last step.
const SETTLE_LIMIT_FRAMES: u64 = 600;

/// Cards that left the stack, grouped by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SwipedCards {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub top: Vec<String>,
    pub bottom: Vec<String>,
}

impl SwipedCards {
    fn push(&mut self, direction: Direction, card: String) {
        match direction {
            Direction::Left => self.left.push(card),
            Direction::Right => self.right.push(card),
            Direction::Top => self.top.push(card),
            Direction::Bottom => self.bottom.push(card),
        }
    }
}

/// Outcome of a replayed session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub swiped: SwipedCards,
    pub taps: Vec<String>,
    pub final_index: usize,
    pub top_card: Option<String>,
    pub swiped_all: bool,
}

impl Summary {
    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self).map_err(AppError::Summary)
    }
}

/// Callback output waiting to be applied to the deck.
#[derive(Debug, Default)]
struct Inbox {
    swipes: Vec<Swiped>,
    taps: Vec<usize>,
}

#[derive(Debug, Default)]
struct FrameClock {
    now: u64,
}

impl FrameClock {
    fn tick(&mut self) -> u64 {
        self.now += FRAME_NANOS;
        self.now
    }
}

struct Session {
    swiper: Swiper,
    deck: CardDeck<String>,
    clock: FrameClock,
    inbox: Rc<RefCell<Inbox>>,
    summary: Summary,
}

impl Session {
    fn apply(&mut self, step: &Step) {
        log::debug!("Step {step:?}");
        match *step {
            Step::Grant => self.swiper.on_grant(),
            Step::Move { dx, dy } => {
                self.swiper.on_move(Vec2::new(dx, dy));
            }
            Step::Release => self.swiper.on_release(),
            Step::Terminate => self.swiper.on_terminate(),
            Step::Wait { .. } => {}
            Step::Swipe {
                direction,
                must_decrement_index,
            } => self.swiper.swipe(direction, must_decrement_index),
            Step::SwipeBack => self.swiper.swipe_back(),
        }
        self.collect();
    }

    fn frame(&mut self) {
        self.swiper.advance(self.clock.tick());
        self.collect();
        if log::log_enabled!(log::Level::Trace) {
            let frame = self.swiper.frame();
            for card in self.deck.render(&frame, String::clone) {
                log::trace!(
                    "{:?} {} opacity {:.2} {:?}",
                    card.visual.slot,
                    card.content,
                    card.visual.opacity,
                    card.visual.transform
                );
            }
        }
    }

    fn card_name(&self, index: usize) -> String {
        self.deck
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("#{index}"))
    }

    /// Apply callback output to the deck and keep the swiper's index in step.
    fn collect(&mut self) {
        let Inbox { swipes, taps } = std::mem::take(&mut *self.inbox.borrow_mut());

        for index in taps {
            let card = self.card_name(index);
            log::info!("Tapped {card}");
            self.summary.taps.push(card);
        }

        for swiped in swipes {
            let card = self.card_name(swiped.index);
            log::info!("Swiped {card} {}", swiped.direction.as_str());
            self.summary.swiped.push(swiped.direction, card);
            if self.deck.on_swiped(&swiped) == DeckEvent::SwipedAll {
                log::info!("Deck exhausted");
                self.summary.swiped_all = true;
            }
            self.swiper.set_card_index(self.deck.index());
        }
    }

    fn settle(&mut self) {
        let mut frames = 0;
        while self.swiper.is_animating() {
            if frames == SETTLE_LIMIT_FRAMES {
                log::warn!("Animations still running after {frames} frames");
                break;
            }
            self.frame();
            frames += 1;
        }
    }

    fn finish(mut self) -> Summary {
        self.summary.final_index = self.deck.index();
        self.summary.top_card = self.deck.slots().current.cloned();
        self.summary
    }
}

/// Replay `script` frame by frame and report what happened.
pub fn run_script(config: SwiperConfig, script: &Script) -> AppResult<Summary> {
    let inbox = Rc::new(RefCell::new(Inbox::default()));
    let callbacks = {
        let swipes = inbox.clone();
        let taps = inbox.clone();
        SwipeCallbacks::new()
            .on_swiped(move |swiped: &Swiped| swipes.borrow_mut().swipes.push(*swiped))
            .on_tap_card(move |index| taps.borrow_mut().taps.push(index))
    };

    let mut session = Session {
        swiper: Swiper::new(config, script.viewport)?.with_callbacks(callbacks),
        deck: CardDeck::new(script.cards.clone()),
        clock: FrameClock::default(),
        inbox,
        summary: Summary::default(),
    };
    log::info!(
        "Replaying {} steps over {} cards",
        script.steps.len(),
        script.cards.len()
    );

    for step in &script.steps {
        session.apply(step);
        for _ in 0..step.frames() {
            session.frame();
        }
    }
    session.settle();
    Ok(session.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckswipe_core::DEFAULT_VIEWPORT;

    fn config() -> SwiperConfig {
        let mut config = SwiperConfig::for_viewport(DEFAULT_VIEWPORT);
        config.horizontal_threshold = 100.0;
        config.vertical_threshold = 100.0;
        config
    }

    fn run(json: &str) -> Summary {
        let script = Script::from_json_str(json).unwrap();
        run_script(config(), &script).unwrap()
    }

    #[test]
    fn test_drag_swipe_and_tap() {
        let summary = run(r#"{
            "cards": ["a", "b", "c"],
            "steps": [
                { "action": "grant" },
                { "action": "move", "dx": 60, "dy": 0 },
                { "action": "move", "dx": 150, "dy": 0 },
                { "action": "release" },
                { "action": "wait", "ms": 500 },
                { "action": "swipe", "direction": "left" },
                { "action": "wait", "ms": 500 },
                { "action": "grant" },
                { "action": "move", "dx": 2, "dy": 1 },
                { "action": "release" }
            ]
        }"#);

        assert_eq!(summary.swiped.right, vec!["a"]);
        assert_eq!(summary.swiped.left, vec!["b"]);
        assert_eq!(summary.taps, vec!["c"]);
        assert_eq!(summary.final_index, 2);
        assert_eq!(summary.top_card.as_deref(), Some("c"));
        assert!(!summary.swiped_all);
    }

    #[test]
    fn test_short_drag_swipes_nothing() {
        let summary = run(r#"{
            "cards": ["a", "b"],
            "steps": [
                { "action": "grant" },
                { "action": "move", "dx": 30, "dy": 20 },
                { "action": "release" }
            ]
        }"#);
        assert_eq!(summary.swiped, SwipedCards::default());
        assert!(summary.taps.is_empty());
        assert_eq!(summary.final_index, 0);
    }

    #[test]
    fn test_swiping_every_card() {
        let summary = run(r#"{
            "cards": ["a", "b"],
            "steps": [
                { "action": "swipe", "direction": "top" },
                { "action": "wait", "ms": 400 },
                { "action": "grant" },
                { "action": "move", "dx": 0, "dy": 300 },
                { "action": "release" }
            ]
        }"#);
        assert_eq!(summary.swiped.top, vec!["a"]);
        assert_eq!(summary.swiped.bottom, vec!["b"]);
        assert!(summary.swiped_all);
        assert_eq!(summary.final_index, 2);
        assert_eq!(summary.top_card, None);
    }

    #[test]
    fn test_back_to_back_swipes_name_each_card() {
        let summary = run(r#"{
            "cards": ["a", "b", "c"],
            "steps": [
                { "action": "swipe", "direction": "right" },
                { "action": "swipe", "direction": "left" }
            ]
        }"#);
        assert_eq!(summary.swiped.right, vec!["a"]);
        assert_eq!(summary.swiped.left, vec!["b"]);
        assert_eq!(summary.final_index, 2);
        assert_eq!(summary.top_card.as_deref(), Some("c"));
    }

    #[test]
    fn test_decrement_steps_back() {
        let summary = run(r#"{
            "cards": ["a", "b", "c"],
            "steps": [
                { "action": "swipe", "direction": "right" },
                { "action": "wait", "ms": 400 },
                { "action": "swipe", "direction": "left", "must_decrement_index": true }
            ]
        }"#);
        assert_eq!(summary.swiped.right, vec!["a"]);
        assert_eq!(summary.swiped.left, vec!["b"]);
        assert_eq!(summary.final_index, 0);
    }

    #[test]
    fn test_summary_json() {
        let summary = Summary {
            taps: vec!["a".into()],
            ..Summary::default()
        };
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["taps"][0], "a");
        assert_eq!(json["swiped"]["left"], serde_json::json!([]));
        assert_eq!(json["swiped_all"], false);
    }
}
