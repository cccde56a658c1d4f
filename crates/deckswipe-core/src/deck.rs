//! Card supply for a swiper: the ordered cards and the logical cursor.

use crate::frame::{CardSlot, CardVisual, StackFrame};
use crate::orchestrator::Swiped;

/// What happened to the cursor after a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckEvent {
    /// The cursor moved and a card is still on top.
    Moved { index: usize },
    /// The last card just left the stack. Reported once.
    SwipedAll,
}

/// The previous, current and next cards around the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSlots<'a, T> {
    pub previous: Option<&'a T>,
    pub current: Option<&'a T>,
    pub next: Option<&'a T>,
}

/// A card drawn by the caller's render function, with its visual state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCard<R> {
    pub visual: CardVisual,
    pub content: R,
}

/// An ordered list of cards and the index of the one on top.
#[derive(Debug, Clone)]
pub struct CardDeck<T> {
    cards: Vec<T>,
    index: usize,
    swiped_all: bool,
}

impl<T> CardDeck<T> {
    pub fn new(cards: Vec<T>) -> Self {
        Self::starting_at(cards, 0)
    }

    pub fn starting_at(cards: Vec<T>, index: usize) -> Self {
        Self {
            cards,
            index,
            swiped_all: false,
        }
    }

    /// Logical index of the top card.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.cards.get(index)
    }

    /// True once the cursor has moved past the last card.
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.cards.len()
    }

    pub fn slots(&self) -> CardSlots<'_, T> {
        CardSlots {
            previous: self
                .index
                .checked_sub(1)
                .and_then(|index| self.cards.get(index)),
            current: self.cards.get(self.index),
            next: self.index.checked_add(1).and_then(|index| self.cards.get(index)),
        }
    }

    /// Move the cursor for a completed swipe.
    ///
    /// The cursor steps back instead of forward when the swipe asked for it.
    pub fn on_swiped(&mut self, swiped: &Swiped) -> DeckEvent {
        if swiped.must_decrement_index {
            self.index = self.index.saturating_sub(1);
            self.swiped_all = false;
        } else {
            self.index = (self.index + 1).min(self.cards.len());
        }

        if self.is_exhausted() && !self.swiped_all {
            self.swiped_all = true;
            log::info!("All {} cards swiped", self.cards.len());
            return DeckEvent::SwipedAll;
        }
        DeckEvent::Moved { index: self.index }
    }

    /// Render every visible card back to front.
    ///
    /// Slots without a card are skipped.
    pub fn render<R>(
        &self,
        frame: &StackFrame,
        mut render_card: impl FnMut(&T) -> R,
    ) -> Vec<RenderedCard<R>> {
        let slots = self.slots();
        frame
            .paint_order()
            .into_iter()
            .filter_map(|visual| {
                let card = match visual.slot {
                    CardSlot::Previous => slots.previous,
                    CardSlot::Current => slots.current,
                    CardSlot::Next => slots.next,
                }?;
                Some(RenderedCard {
                    visual,
                    content: render_card(card),
                })
            })
            .collect()
    }
}
