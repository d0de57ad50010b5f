use std::fmt::Debug;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use super::Card;

/// A set of cards packed into the low 52 bits of a `u64`.
///
/// Bit `n` is set when `Card::from(n)` is a member. Membership checks,
/// insertion and removal are all single bit operations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CardBitSet {
    cards: u64,
}

const FIFTY_TWO_ONES: u64 = (1 << 52) - 1;

#[inline]
fn bit(card: Card) -> u64 {
    1 << u8::from(card)
}

impl CardBitSet {
    /// Create a new empty bitset
    ///
    /// ```
    /// use holdem_equity::core::CardBitSet;
    /// let cards = CardBitSet::new();
    /// assert!(cards.is_empty());
    /// ```
    pub fn new() -> Self {
        Self { cards: 0 }
    }

    /// A bitset holding every one of the 52 cards.
    ///
    /// ```
    /// use holdem_equity::core::CardBitSet;
    ///
    /// assert_eq!(52, CardBitSet::full().count());
    /// ```
    pub fn full() -> Self {
        Self {
            cards: FIFTY_TWO_ONES,
        }
    }

    /// Insert a card. Returns true if the card wasn't already present.
    pub fn insert(&mut self, card: Card) -> bool {
        let missing = !self.contains(card);
        self.cards |= bit(card);
        missing
    }

    /// Remove a card. Returns true if the card was present.
    ///
    /// ```
    /// use holdem_equity::core::{Card, CardBitSet, Suit, Value};
    ///
    /// let mut cards = CardBitSet::full();
    /// let six = Card::new(Value::Six, Suit::Club);
    ///
    /// assert!(cards.remove(six));
    /// assert!(!cards.contains(six));
    /// assert!(!cards.remove(six));
    /// ```
    pub fn remove(&mut self, card: Card) -> bool {
        let present = self.contains(card);
        self.cards &= !bit(card);
        present
    }

    pub fn contains(&self, card: Card) -> bool {
        (self.cards & bit(card)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.cards == 0
    }

    /// How many cards are in the bitset ?
    pub fn count(&self) -> usize {
        self.cards.count_ones() as usize
    }

    pub fn clear(&mut self) {
        self.cards = 0;
    }

    /// Iterate the members in dense index order.
    pub fn iter(&self) -> CardBitSetIter {
        CardBitSetIter(self.cards)
    }
}

impl Debug for CardBitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(*self).finish()
    }
}

impl BitOr for CardBitSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            cards: self.cards | rhs.cards,
        }
    }
}

impl BitOrAssign<Card> for CardBitSet {
    fn bitor_assign(&mut self, rhs: Card) {
        self.cards |= bit(rhs);
    }
}

impl BitAnd for CardBitSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            cards: self.cards & rhs.cards,
        }
    }
}

impl Not for CardBitSet {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self {
            // Only the 52 card bits are meaningful.
            cards: !self.cards & FIFTY_TWO_ONES,
        }
    }
}

impl FromIterator<Card> for CardBitSet {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        let mut set = Self::new();
        for card in iter {
            set.insert(card);
        }
        set
    }
}

/// Iterator over the cards of a `CardBitSet`, lowest index first.
pub struct CardBitSetIter(u64);

impl IntoIterator for CardBitSet {
    type Item = Card;
    type IntoIter = CardBitSetIter;

    fn into_iter(self) -> Self::IntoIter {
        CardBitSetIter(self.cards)
    }
}

impl Iterator for CardBitSetIter {
    type Item = Card;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }

        let idx = self.0.trailing_zeros();
        // Clear the lowest set bit.
        self.0 &= self.0 - 1;

        Some(Card::from(idx as u8))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for CardBitSetIter {}
