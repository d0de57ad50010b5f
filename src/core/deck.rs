use rand::Rng;

use super::{Card, CardBitSet, CardBitSetIter, EquityError, FlatDeck};

/// Deck struct that can tell quickly if a card is in the deck.
///
/// A deck starts out with all 52 cards and only ever shrinks. Sampling
/// never mutates the deck itself; it works on a flattened copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deck(CardBitSet);

impl Deck {
    /// Create the default 52 card deck
    ///
    /// ```
    /// use holdem_equity::core::Deck;
    ///
    /// assert_eq!(52, Deck::new().len());
    /// ```
    pub fn new() -> Self {
        Self(CardBitSet::full())
    }

    /// Given a card, is it in the current deck?
    pub fn contains(&self, c: &Card) -> bool {
        self.0.contains(*c)
    }

    /// Remove a group of cards from the deck.
    ///
    /// Either every card is removed or none is. A card that is no longer
    /// in the deck, or that appears twice in `cards`, is reported as
    /// `DuplicateOrUnavailableCard`.
    ///
    /// ```
    /// use holdem_equity::core::{Card, Deck, EquityError};
    ///
    /// let ace = Card::parse("As").unwrap();
    /// let mut deck = Deck::new();
    /// deck.remove([ace]).unwrap();
    ///
    /// assert_eq!(51, deck.len());
    /// assert_eq!(
    ///     Err(EquityError::DuplicateOrUnavailableCard(ace)),
    ///     deck.remove([ace])
    /// );
    /// ```
    pub fn remove<I>(&mut self, cards: I) -> Result<(), EquityError>
    where
        I: IntoIterator<Item = Card>,
    {
        let mut remaining = self.0;
        for card in cards {
            if !remaining.remove(card) {
                return Err(EquityError::DuplicateOrUnavailableCard(card));
            }
        }
        self.0 = remaining;
        Ok(())
    }

    /// How many cards are there in the deck.
    pub fn len(&self) -> usize {
        self.0.count()
    }

    /// Have all of the cards been dealt from this deck?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an iterator from this deck
    pub fn iter(&self) -> CardBitSetIter {
        self.0.iter()
    }

    /// Deal disjoint groups of cards from one random permutation of the
    /// deck.
    ///
    /// The groups are consecutive slices of the same shuffle so they can
    /// never overlap each other or any card already removed. The deck
    /// itself is left untouched.
    ///
    /// ```
    /// use rand::{SeedableRng, rngs::StdRng};
    /// use holdem_equity::core::Deck;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let groups = Deck::new().partition_sample(&[2, 2, 5], &mut rng).unwrap();
    ///
    /// assert_eq!(vec![2, 2, 5], groups.iter().map(Vec::len).collect::<Vec<_>>());
    /// ```
    pub fn partition_sample<R: Rng>(
        &self,
        sizes: &[usize],
        rng: &mut R,
    ) -> Result<Vec<Vec<Card>>, EquityError> {
        let mut flat: FlatDeck = (*self).into();
        let groups = flat.partition(sizes, rng)?;
        Ok(groups.into_iter().map(<[Card]>::to_vec).collect())
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Deck> for CardBitSet {
    fn from(deck: Deck) -> Self {
        deck.0
    }
}

/// Turn a deck into an iterator
impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = CardBitSetIter;
    /// Consume this deck and create a new iterator.
    fn into_iter(self) -> CardBitSetIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::core::{Suit, Value};

    #[test]
    fn test_contains_in() {
        let d = Deck::new();
        assert!(d.contains(&Card {
            value: Value::Eight,
            suit: Suit::Heart,
        }));
    }

    #[test]
    fn test_remove() {
        let mut d = Deck::new();
        let c = Card::new(Value::Ace, Suit::Heart);
        assert!(d.contains(&c));
        d.remove([c]).unwrap();
        assert!(!d.contains(&c));
        assert_eq!(51, d.len());
        assert!(d.remove([c]).is_err());
    }

    #[test]
    fn test_remove_many_leaves_the_rest() {
        let removed: Vec<Card> = (0..52u8).step_by(5).map(Card::from).collect();
        let mut d = Deck::new();
        d.remove(removed.iter().copied()).unwrap();

        assert_eq!(52 - removed.len(), d.len());
        for card in &removed {
            assert!(!d.contains(card));
        }
        assert_eq!(d.len(), d.iter().count());
    }

    #[test]
    fn test_remove_repeated_input_is_atomic() {
        let ace = Card::new(Value::Ace, Suit::Spade);
        let king = Card::new(Value::King, Suit::Spade);
        let mut d = Deck::new();

        assert_eq!(
            Err(EquityError::DuplicateOrUnavailableCard(ace)),
            d.remove([king, ace, ace])
        );
        // Nothing was taken out.
        assert_eq!(52, d.len());
        assert!(d.contains(&king));
    }

    #[test]
    fn test_partition_disjoint() {
        let mut rng = StdRng::seed_from_u64(420);
        let mut d = Deck::new();
        let known = [
            Card::new(Value::Ace, Suit::Spade),
            Card::new(Value::Ace, Suit::Heart),
            Card::new(Value::Ten, Suit::Club),
        ];
        d.remove(known).unwrap();

        for sizes in [vec![2; 9], vec![2, 5], vec![0, 3, 0, 1], vec![49], vec![]] {
            let groups = d.partition_sample(&sizes, &mut rng).unwrap();
            assert_eq!(sizes.len(), groups.len());

            let mut seen = HashSet::new();
            for (group, size) in groups.iter().zip(&sizes) {
                assert_eq!(*size, group.len());
                for card in group {
                    assert!(seen.insert(*card), "{card} dealt twice");
                    assert!(!known.contains(card));
                }
            }
        }
        // Sampling never touches the deck.
        assert_eq!(49, d.len());
    }

    #[test]
    fn test_partition_exhausted() {
        let mut rng = StdRng::seed_from_u64(1);
        let d = Deck::new();
        assert_eq!(
            Err(EquityError::DeckExhausted {
                requested: 53,
                remaining: 52
            }),
            d.partition_sample(&[50, 3], &mut rng)
        );
    }

    #[test]
    fn test_partition_seeded() {
        let d = Deck::new();
        let one = d
            .partition_sample(&[2, 2, 5], &mut StdRng::seed_from_u64(99))
            .unwrap();
        let two = d
            .partition_sample(&[2, 2, 5], &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(one, two);
    }
}
