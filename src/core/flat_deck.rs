use std::ops::{Index, RangeFull};

use rand::Rng;
use rand::seq::SliceRandom;

use super::{Card, Deck, EquityError};

/// `FlatDeck` is a deck of cards that allows easy
/// indexing into the cards. It does not provide
/// contains methods.
///
/// This is the working form of a `Deck` used while sampling. Each
/// simulation worker owns its own copy.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatDeck {
    /// Card storage.
    cards: Vec<Card>,
}

impl FlatDeck {
    /// How many cards are there in the deck ?
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw `n` cards uniformly at random without replacement. This is
    /// the per trial path: it never allocates.
    ///
    /// This runs a partial Fisher-Yates shuffle, so the returned slice is
    /// the prefix of a uniformly random permutation no matter what order
    /// the deck was in beforehand. Cost is linear in `n`. If `n` is
    /// larger than the deck every card is returned.
    pub fn draw<R: Rng>(&mut self, n: usize, rng: &mut R) -> &[Card] {
        let (drawn, _) = self.cards.partial_shuffle(rng, n);
        drawn
    }

    /// Draw enough cards for every group and slice them up in order.
    ///
    /// ```
    /// use rand::{SeedableRng, rngs::StdRng};
    /// use holdem_equity::core::{Deck, FlatDeck};
    ///
    /// let mut rng = StdRng::seed_from_u64(3);
    /// let mut deck: FlatDeck = Deck::new().into();
    /// let groups = deck.partition(&[2, 3], &mut rng).unwrap();
    ///
    /// assert_eq!(2, groups[0].len());
    /// assert_eq!(3, groups[1].len());
    /// ```
    pub fn partition<R: Rng>(
        &mut self,
        sizes: &[usize],
        rng: &mut R,
    ) -> Result<Vec<&[Card]>, EquityError> {
        let requested: usize = sizes.iter().sum();
        if requested > self.len() {
            return Err(EquityError::DeckExhausted {
                requested,
                remaining: self.len(),
            });
        }

        let mut rest = self.draw(requested, rng);
        let mut groups = Vec::with_capacity(sizes.len());
        for &size in sizes {
            let (group, tail) = rest.split_at(size);
            groups.push(group);
            rest = tail;
        }
        Ok(groups)
    }
}

impl Index<usize> for FlatDeck {
    type Output = Card;
    fn index(&self, index: usize) -> &Card {
        &self.cards[index]
    }
}

impl Index<RangeFull> for FlatDeck {
    type Output = [Card];
    fn index(&self, index: RangeFull) -> &[Card] {
        &self.cards[index]
    }
}

impl From<Vec<Card>> for FlatDeck {
    fn from(value: Vec<Card>) -> Self {
        Self { cards: value }
    }
}

/// Allow creating a flat deck from a Deck
impl From<Deck> for FlatDeck {
    /// Flatten this deck. The cards come out in index order so that the
    /// same deck always produces the same starting flat deck.
    fn from(value: Deck) -> Self {
        Self {
            cards: value.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::core::{Suit, Value};

    #[test]
    fn test_deck_from() {
        let fd: FlatDeck = Deck::new().into();
        assert_eq!(52, fd.len());
        assert!(fd[..].windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_from_vec() {
        let c = Card::new(Value::Nine, Suit::Heart);
        let flat_deck: FlatDeck = vec![c].into();

        assert_eq!(1, flat_deck.len());
        assert_eq!(c, flat_deck[0]);
    }

    #[test]
    fn test_draw_rng() {
        let mut fd_one: FlatDeck = Deck::new().into();
        let mut fd_two: FlatDeck = Deck::new().into();

        let mut rng_one = StdRng::seed_from_u64(420);
        let mut rng_two = StdRng::seed_from_u64(420);

        assert_eq!(fd_one.draw(9, &mut rng_one), fd_two.draw(9, &mut rng_two));
        assert_eq!(fd_one, fd_two);
    }

    #[test]
    fn test_draw_is_unique() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut fd: FlatDeck = Deck::new().into();
        for n in [0, 1, 9, 23, 52] {
            let drawn = fd.draw(n, &mut rng);
            assert_eq!(n, drawn.len());
            let unique: HashSet<_> = drawn.iter().collect();
            assert_eq!(n, unique.len());
        }
        // Drawing reorders but never loses cards.
        let all: HashSet<_> = fd[..].iter().copied().collect();
        assert_eq!(52, all.len());
    }

    #[test]
    fn test_draw_clamps_to_deck() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut fd: FlatDeck = vec![Card::from(0), Card::from(1)].into();
        assert_eq!(2, fd.draw(10, &mut rng).len());
    }

    #[test]
    fn test_partition_too_many() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut fd: FlatDeck = vec![Card::from(0), Card::from(1), Card::from(2)].into();
        assert_eq!(
            Err(EquityError::DeckExhausted {
                requested: 4,
                remaining: 3
            }),
            fd.partition(&[2, 2], &mut rng)
        );
    }
}
