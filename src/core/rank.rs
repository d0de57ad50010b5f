use std::fmt;
use std::sync::OnceLock;

use super::{Card, CardBitSet, EquityError};

/// Strength of a poker hand.
///
/// This is a plain integer in `1..=7462`. Lower is stronger: 1 is a royal
/// flush and 7462 is 7-5-4-3-2 offsuit. Every distinct 5 card hand
/// strength gets exactly one value, so two hands tie exactly when their
/// ranks are equal.
///
/// Note that `Ord` follows the integer, so `a < b` means `a` is the
/// *better* hand. Use [`HandRank::beats`] when that reads clearer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct HandRank(u16);

/// The number of distinct 5 card hand strengths.
pub const NUM_HAND_RANKS: u16 = 7462;

impl HandRank {
    /// The best possible hand.
    pub const ROYAL_FLUSH: Self = Self(1);
    /// The worst possible hand.
    pub const WORST: Self = Self(NUM_HAND_RANKS);

    pub fn value(self) -> u16 {
        self.0
    }

    /// Is this strictly stronger than `other` ?
    pub fn beats(self, other: Self) -> bool {
        self.0 < other.0
    }

    /// Which of the nine hand categories this rank falls in.
    pub fn category(self) -> HandCategory {
        match self.0 {
            0..=10 => HandCategory::StraightFlush,
            11..=166 => HandCategory::FourOfAKind,
            167..=322 => HandCategory::FullHouse,
            323..=1599 => HandCategory::Flush,
            1600..=1609 => HandCategory::Straight,
            1610..=2467 => HandCategory::ThreeOfAKind,
            2468..=3325 => HandCategory::TwoPair,
            3326..=6185 => HandCategory::OnePair,
            _ => HandCategory::HighCard,
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.0, self.category())
    }
}

/// The standard poker hand hierarchy, strongest first.
///
/// Ordered the same way as `HandRank`: smaller is stronger.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum HandCategory {
    /// Five cards in a sequence all of the same suit.
    StraightFlush,
    /// Four of the same value.
    FourOfAKind,
    /// Three of one value and two of another value
    FullHouse,
    /// Five cards of the same suit
    Flush,
    /// Five cards in a sequence
    Straight,
    /// Three of the same value.
    ThreeOfAKind,
    /// Two different pair of matching cards.
    TwoPair,
    /// One Card matches another.
    OnePair,
    /// No matches
    HighCard,
}

/// One prime per value. The product of a hand's primes identifies its
/// multiset of values regardless of order.
const PRIMES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// Bit mask for the wheel (Ace, two, three, four, five)
const WHEEL: u16 = 0b1_0000_0000_1111;

/// All 13 bit masks with exactly `bits` set, highest mask first.
///
/// For masks with the same number of bits, the numerically larger mask is
/// always the one that wins on high cards, so this is best first.
fn masks_with(bits: u32) -> impl Iterator<Item = u16> {
    (0..(1u16 << 13)).rev().filter(move |m| m.count_ones() == bits)
}

/// The ten straights, broadway first and the wheel last.
fn straights() -> impl Iterator<Item = u16> {
    (4..13)
        .rev()
        .map(|top| 0b1_1111u16 << (top - 4))
        .chain(std::iter::once(WHEEL))
}

fn prime_product(mask: u16) -> u32 {
    (0..13)
        .filter(|&v| mask & (1u16 << v) != 0)
        .map(|v| PRIMES[v])
        .product()
}

/// Table driven five card hand evaluator.
///
/// The tables are built once and then shared. Hands whose five values are
/// all different are looked up by their 13 bit value mask, in one table for
/// flushes and one for everything else. Hands with a repeated value are
/// looked up by prime product.
///
/// # Examples
///
/// ```
/// use holdem_equity::core::{Card, Evaluator, HandCategory};
///
/// let cards: Vec<Card> = ["As", "Ks", "Qs", "Js", "Ts", "2d", "2c"]
///     .iter()
///     .map(|t| Card::parse(t).unwrap())
///     .collect();
/// let rank = Evaluator::shared().evaluate(&cards).unwrap();
///
/// assert_eq!(HandCategory::StraightFlush, rank.category());
/// ```
#[derive(Debug)]
pub struct Evaluator {
    flush: Vec<u16>,
    unique: Vec<u16>,
    /// (prime product, rank) sorted by product.
    paired: Vec<(u32, u16)>,
}

impl Evaluator {
    /// Build all of the lookup tables.
    ///
    /// This is not free. Most callers want [`Evaluator::shared`].
    pub fn new() -> Self {
        let mut flush = vec![0u16; 1 << 13];
        let mut unique = vec![0u16; 1 << 13];
        let mut paired = Vec::with_capacity(4888);
        let mut next: u16 = 1;
        let mut assign = || {
            let rank = next;
            next += 1;
            rank
        };

        let straight_masks: Vec<u16> = straights().collect();
        for &mask in &straight_masks {
            flush[usize::from(mask)] = assign();
        }

        for quad in (0..13).rev() {
            for kicker in (0..13).rev().filter(|&k| k != quad) {
                paired.push((PRIMES[quad].pow(4) * PRIMES[kicker], assign()));
            }
        }

        for set in (0..13).rev() {
            for pair in (0..13).rev().filter(|&p| p != set) {
                paired.push((PRIMES[set].pow(3) * PRIMES[pair].pow(2), assign()));
            }
        }

        let no_straights: Vec<u16> = masks_with(5)
            .filter(|m| !straight_masks.contains(m))
            .collect();
        for &mask in &no_straights {
            flush[usize::from(mask)] = assign();
        }

        for &mask in &straight_masks {
            unique[usize::from(mask)] = assign();
        }

        for set in (0..13).rev() {
            for kickers in masks_with(2).filter(|&m| m & (1u16 << set) == 0) {
                paired.push((PRIMES[set].pow(3) * prime_product(kickers), assign()));
            }
        }

        for pairs in masks_with(2) {
            for kicker in masks_with(1).filter(|&m| m & pairs == 0) {
                let p = prime_product(pairs);
                paired.push((p * p * prime_product(kicker), assign()));
            }
        }

        for pair in (0..13).rev() {
            for kickers in masks_with(3).filter(|&m| m & (1u16 << pair) == 0) {
                paired.push((PRIMES[pair].pow(2) * prime_product(kickers), assign()));
            }
        }

        for &mask in &no_straights {
            unique[usize::from(mask)] = assign();
        }

        debug_assert_eq!(NUM_HAND_RANKS + 1, next);
        paired.sort_unstable();

        Self {
            flush,
            unique,
            paired,
        }
    }

    /// The process wide evaluator. Tables are built on first use.
    pub fn shared() -> &'static Self {
        static EVALUATOR: OnceLock<Evaluator> = OnceLock::new();
        EVALUATOR.get_or_init(Self::new)
    }

    /// Rank a hand of 5, 6 or 7 distinct cards.
    ///
    /// With more than five cards the best five card subset is ranked.
    pub fn evaluate(&self, cards: &[Card]) -> Result<HandRank, EquityError> {
        if !(5..=7).contains(&cards.len()) {
            return Err(EquityError::InvalidHandSize(cards.len()));
        }
        let mut seen = CardBitSet::new();
        for &card in cards {
            if !seen.insert(card) {
                return Err(EquityError::DuplicateOrUnavailableCard(card));
            }
        }
        Ok(self.rank_best(cards))
    }

    /// Rank exactly five cards. No validation is done.
    pub fn rank_five(&self, cards: &[Card; 5]) -> HandRank {
        let mut mask: u16 = 0;
        let mut product: u32 = 1;
        let mut suits: u8 = 0;
        for c in cards {
            let v = c.value as usize;
            mask |= 1 << v;
            product *= PRIMES[v];
            suits |= 1 << (c.suit as u8);
        }

        let rank = if suits.count_ones() == 1 {
            self.flush[usize::from(mask)]
        } else if mask.count_ones() == 5 {
            self.unique[usize::from(mask)]
        } else {
            match self.paired.binary_search_by_key(&product, |&(p, _)| p) {
                Ok(idx) => self.paired[idx].1,
                // Only reachable with a repeated card, which can't come
                // from a deck.
                Err(_) => NUM_HAND_RANKS,
            }
        };
        HandRank(rank)
    }

    /// Rank the best five card hand out of 5 to 7 cards. No validation is
    /// done; slices of other lengths rank as the worst hand.
    pub fn rank_best(&self, cards: &[Card]) -> HandRank {
        match cards.len() {
            5 => self.rank_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]),
            6 => (0..6)
                .map(|skip| self.rank_five(&five_without(cards, skip, skip)))
                .min()
                .unwrap_or(HandRank::WORST),
            7 => (0..7)
                .flat_map(|i| ((i + 1)..7).map(move |j| (i, j)))
                .map(|(i, j)| self.rank_five(&five_without(cards, i, j)))
                .min()
                .unwrap_or(HandRank::WORST),
            _ => HandRank::WORST,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy the first five cards of `cards` that aren't at index `i` or `j`.
fn five_without(cards: &[Card], i: usize, j: usize) -> [Card; 5] {
    let mut out = [cards[0]; 5];
    let mut n = 0;
    for (idx, &card) in cards.iter().enumerate() {
        if idx != i && idx != j && n < 5 {
            out[n] = card;
            n += 1;
        }
    }
    out
}

/// Can this turn into a hand rank?
pub trait Rankable {
    /// The cards that make up the hand.
    fn cards(&self) -> impl Iterator<Item = Card>;

    /// Rank the best five card hand using the shared evaluator.
    fn rank(&self) -> Result<HandRank, EquityError> {
        let cards: Vec<Card> = self.cards().collect();
        Evaluator::shared().evaluate(&cards)
    }
}

impl Rankable for [Card] {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::{CardIter, Deck, Hand};

    fn rank(s: &str) -> HandRank {
        Hand::new_from_str(s).unwrap().rank().unwrap()
    }

    #[test]
    fn test_table_sizes() {
        let e = Evaluator::shared();
        assert_eq!(4888, e.paired.len());
        assert_eq!(1287, e.flush.iter().filter(|&&r| r != 0).count());
        assert_eq!(1287, e.unique.iter().filter(|&&r| r != 0).count());
        // Prime products are unique.
        assert!(e.paired.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_extremes() {
        assert_eq!(HandRank::ROYAL_FLUSH, rank("AsKsQsJsTs"));
        assert_eq!(HandRank::WORST, rank("7c5d4h3s2c"));
    }

    #[test]
    fn test_category_ordering() {
        let hands = [
            ("AhKhQhJhTh", HandCategory::StraightFlush),
            ("9c9d9h9sAd", HandCategory::FourOfAKind),
            ("AcAdAhKsKd", HandCategory::FullHouse),
            ("Ah8h9hThKh", HandCategory::Flush),
            ("2c3s4h5s6d", HandCategory::Straight),
            ("2c2s2h5s6d", HandCategory::ThreeOfAKind),
            ("AdAcTd9c9s", HandCategory::TwoPair),
            ("AdAc9d8cTs", HandCategory::OnePair),
            ("Ad8h9cTc5c", HandCategory::HighCard),
        ];
        for (s, category) in hands {
            assert_eq!(category, rank(s).category(), "{s}");
        }
        for pair in hands.windows(2) {
            assert!(rank(pair[0].0).beats(rank(pair[1].0)));
        }
    }

    #[test]
    fn test_wheel_is_lowest_straight() {
        let wheel = rank("Ad2c3s4h5s");
        let six_high = rank("2c3s4h5s6d");
        assert_eq!(HandCategory::Straight, wheel.category());
        assert!(six_high.beats(wheel));

        let steel_wheel = rank("Ah2h3h4h5h");
        assert_eq!(HandCategory::StraightFlush, steel_wheel.category());
        assert_eq!(HandRank(10), steel_wheel);
    }

    #[test]
    fn test_kickers() {
        assert!(rank("AdAc9d8cTs").beats(rank("AdAc9d8c7s")));
        assert!(rank("KdKcKh8c7s").beats(rank("QdQcQhAcKs")));
        assert!(rank("9c9d9h9sAd").beats(rank("9c9d9h9sKd")));
        assert!(rank("AdAcTdTc2s").beats(rank("AdAc9d9cKs")));
        assert!(rank("AcKdJh9s7c").beats(rank("AcKdJh9s6c")));
        // Suits never break ties.
        assert_eq!(rank("AcKdJh9s7c"), rank("AdKcJs9h7d"));
    }

    #[test]
    fn test_seven_cards_pick_best_five() {
        // Flush on the board plus a pair in the hand.
        let r = rank("2h7h9hJhKh2c2d");
        assert_eq!(HandCategory::Flush, r.category());
        assert_eq!(rank("2h7h9hJhKh"), r);

        // Two pair plus a pair makes the best two pair with best kicker.
        assert_eq!(rank("AcAdKcKdQs"), rank("AcAdKcKdQsQh2s"));
        // Two trips make a full house.
        assert_eq!(rank("AcAdAhKcKd"), rank("AcAdAhKcKdKh2s"));
        // Six card straight plays the top five.
        assert_eq!(rank("3c4d5h6s7c"), rank("2s3c4d5h6s7c"));
    }

    #[test]
    fn test_seven_equals_max_over_subsets() {
        let e = Evaluator::shared();
        let deck: Vec<Card> = Deck::new().into_iter().collect();
        // A spread of fixed seven card hands.
        for start in (0..45).step_by(4) {
            let cards: Vec<Card> = (0..7).map(|k| deck[(start + k * 7) % 52]).collect();
            let best = CardIter::new(&cards, 5)
                .map(|five| e.evaluate(&five).unwrap())
                .min()
                .unwrap();
            assert_eq!(best, e.evaluate(&cards).unwrap());
        }
    }

    #[test]
    fn test_all_five_card_hands() {
        let e = Evaluator::shared();
        let deck: Vec<Card> = Deck::new().into_iter().collect();
        let mut distinct = HashSet::new();
        let mut count = 0;
        for five in CardIter::new(&deck, 5) {
            let r = e.rank_five(&[five[0], five[1], five[2], five[3], five[4]]);
            assert!(r.value() >= 1 && r.value() <= NUM_HAND_RANKS);
            distinct.insert(r);
            count += 1;
        }
        assert_eq!(2_598_960, count);
        assert_eq!(usize::from(NUM_HAND_RANKS), distinct.len());
    }

    #[test]
    fn test_evaluate_validates() {
        let e = Evaluator::shared();
        let cards: Vec<Card> = Hand::new_from_str("AsKsQsJs")
            .unwrap()
            .iter()
            .collect();
        assert_eq!(Err(EquityError::InvalidHandSize(4)), e.evaluate(&cards));

        let ace = Card::parse("As").unwrap();
        let mut dup = cards.clone();
        dup.push(ace);
        assert_eq!(
            Err(EquityError::DuplicateOrUnavailableCard(ace)),
            e.evaluate(&dup)
        );
    }

    #[test]
    fn test_rank_slice() {
        let cards: Vec<Card> = ["Qc", "Qd", "7h", "7s", "2c", "2d"]
            .iter()
            .map(|t| Card::parse(t).unwrap())
            .collect();
        let r = cards.rank().unwrap();
        assert_eq!(HandCategory::TwoPair, r.category());
        assert_eq!(rank("QcQd7h7s2c"), r);
    }
}
