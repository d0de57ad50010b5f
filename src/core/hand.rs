use super::{Card, CardBitSet, CardBitSetIter, EquityError, Rankable};

/// An unordered set of cards, such as a player's hole cards or the hole
/// cards plus the board.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default)]
pub struct Hand(CardBitSet);

impl Hand {
    /// Create a new empty hand
    ///
    /// # Examples
    ///
    /// ```
    /// use holdem_equity::core::Hand;
    ///
    /// let hand = Hand::new();
    ///
    /// assert!(hand.is_empty());
    /// ```
    pub fn new() -> Self {
        Self(CardBitSet::new())
    }

    /// Build a hand from cards, rejecting repeats.
    pub fn new_with_cards<I>(cards: I) -> Result<Self, EquityError>
    where
        I: IntoIterator<Item = Card>,
    {
        let mut hand = Self::new();
        for card in cards {
            if !hand.insert(card) {
                return Err(EquityError::DuplicateOrUnavailableCard(card));
            }
        }
        Ok(hand)
    }

    /// Given a card, is it in the current hand?
    pub fn contains(&self, c: &Card) -> bool {
        self.0.contains(*c)
    }

    /// Add a card. Returns false if it was already in the hand.
    pub fn insert(&mut self, c: Card) -> bool {
        self.0.insert(c)
    }

    pub fn count(&self) -> usize {
        self.0.count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> CardBitSetIter {
        self.0.iter()
    }

    /// Parse back to back card tokens, e.g. `AdKh` or `AsKsQsJsTs`.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdem_equity::core::{EquityError, Hand};
    ///
    /// assert_eq!(2, Hand::new_from_str("AdKh").unwrap().count());
    /// assert!(matches!(
    ///     Hand::new_from_str("AdAd"),
    ///     Err(EquityError::DuplicateOrUnavailableCard(_))
    /// ));
    /// ```
    pub fn new_from_str(hand_string: &str) -> Result<Self, EquityError> {
        let chars: Vec<char> = hand_string.chars().collect();
        let cards = chars
            .chunks(2)
            .map(|pair| Card::parse(&pair.iter().collect::<String>()))
            .collect::<Result<Vec<Card>, EquityError>>()?;
        Self::new_with_cards(cards)
    }
}

impl Rankable for Hand {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter()
    }
}

impl From<Hand> for CardBitSet {
    fn from(val: Hand) -> Self {
        val.0
    }
}
