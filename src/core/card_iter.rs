use super::Card;

/// Iterate every `num_cards` sized combination of some cards.
///
/// Combinations come out in lexicographic index order. This is used to
/// check the seven card evaluator against every five card subset and to
/// walk all five card hands.
///
/// ```
/// use holdem_equity::core::{Card, CardIter};
///
/// let cards: Vec<Card> = (0..7).map(Card::from).collect();
/// assert_eq!(21, CardIter::new(&cards, 5).count());
/// ```
#[derive(Debug)]
pub struct CardIter<'a> {
    // All the possible cards that can be dealt
    possible_cards: &'a [Card],

    // Set of current offsets being used to create card sets.
    idx: Vec<usize>,

    done: bool,
}

impl<'a> CardIter<'a> {
    pub fn new(possible_cards: &'a [Card], num_cards: usize) -> Self {
        Self {
            possible_cards,
            idx: (0..num_cards).collect(),
            done: num_cards > possible_cards.len(),
        }
    }

    /// Move to the next combination. Returns false when exhausted.
    fn advance(&mut self) -> bool {
        let n = self.possible_cards.len();
        let k = self.idx.len();
        // Find the right most offset that can still move forward.
        let Some(level) = (0..k).rev().find(|&i| self.idx[i] < n - k + i) else {
            return false;
        };
        self.idx[level] += 1;
        for i in (level + 1)..k {
            self.idx[i] = self.idx[i - 1] + 1;
        }
        true
    }
}

impl Iterator for CardIter<'_> {
    type Item = Vec<Card>;

    fn next(&mut self) -> Option<Vec<Card>> {
        if self.done {
            return None;
        }
        let result = self.idx.iter().map(|&i| self.possible_cards[i]).collect();
        self.done = !self.advance();
        Some(result)
    }
}
