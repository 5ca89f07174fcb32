use rand::Rng;
use rand::seq::SliceRandom;

use study_core::model::{Card, CardOrder};

/// Orders the deck's cards for the first pass of a session.
///
/// `Random` shuffles once here; retry cycles are always built from the deck's
/// original order by the engine.
pub fn first_cycle_queue<R: Rng + ?Sized>(
    cards: &[Card],
    order: CardOrder,
    rng: &mut R,
) -> Vec<Card> {
    let mut queue = cards.to_vec();
    if order == CardOrder::Random {
        queue.as_mut_slice().shuffle(rng);
    }
    queue
}
