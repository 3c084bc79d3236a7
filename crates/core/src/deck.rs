//! Deck building - turns loaded items into a shuffled board of pairs.

use std::collections::HashSet;

use crate::rng::DeckRng;
use crate::types::{Card, Item};

/// Drop repeated item ids, keeping the first occurrence and the original order.
///
/// At most `limit` items are kept so a generous provider never grows the board.
pub fn distinct_items(items: Vec<Item>, limit: usize) -> Vec<Item> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .take(limit)
        .collect()
}

/// Build two face-down cards per item, in item order.
///
/// Pair ids are `pair-<n>` and card ids `card-<n>-1` / `card-<n>-2`.
pub fn build_pairs(items: &[Item]) -> Vec<Card> {
    let mut cards = Vec::with_capacity(items.len() * 2);
    for (index, item) in items.iter().enumerate() {
        let pair_id = format!("pair-{index}");
        cards.push(Card::new(
            format!("card-{index}-1"),
            item.id.clone(),
            pair_id.clone(),
        ));
        cards.push(Card::new(format!("card-{index}-2"), item.id.clone(), pair_id));
    }
    cards
}

/// Build and shuffle a full deck.
pub fn deal(items: &[Item], rng: &mut DeckRng) -> Vec<Card> {
    let mut cards = build_pairs(items);
    rng.shuffle(&mut cards);
    cards
}
