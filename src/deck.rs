//! Deck building and point accounting.

use crate::models::{DeckEntry, Pokemon};
use anyhow::{anyhow, Result};

/// Number of selection slots in a deck.
pub const DECK_SLOTS: usize = 6;

/// How many rows the leaderboard shows.
pub const LEADERBOARD_LIMIT: usize = 10;

/// Six cards chosen from a user's collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSelection {
    slots: Vec<DeckEntry>,
}

impl DeckSelection {
    /// Resolve card choices against the collection. A choice may be a
    /// card id or a card name (case-insensitive); the same card may fill
    /// several slots.
    pub fn resolve(choices: &[String], collection: &[DeckEntry]) -> Result<Self> {
        if choices.len() != DECK_SLOTS {
            return Err(anyhow!(
                "a deck needs exactly {} cards, got {}",
                DECK_SLOTS,
                choices.len()
            ));
        }
        let mut slots = Vec::with_capacity(DECK_SLOTS);
        for choice in choices {
            let by_id = choice.parse::<u32>().ok();
            let found = collection.iter().find(|entry| {
                by_id == Some(entry.id) || entry.name.eq_ignore_ascii_case(choice)
            });
            match found {
                Some(entry) => slots.push(entry.clone()),
                None => {
                    return Err(anyhow!("'{}' is not in your collection", choice))
                }
            }
        }
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[DeckEntry] {
        &self.slots
    }
}

/// Sum of the point values of the selected cards.
pub fn total_points(cards: &[Pokemon]) -> u64 {
    cards.iter().map(|card| card.pokemon_points).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, name: &str) -> DeckEntry {
        DeckEntry {
            id,
            name: name.to_string(),
        }
    }

    fn collection() -> Vec<DeckEntry> {
        vec![
            entry(1, "bulbasaur"),
            entry(4, "charmander"),
            entry(7, "squirtle"),
            entry(25, "pikachu"),
        ]
    }

    fn choices(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_by_id_and_name() {
        let picks = choices(&["1", "charmander", "7", "PIKACHU", "25", "4"]);
        let deck = DeckSelection::resolve(&picks, &collection()).unwrap();
        assert_eq!(deck.slots().len(), DECK_SLOTS);
        assert_eq!(deck.slots()[0].name, "bulbasaur");
        assert_eq!(deck.slots()[1].id, 4);
        assert_eq!(deck.slots()[3].id, 25);
    }

    #[test]
    fn test_duplicates_allowed() {
        let picks = choices(&["25", "25", "25", "25", "25", "25"]);
        let deck = DeckSelection::resolve(&picks, &collection()).unwrap();
        assert!(deck.slots().iter().all(|e| e.id == 25));
    }

    #[test]
    fn test_wrong_slot_count_rejected() {
        let picks = choices(&["1", "4"]);
        assert!(DeckSelection::resolve(&picks, &collection()).is_err());
    }

    #[test]
    fn test_unknown_card_rejected() {
        let picks = choices(&["1", "4", "7", "25", "1", "mewtwo"]);
        let err = DeckSelection::resolve(&picks, &collection()).unwrap_err();
        assert!(err.to_string().contains("mewtwo"));
    }

    #[test]
    fn test_total_points() {
        let card = |points| Pokemon {
            pokemon_id: 1,
            pokemon_name: "x".to_string(),
            pokemon_generation: String::new(),
            pokemon_rarity: Default::default(),
            pokemon_points: points,
            pokemon_stats: Vec::new(),
            pokemon_sprite_path: String::new(),
        };
        assert_eq!(total_points(&[]), 0);
        assert_eq!(total_points(&[card(45), card(90), card(0)]), 135);
    }
}
