//! Wire models for the game server's JSON payloads.
//!
//! Field names mirror the server responses exactly; lookup endpoints
//! answer misses with a bare `details` message instead of the entity,
//! which the client surfaces as `Option` (see `client`).

use serde::{Deserialize, Serialize};

/// Card rarity. Rarity drives the card's point value server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    None,
    Normal,
    Legendary,
    Mythical,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::None => "none",
            Rarity::Normal => "normal",
            Rarity::Legendary => "legendary",
            Rarity::Mythical => "mythical",
        }
    }
}

/// One base stat. The server sends six per card, in order: hp, attack,
/// defense, special-attack, special-defense, speed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub stat_name: String,
    pub stat_value: u32,
}

/// A full card as returned by the lookup endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
    pub pokemon_id: u32,
    pub pokemon_name: String,
    #[serde(default)]
    pub pokemon_generation: String,
    #[serde(default)]
    pub pokemon_rarity: Rarity,
    #[serde(default)]
    pub pokemon_points: u64,
    #[serde(default)]
    pub pokemon_stats: Vec<PokemonStat>,
    #[serde(default)]
    pub pokemon_sprite_path: String,
}

impl Pokemon {
    /// A deck reference to this card.
    pub fn deck_entry(&self) -> DeckEntry {
        DeckEntry {
            id: self.pokemon_id,
            name: self.pokemon_name.clone(),
        }
    }
}

/// A collected card reference inside a user's deck list. The server's
/// field names carry leading underscores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    #[serde(rename = "_id")]
    pub id: u32,
    #[serde(rename = "_name")]
    pub name: String,
}

/// The authenticated user's profile from `/get_user`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub user_name: String,
    #[serde(default)]
    pub deck_ids: Vec<DeckEntry>,
    #[serde(default)]
    pub points: u64,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaderboardUser {
    pub user_name: String,
    #[serde(default)]
    pub points: u64,
}

/// Response of `/get_users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Leaderboard {
    #[serde(default)]
    pub users: Vec<LeaderboardUser>,
}

/// Acknowledgement envelope for mutation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub details: String,
}

impl ApiMessage {
    /// The server reports a successful registration with a message
    /// containing "successfully".
    pub fn is_success(&self) -> bool {
        self.details.contains("successfully")
    }
}
