//! Shared test doubles: a scripted game API and a collecting notifier.

use crate::auth::{AuthState, BearerToken};
use crate::client::GameApi;
use crate::models::{
    ApiMessage, DeckEntry, Leaderboard, Pokemon, UserProfile,
};
use crate::notify::Notify;
use anyhow::Result;
use secrecy::SecretString;
use std::cell::RefCell;

/// Build a card with the fields the flows care about.
pub fn card(id: u32, name: &str, points: u64) -> Pokemon {
    Pokemon {
        pokemon_id: id,
        pokemon_name: name.to_string(),
        pokemon_generation: "generation-i".to_string(),
        pokemon_rarity: Default::default(),
        pokemon_points: points,
        pokemon_stats: Vec::new(),
        pokemon_sprite_path: String::new(),
    }
}

/// Build a user profile with the given collection.
pub fn profile(user_name: &str, collection: &[(u32, &str)]) -> UserProfile {
    UserProfile {
        user_name: user_name.to_string(),
        deck_ids: collection
            .iter()
            .map(|(id, name)| DeckEntry {
                id: *id,
                name: name.to_string(),
            })
            .collect(),
        points: 0,
    }
}

/// Scripted [`GameApi`] that records every call it receives.
pub struct MockGameApi {
    /// Login result; `None` rejects the credentials.
    pub token: Option<BearerToken>,
    /// `/get_user` result; `None` rejects the token.
    pub user: Option<UserProfile>,
    /// Lookup pool for by-name and by-id queries.
    pub cards: Vec<Pokemon>,
    /// Next pack draw; `None` means an empty pack.
    pub random_card: Option<Pokemon>,
    pub board: Leaderboard,
    pub register_details: String,
    calls: RefCell<Vec<String>>,
}

impl MockGameApi {
    pub fn new() -> Self {
        Self {
            token: None,
            user: None,
            cards: Vec::new(),
            random_card: None,
            board: Leaderboard::default(),
            register_details: "User added successfully".to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A mock with a valid session for `user_name` holding `collection`.
    pub fn with_session(user_name: &str, collection: &[(u32, &str)]) -> Self {
        let mut mock = Self::new();
        mock.token = Some(BearerToken {
            token_type: "bearer".to_string(),
            access_token: "mock-token".to_string(),
        });
        mock.user = Some(profile(user_name, collection));
        mock
    }

    /// The auth state matching this mock's token.
    pub fn auth_state(&self) -> AuthState {
        match &self.token {
            Some(token) => AuthState::Authenticated(token.clone()),
            None => AuthState::Anonymous,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl GameApi for MockGameApi {
    fn login(
        &self,
        username: &str,
        _password: &SecretString,
    ) -> Result<Option<BearerToken>> {
        self.record(format!("login:{}", username));
        Ok(self.token.clone())
    }

    fn register(
        &self,
        username: &str,
        _password: &SecretString,
    ) -> Result<ApiMessage> {
        self.record(format!("register:{}", username));
        Ok(ApiMessage {
            details: self.register_details.clone(),
        })
    }

    fn current_user(&self, _token: &BearerToken) -> Result<Option<UserProfile>> {
        self.record("get_user".to_string());
        Ok(self.user.clone())
    }

    fn pokemon_by_name(&self, name: &str) -> Result<Option<Pokemon>> {
        self.record(format!("pokemon_name:{}", name));
        Ok(self
            .cards
            .iter()
            .find(|c| c.pokemon_name.eq_ignore_ascii_case(name))
            .cloned())
    }

    fn pokemon_by_id(&self, id: u32) -> Result<Option<Pokemon>> {
        self.record(format!("pokemon_id:{}", id));
        Ok(self.cards.iter().find(|c| c.pokemon_id == id).cloned())
    }

    fn random_pokemon(&self, generation: u8) -> Result<Option<Pokemon>> {
        self.record(format!("random:{}", generation));
        Ok(self.random_card.clone())
    }

    fn add_to_deck(&self, username: &str, entry: &DeckEntry) -> Result<ApiMessage> {
        self.record(format!("add_to_deck:{}:{}", username, entry.id));
        Ok(ApiMessage {
            details: "Pokemon added successfully".to_string(),
        })
    }

    fn update_points(&self, username: &str, points: u64) -> Result<ApiMessage> {
        self.record(format!("update_points:{}:{}", username, points));
        Ok(ApiMessage {
            details: "Points updated successfully".to_string(),
        })
    }

    fn leaderboard(&self) -> Result<Leaderboard> {
        self.record("get_users".to_string());
        Ok(self.board.clone())
    }
}

/// [`Notify`] sink that captures messages for assertions.
#[derive(Default)]
pub struct CollectingNotifier {
    infos: RefCell<Vec<String>>,
    failures: RefCell<Vec<String>>,
}

impl CollectingNotifier {
    pub fn infos(&self) -> Vec<String> {
        self.infos.borrow().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.borrow().clone()
    }
}

impl Notify for CollectingNotifier {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn failure(&self, message: &str) {
        self.failures.borrow_mut().push(message.to_string());
    }
}
