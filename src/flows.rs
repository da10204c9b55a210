//! Game flows shared by the REPL and one-shot mode.
//!
//! Each flow validates its input, talks to the server through the
//! [`GameApi`] seam, and reports outcomes through the [`Notify`] sink.
//! There is exactly one implementation per operation; interactive and
//! quiet sessions differ only in how failures are surfaced.
//!
//! Auth travels as an explicit [`AuthState`] value. Flows mutate it in
//! memory only; persisting the session file is the caller's job.

use crate::auth::AuthState;
use crate::client::GameApi;
use crate::deck::{total_points, DeckSelection, LEADERBOARD_LIMIT};
use crate::models::UserProfile;
use crate::notify::Notify;
use crate::validation::{validate_password, validate_repeat, validate_username};
use anyhow::Result;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};

/// The game server knows exactly three card generations.
pub const MIN_GENERATION: u8 = 1;
pub const MAX_GENERATION: u8 = 3;

/// What happened to a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Client-side validation failed; nothing was sent.
    Blocked,
    /// The server refused (e.g. name taken).
    Rejected,
    /// The account exists now.
    Created,
}

/// Resolve the current user or report why there is none.
fn require_user(
    api: &dyn GameApi,
    notify: &dyn Notify,
    auth: &AuthState,
) -> Result<Option<UserProfile>> {
    let Some(token) = auth.token() else {
        notify.failure("You are not logged in");
        return Ok(None);
    };
    match api.current_user(token)? {
        Some(user) => Ok(Some(user)),
        None => {
            notify.failure("Session expired, please log in again");
            Ok(None)
        }
    }
}

/// Look up a card by name and display it. Returns whether it was found.
pub fn search(api: &dyn GameApi, notify: &dyn Notify, name: &str) -> Result<bool> {
    let Some(card) = api.pokemon_by_name(name)? else {
        notify.failure("Pokemon not found!");
        return Ok(false);
    };

    notify.info(&format!(
        "#{} {}  [{} | {} | {} points]",
        card.pokemon_id,
        card.pokemon_name,
        card.pokemon_generation,
        card.pokemon_rarity.as_str(),
        card.pokemon_points
    ));
    for stat in &card.pokemon_stats {
        notify.info(&format!("  {:<16} {}", stat.stat_name, stat.stat_value));
    }
    if !card.pokemon_sprite_path.is_empty() {
        notify.info(&format!("  sprite: {}", card.pokemon_sprite_path));
    }
    Ok(true)
}

/// Exchange credentials for a bearer token. On success the auth state
/// is replaced; on rejection it is left untouched.
pub fn login(
    api: &dyn GameApi,
    notify: &dyn Notify,
    auth: &mut AuthState,
    username: &str,
    password: &SecretString,
) -> Result<bool> {
    match api.login(username, password)? {
        Some(token) => {
            *auth = AuthState::Authenticated(token);
            notify.info(&format!("Logged in as {}", username));
            Ok(true)
        }
        None => {
            notify.failure("Username or Password wrong");
            Ok(false)
        }
    }
}

/// Drop the session token.
pub fn logout(notify: &dyn Notify, auth: &mut AuthState) {
    *auth = AuthState::Anonymous;
    notify.info("Logged out");
}

/// Create an account. Every client-side check runs and every failure is
/// reported; the request is only sent when all of them pass.
pub fn register(
    api: &dyn GameApi,
    notify: &dyn Notify,
    username: &str,
    password: &SecretString,
    repeat: &SecretString,
) -> Result<RegisterOutcome> {
    let mut fail = false;

    let check = validate_password(password.expose_secret());
    if !check.is_ok() {
        fail = true;
        notify.failure(check.message());
    }
    if !validate_repeat(password.expose_secret(), repeat.expose_secret()) {
        fail = true;
        notify.failure("Repeated password must be same");
    }
    if !validate_username(username) {
        fail = true;
        notify.failure("Username must start with a letter");
    }
    if fail {
        return Ok(RegisterOutcome::Blocked);
    }

    let reply = api.register(username, password)?;
    notify.info(&reply.details);
    if reply.is_success() {
        notify.info("You can now log in");
        Ok(RegisterOutcome::Created)
    } else {
        Ok(RegisterOutcome::Rejected)
    }
}

/// Show who the server thinks we are.
pub fn whoami(
    api: &dyn GameApi,
    notify: &dyn Notify,
    auth: &AuthState,
) -> Result<Option<UserProfile>> {
    let Some(user) = require_user(api, notify, auth)? else {
        return Ok(None);
    };
    notify.info(&format!(
        "Logged in as {} ({} points, {} cards)",
        user.user_name,
        user.points,
        user.deck_ids.len()
    ));
    Ok(Some(user))
}

/// List the user's collected cards.
pub fn show_collection(
    api: &dyn GameApi,
    notify: &dyn Notify,
    auth: &AuthState,
) -> Result<()> {
    let Some(user) = require_user(api, notify, auth)? else {
        return Ok(());
    };
    if user.deck_ids.is_empty() {
        notify.info("Your collection is empty - open a pack first");
        return Ok(());
    }
    notify.info(&format!("{} cards:", user.deck_ids.len()));
    for entry in &user.deck_ids {
        notify.info(&format!("  #{:<4} {}", entry.id, entry.name));
    }
    Ok(())
}

/// Open a pack: draw a random card of a generation and add it to the
/// user's collection. An omitted generation is picked at random.
/// Returns the generation and card name for the transcript.
pub fn open_pack(
    api: &dyn GameApi,
    notify: &dyn Notify,
    auth: &AuthState,
    generation: Option<u8>,
) -> Result<Option<(u8, String)>> {
    let Some(user) = require_user(api, notify, auth)? else {
        return Ok(None);
    };

    let generation = match generation {
        Some(g) if (MIN_GENERATION..=MAX_GENERATION).contains(&g) => g,
        Some(_) => {
            notify.failure("Only generations 1-3 are supported");
            return Ok(None);
        }
        None => rand::thread_rng().gen_range(MIN_GENERATION..=MAX_GENERATION),
    };

    let Some(card) = api.random_pokemon(generation)? else {
        notify.failure("The pack came up empty, try again");
        return Ok(None);
    };
    notify.info(&format!(
        "You pulled {}: {} Points",
        card.pokemon_name, card.pokemon_points
    ));

    let reply = api.add_to_deck(&user.user_name, &card.deck_entry())?;
    notify.info(&reply.details);
    Ok(Some((generation, card.pokemon_name)))
}

/// Build a six-card deck from the collection, sum its points, and save
/// the score. Returns the user name and total on success.
pub fn save_deck_points(
    api: &dyn GameApi,
    notify: &dyn Notify,
    auth: &AuthState,
    choices: &[String],
) -> Result<Option<(String, u64)>> {
    let Some(user) = require_user(api, notify, auth)? else {
        return Ok(None);
    };

    let selection = match DeckSelection::resolve(choices, &user.deck_ids) {
        Ok(selection) => selection,
        Err(e) => {
            notify.failure(&e.to_string());
            return Ok(None);
        }
    };

    let mut cards = Vec::with_capacity(selection.slots().len());
    for entry in selection.slots() {
        match api.pokemon_by_id(entry.id)? {
            Some(card) => cards.push(card),
            None => {
                notify.failure(&format!("Card '{}' could not be loaded", entry.name));
                return Ok(None);
            }
        }
    }

    let points = total_points(&cards);
    let reply = api.update_points(&user.user_name, points)?;
    notify.info(&format!("Deck total: {} points", points));
    notify.info(&reply.details);
    Ok(Some((user.user_name, points)))
}

/// Display the top players. Returns how many rows were shown.
pub fn leaderboard(api: &dyn GameApi, notify: &dyn Notify) -> Result<usize> {
    let board = api.leaderboard()?;
    if board.users.is_empty() {
        notify.failure("No users found");
        return Ok(0);
    }
    let shown = board.users.len().min(LEADERBOARD_LIMIT);
    for (rank, row) in board.users.iter().take(LEADERBOARD_LIMIT).enumerate() {
        notify.info(&format!("{:>2}. {} : {}", rank + 1, row.user_name, row.points));
    }
    Ok(shown)
}
