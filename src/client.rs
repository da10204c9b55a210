//! HTTP client for the game server.
//!
//! All endpoints are POST and answer JSON. Lookup endpoints signal a
//! miss with a bare `details` message instead of the entity, so the
//! client decides hit/miss by key presence, not by status code, and
//! surfaces misses as `None`.

use crate::auth::BearerToken;
use crate::models::{ApiMessage, DeckEntry, Leaderboard, Pokemon, UserProfile};
use anyhow::{anyhow, Context as _, Result};
use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

// Retry configuration for rate limiting and transient errors
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF_MS: u64 = 15_000;

/// Check if an HTTP status code is retryable (429 rate limit or 5xx
/// server error).
fn is_retryable_status(code: u16) -> bool {
    code == 429 || (500..600).contains(&code)
}

/// Client-side view of the game server. A trait so the flows can run
/// against a mock in tests.
pub trait GameApi {
    /// POST `/token`. `None` means the credentials were rejected.
    fn login(&self, username: &str, password: &SecretString)
        -> Result<Option<BearerToken>>;

    /// POST `/register_user`.
    fn register(&self, username: &str, password: &SecretString)
        -> Result<ApiMessage>;

    /// POST `/get_user` with the Authorization header. `None` means the
    /// token was rejected.
    fn current_user(&self, token: &BearerToken) -> Result<Option<UserProfile>>;

    /// POST `/Pokemon_Name/{name}`. `None` means no such card.
    fn pokemon_by_name(&self, name: &str) -> Result<Option<Pokemon>>;

    /// POST `/Pokemon_Id/{id}`.
    fn pokemon_by_id(&self, id: u32) -> Result<Option<Pokemon>>;

    /// POST `/Pokemon_Rand/{generation}`.
    fn random_pokemon(&self, generation: u8) -> Result<Option<Pokemon>>;

    /// POST `/add_to_deck`.
    fn add_to_deck(&self, username: &str, entry: &DeckEntry)
        -> Result<ApiMessage>;

    /// POST `/update_points`.
    fn update_points(&self, username: &str, points: u64) -> Result<ApiMessage>;

    /// POST `/get_users`.
    fn leaderboard(&self) -> Result<Leaderboard>;
}

/// What a request carries besides the path.
enum Payload<'a> {
    Empty,
    Form(&'a [(&'a str, &'a str)]),
    Json(Value),
}

pub struct HttpGameClient {
    base: Url,
    http: reqwest::blocking::Client,
}

impl HttpGameClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("invalid server URL: {}", base_url))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("invalid server URL: {}", base_url));
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { base, http })
    }

    /// Build an endpoint URL from path segments. Segments are encoded,
    /// so raw user input (search names) is safe here.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("server URL has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// POST with retry on 429/5xx and transport errors. Any other
    /// response body is parsed as JSON and returned as-is; callers
    /// decide hit/miss by key presence.
    fn post(
        &self,
        segments: &[&str],
        token: Option<&BearerToken>,
        payload: Payload,
    ) -> Result<Value> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();

        let mut attempt = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            attempt += 1;

            let mut request = self.http.post(url.clone());
            if let Some(token) = token {
                request = request.header(AUTHORIZATION, token.authorization());
            }
            request = match &payload {
                Payload::Empty => request,
                Payload::Form(fields) => request.form(fields),
                Payload::Json(body) => request.json(body),
            };

            match request.send() {
                Ok(resp) => {
                    let code = resp.status().as_u16();
                    if is_retryable_status(code) && attempt < MAX_RETRIES {
                        let retry_after = resp
                            .headers()
                            .get(RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .map(|secs| secs * 1000);
                        let wait_ms =
                            retry_after.unwrap_or(backoff_ms).min(MAX_BACKOFF_MS);
                        eprintln!(
                            "[client] {} from {}, retrying in {}ms (attempt {}/{})",
                            code, path, wait_ms, attempt, MAX_RETRIES
                        );
                        std::thread::sleep(Duration::from_millis(wait_ms));
                        backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
                        continue;
                    }
                    if is_retryable_status(code) {
                        let body = resp.text().unwrap_or_default();
                        return Err(anyhow!(
                            "server error {} on {} after {} attempts: {}",
                            code,
                            path,
                            MAX_RETRIES,
                            body
                        ));
                    }
                    // 2xx and game-level 4xx both carry a JSON body
                    return resp
                        .json()
                        .with_context(|| format!("invalid JSON from {}", path));
                }
                Err(e) if attempt < MAX_RETRIES => {
                    eprintln!(
                        "[client] connection error on {}, retrying in {}ms (attempt {}/{}): {}",
                        path, backoff_ms, attempt, MAX_RETRIES, e
                    );
                    std::thread::sleep(Duration::from_millis(backoff_ms));
                    backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
                }
                Err(e) => {
                    return Err(anyhow!(
                        "connection error on {} after {} attempts: {}",
                        path,
                        MAX_RETRIES,
                        e
                    ));
                }
            }
        }
    }
}

/// Parse an entity out of a response if its marker key is present,
/// otherwise treat the response as a miss.
fn optional_entity<T: DeserializeOwned>(body: Value, key: &str) -> Result<Option<T>> {
    if body.get(key).is_none() {
        return Ok(None);
    }
    let entity = serde_json::from_value(body)?;
    Ok(Some(entity))
}

impl GameApi for HttpGameClient {
    fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Option<BearerToken>> {
        let fields = [
            ("username", username),
            ("password", password.expose_secret()),
        ];
        let body = self.post(&["token"], None, Payload::Form(&fields))?;
        optional_entity(body, "access_token")
    }

    fn register(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<ApiMessage> {
        let body = serde_json::json!({
            "username": username,
            "password": password.expose_secret(),
        });
        let reply = self.post(&["register_user"], None, Payload::Json(body))?;
        serde_json::from_value(reply).context("register reply missing details")
    }

    fn current_user(&self, token: &BearerToken) -> Result<Option<UserProfile>> {
        let body = self.post(&["get_user"], Some(token), Payload::Empty)?;
        optional_entity(body, "user_name")
    }

    fn pokemon_by_name(&self, name: &str) -> Result<Option<Pokemon>> {
        let body = self.post(&["Pokemon_Name", name], None, Payload::Empty)?;
        optional_entity(body, "pokemon_id")
    }

    fn pokemon_by_id(&self, id: u32) -> Result<Option<Pokemon>> {
        let id = id.to_string();
        let body = self.post(&["Pokemon_Id", &id], None, Payload::Empty)?;
        optional_entity(body, "pokemon_id")
    }

    fn random_pokemon(&self, generation: u8) -> Result<Option<Pokemon>> {
        let generation = generation.to_string();
        let body =
            self.post(&["Pokemon_Rand", &generation], None, Payload::Empty)?;
        optional_entity(body, "pokemon_id")
    }

    fn add_to_deck(
        &self,
        username: &str,
        entry: &DeckEntry,
    ) -> Result<ApiMessage> {
        let body = serde_json::json!({
            "username": username,
            "new_elem": entry,
        });
        let reply = self.post(&["add_to_deck"], None, Payload::Json(body))?;
        serde_json::from_value(reply).context("add_to_deck reply missing details")
    }

    fn update_points(&self, username: &str, points: u64) -> Result<ApiMessage> {
        let body = serde_json::json!({
            "username": username,
            "points_elem": points,
        });
        let reply = self.post(&["update_points"], None, Payload::Json(body))?;
        serde_json::from_value(reply).context("update_points reply missing details")
    }

    fn leaderboard(&self) -> Result<Leaderboard> {
        let body = self.post(&["get_users"], None, Payload::Empty)?;
        Ok(serde_json::from_value(body).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpGameClient {
        HttpGameClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_retryable_status() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(200));
        assert!(!is_retryable_status(401));
        assert!(!is_retryable_status(404));
    }

    #[test]
    fn test_endpoint_urls() {
        let c = client("http://localhost:8000");
        let url = c.endpoint(&["Pokemon_Name", "pikachu"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/Pokemon_Name/pikachu");

        // Trailing slash on the base does not double up
        let c = client("http://localhost:8000/");
        let url = c.endpoint(&["token"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/token");

        // Base with a path prefix keeps it
        let c = client("http://example.com/game");
        let url = c.endpoint(&["get_users"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/game/get_users");
    }

    #[test]
    fn test_endpoint_encodes_user_input() {
        let c = client("http://localhost:8000");
        let url = c.endpoint(&["Pokemon_Name", "mr mime"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/Pokemon_Name/mr%20mime");

        // A slash in the input stays one segment
        let url = c.endpoint(&["Pokemon_Name", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/Pokemon_Name/a%2Fb");
    }

    #[test]
    fn test_invalid_server_url_rejected() {
        assert!(HttpGameClient::new("not a url", Duration::from_secs(1)).is_err());
        assert!(
            HttpGameClient::new("mailto:x@y", Duration::from_secs(1)).is_err()
        );
    }

    #[test]
    fn test_optional_entity_by_key_presence() {
        let hit = serde_json::json!({
            "access_token": "abc", "token_type": "bearer"
        });
        let token: Option<BearerToken> =
            optional_entity(hit, "access_token").unwrap();
        assert_eq!(token.unwrap().access_token, "abc");

        // A details-only body is a miss, not an error
        let miss = serde_json::json!({"details": "Pokemon with this Name not found"});
        let pokemon: Option<Pokemon> = optional_entity(miss, "pokemon_id").unwrap();
        assert!(pokemon.is_none());
    }
}
