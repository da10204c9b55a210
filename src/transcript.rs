//! Session transcript: a JSONL audit log of game events.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct Transcript {
    pub path: PathBuf,
    session_id: String,
    server: String,
    file: File,
}

#[derive(Serialize)]
struct Event<'a> {
    ts: DateTime<Utc>,
    session_id: &'a str,
    server: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(flatten)]
    data: serde_json::Value,
}

impl Transcript {
    pub fn new(path: &Path, session_id: &str, server: &str) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            session_id: session_id.to_string(),
            server: server.to_string(),
            file,
        })
    }

    pub fn log(&mut self, event_type: &str, data: serde_json::Value) -> Result<()> {
        let event = Event {
            ts: Utc::now(),
            session_id: &self.session_id,
            server: &self.server,
            event_type,
            data,
        };
        let line = serde_json::to_string(&event)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn session_start(&mut self, mode: &str) -> Result<()> {
        self.log("session_start", serde_json::json!({ "mode": mode }))
    }

    pub fn login_ok(&mut self, username: &str) -> Result<()> {
        self.log("login_ok", serde_json::json!({ "username": username }))
    }

    pub fn login_failed(&mut self, username: &str) -> Result<()> {
        self.log("login_failed", serde_json::json!({ "username": username }))
    }

    pub fn logout(&mut self) -> Result<()> {
        self.log("logout", serde_json::json!({}))
    }

    /// Log a registration attempt; `blocked` means client-side
    /// validation stopped it before any request was sent.
    pub fn register_attempt(
        &mut self,
        username: &str,
        blocked: bool,
        ok: bool,
    ) -> Result<()> {
        self.log(
            "register_attempt",
            serde_json::json!({
                "username": username,
                "blocked": blocked,
                "ok": ok,
            }),
        )
    }

    pub fn search(&mut self, query: &str, found: bool) -> Result<()> {
        self.log(
            "search",
            serde_json::json!({ "query": query, "found": found }),
        )
    }

    pub fn pack_opened(&mut self, generation: u8, card: Option<&str>) -> Result<()> {
        self.log(
            "pack_opened",
            serde_json::json!({ "generation": generation, "card": card }),
        )
    }

    pub fn points_saved(&mut self, username: &str, points: u64) -> Result<()> {
        self.log(
            "points_saved",
            serde_json::json!({ "username": username, "points": points }),
        )
    }

    pub fn leaderboard_viewed(&mut self, rows: usize) -> Result<()> {
        self.log("leaderboard_viewed", serde_json::json!({ "rows": rows }))
    }
}
