use anyhow::{anyhow, Result};
use clap::Parser;
use pokedeck::cli::{self, Args, Context};
use pokedeck::client::HttpGameClient;
use pokedeck::config::Config;
use pokedeck::notify::{ConsoleNotifier, NotifyMode};
use pokedeck::session;
use pokedeck::transcript::Transcript;
use std::cell::RefCell;
use std::path::PathBuf;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Load configuration
    let mut cfg = if let Some(config_path) = &args.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Apply CLI overrides
    if let Some(server) = &args.server {
        cfg.server_url = server.clone();
    }
    if let Some(dir) = &args.transcripts_dir {
        cfg.transcripts_dir = Some(dir.clone());
    }

    // Validate configuration
    if let Err(errors) = cfg.validate() {
        for err in &errors {
            eprintln!("Config error: {}", err);
        }
        return Err(anyhow!(
            "configuration has {} validation error(s)",
            errors.len()
        ));
    }

    let session_id = uuid::Uuid::new_v4().to_string();
    let transcripts_dir = cfg.transcripts_dir.clone().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pokedeck")
            .join("sessions")
    });
    std::fs::create_dir_all(&transcripts_dir)?;

    let transcript_path = transcripts_dir.join(format!("{}.jsonl", session_id));
    let mut transcript =
        Transcript::new(&transcript_path, &session_id, &cfg.server_url)?;

    let mode = if args.command.is_some() { "one-shot" } else { "repl" };
    let _ = transcript.session_start(mode);

    let client = HttpGameClient::new(&cfg.server_url, cfg.timeout())?;
    let notifier = ConsoleNotifier::new(if args.quiet {
        NotifyMode::Quiet
    } else {
        NotifyMode::Interactive
    });

    // Restore the saved session, if any
    let auth = session::load_auth();

    let ctx = Context {
        args,
        session_id,
        config: cfg,
        client,
        notifier,
        auth: RefCell::new(auth),
        transcript: RefCell::new(transcript),
    };

    if let Some(command) = ctx.args.command.clone() {
        cli::run_once(&ctx, &command)
    } else {
        cli::run_repl(ctx)
    }
}
