//! Command-line interface: argument parsing, the REPL, and command
//! dispatch shared with one-shot mode.
//!
//! In the REPL, bare input is a card search; everything else is a
//! `/command`. One-shot mode (`-c "pack 2"`) runs the same grammar
//! without the slash.

use crate::client::HttpGameClient;
use crate::config::Config;
use crate::flows::{self, RegisterOutcome};
use crate::notify::{ConsoleNotifier, Notify};
use crate::session;
use crate::transcript::Transcript;
use anyhow::{anyhow, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use secrecy::SecretString;
use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Instant;

/// Pokedeck - command-line client for the Pokemon card-collection game
#[derive(Parser, Debug, Clone)]
#[command(name = "pokedeck", about = "Pokedeck - card-collection game client")]
pub struct Args {
    #[arg(
        short,
        long,
        help = "One-shot command mode (e.g. \"search pikachu\")"
    )]
    pub command: Option<String>,

    #[arg(long, env = "POKEDECK_SERVER_URL", help = "Game server base URL")]
    pub server: Option<String>,

    #[arg(
        long,
        env = "POKEDECK_PASSWORD",
        hide_env_values = true,
        help = "Password for login/register in one-shot mode"
    )]
    pub password: Option<String>,

    #[arg(long, help = "Path to a config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Directory for session transcripts")]
    pub transcripts_dir: Option<PathBuf>,

    #[arg(long, help = "Report failures on stderr instead of stdout")]
    pub quiet: bool,

    #[arg(long, help = "Verbose output")]
    pub verbose: bool,
}

/// Get the path to the history file
fn history_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pokedeck")
        .join("history")
}

pub struct Context {
    pub args: Args,
    pub session_id: String,
    pub config: Config,
    pub client: HttpGameClient,
    pub notifier: ConsoleNotifier,
    pub auth: RefCell<crate::auth::AuthState>,
    pub transcript: RefCell<Transcript>,
}

pub fn run_once(ctx: &Context, command: &str) -> Result<()> {
    dispatch(ctx, None, command)?;
    Ok(())
}

pub fn run_repl(ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    // Load command history
    let history_file = history_path();
    let _ = rl.load_history(&history_file);

    println!(
        "pokedeck - connected to {}. Type a name to search, /help for commands, /exit to quit",
        ctx.config.server_url
    );

    loop {
        match rl.readline("pokedeck> ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(&line)?;

                // Bare input is a card search
                let command = match line.strip_prefix('/') {
                    Some(cmd) => cmd.to_string(),
                    None => format!("search {}", line),
                };

                match dispatch(&ctx, Some(&mut rl), &command) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    // Save command history (create parent directory if needed)
    if let Some(parent) = history_file.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = rl.save_history(&history_file);

    Ok(())
}

/// Read a password: prompted in the REPL, from `--password` /
/// `POKEDECK_PASSWORD` in one-shot mode.
fn read_password(
    ctx: &Context,
    rl: &mut Option<&mut DefaultEditor>,
    prompt: &str,
) -> Result<SecretString> {
    if let Some(rl) = rl.as_deref_mut() {
        let line = rl.readline(prompt)?;
        return Ok(SecretString::from(line));
    }
    match &ctx.args.password {
        Some(password) => Ok(SecretString::from(password.clone())),
        None => Err(anyhow!(
            "no password available - set POKEDECK_PASSWORD for one-shot mode"
        )),
    }
}

/// Parse a pack generation argument.
fn parse_generation(arg: &str) -> Option<u8> {
    arg.parse::<u8>().ok()
}

/// Handle one command. Returns true when the session should end.
fn dispatch(
    ctx: &Context,
    mut rl: Option<&mut DefaultEditor>,
    input: &str,
) -> Result<bool> {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let command = parts[0];
    let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

    let start = Instant::now();
    match command {
        "exit" | "quit" => return Ok(true),
        "help" => print_help(),
        "server" => println!("Server: {}", ctx.config.server_url),
        "search" => {
            if rest.is_empty() {
                ctx.notifier.failure("Usage: search <name>");
            } else {
                cmd_search(ctx, rest)?;
            }
        }
        "login" => {
            if rest.is_empty() {
                ctx.notifier.failure("Usage: login <username>");
            } else {
                cmd_login(ctx, &mut rl, rest)?;
            }
        }
        "register" => {
            if rest.is_empty() {
                ctx.notifier.failure("Usage: register <username>");
            } else {
                cmd_register(ctx, &mut rl, rest)?;
            }
        }
        "logout" => cmd_logout(ctx),
        "whoami" => {
            flows::whoami(&ctx.client, &ctx.notifier, &ctx.auth.borrow())?;
        }
        "collection" => {
            flows::show_collection(&ctx.client, &ctx.notifier, &ctx.auth.borrow())?;
        }
        "pack" => cmd_pack(ctx, rest)?,
        "deck" => cmd_deck(ctx, rest)?,
        "leaderboard" => cmd_leaderboard(ctx)?,
        _ => println!("Unknown command: {}", command),
    }

    if ctx.args.verbose {
        eprintln!("[Duration: {:.1}s]", start.elapsed().as_secs_f64());
    }
    Ok(false)
}

fn print_help() {
    println!("Commands:");
    println!("  <name>               - search a card by name");
    println!("  /search <name>       - same, explicitly");
    println!("  /login <username>    - log in (prompts for the password)");
    println!("  /register <username> - create an account");
    println!("  /logout              - drop the session");
    println!("  /whoami              - show the logged-in user");
    println!("  /collection          - list your collected cards");
    println!("  /pack [gen]          - open a pack (generation 1-3, random if omitted)");
    println!("  /deck <c1> .. <c6>   - pick six cards, save their point total");
    println!("  /leaderboard         - show the top players");
    println!("  /server              - show the server URL");
    println!("  /help                - show commands");
    println!("  /exit                - quit");
}

fn cmd_search(ctx: &Context, query: &str) -> Result<()> {
    let found = flows::search(&ctx.client, &ctx.notifier, query)?;
    let _ = ctx.transcript.borrow_mut().search(query, found);
    Ok(())
}

fn cmd_login(
    ctx: &Context,
    rl: &mut Option<&mut DefaultEditor>,
    username: &str,
) -> Result<()> {
    let password = read_password(ctx, rl, "Password: ")?;
    let mut auth = ctx.auth.borrow_mut();
    let ok = flows::login(&ctx.client, &ctx.notifier, &mut auth, username, &password)?;
    if ok {
        if let Err(e) = session::save_auth(&auth) {
            eprintln!("Warning: failed to save session: {}", e);
        }
        let _ = ctx.transcript.borrow_mut().login_ok(username);
    } else {
        let _ = ctx.transcript.borrow_mut().login_failed(username);
    }
    Ok(())
}

fn cmd_register(
    ctx: &Context,
    rl: &mut Option<&mut DefaultEditor>,
    username: &str,
) -> Result<()> {
    let password = read_password(ctx, rl, "Password: ")?;
    // One-shot mode reads the same source twice, which always matches
    let repeat = read_password(ctx, rl, "Repeat password: ")?;

    let outcome =
        flows::register(&ctx.client, &ctx.notifier, username, &password, &repeat)?;
    let _ = ctx.transcript.borrow_mut().register_attempt(
        username,
        outcome == RegisterOutcome::Blocked,
        outcome == RegisterOutcome::Created,
    );
    Ok(())
}

fn cmd_logout(ctx: &Context) {
    let mut auth = ctx.auth.borrow_mut();
    flows::logout(&ctx.notifier, &mut auth);
    if let Err(e) = session::save_auth(&auth) {
        eprintln!("Warning: failed to save session: {}", e);
    }
    let _ = ctx.transcript.borrow_mut().logout();
}

fn cmd_pack(ctx: &Context, rest: &str) -> Result<()> {
    let generation = if rest.is_empty() {
        None
    } else {
        match parse_generation(rest) {
            Some(g) => Some(g),
            None => {
                ctx.notifier.failure("Usage: pack [generation 1-3]");
                return Ok(());
            }
        }
    };

    let pulled =
        flows::open_pack(&ctx.client, &ctx.notifier, &ctx.auth.borrow(), generation)?;
    if let Some((generation, card)) = pulled {
        let _ = ctx
            .transcript
            .borrow_mut()
            .pack_opened(generation, Some(&card));
    }
    Ok(())
}

fn cmd_deck(ctx: &Context, rest: &str) -> Result<()> {
    let choices: Vec<String> =
        rest.split_whitespace().map(|s| s.to_string()).collect();
    let saved = flows::save_deck_points(
        &ctx.client,
        &ctx.notifier,
        &ctx.auth.borrow(),
        &choices,
    )?;
    if let Some((username, points)) = saved {
        let _ = ctx.transcript.borrow_mut().points_saved(&username, points);
    }
    Ok(())
}

fn cmd_leaderboard(ctx: &Context) -> Result<()> {
    let rows = flows::leaderboard(&ctx.client, &ctx.notifier)?;
    let _ = ctx.transcript.borrow_mut().leaderboard_viewed(rows);
    Ok(())
}
