//! User-facing output with a configurable failure strategy.
//!
//! The game flows report everything through a [`Notify`] sink instead of
//! printing inline. Interactive sessions surface failures to the user;
//! quiet mode keeps them on the diagnostic stream for scripted use.
//! Either way there is exactly one implementation of each flow.

/// How failures reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyMode {
    /// Show failure messages to the user (stdout).
    #[default]
    Interactive,
    /// Keep failure messages on stderr.
    Quiet,
}

/// Sink for flow output.
pub trait Notify {
    /// Normal result output.
    fn info(&self, message: &str);
    /// A user-caused failure (bad input, wrong credentials, miss).
    fn failure(&self, message: &str);
}

/// Console sink used by the CLI.
pub struct ConsoleNotifier {
    mode: NotifyMode,
}

impl ConsoleNotifier {
    pub fn new(mode: NotifyMode) -> Self {
        Self { mode }
    }
}

impl Notify for ConsoleNotifier {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn failure(&self, message: &str) {
        match self.mode {
            NotifyMode::Interactive => println!("{}", message),
            NotifyMode::Quiet => eprintln!("[pokedeck] {}", message),
        }
    }
}
