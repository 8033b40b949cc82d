//! Shared state for command handlers.

use tomatask_core::{Config, CoreError, Database, Identity, PomodoroSettings, SettingsResolver};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Config plus an open database, loaded once per command.
pub struct Context {
    pub config: Config,
    pub db: Database,
}

impl Context {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            config: Config::load()?,
            db: Database::open()?,
        })
    }

    pub fn identity(&self) -> Identity {
        self.config.identity()
    }

    pub fn resolver(&self) -> SettingsResolver<&Database> {
        SettingsResolver::new(&self.db)
    }

    pub fn effective_settings(&self) -> PomodoroSettings {
        self.resolver().effective(&self.identity())
    }
}

/// Error text for operations that need a signed-in user.
pub const LOGIN_HINT: &str = "not signed in; run `tomatask login <user>` first";

/// Turn `Unauthenticated` into the login hint; pass other errors through.
pub fn signed_in<T>(result: Result<T, CoreError>) -> Result<T, Box<dyn std::error::Error>> {
    match result {
        Err(CoreError::Unauthenticated) => Err(LOGIN_HINT.into()),
        other => Ok(other?),
    }
}
