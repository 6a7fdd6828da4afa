pub mod completion;
pub mod config;
pub mod resources;
pub mod session;
pub mod volunteer;

use std::{
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context as _, Result, bail};
use client::{ApiClient, AuthController, ClientError, CrudViewModel, FileTokenStore, Resource};
use shared::config::ClientConfig;

/// Everything a command needs: configuration, the credential file, and the
/// controller that owns it.
pub struct Context {
    pub config: ClientConfig,
    pub token_path: PathBuf,
    pub auth: AuthController,
}

impl Context {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let token_path = config
            .token_path
            .clone()
            .unwrap_or_else(FileTokenStore::default_path);
        let store = Arc::new(FileTokenStore::new(&token_path));
        let client =
            ApiClient::from_config(&config, store).context("failed to build API client")?;
        Ok(Self {
            config,
            token_path,
            auth: AuthController::new(client),
        })
    }
}

/// Turn a failed operation into the message a user should see.
pub fn user_error(err: &ClientError, fallback: &str) -> anyhow::Error {
    anyhow::anyhow!(err.user_message(fallback))
}

/// Fail with the view-model's recorded message when `result` is an error.
pub fn check<R: Resource, T>(vm: &CrudViewModel<R>, result: Result<T, ClientError>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => match vm.last_error() {
            Some(message) if !message.is_empty() => bail!("{message}"),
            _ => Err(user_error(&err, "Request failed")),
        },
    }
}

pub fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}

/// Ask a yes/no question; anything but `y` or `yes` is a no.
pub fn confirm(message: &str) -> bool {
    print!("{message} [y/N] ");
    io::stdout().flush().ok();
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
