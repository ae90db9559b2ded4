//! Bearer token storage
//!
//! The report needs an Alby access token. [`TokenStore`] abstracts where it is
//! kept; [`FileTokenStore`] persists it in the user's config directory.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const TOKEN_PROMPT: &str = "Please enter your Alby token";
pub const TOKEN_REQUIRED: &str =
    "A token is mandatory to access your transactions from Alby servers.";

pub trait TokenStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn forget(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read token file: {}", self.path.display())),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Failed to open token file: {}", self.path.display()))?;

        // mode() only applies on creation; narrow a pre-existing file before writing
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict token file: {}", self.path.display()))?;
        }

        file.write_all(token.as_bytes())
            .with_context(|| format!("Failed to write token file: {}", self.path.display()))?;

        info!(path = %self.path.display(), "Token saved");
        Ok(())
    }

    fn forget(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Token removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove token file: {}", self.path.display())),
        }
    }
}

/// Resolve the token to use for this run.
///
/// With `forget` set the stored token is discarded first. When nothing is
/// stored, `prompt` is asked for one and a non-empty answer is saved.
pub fn acquire_token<S, P>(store: &S, forget: bool, prompt: P) -> Result<String>
where
    S: TokenStore + ?Sized,
    P: FnOnce() -> Result<Option<String>>,
{
    if forget {
        store.forget()?;
    } else if let Some(token) = store.load()? {
        return Ok(token);
    }

    let token = prompt()?
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow::anyhow!(TOKEN_REQUIRED))?;

    store.save(&token)?;
    Ok(token)
}

/// Ask for the token on stderr and read one line from stdin.
pub fn prompt_stdin() -> Result<Option<String>> {
    eprintln!("{TOKEN_PROMPT}");
    io::stderr().flush().context("Failed to flush stderr")?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read token from stdin")?;

    Ok((read > 0).then_some(line))
}
