//! Service account token files.
//!
//! A service account holds a single-use refresh token. Every exchange
//! returns a new one, so the file is rewritten after each login.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Contents of a service account token file.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiTokenFile {
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_token_type() -> String {
    "Service Account".to_string()
}

impl std::fmt::Debug for ApiTokenFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiTokenFile")
            .field("token_type", &self.token_type)
            .field("refresh_token", &"[REDACTED]")
            .field("updated_by", &self.updated_by)
            .field("updated_on", &self.updated_on)
            .finish()
    }
}

impl ApiTokenFile {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            token_type: default_token_type(),
            refresh_token: refresh_token.into(),
            updated_by: None,
            updated_on: None,
        }
    }

    /// Read a token file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::with_source(
                ErrorKind::Io(format!("cannot read token file {}: {}", path.display(), e)),
                e,
            )
        })?;
        let file: ApiTokenFile = serde_json::from_str(&json)?;

        if file.refresh_token.trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(format!(
                "token file {} has an empty refresh_token",
                path.display()
            ))));
        }

        Ok(file)
    }

    /// Write the file, readable only by its owner on Unix.
    ///
    /// The token is written to a private temporary file in the same
    /// directory and renamed over `path`, so a failed write leaves the
    /// previous token in place.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
                parent
            }
            None => Path::new("."),
        };

        let json = serde_json::to_string_pretty(self)?;

        // NamedTempFile is created with mode 0600 on Unix.
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Replace the refresh token and stamp the update.
    pub fn rotate(&mut self, refresh_token: impl Into<String>) {
        self.refresh_token = refresh_token.into();
        self.updated_by = Some(busbar_vcd_client::USER_AGENT.to_string());
        self.updated_on = Some(chrono::Utc::now());
    }
}

/// Default directory for token files.
///
/// Default path: `<config dir>/busbar-vcd/tokens/`
pub fn default_token_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| {
        Error::new(ErrorKind::Config(
            "Could not find configuration directory".to_string(),
        ))
    })?;

    Ok(base.join("busbar-vcd").join("tokens"))
}

/// Default token file path for a name such as an org or account.
pub fn default_token_path(name: &str) -> Result<PathBuf> {
    let safe_name = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect::<String>();

    Ok(default_token_dir()?.join(format!("{}.json", safe_name)))
}
