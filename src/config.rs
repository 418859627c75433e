//! Configuration types.
//!
//! Two structs, both built once at startup and passed by reference:
//!
//! * [`AppConfig`]: the credential, chat endpoint, model, vault directory
//!   and history file. Every component that talks to the network or writes
//!   user data reads from here instead of the process environment.
//! * [`ConversionConfig`]: knobs for the PDF → OCR pipeline.
//!
//! Both use the builder pattern so callers set only what they care about.

use crate::error::JesterError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Chat-completion endpoint used when none is configured.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Model identifier sent with every request when none is configured.
pub const DEFAULT_MODEL: &str = "qwen/qwen3-235b-a22b-07-25:free";

/// History file, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "history.json";

/// `User-Agent` header for chat requests.
pub const USER_AGENT: &str = concat!("Jester/", env!("CARGO_PKG_VERSION"));

// ── AppConfig ────────────────────────────────────────────────────────────

/// Process-wide settings: credential, endpoint and persistence locations.
///
/// # Example
/// ```rust
/// use jester::AppConfig;
///
/// let app = AppConfig::builder()
///     .api_key("sk-or-test")
///     .vault_path("/tmp/vault")
///     .build()
///     .unwrap();
/// assert!(app.vault_dir().is_ok());
/// ```
#[derive(Clone)]
pub struct AppConfig {
    /// Bearer token for the chat endpoint. Never empty.
    pub api_key: String,

    /// Chat-completion URL. Default: [`DEFAULT_API_URL`].
    pub api_url: String,

    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Directory that receives notes and converted documents.
    /// Only features that write into the vault require it.
    pub vault_path: Option<PathBuf>,

    /// JSON history file. Default: [`DEFAULT_HISTORY_FILE`].
    pub history_path: PathBuf,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("vault_path", &self.vault_path)
            .field("history_path", &self.history_path)
            .finish()
    }
}

impl AppConfig {
    /// Create a new builder for `AppConfig`.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// The vault directory, or [`JesterError::VaultNotConfigured`].
    ///
    /// Called only by features that write into the vault, so a missing
    /// vault never blocks plain prompt modes.
    pub fn vault_dir(&self) -> Result<&Path, JesterError> {
        self.vault_path
            .as_deref()
            .ok_or(JesterError::VaultNotConfigured)
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_key: Option<String>,
    api_url: Option<String>,
    model: Option<String>,
    vault_path: Option<PathBuf>,
    history_path: Option<PathBuf>,
}

impl AppConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// An empty path is treated as "not configured".
    pub fn vault_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.vault_path = if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        };
        self
    }

    pub fn history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = Some(path.into());
        self
    }

    /// Build the configuration. Fails with [`JesterError::MissingApiKey`]
    /// when the credential is absent or blank.
    pub fn build(self) -> Result<AppConfig, JesterError> {
        let api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(JesterError::MissingApiKey)?;

        let api_url = self.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(JesterError::InvalidConfig(format!(
                "API URL must be http(s), got '{api_url}'"
            )));
        }

        let model = self
            .model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(AppConfig {
            api_key,
            api_url,
            model,
            vault_path: self.vault_path,
            history_path: self
                .history_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE)),
        })
    }
}

// ── ConversionConfig ─────────────────────────────────────────────────────

/// Settings for the PDF → OCR → AI conversion pipeline.
///
/// Built via [`ConversionConfig::builder()`] or [`ConversionConfig::default()`].
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rendering DPI used when rasterising each PDF page. Range: 72–600. Default: 300.
    ///
    /// Tesseract is tuned for glyphs around 20–30 px tall; 300 DPI puts body
    /// text of ordinary documents in that band.
    pub dpi: u32,

    /// Cap on either rendered dimension in pixels. Default: 6000.
    ///
    /// An A4 page at 300 DPI is 2480 × 3508 px. The cap only bites on
    /// posters and other oversized pages.
    pub max_rendered_pixels: u32,

    /// Number of pages recognised at the same time. Default: available parallelism.
    pub ocr_workers: usize,

    /// OCR executable. Default: `tesseract` from `PATH`.
    pub tesseract_cmd: PathBuf,

    /// Tesseract language model. Default: `eng`.
    pub ocr_language: String,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            max_rendered_pixels: 6000,
            ocr_workers: default_ocr_workers(),
            tesseract_cmd: PathBuf::from("tesseract"),
            ocr_language: "eng".to_string(),
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("ocr_workers", &self.ocr_workers)
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("ocr_language", &self.ocr_language)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

fn default_ocr_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn ocr_workers(mut self, n: usize) -> Self {
        self.config.ocr_workers = n.max(1);
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, JesterError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(JesterError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.ocr_workers == 0 {
            return Err(JesterError::InvalidConfig(
                "OCR workers must be ≥ 1".into(),
            ));
        }
        if c.ocr_language.trim().is_empty() {
            return Err(JesterError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        if c.tesseract_cmd.as_os_str().is_empty() {
            return Err(JesterError::InvalidConfig(
                "Tesseract command must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
