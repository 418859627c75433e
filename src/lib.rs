//! # jester
//!
//! A command-line study assistant: send a templated prompt to a hosted
//! chat-completion model, keep a JSON history of what was asked, and save
//! answers (or OCR'd PDFs) as Markdown notes in an Obsidian vault.
//!
//! ## Prompt Mode
//!
//! ```text
//! flag ──▶ PromptKind::render ──▶ AiClient::ask ──▶ AiReply
//!                                                     │
//!                              HistoryLog::append ◀───┤ (successes only)
//!                              NoteSink::save     ◀───┘ (with -o)
//! ```
//!
//! ## Conversion Pipeline
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input       validate path and %PDF magic
//!  ├─ 2. Render      rasterise every page via pdfium (spawn_blocking)
//!  ├─ 3. Preprocess  greyscale → threshold → sharpen
//!  ├─ 4. OCR         one tesseract process per page, bounded pool
//!  ├─ 5. Aggregate   sort by page, "## Page N" sections
//!  ├─ 6. Clean up    one chat request turns OCR text into Markdown
//!  └─ 7. Save        <vault>/<name>.md
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jester::{convert, save_draft, AppConfig, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = AppConfig::builder()
//!         .api_key(std::env::var("OPENROUTER_API_KEY")?)
//!         .vault_path("/home/me/vault")
//!         .build()?;
//!
//!     let draft = convert("lecture.pdf", &app, &ConversionConfig::default()).await?;
//!     let path = save_draft(&draft, app.vault_dir()?, &draft.suggested_name).await?;
//!     println!("saved {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `jester` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Runtime Requirements
//!
//! PDF conversion needs the pdfium shared library (`PDFIUM_LIB_PATH`, the
//! working directory, or the system loader path) and a `tesseract`
//! executable. Prompt mode needs neither.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod actions;
pub mod ai;
pub mod ask;
pub mod config;
pub mod convert;
pub mod error;
pub mod history;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod vault;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use actions::{Action, ActionFlags};
pub use ai::{AiClient, AiReply};
pub use ask::{ask_and_record, Exchange};
pub use config::{AppConfig, AppConfigBuilder, ConversionConfig, ConversionConfigBuilder};
pub use convert::{clean_up, convert, convert_with, save_draft};
pub use error::{JesterError, PageError};
pub use history::{HistoryEntry, HistoryLog};
pub use output::{AggregateDocument, ConversionDraft, ConversionStats, PageText};
pub use pipeline::ocr::{TesseractRecognizer, TextRecognizer};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use prompts::PromptKind;
pub use vault::NoteSink;
