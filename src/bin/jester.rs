//! CLI binary for jester.
//!
//! A thin shim over the library crate: maps flags and environment variables
//! to `AppConfig` / `ConversionConfig`, picks one action and prints results.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use jester::config::{DEFAULT_API_URL, DEFAULT_HISTORY_FILE, DEFAULT_MODEL};
use jester::vault::default_note_name;
use jester::{
    ask_and_record, convert, save_draft, Action, ActionFlags, AiClient, AppConfig,
    ConversionConfig, ConversionProgressCallback, HistoryLog, NoteSink, PromptKind,
};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}
fn purple(s: &str) -> String {
    format!("\x1b[95m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress for a PDF conversion: a spinner while pdfium renders,
/// a bar while pages are OCR'd (they finish out of order), then a spinner
/// again while the model cleans up the text.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(spinner_style());
        bar.set_prefix("Rendering");
        bar.set_message("Converting PDF to images (this may take a moment)…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn elapsed_secs(&self, page_num: usize) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut t| t.remove(&page_num))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_render_complete(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("OCR");
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Extracting text from {total_pages} pages (in parallel)…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        if let Ok(mut t) = self.start_times.lock() {
            t.insert(page_num, Instant::now());
        }
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, text_len: usize) {
        let secs = self.elapsed_secs(page_num);
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{text_len:>5} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs(page_num);
        let msg: String = if error.chars().count() > 80 {
            error.chars().take(79).chain(['…']).collect()
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_cleanup_start(&self, document_len: usize) {
        self.bar.set_style(spinner_style());
        self.bar.set_prefix("Cleaning up");
        self.bar
            .set_message(format!("sending {document_len} chars of OCR text to the model…"));
    }

    fn on_conversion_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages recognised and formatted",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }
}

// ── Help and intro screens ───────────────────────────────────────────────────

const COMMANDS: &str = r#"
Commands:
  -s   --summarize    Summarize literature or a concept
  -q   --question     Get a short answer + summary
  --iq --quotes       Get interesting quotes from a book
  --hh --helpme       Show this help menu
  --nf --neofetch     Show Jester ASCII intro
  -g   --generate     Create something (story, poem, etc.)
  -w   --wordfor      Suggest a word or phrase
  --cd --code         Help with code-related questions
  --dm --dnd          Answer a Dungeons and Dragons question
  --cv --convertnote  Convert a PDF to clean, AI-formatted markdown and save to Obsidian
  -o   --obsidian     Save the response to Obsidian (optional filename)
"#;

const BANNER: &str = r#"
        .-"-.     .-"-.
       /     \   /     \
      (   o   ) (   o   )
       \     / _ \     /
        '-.-' ( ) '-.-'
          \    \_/    /
           '._     _.'
              '---'
      J  E  S  T  E  R
"#;

fn print_intro(app: &AppConfig) {
    println!("{}", purple(BANNER));
    println!("  {}  {}", dim("model  "), app.model);
    println!(
        "  {}  {}",
        dim("vault  "),
        app.vault_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!("  {}  {}", dim("history"), app.history_path.display());
    println!();
    println!("Jester here. How may I serve thee?\n");
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Quick answer, recorded in history.json
  jester -q "Why is the sky blue?"

  # Summary saved to the vault as photosynthesis.md
  jester -s "photosynthesis" -o photosynthesis

  # Word suggestions saved under a timestamped name
  jester -w "a feeling of quiet dread" -o

  # OCR a scanned PDF and save the cleaned Markdown to the vault
  jester --cv "~/Downloads/lecture 3.pdf"

ENVIRONMENT VARIABLES:
  OPENROUTER_API_KEY   API key for the chat endpoint (required)
  OBSIDIAN_VAULT_PATH  Vault directory for -o and --cv
  JESTER_MODEL         Override the model ID
  JESTER_API_URL       Override the chat-completion URL
  JESTER_HISTORY_FILE  History file (default: history.json)
  TESSERACT_CMD        tesseract executable (default: tesseract)
  JESTER_DPI           Rendering DPI for --cv (default: 300)
  JESTER_OCR_WORKERS   Pages recognised at once (default: CPU count)
  PDFIUM_LIB_PATH      Path to an existing libpdfium
"#;

/// A command-line study assistant backed by a hosted chat model.
#[derive(Parser, Debug)]
#[command(
    name = "jester",
    version,
    about = "Ask a hosted chat model, keep a history, and save notes to Obsidian",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Summarize a topic or literature.
    #[arg(short, long, value_name = "TOPIC")]
    summarize: Option<String>,

    /// Quick answer to a question.
    #[arg(short, long, value_name = "QUESTION")]
    question: Option<String>,

    /// Interesting quotes from a book.
    #[arg(long, visible_alias = "iq", value_name = "BOOK")]
    quotes: Option<String>,

    /// Show all commands.
    #[arg(long, visible_alias = "hh")]
    helpme: bool,

    /// Neofetch-style intro.
    #[arg(long, visible_alias = "nf")]
    neofetch: bool,

    /// Generate something as requested.
    #[arg(short, long, value_name = "REQUEST")]
    generate: Option<String>,

    /// Creative word lists for something.
    #[arg(short, long, value_name = "IDEA")]
    wordfor: Option<String>,

    /// Answer a Dungeons and Dragons question.
    #[arg(long, visible_alias = "dm", value_name = "QUESTION")]
    dnd: Option<String>,

    /// Help with code.
    #[arg(long, visible_alias = "cd", value_name = "PROBLEM")]
    code: Option<String>,

    /// Convert a PDF to clean, AI-formatted markdown and save to Obsidian.
    #[arg(long, visible_alias = "cv", value_name = "PDF")]
    convertnote: Option<String>,

    /// Save the response to Obsidian, optionally under NAME.
    #[arg(short = 'o', long, value_name = "NAME", num_args = 0..=1, default_missing_value = "")]
    obsidian: Option<String>,

    /// API key for the chat endpoint.
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Obsidian vault directory.
    #[arg(long, env = "OBSIDIAN_VAULT_PATH", value_name = "DIR")]
    vault: Option<PathBuf>,

    /// Model ID sent with every request.
    #[arg(long, env = "JESTER_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Chat-completion endpoint.
    #[arg(long, env = "JESTER_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// JSON history file.
    #[arg(long, env = "JESTER_HISTORY_FILE", default_value = DEFAULT_HISTORY_FILE)]
    history: PathBuf,

    /// tesseract executable used by --convertnote.
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    tesseract: PathBuf,

    /// Rendering DPI for --convertnote (72–600).
    #[arg(long, env = "JESTER_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Pages recognised at once. Default: number of CPUs.
    #[arg(long, env = "JESTER_OCR_WORKERS")]
    ocr_workers: Option<usize>,

    /// PDF user password for encrypted documents.
    #[arg(long)]
    password: Option<String>,

    /// Disable the conversion progress bar.
    #[arg(long, env = "JESTER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "JESTER_VERBOSE")]
    verbose: bool,
}

impl Cli {
    fn action_flags(&self) -> ActionFlags {
        ActionFlags {
            intro: self.neofetch,
            help: self.helpme,
            convert: self.convertnote.clone(),
            summarize: self.summarize.clone(),
            question: self.question.clone(),
            quotes: self.quotes.clone(),
            generate: self.generate.clone(),
            wordfor: self.wordfor.clone(),
            dnd: self.dnd.clone(),
            code: self.code.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Startup configuration ────────────────────────────────────────────
    let mut builder = AppConfig::builder()
        .api_key(cli.api_key.clone().unwrap_or_default())
        .api_url(&cli.api_url)
        .model(&cli.model)
        .history_path(&cli.history);
    if let Some(ref vault) = cli.vault {
        builder = builder.vault_path(vault);
    }
    let app = builder.build().context("Startup configuration failed")?;

    // ── Dispatch ─────────────────────────────────────────────────────────
    match cli.action_flags().resolve() {
        Action::Intro => print_intro(&app),
        Action::Help => println!("{COMMANDS}"),
        Action::Usage => println!("No valid command. Try `--hh` for help."),
        Action::ConvertPdf { path } => run_convert(&cli, &app, &path).await?,
        Action::Ask { kind, input } => run_ask(&cli, &app, kind, &input).await?,
    }

    Ok(())
}

/// Prompt mode: render the template, ask, record, optionally save.
async fn run_ask(cli: &Cli, app: &AppConfig, kind: PromptKind, input: &str) -> Result<()> {
    // Resolve the vault before spending a request on an answer we can't keep.
    let sink = match cli.obsidian {
        Some(_) => match app.vault_dir() {
            Ok(dir) => Some(NoteSink::new(dir)),
            Err(e) => {
                eprintln!("{}", red(&e.to_string()));
                return Ok(());
            }
        },
        None => None,
    };

    let client = AiClient::new(app)?;
    let history = HistoryLog::new(&app.history_path);

    println!("\n Thinking...\n");
    let exchange = ask_and_record(&client, &history, kind.render(input))
        .await
        .context("Failed to update history")?;
    println!(" Response:\n{}", exchange.reply.to_string().trim());

    if let (Some(sink), Some(name)) = (sink, cli.obsidian.as_deref()) {
        if !exchange.reply.is_success() {
            eprintln!("\n{}", dim("Nothing saved to Obsidian: the model did not answer."));
            return Ok(());
        }

        let name = if name.trim().is_empty() {
            default_note_name(Local::now())
        } else {
            name.to_string()
        };
        let path = exchange
            .save_to(&sink, &name)
            .await
            .context("Failed to save note")?;
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("\nSaved to Obsidian as {file_name}");
    }

    Ok(())
}

/// Conversion mode: OCR the PDF, ask for a filename, save into the vault.
async fn run_convert(cli: &Cli, app: &AppConfig, pdf: &str) -> Result<()> {
    let vault = match app.vault_dir() {
        Ok(dir) => dir.to_path_buf(),
        Err(e) => {
            eprintln!("{}", red(&e.to_string()));
            return Ok(());
        }
    };

    let progress = if cli.no_progress {
        None
    } else {
        Some(CliProgressCallback::new())
    };

    let mut builder = ConversionConfig::builder()
        .dpi(cli.dpi)
        .tesseract_cmd(&cli.tesseract);
    if let Some(n) = cli.ocr_workers {
        builder = builder.ocr_workers(n);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(ref cb) = progress {
        builder = builder.progress_callback(cb.clone() as Arc<dyn ConversionProgressCallback>);
    }
    let config = builder.build().context("Invalid configuration")?;

    if progress.is_none() {
        println!("Converting PDF to images (this may take a moment)...");
    }
    let result = convert(pdf, app, &config).await;
    if let Some(ref cb) = progress {
        cb.bar.finish_and_clear();
    }
    let draft = result.context("Error processing PDF")?;

    let name = prompt_filename(&draft.suggested_name)?;
    let path = save_draft(&draft, &vault, &name)
        .await
        .context("Failed to save converted note")?;

    println!("\nSuccessfully converted and saved to: {}", path.display());
    eprintln!(
        "   {}",
        dim(&format!(
            "{} pages  ·  {} OCR chars  ·  render {}ms  ·  OCR {}ms  ·  model {}ms",
            draft.stats.total_pages,
            draft.stats.ocr_chars,
            draft.stats.render_duration_ms,
            draft.stats.ocr_duration_ms,
            draft.stats.llm_duration_ms,
        ))
    );
    Ok(())
}

/// Ask for a note name on stdin; blank input or EOF keeps `suggested`.
fn prompt_filename(suggested: &str) -> Result<String> {
    print!("\nEnter the desired filename (without .md) [default: {suggested}]: ");
    io::stdout().flush().context("Failed to write prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read filename")?;

    let name = line.trim();
    Ok(if name.is_empty() {
        suggested.to_string()
    } else {
        name.to_string()
    })
}
