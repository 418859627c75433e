//! Selection of the one action an invocation performs.
//!
//! The command line accepts many flags but runs exactly one primary action.
//! [`ActionFlags::resolve`] applies a fixed precedence so the binary never
//! has to reason about flag combinations, and so "no recognised flag" is a
//! value ([`Action::Usage`]) rather than a code path buried in `main`.

use crate::prompts::PromptKind;

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print the banner.
    Intro,
    /// Print the command table.
    Help,
    /// Convert a PDF into a vault note.
    ConvertPdf { path: String },
    /// Send a templated prompt.
    Ask { kind: PromptKind, input: String },
    /// Nothing recognised: print a usage hint and exit cleanly.
    Usage,
}

impl Action {
    /// Whether this action contacts the chat endpoint.
    pub fn uses_network(&self) -> bool {
        matches!(self, Action::ConvertPdf { .. } | Action::Ask { .. })
    }

    /// Whether this action writes into the vault regardless of `-o`.
    pub fn needs_vault(&self) -> bool {
        matches!(self, Action::ConvertPdf { .. })
    }
}

/// Raw flag values as parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct ActionFlags {
    pub intro: bool,
    pub help: bool,
    pub convert: Option<String>,
    pub summarize: Option<String>,
    pub question: Option<String>,
    pub quotes: Option<String>,
    pub generate: Option<String>,
    pub wordfor: Option<String>,
    pub dnd: Option<String>,
    pub code: Option<String>,
}

impl ActionFlags {
    /// Pick the action. Precedence: intro, help, convert, then the prompt
    /// kinds in [`PromptKind::ALL`] order. Empty or whitespace-only values
    /// count as absent.
    pub fn resolve(self) -> Action {
        if self.intro {
            return Action::Intro;
        }
        if self.help {
            return Action::Help;
        }
        if let Some(path) = present(self.convert) {
            return Action::ConvertPdf { path };
        }

        let prompts = [
            (PromptKind::Summarize, self.summarize),
            (PromptKind::Question, self.question),
            (PromptKind::Quotes, self.quotes),
            (PromptKind::Generate, self.generate),
            (PromptKind::WordFor, self.wordfor),
            (PromptKind::Dnd, self.dnd),
            (PromptKind::Code, self.code),
        ];
        prompts
            .into_iter()
            .find_map(|(kind, value)| present(value).map(|input| Action::Ask { kind, input }))
            .unwrap_or(Action::Usage)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
