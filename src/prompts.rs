//! Prompt templates.
//!
//! Every string sent to the chat endpoint is built here, so wording changes
//! touch one file and tests can inspect prompts without a network call.

use std::fmt;

/// Markers around the OCR text inside the cleanup instruction.
pub const OCR_TEXT_START: &str = "--- OCR TEXT START ---";
pub const OCR_TEXT_END: &str = "--- OCR TEXT END ---";

/// Instruction wrapped around OCR output before it is sent for cleanup.
const CLEANUP_INSTRUCTION: &str = "The following text was extracted from a PDF using OCR. \
It may contain errors or formatting issues. \
Please clean it up, correct any obvious OCR mistakes, and format it into clear, well-structured markdown. \
Preserve the original intent and structure (headings, lists, paragraphs) as best as you can.";

/// Build the cleanup prompt for an aggregate OCR document.
///
/// The text is trimmed and embedded verbatim between [`OCR_TEXT_START`] and
/// [`OCR_TEXT_END`].
pub fn cleanup_prompt(ocr_text: &str) -> String {
    format!(
        "{CLEANUP_INSTRUCTION}\n\n{OCR_TEXT_START}\n{}\n{OCR_TEXT_END}",
        ocr_text.trim()
    )
}

/// The prompt templates selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Medium-length summary of a topic or work.
    Summarize,
    /// One-line answer followed by a longer summary.
    Question,
    /// Ten quotes from a book, with attribution and context.
    Quotes,
    /// Free-form generation (story, poem, ...).
    Generate,
    /// Word and phrase suggestions.
    WordFor,
    /// Dungeons & Dragons rules question.
    Dnd,
    /// Code for a stated problem and language.
    Code,
}

impl PromptKind {
    /// All kinds, in flag-precedence order.
    pub const ALL: [PromptKind; 7] = [
        PromptKind::Summarize,
        PromptKind::Question,
        PromptKind::Quotes,
        PromptKind::Generate,
        PromptKind::WordFor,
        PromptKind::Dnd,
        PromptKind::Code,
    ];

    /// Fill the template with the user's text.
    pub fn render(self, input: &str) -> String {
        match self {
            PromptKind::Summarize => format!(
                "In markdown format: Summarize {input} into a medium length understandable form, around one or two paragraphs."
            ),
            PromptKind::Question => format!(
                "In markdown format: Quickly answer the question (1 line), then give a more detailed summary: {input}"
            ),
            PromptKind::Quotes => format!(
                "In markdown format: Show 10 interesting quotes from '{input}', with who said it, when, and some context."
            ),
            PromptKind::Generate => {
                format!("In markdown format: Generate something based on: {input}")
            }
            PromptKind::WordFor => format!(
                "In markdown format: Give 5 close matches, 5 far matches, 3 expressions, 2 metaphors, and 3 made-up fantasy-like words to explain: {input}"
            ),
            PromptKind::Dnd => format!(
                "In markdown format: Answer this D&D question simply, then give a detailed explanation: {input}"
            ),
            PromptKind::Code => {
                format!("Make code for this problem in the language stated: {input}")
            }
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PromptKind::Summarize => "summarize",
            PromptKind::Question => "question",
            PromptKind::Quotes => "quotes",
            PromptKind::Generate => "generate",
            PromptKind::WordFor => "wordfor",
            PromptKind::Dnd => "dnd",
            PromptKind::Code => "code",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_prompt_wraps_trimmed_text() {
        let p = cleanup_prompt("\n\n---\n\n## Page 1\nhello\n");
        assert!(p.starts_with("The following text was extracted from a PDF using OCR."));
        assert!(p.contains("--- OCR TEXT START ---\n---\n\n## Page 1\nhello\n--- OCR TEXT END ---"));
        assert!(p.ends_with(OCR_TEXT_END));
    }

    #[test]
    fn every_kind_embeds_input() {
        for kind in PromptKind::ALL {
            let p = kind.render("the Odyssey");
            assert!(p.contains("the Odyssey"), "{kind}: {p}");
        }
    }

    #[test]
    fn markdown_kinds_ask_for_markdown() {
        for kind in PromptKind::ALL {
            let p = kind.render("x");
            if kind == PromptKind::Code {
                assert!(p.starts_with("Make code"));
            } else {
                assert!(p.starts_with("In markdown format:"), "{kind}: {p}");
            }
        }
    }

    #[test]
    fn quotes_are_single_quoted() {
        assert!(PromptKind::Quotes.render("Dune").contains("from 'Dune'"));
    }
}
