//! Prompt construction for alloy/phase extraction

use crate::error::ExtractorError;
use phasemine_domain::{Phase, TokenCounter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter placed around the paper text and around earlier answers
pub const DELIMITER: &str = "—————";

/// Builds the single-turn extraction prompt for one chunk
pub struct PromptBuilder<'a> {
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for a chunk's text
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(EXTRACTION_INSTRUCTIONS.len() + self.text.len() + 512);

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("\"Phase\": Phase of the alloy as reported in the text. Possible values: ");
        prompt.push_str(&phase_vocabulary());
        prompt.push_str("\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt.push('\n');

        push_delimited(&mut prompt, self.text);
        prompt
    }
}

/// Allowance per dialog message for the chat template's role markers
const TEMPLATE_TOKENS_PER_MESSAGE: usize = 8;

/// Tokens the longest dialog of one chunk can occupy, reply included
///
/// The final request of a chunk carries the extraction prompt around up to
/// `max_chunk_length` tokens of text plus, per refinement pass, the previous
/// answer twice (as the assistant turn and inside the follow-up prompt).
/// Answers are bounded by `max_new_tokens`.
pub fn context_window<T: TokenCounter>(
    tokenizer: &T,
    max_chunk_length: usize,
    passes: &[RefinementPass],
    max_new_tokens: usize,
) -> Result<usize, ExtractorError> {
    let count = |text: &str| {
        tokenizer
            .count_tokens(text)
            .map_err(|e| ExtractorError::Tokenizer(e.to_string()))
    };

    let mut total =
        count(&PromptBuilder::new("").build())? + max_chunk_length + TEMPLATE_TOKENS_PER_MESSAGE;
    for pass in passes {
        total += count(&pass.prompt(""))? + 2 * max_new_tokens + 2 * TEMPLATE_TOKENS_PER_MESSAGE;
    }
    Ok(total + max_new_tokens)
}

/// Follow-up prompt applied to a chunk's previous answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefinementPass {
    /// Drop records whose alloy is not a multi-element composition
    CompositionCheck,

    /// Map reported phases onto the closed vocabulary
    PhaseNormalization,
}

impl RefinementPass {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            RefinementPass::CompositionCheck => "composition-check",
            RefinementPass::PhaseNormalization => "phase-normalization",
        }
    }

    /// Build the follow-up prompt around the previous answer (a JSON array)
    pub fn prompt(&self, previous: &str) -> String {
        let mut prompt = match self {
            RefinementPass::CompositionCheck => COMPOSITION_CHECK_INSTRUCTIONS.to_string(),
            RefinementPass::PhaseNormalization => format!(
                "{}\n\nPossible values are: {}.\n{}",
                PHASE_NORMALIZATION_INSTRUCTIONS,
                phase_vocabulary(),
                PHASE_NORMALIZATION_EXAMPLES
            ),
        };
        prompt.push_str("\n\nReturn the updated list of JSON objects with only valid entries.\n\nHere is the list:\n");
        push_delimited(&mut prompt, previous);
        prompt
    }
}

impl fmt::Display for RefinementPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn phase_vocabulary() -> String {
    Phase::ALL
        .iter()
        .map(|p| format!("'{}'", p))
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_delimited(prompt: &mut String, body: &str) {
    prompt.push_str(DELIMITER);
    prompt.push('\n');
    prompt.push_str(body);
    prompt.push('\n');
    prompt.push_str(DELIMITER);
    prompt.push('\n');
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a helpful assistant. Your task is to extract every alloy and its phase from the text of a materials science paper.

Extract alloy and phase information from the paper text delimited by —————.
Use this JSON schema for each alloy:

{
  "Alloy": "XXX",
  "Phase": "XXX"
}

Rules:
"Alloy": Elemental composition of the alloy as written in the paper (e.g., AlFeNiTiVZr).
- An alloy must contain more than one chemical element; skip single-element entries
- Skip alloys containing unknown placeholders (e.g., "X", "Y") or invalid element symbols
- 'BCC' is body-centred cubic, 'FCC' is face-centred cubic and 'Im' is intermetallic"#;

const OUTPUT_FORMAT_REMINDER: &str = "Return a list of JSON objects if there are several alloys. \
Only return valid JSON objects, with no additional text.";

const COMPOSITION_CHECK_INSTRUCTIONS: &str =
    "Ensure that every alloy composition contains multiple elements. If it does not, remove it from the list.";

const PHASE_NORMALIZATION_INSTRUCTIONS: &str = "Ensure that the phase information is valid. \
It may need to be changed or simplified.";

const PHASE_NORMALIZATION_EXAMPLES: &str = r#"'BCC' is body-centred cubic, 'FCC' is face-centred cubic and 'Im' is intermetallic.
If other values are mentioned, simplify them to one of the possible values.

For example:
- 'FCC + B2' --> 'FCC + Im'
- 'B2' --> 'Im'
- 'BCC + HCP' --> 'BCC'
- 'B2 + BCC + FCC + SIGMA' --> 'FCC + BCC + Im'
- 'FCC + LAVES' --> 'FCC + Im'
- 'AMORPHOUS + FCC + IM' --> 'FCC + Im'
- 'FCC + L12' --> 'FCC + Im'
- 'BCC + FCC + FCC' --> 'FCC + BCC'
- 'HCP + Im' --> 'Im'"#;
