//! Collapse runs of repeated words or phrases left behind by OCR
//!
//! OCR models occasionally loop, emitting the same token or phrase dozens of
//! times. A run of `threshold` or more consecutive copies is reduced to one.

/// Collapses consecutive repeats of a whitespace-delimited phrase
#[derive(Debug, Clone, Copy)]
pub struct RepetitionCollapser {
    threshold: usize,
    max_phrase_tokens: usize,
}

impl Default for RepetitionCollapser {
    fn default() -> Self {
        Self::new(3, 8)
    }
}

impl RepetitionCollapser {
    /// Create a collapser
    ///
    /// `threshold` is clamped to at least 2 and `max_phrase_tokens` to at least 1.
    pub fn new(threshold: usize, max_phrase_tokens: usize) -> Self {
        Self {
            threshold: threshold.max(2),
            max_phrase_tokens: max_phrase_tokens.max(1),
        }
    }

    /// Collapse every qualifying run in `text`
    ///
    /// Tokens compare exactly (case-sensitive, punctuation included). A phrase
    /// must begin and end with a word character, so runs of bare punctuation
    /// such as Markdown table rules are left alone. Whitespace outside a
    /// collapsed run is preserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use phasemine_cleaner::RepetitionCollapser;
    ///
    /// let collapser = RepetitionCollapser::default();
    /// assert_eq!(collapser.collapse("the the the alloy"), "the alloy");
    /// assert_eq!(collapser.collapse("BCC phase BCC phase BCC phase."), "BCC phase BCC phase BCC phase.");
    /// assert_eq!(collapser.collapse("BCC phase BCC phase BCC phase end"), "BCC phase end");
    /// ```
    pub fn collapse(&self, text: &str) -> String {
        let spans = token_spans(text);
        let tokens: Vec<&str> = spans.iter().map(|&(s, e)| &text[s..e]).collect();

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        let mut i = 0;
        while i < tokens.len() {
            match self.run_at(&tokens, i) {
                Some((phrase_len, repeats)) => {
                    let first_end = spans[i + phrase_len - 1].1;
                    out.push_str(&text[cursor..first_end]);
                    cursor = spans[i + phrase_len * repeats - 1].1;
                    i += phrase_len * repeats;
                }
                None => i += 1,
            }
        }
        out.push_str(&text[cursor..]);
        out
    }

    /// Shortest phrase starting at `start` repeated at least `threshold` times
    fn run_at(&self, tokens: &[&str], start: usize) -> Option<(usize, usize)> {
        for phrase_len in 1..=self.max_phrase_tokens {
            if start + phrase_len * self.threshold > tokens.len() {
                break;
            }

            let phrase = &tokens[start..start + phrase_len];
            if !is_word_bounded(phrase) {
                continue;
            }

            let mut repeats = 1;
            while start + (repeats + 1) * phrase_len <= tokens.len()
                && tokens[start + repeats * phrase_len..start + (repeats + 1) * phrase_len] == *phrase
            {
                repeats += 1;
            }

            if repeats >= self.threshold {
                return Some((phrase_len, repeats));
            }
        }
        None
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_bounded(phrase: &[&str]) -> bool {
    let first = phrase.first().and_then(|t| t.chars().next());
    let last = phrase.last().and_then(|t| t.chars().next_back());
    matches!((first, last), (Some(f), Some(l)) if is_word_char(f) && is_word_char(l))
}

/// Byte spans of whitespace-delimited tokens
fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (idx, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, idx));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}
