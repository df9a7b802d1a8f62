//! Line-preserving chunking by token budget

use crate::error::ExtractorError;
use crate::types::Chunk;
use phasemine_domain::TokenCounter;

/// Splits text into runs of whole lines that fit a token budget
///
/// Lines are accumulated until adding the next one would push the joined
/// buffer over `max_len`; the buffer is then emitted and the line starts a
/// new one. A line that alone exceeds the budget becomes its own chunk.
pub struct LineChunker<T> {
    tokenizer: T,
    max_len: usize,
}

impl<T: TokenCounter> LineChunker<T> {
    /// Create a new chunker
    pub fn new(tokenizer: T, max_len: usize) -> Result<Self, ExtractorError> {
        if max_len == 0 {
            return Err(ExtractorError::Config(
                "max chunk length must be greater than 0".to_string(),
            ));
        }
        Ok(Self { tokenizer, max_len })
    }

    /// Chunk the given text
    ///
    /// Joining the chunks' texts with `'\n'` reproduces `text` exactly. Empty
    /// text yields a single empty chunk.
    pub fn chunk(&self, text: &str) -> Result<Vec<Chunk>, ExtractorError> {
        let mut chunks = Vec::new();
        let mut lines: Vec<String> = Vec::new();
        let mut joined = String::new();
        let mut tokens = 0;

        for line in text.split('\n') {
            if lines.is_empty() {
                tokens = self.count(line)?;
                joined.push_str(line);
                lines.push(line.to_string());
                continue;
            }

            let candidate_len = joined.len();
            joined.push('\n');
            joined.push_str(line);
            let candidate_tokens = self.count(&joined)?;

            if candidate_tokens > self.max_len {
                joined.truncate(candidate_len);
                chunks.push(Chunk {
                    index: chunks.len(),
                    lines: std::mem::take(&mut lines),
                    token_count: tokens,
                });
                joined.clear();
                joined.push_str(line);
                tokens = self.count(line)?;
            } else {
                tokens = candidate_tokens;
            }
            lines.push(line.to_string());
        }

        chunks.push(Chunk {
            index: chunks.len(),
            lines,
            token_count: tokens,
        });
        Ok(chunks)
    }

    fn count(&self, text: &str) -> Result<usize, ExtractorError> {
        self.tokenizer
            .count_tokens(text)
            .map_err(|e| ExtractorError::Tokenizer(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use phasemine_domain::TokenCounter;
    use std::convert::Infallible;

    /// Counts whitespace-separated words
    pub struct WordCounter;

    impl TokenCounter for WordCounter {
        type Error = Infallible;

        fn count_tokens(&self, text: &str) -> Result<usize, Infallible> {
            Ok(text.split_whitespace().count())
        }
    }

    /// Always fails
    pub struct BrokenCounter;

    impl TokenCounter for BrokenCounter {
        type Error = &'static str;

        fn count_tokens(&self, _text: &str) -> Result<usize, &'static str> {
            Err("vocabulary missing")
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::test_support::WordCounter;
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: chunks joined by newline reproduce the text exactly
        #[test]
        fn prop_chunks_lossless(text in "([a-z]{1,6}[ ]?){0,8}(\n([a-z]{1,6}[ ]?){0,8}){0,20}", max in 1usize..12) {
            let chunker = LineChunker::new(WordCounter, max).unwrap();
            let chunks = chunker.chunk(&text).unwrap();
            let rebuilt: Vec<String> = chunks.iter().map(Chunk::text).collect();
            prop_assert_eq!(rebuilt.join("\n"), text);
        }

        /// Property: only single-line chunks may exceed the budget
        #[test]
        fn prop_chunk_bound(text in "([a-z]{1,6} ){0,8}(\n([a-z]{1,6} ){0,8}){0,20}", max in 1usize..12) {
            let chunker = LineChunker::new(WordCounter, max).unwrap();
            for chunk in chunker.chunk(&text).unwrap() {
                let counted = WordCounter.count_tokens(&chunk.text()).unwrap();
                prop_assert_eq!(counted, chunk.token_count);
                prop_assert!(counted <= max || chunk.lines.len() == 1);
            }
        }
    }
}
