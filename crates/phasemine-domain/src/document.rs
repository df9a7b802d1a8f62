//! Document module - the unit of work flowing through the pipeline

/// A paper's text, identified by the stem of the file it was read from
///
/// Documents are immutable as far as the pipeline is concerned: every
/// cleaning stage produces a new `Document` via [`Document::with_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File stem (name without extension)
    pub id: String,

    /// Full text, lines separated by `'\n'`
    pub text: String,
}

impl Document {
    /// Create a new document
    ///
    /// # Examples
    ///
    /// ```
    /// use phasemine_domain::Document;
    ///
    /// let doc = Document::new("paper_01", "## Abstract\nfoo");
    /// assert_eq!(doc.id, "paper_01");
    /// assert_eq!(doc.text, "## Abstract\nfoo");
    /// ```
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Derive a new document with the same id and replaced text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            text: text.into(),
        }
    }
}
