//! Section boundary detection over Markdown-style headings
//!
//! Detection is a single pass over the document's lines. Each line is
//! classified with anchored patterns, so the cost is linear in the document
//! length regardless of how the section bodies look.

use crate::config::DEFAULT_BOILERPLATE_SECTIONS;
use crate::error::CleanerError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Any heading that terminates a section: one to six `#` then whitespace
    static ref RE_HEADING: Regex = Regex::new(r"^#{1,6}\s").unwrap();

    /// Abstract heading, tolerating an OCR split ("A bstract")
    static ref RE_ABSTRACT: Regex =
        Regex::new(r"(?i)^#+\s*(?:[ivxlcdm\d]*\.?\s*)?a\s*bstract").unwrap();

    static ref RE_INTRODUCTION: Regex =
        Regex::new(r"(?i)^#+\s*(?:[ivxlcdm\d]*\.?\s*)?introduction").unwrap();

    static ref RE_EXPERIMENTAL: Regex = Regex::new(
        r"(?i)^#+\s*(?:[ivxlcdm\d]*\.?\s*)?(?:experiment(?:al|s)?|materials\s+and\s+methods|methodology)"
    ).unwrap();

    static ref RE_DEFAULT_BOILERPLATE: Regex = boilerplate_pattern(
        &DEFAULT_BOILERPLATE_SECTIONS.iter().map(|s| s.to_string()).collect::<Vec<_>>()
    ).unwrap();
}

/// Kind of section a heading introduces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    /// Abstract
    Abstract,
    /// Introduction
    Introduction,
    /// Experimental, Materials and Methods, or Methodology
    Experimental,
    /// Reference list
    References,
    /// Any other boilerplate section, carrying the heading name as written
    Boilerplate(String),
}

impl SectionKind {
    /// Short label used in logs
    pub fn label(&self) -> String {
        match self {
            SectionKind::Abstract => "abstract".to_string(),
            SectionKind::Introduction => "introduction".to_string(),
            SectionKind::Experimental => "experimental".to_string(),
            SectionKind::References => "references".to_string(),
            SectionKind::Boilerplate(name) => format!("boilerplate:{}", name.to_lowercase()),
        }
    }
}

/// Location of a heading-introduced section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMatch {
    /// What the heading introduces
    pub kind: SectionKind,

    /// Byte offset of the start of the heading line
    pub start: usize,

    /// Byte offset of the next heading line, `None` if the section runs to the end
    pub end: Option<usize>,
}

impl SectionMatch {
    /// End offset, resolving "runs to the end" against the text length
    pub fn end_or(&self, len: usize) -> usize {
        self.end.unwrap_or(len)
    }
}

/// Front-matter anchors found in a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionBoundaries {
    /// Last abstract heading
    pub abstract_section: Option<SectionMatch>,

    /// First introduction heading
    pub introduction: Option<SectionMatch>,

    /// First experimental/methodology heading
    pub experimental: Option<SectionMatch>,
}

/// Locates sections by heading semantics. Deletes nothing.
#[derive(Debug, Clone)]
pub struct SectionDetector {
    boilerplate: Regex,
}

impl Default for SectionDetector {
    fn default() -> Self {
        Self {
            boilerplate: RE_DEFAULT_BOILERPLATE.clone(),
        }
    }
}

impl SectionDetector {
    /// Create a detector for the given boilerplate section names
    ///
    /// References is always included whether or not it appears in `sections`.
    pub fn with_sections(sections: &[String]) -> Result<Self, CleanerError> {
        let boilerplate = boilerplate_pattern(sections)
            .map_err(|e| CleanerError::Config(format!("invalid boilerplate section name: {}", e)))?;
        Ok(Self { boilerplate })
    }

    /// Locate the abstract, introduction and experimental headings
    pub fn detect(&self, text: &str) -> SectionBoundaries {
        let lines: Vec<(usize, &str)> = line_spans(text).collect();
        let headings = heading_offsets(&lines);

        let mut boundaries = SectionBoundaries::default();
        for &(start, line) in &lines {
            if RE_ABSTRACT.is_match(line) {
                // Running headers repeat "Abstract" in front matter; the last one wins
                boundaries.abstract_section = Some(section_at(SectionKind::Abstract, start, &headings));
            }
            if boundaries.introduction.is_none() && RE_INTRODUCTION.is_match(line) {
                boundaries.introduction = Some(section_at(SectionKind::Introduction, start, &headings));
            }
            if boundaries.experimental.is_none() && RE_EXPERIMENTAL.is_match(line) {
                boundaries.experimental = Some(section_at(SectionKind::Experimental, start, &headings));
            }
        }

        boundaries
    }

    /// Locate every boilerplate section, in document order
    pub fn find_boilerplate(&self, text: &str) -> Vec<SectionMatch> {
        let lines: Vec<(usize, &str)> = line_spans(text).collect();
        let headings = heading_offsets(&lines);

        lines
            .iter()
            .filter_map(|&(start, line)| {
                let caps = self.boilerplate.captures(line)?;
                let name = caps.name("name")?.as_str();
                let kind = if name.eq_ignore_ascii_case("references") {
                    SectionKind::References
                } else {
                    SectionKind::Boilerplate(name.to_string())
                };
                Some(section_at(kind, start, &headings))
            })
            .collect()
    }
}

/// Whether a line (including its trailing newline, if any) is a section-terminating heading
pub fn is_heading_line(line: &str) -> bool {
    RE_HEADING.is_match(line)
}

/// Lines with their byte offsets; each slice keeps its trailing `'\n'`
fn line_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}

fn heading_offsets(lines: &[(usize, &str)]) -> Vec<usize> {
    lines
        .iter()
        .filter(|(_, line)| is_heading_line(line))
        .map(|&(start, _)| start)
        .collect()
}

fn section_at(kind: SectionKind, start: usize, headings: &[usize]) -> SectionMatch {
    // headings is sorted; the section ends at the first heading after its own line
    let idx = headings.partition_point(|&h| h <= start);
    SectionMatch {
        kind,
        start,
        end: headings.get(idx).copied(),
    }
}

fn boilerplate_pattern(sections: &[String]) -> Result<Regex, regex::Error> {
    let mut names = vec!["References".to_string()];
    names.extend(
        sections
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("references"))
            .map(|s| s.to_string()),
    );

    let alternatives: Vec<String> = names
        .iter()
        .map(|name| {
            name.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();

    Regex::new(&format!(
        r"(?i)^#{{1,6}}\s*\d*\.?\s*(?P<name>{})\b",
        alternatives.join("|")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> SectionDetector {
        SectionDetector::default()
    }

    #[test]
    fn test_detects_front_matter_anchors() {
        let text = "# Title\n## Abstract\nfoo\n## 1. Introduction\nbar\n## 2 Experimental\nbaz\n";
        let b = detector().detect(text);

        assert_eq!(b.abstract_section.as_ref().map(|m| m.start), text.find("## Abstract"));
        assert_eq!(b.introduction.as_ref().map(|m| m.start), text.find("## 1. Introduction"));
        assert_eq!(b.experimental.as_ref().map(|m| m.start), text.find("## 2 Experimental"));
    }

    #[test]
    fn test_section_end_is_next_heading() {
        let text = "## Abstract\nfoo\n## Introduction\nbar";
        let b = detector().detect(text);

        let abs = b.abstract_section.unwrap();
        assert_eq!(abs.end, text.find("## Introduction"));
        assert_eq!(b.introduction.unwrap().end, None);
    }

    #[test]
    fn test_last_abstract_wins() {
        let text = "# Abstract\nrunning header\n## Body\n# Abstract\nreal abstract\n";
        let b = detector().detect(text);
        assert_eq!(b.abstract_section.unwrap().start, text.rfind("# Abstract").unwrap());
    }

    #[test]
    fn test_first_introduction_wins() {
        let text = "## Introduction\none\n## Introduction\ntwo\n";
        let b = detector().detect(text);
        assert_eq!(b.introduction.unwrap().start, 0);
    }

    #[test]
    fn test_roman_numerals_and_ocr_split() {
        let text = "## IV. Materials and Methods\nx\n## A bstract\ny\n";
        let b = detector().detect(text);
        assert!(b.experimental.is_some());
        assert!(b.abstract_section.is_some());
    }

    #[test]
    fn test_experimental_variants() {
        for heading in ["## Experiments", "## EXPERIMENTAL DETAILS", "# Methodology", "### 3 Experiment"] {
            let b = detector().detect(&format!("{}\nbody", heading));
            assert!(b.experimental.is_some(), "expected match for {}", heading);
        }
    }

    #[test]
    fn test_non_headings_ignored() {
        let text = "Abstract\nIntroduction in running text\n## Discussion\n";
        let b = detector().detect(text);
        assert_eq!(b, SectionBoundaries::default());
    }

    #[test]
    fn test_find_boilerplate_kinds() {
        let text = "## Results\nr\n## Acknowledgements\nthanks\n## 6. References\n[1] x\n";
        let found = detector().find_boilerplate(text);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, SectionKind::Boilerplate("Acknowledgements".to_string()));
        assert_eq!(found[0].end, text.find("## 6. References"));
        assert_eq!(found[1].kind, SectionKind::References);
        assert_eq!(found[1].end, None);
    }

    #[test]
    fn test_boilerplate_requires_word_boundary() {
        let text = "## Fundingsources\nkeep\n## Funding sources\ndrop\n";
        let found = detector().find_boilerplate(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start, text.find("## Funding sources").unwrap());
    }

    #[test]
    fn test_boilerplate_heading_depth_limited() {
        let found = detector().find_boilerplate("####### References\n[1]\n");
        assert!(found.is_empty());
    }

    #[test]
    fn test_custom_sections_always_include_references() {
        let detector = SectionDetector::with_sections(&["Data Availability".to_string()]).unwrap();
        let text = "## Data  availability\nx\n## References\ny\n## Funding\nz\n";
        let labels: Vec<String> = detector
            .find_boilerplate(text)
            .iter()
            .map(|m| m.kind.label())
            .collect();
        assert_eq!(labels, vec!["boilerplate:data  availability", "references"]);
    }

    #[test]
    fn test_is_heading_line() {
        assert!(is_heading_line("## Results\n"));
        assert!(is_heading_line("##\n"));
        assert!(!is_heading_line("##Results"));
        assert!(!is_heading_line("text # not heading"));
    }
}
