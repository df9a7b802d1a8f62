//! Boilerplate removal: trailing non-substantive sections and leading front matter

use crate::sections::{SectionBoundaries, SectionDetector};
use tracing::debug;

/// Where the leading cut lands, given which anchors were found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadCut {
    /// Keep from the experimental heading onward
    Experimental,
    /// Keep from the introduction heading onward
    Introduction,
    /// Keep from the abstract heading onward
    Abstract,
    /// Structure too ambiguous; keep everything
    Keep,
}

impl HeadCut {
    /// Decide the cut from the detected anchors
    ///
    /// An abstract alone only trims what precedes it. Content is discarded up
    /// to the experimental section only when an introduction anchors the
    /// front matter.
    pub fn decide(boundaries: &SectionBoundaries) -> Self {
        match (
            boundaries.abstract_section.is_some(),
            boundaries.introduction.is_some(),
            boundaries.experimental.is_some(),
        ) {
            (_, true, true) => HeadCut::Experimental,
            (_, true, false) => HeadCut::Introduction,
            (true, false, _) => HeadCut::Abstract,
            (false, false, _) => HeadCut::Keep,
        }
    }

    /// Byte offset the kept text starts at
    pub fn offset(&self, boundaries: &SectionBoundaries) -> usize {
        let section = match self {
            HeadCut::Experimental => boundaries.experimental.as_ref(),
            HeadCut::Introduction => boundaries.introduction.as_ref(),
            HeadCut::Abstract => boundaries.abstract_section.as_ref(),
            HeadCut::Keep => None,
        };
        section.map_or(0, |m| m.start)
    }
}

/// Removes boilerplate sections from the tail and front matter from the head
#[derive(Debug, Clone)]
pub struct BoilerplateStripper {
    detector: SectionDetector,
    truncate_front_matter: bool,
}

impl Default for BoilerplateStripper {
    fn default() -> Self {
        Self::new(SectionDetector::default(), true)
    }
}

impl BoilerplateStripper {
    /// Create a stripper around a detector
    pub fn new(detector: SectionDetector, truncate_front_matter: bool) -> Self {
        Self {
            detector,
            truncate_front_matter,
        }
    }

    /// Run tail removal then head truncation; the result is trimmed
    pub fn strip(&self, text: &str) -> String {
        let without_tail = self.remove_boilerplate(text);
        if self.truncate_front_matter {
            self.truncate_head(&without_tail).to_string()
        } else {
            without_tail.trim().to_string()
        }
    }

    /// Delete every boilerplate section from its heading to the next heading
    pub fn remove_boilerplate(&self, text: &str) -> String {
        let matches = self.detector.find_boilerplate(text);
        if matches.is_empty() {
            return text.to_string();
        }

        let mut ranges: Vec<(usize, usize)> = matches
            .iter()
            .map(|m| {
                debug!("Removing {} section at byte {}", m.kind.label(), m.start);
                (m.start, m.end_or(text.len()))
            })
            .collect();
        ranges.sort_unstable();

        let mut kept = String::with_capacity(text.len());
        let mut cursor = 0;
        for (start, end) in ranges {
            if start > cursor {
                kept.push_str(&text[cursor..start]);
            }
            cursor = cursor.max(end);
        }
        kept.push_str(&text[cursor..]);
        kept
    }

    /// Drop leading content according to [`HeadCut::decide`]; the result is trimmed
    pub fn truncate_head<'a>(&self, text: &'a str) -> &'a str {
        let boundaries = self.detector.detect(text);
        let cut = HeadCut::decide(&boundaries);
        let offset = cut.offset(&boundaries);
        debug!("Head cut {:?} at byte {}", cut, offset);
        text[offset..].trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripper() -> BoilerplateStripper {
        BoilerplateStripper::new(SectionDetector::default(), true)
    }

    #[test]
    fn test_references_removed_to_end() {
        let text = "## Results\nAlCoCrFeNi is BCC.\n## References\n[1] Smith 2020\n[2] Doe 2021\n";
        let out = stripper().remove_boilerplate(text);
        assert_eq!(out, "## Results\nAlCoCrFeNi is BCC.\n");
    }

    #[test]
    fn test_boilerplate_removed_up_to_next_heading() {
        let text = "## Acknowledgments\nThanks.\n## Conclusions\nDone.\n";
        let out = stripper().remove_boilerplate(text);
        assert_eq!(out, "## Conclusions\nDone.\n");
    }

    #[test]
    fn test_every_occurrence_removed() {
        let text = "## Funding\nA\n## Body\nB\n### Funding\nC\n## End\nD";
        let out = stripper().remove_boilerplate(text);
        assert_eq!(out, "## Body\nB\n## End\nD");
    }

    #[test]
    fn test_adjacent_boilerplate_sections() {
        let text = "## Body\nB\n## Author Contributions\nX\n## Conflicts of interest\nY\n## References\nZ";
        let out = stripper().remove_boilerplate(text);
        assert_eq!(out, "## Body\nB\n");
    }

    #[test]
    fn test_unspaced_heading_inside_section_stays_removed() {
        // "##References" does not terminate a section but still starts one
        let text = "## Funding\nA\n##References\nB\n## Body\nC";
        let out = stripper().remove_boilerplate(text);
        assert_eq!(out, "## Body\nC");
    }

    #[test]
    fn test_head_cut_policy_table() {
        use crate::sections::{SectionKind, SectionMatch};
        let m = |kind| Some(SectionMatch { kind, start: 0, end: None });
        let b = |a: bool, i: bool, e: bool| SectionBoundaries {
            abstract_section: if a { m(SectionKind::Abstract) } else { None },
            introduction: if i { m(SectionKind::Introduction) } else { None },
            experimental: if e { m(SectionKind::Experimental) } else { None },
        };

        assert_eq!(HeadCut::decide(&b(true, true, true)), HeadCut::Experimental);
        assert_eq!(HeadCut::decide(&b(true, true, false)), HeadCut::Introduction);
        assert_eq!(HeadCut::decide(&b(true, false, false)), HeadCut::Abstract);
        assert_eq!(HeadCut::decide(&b(true, false, true)), HeadCut::Abstract);
        assert_eq!(HeadCut::decide(&b(false, true, true)), HeadCut::Experimental);
        assert_eq!(HeadCut::decide(&b(false, true, false)), HeadCut::Introduction);
        assert_eq!(HeadCut::decide(&b(false, false, true)), HeadCut::Keep);
        assert_eq!(HeadCut::decide(&b(false, false, false)), HeadCut::Keep);
    }

    #[test]
    fn test_truncate_head_keeps_from_experimental() {
        let text = "Title\n## Abstract\na\n## Introduction\nb\n## Experimental\nc\n";
        assert_eq!(stripper().truncate_head(text), "## Experimental\nc");
    }

    #[test]
    fn test_truncate_head_without_anchors_only_trims() {
        let text = "\n\n  Plain text\nwith no headings  \n";
        assert_eq!(stripper().truncate_head(text), "Plain text\nwith no headings");
    }

    #[test]
    fn test_strip_without_front_matter_truncation() {
        let stripper = BoilerplateStripper::new(SectionDetector::default(), false);
        let text = "## Abstract\na\n## Introduction\nb\n## References\nc\n";
        assert_eq!(stripper.strip(text), "## Abstract\na\n## Introduction\nb");
    }
}
