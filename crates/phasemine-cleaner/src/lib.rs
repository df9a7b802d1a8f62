//! Phasemine Cleaner
//!
//! Heuristic cleaning of OCR-derived paper text before extraction.
//!
//! # Overview
//!
//! Papers converted from PDF carry a lot of text that never contains alloy
//! compositions: reference lists, acknowledgements, funding statements, and
//! front matter. OCR also loops on occasion, repeating a word or phrase many
//! times. The cleaner removes both so that extraction chunks hold
//! substantive content.
//!
//! # Architecture
//!
//! ```text
//! raw text → RepetitionCollapser → BoilerplateStripper → cleaned text
//!                                        │
//!                                  SectionDetector
//! ```
//!
//! - **SectionDetector**: Locates abstract, introduction, experimental and
//!   boilerplate headings in one linear pass over the lines
//! - **BoilerplateStripper**: Removes boilerplate sections up to the next
//!   heading and truncates front matter by a fixed priority policy
//! - **RepetitionCollapser**: Reduces runs of a repeated phrase to one copy
//!
//! # Example Usage
//!
//! ```
//! use phasemine_cleaner::Cleaner;
//! use phasemine_domain::Document;
//!
//! let cleaner = Cleaner::default_config();
//! let doc = Document::new(
//!     "paper",
//!     "## Abstract\nfoo\n## Introduction\nbar\n## Experimental\nAlCoCrFeNi is BCC.\n## References\n[1] ...\n",
//! );
//!
//! let cleaned = cleaner.clean(&doc);
//! assert_eq!(cleaned.text, "## Experimental\nAlCoCrFeNi is BCC.");
//! ```

#![warn(missing_docs)]

mod batch;
mod boilerplate;
mod cleaner;
mod config;
mod error;
mod repetition;
mod sections;

pub use batch::{list_documents, CleanSummary, CleanedFile};
pub use boilerplate::{BoilerplateStripper, HeadCut};
pub use cleaner::Cleaner;
pub use config::{CleanerConfig, DEFAULT_BOILERPLATE_SECTIONS};
pub use error::CleanerError;
pub use repetition::RepetitionCollapser;
pub use sections::{is_heading_line, SectionBoundaries, SectionDetector, SectionKind, SectionMatch};
