//! Integration tests for phasemine-cleaner
//!
//! These tests run whole documents through the cleaning stage.

use phasemine_cleaner::{BoilerplateStripper, Cleaner, CleanerConfig};
use phasemine_domain::Document;
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

const FULL: &str = "Journal of Alloys 12 (2024)\n\
## Abstract\nWe study HEAs.\n\
## Introduction\nHEAs are interesting.\n\
## Experimental\nAlCoCrFeNi was arc melted.\n\
## Results\nThe alloy is BCC.\n";

#[test]
fn test_head_truncation_with_all_anchors() {
    let stripper = BoilerplateStripper::default();
    let out = stripper.strip(FULL);
    assert!(out.starts_with("## Experimental\n"));
    assert!(out.ends_with("The alloy is BCC."));
}

#[test]
fn test_head_truncation_without_experimental() {
    let text = FULL.replace("## Experimental\n", "");
    let out = BoilerplateStripper::default().strip(&text);
    assert!(out.starts_with("## Introduction\n"));
}

#[test]
fn test_head_truncation_with_abstract_only() {
    let text = FULL
        .replace("## Experimental\n", "")
        .replace("## Introduction\n", "");
    let out = BoilerplateStripper::default().strip(&text);
    assert!(out.starts_with("## Abstract\n"));
    assert!(out.contains("AlCoCrFeNi was arc melted."));
}

#[test]
fn test_no_anchors_keeps_everything() {
    let text = "Journal header\n## Results\nThe alloy is FCC.\n";
    let out = BoilerplateStripper::default().strip(text);
    assert_eq!(out, text.trim());
}

#[test]
fn test_end_to_end_cleaning_scenario() {
    let doc = Document::new(
        "paper",
        "## Abstract\nfoo\n## Introduction\nbar\n## Experimental\nAlloy AlCoCrFeNi shows BCC.\n## References\n[1] ...\n",
    );
    let cleaned = Cleaner::default_config().clean(&doc);
    assert_eq!(cleaned.text, "## Experimental\nAlloy AlCoCrFeNi shows BCC.");
}

#[test]
fn test_front_matter_kept_when_disabled() {
    let config = CleanerConfig {
        truncate_front_matter: false,
        ..Default::default()
    };
    let cleaner = Cleaner::new(config).unwrap();
    let out = cleaner.clean_text(FULL);
    assert!(out.starts_with("Journal of Alloys"));
}

#[test]
fn test_clean_directory_round_trip() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(input.path().join("p1.mmd"), FULL).unwrap();
    fs::write(input.path().join("p2.mmd"), "## Funding\nNSF\n## Results\nFCC\n").unwrap();
    fs::write(input.path().join("readme.md"), "ignored").unwrap();

    let cleaner = Cleaner::default_config();
    let summary = cleaner.clean_directory(input.path(), output.path()).unwrap();

    let names: Vec<&str> = summary.cleaned.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["p1.mmd", "p2.mmd"]);
    assert!(summary.skipped.is_empty());
    assert_eq!(fs::read_to_string(output.path().join("p2.mmd")).unwrap(), "## Results\nFCC");
    assert!(!output.path().join("readme.md").exists());
}

proptest! {
    /// Property: a References heading followed only by non-heading lines is removed entirely
    #[test]
    fn test_references_tail_removed(
        body in "[A-Za-z ]{1,30}",
        refs in prop::collection::vec("[A-Za-z0-9 .,\\[\\]]{0,40}", 0..20),
    ) {
        let text = format!("## Results\n{}\n## References\n{}", body, refs.join("\n"));
        let stripper = BoilerplateStripper::default();
        let out = stripper.remove_boilerplate(&text);
        prop_assert_eq!(out, format!("## Results\n{}\n", body));
    }

    /// Property: cleaning never grows a document
    #[test]
    fn test_cleaning_never_grows(text in "(## [A-Za-z]{1,12}\n|[a-z ]{0,20}\n){0,30}") {
        let cleaner = Cleaner::default_config();
        prop_assert!(cleaner.clean_text(&text).len() <= text.len());
    }
}
