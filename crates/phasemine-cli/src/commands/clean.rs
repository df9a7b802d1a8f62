//! Clean command implementation.

use crate::cli::{CleanArgs, CleanOptions};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use phasemine_cleaner::{CleanSummary, Cleaner, CleanerConfig};
use std::path::Path;

/// Execute the clean command.
pub fn execute_clean(args: CleanArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.clean.raw_dir.clone());
    let output = args
        .output
        .unwrap_or_else(|| config.pipeline.input_dir.clone());

    let summary = clean_directory(&args.options, config, &input, &output)?;
    println!("{}", formatter.format_clean_summary(&summary)?);
    Ok(())
}

/// Clean `input` into `output` with file settings overridden by `options`.
pub(crate) fn clean_directory(
    options: &CleanOptions,
    config: &Config,
    input: &Path,
    output: &Path,
) -> Result<CleanSummary> {
    let cleaner = Cleaner::new(cleaner_config(options, config))?;
    Ok(cleaner.clean_directory(input, output)?)
}

/// Merge command-line overrides into the `[clean]` settings.
pub(crate) fn cleaner_config(options: &CleanOptions, config: &Config) -> CleanerConfig {
    let mut cleaner = config.clean.cleaner.clone();
    if let Some(threshold) = options.threshold {
        cleaner.repetition_threshold = threshold;
    }
    if options.keep_front_matter {
        cleaner.truncate_front_matter = false;
    }
    cleaner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_applied() {
        let options = CleanOptions {
            threshold: Some(6),
            keep_front_matter: true,
        };
        let merged = cleaner_config(&options, &Config::default());
        assert_eq!(merged.repetition_threshold, 6);
        assert!(!merged.truncate_front_matter);
    }

    #[test]
    fn test_no_overrides_keeps_file_values() {
        let mut config = Config::default();
        config.clean.cleaner.repetition_threshold = 4;
        let merged = cleaner_config(&CleanOptions::default(), &config);
        assert_eq!(merged, config.clean.cleaner);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let dir = TempDir::new().unwrap();
        let options = CleanOptions {
            threshold: Some(1),
            keep_front_matter: false,
        };
        let result = clean_directory(&options, &Config::default(), dir.path(), dir.path());
        assert!(matches!(result, Err(CliError::Cleaner(_))));
    }

    #[test]
    fn test_clean_directory() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a.mmd"), "## Results\nok\n## Funding\nx\n").unwrap();

        let summary =
            clean_directory(&CleanOptions::default(), &Config::default(), input.path(), output.path())
                .unwrap();
        assert_eq!(summary.cleaned.len(), 1);
        assert_eq!(fs::read_to_string(output.path().join("a.mmd")).unwrap(), "## Results\nok");
    }
}
