//! Extract and run command implementations.

use crate::cli::{ExtractArgs, ExtractOptions, RunArgs};
use crate::commands::clean::clean_directory;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use phasemine_domain::TokenCounter;
use phasemine_extractor::{context_window, BatchSummary, ExtractorConfig, Pipeline, PipelineConfig};
use phasemine_llm::{GenerationOptions, ModelTokenizer, OllamaProvider};
use std::path::PathBuf;
use tracing::{debug, info};

/// Execute the extract command.
pub fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let pipeline = pipeline_config(&args.options, config, args.input, args.output);
    let summary = extract(&args.options, config, pipeline)?;
    println!("{}", formatter.format_batch_summary(&summary)?);
    Ok(())
}

/// Execute the run command: clean, then extract the cleaned documents.
pub fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let raw = args.input.unwrap_or_else(|| config.clean.raw_dir.clone());
    let pipeline = pipeline_config(&args.extract, config, args.cleaned, args.output);

    let cleaned = clean_directory(&args.clean, config, &raw, &pipeline.input_dir)?;
    println!("{}", formatter.format_clean_summary(&cleaned)?);

    let summary = extract(&args.extract, config, pipeline)?;
    println!("{}", formatter.format_batch_summary(&summary)?);
    Ok(())
}

fn extract(options: &ExtractOptions, config: &Config, pipeline: PipelineConfig) -> Result<BatchSummary> {
    let tokenizer_path = options.tokenizer.as_deref().or(config.llm.tokenizer.as_deref());
    let tokenizer = ModelTokenizer::load(tokenizer_path)?;
    info!("Sizing chunks with the {} tokenizer", tokenizer.describe());

    let extractor = extractor_config(options, config);
    let generation = generation_options(config, &pipeline, &extractor, &tokenizer)?;

    let endpoint = options
        .endpoint
        .clone()
        .unwrap_or_else(|| config.llm.endpoint.clone());
    let mut provider = OllamaProvider::new(endpoint, pipeline.model.clone())?
        .with_options(generation)
        .with_max_attempts(config.llm.max_attempts);
    if let Some(timeout) = config.llm.timeout() {
        provider = provider.with_timeout(timeout);
    }
    provider.ensure_model_available()?;

    let runner = Pipeline::new(provider, tokenizer, pipeline, extractor)?;
    Ok(runner.run()?)
}

/// Decoding options with a context window large enough for the chunk budget
///
/// An explicit `context_window` in the config wins.
pub(crate) fn generation_options<T: TokenCounter>(
    config: &Config,
    pipeline: &PipelineConfig,
    extractor: &ExtractorConfig,
    tokenizer: &T,
) -> Result<GenerationOptions> {
    let mut generation = config.llm.generation.clone();
    if generation.context_window.is_none() {
        let needed = context_window(
            tokenizer,
            pipeline.max_chunk_length,
            &extractor.refinement_passes,
            generation.max_new_tokens as usize,
        )?;
        let window = u32::try_from(needed).map_err(|_| {
            CliError::Config(format!("context window of {} tokens is too large", needed))
        })?;
        debug!("Requesting a context window of {} tokens", window);
        generation.context_window = Some(window);
    }
    Ok(generation)
}

/// Merge command-line overrides into the `[pipeline]` settings.
pub(crate) fn pipeline_config(
    options: &ExtractOptions,
    config: &Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> PipelineConfig {
    let mut pipeline = config.pipeline.clone();
    if let Some(input) = input {
        pipeline = pipeline.with_input_dir(input);
    }
    if let Some(output) = output {
        pipeline = pipeline.with_output_dir(output);
    }
    if let Some(model) = &options.model {
        pipeline.model = model.clone();
    }
    if let Some(max_len) = options.max_len {
        pipeline.max_chunk_length = max_len;
    }
    if let Some(quantization) = options.quantization {
        pipeline.quantization = quantization;
    }
    pipeline
}

/// Merge command-line overrides into the `[extract]` settings.
pub(crate) fn extractor_config(options: &ExtractOptions, config: &Config) -> ExtractorConfig {
    let mut extractor = config.extract.clone();
    if !options.refine.is_empty() {
        extractor.refinement_passes = options.refine.iter().copied().map(Into::into).collect();
    }
    if options.strict {
        extractor.strict_records = true;
    }
    extractor
}
