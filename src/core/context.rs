//! One extraction run over a project.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI arguments (`--source-root`, `--output`)
//! 2. `.autointlrc.json` config file
//! 3. Built-in defaults
//!
//! Every configuration problem surfaces from [`ExtractContext::new`], before
//! a single source file is read.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, Result, anyhow};
use rayon::prelude::*;
use swc_common::{GLOBALS, Globals, SourceMap};

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        dictionary::{Dictionary, KeyCollision},
        file_scanner::scan_files,
        options::ExtractionObserver,
        parsers::jsx::{parse_source, print_module},
        transform::{TransformOutcome, Transformer},
    },
};

/// A file that went through the transformer.
#[derive(Debug)]
pub struct ProcessedFile {
    pub file_path: String,
    pub outcome: TransformOutcome,
    /// Re-printed source, present only when something was rewritten.
    pub output: Option<String>,
    /// Parser errors recovered from while reading the file.
    pub warnings: Vec<String>,
}

/// A file that could not be read, parsed or transformed. It is left as is.
#[derive(Debug, Clone)]
pub struct FailedFile {
    pub file_path: String,
    pub error: String,
}

/// Everything one run produced, in file order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub processed: Vec<ProcessedFile>,
    pub failures: Vec<FailedFile>,
    /// Entries of this run only, folded across files.
    pub dictionary: Dictionary,
    pub collisions: Vec<KeyCollision>,
}

impl RunReport {
    pub fn rewritten(&self) -> impl Iterator<Item = &ProcessedFile> {
        self.processed.iter().filter(|file| file.outcome.rewritten)
    }

    pub fn entry_count(&self) -> usize {
        self.processed
            .iter()
            .map(|file| file.outcome.entries.len())
            .sum()
    }
}

pub struct ExtractContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Where the dictionary artifact lives.
    pub output_path: PathBuf,

    /// Source files to transform, sorted.
    pub files: BTreeSet<String>,

    pub verbose: bool,

    transformer: Transformer,
}

impl ExtractContext {
    /// Load configuration, build the transformer and scan source files.
    ///
    /// # Errors
    ///
    /// Returns error if the config file is invalid or an engine option is
    /// missing or malformed.
    pub fn new(common_args: &CommonArgs, observer: Arc<dyn ExtractionObserver>) -> Result<Self> {
        let verbose = common_args.verbose;

        // CLI --source-root decides where the config search starts
        let search_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let config_result = load_config(&search_dir)?;

        if verbose && !config_result.from_file {
            eprintln!(
                "Note: No {} found, using default configuration",
                CONFIG_FILE_NAME
            );
        }

        let mut config = config_result.config;
        if let Some(source_root) = &common_args.source_root {
            config.source_root = source_root.to_string_lossy().into_owned();
        }

        let output_path = common_args
            .output
            .clone()
            .unwrap_or_else(|| config.output_path());

        Self::from_config(config, output_path, verbose, observer)
    }

    /// Build a context from an already merged configuration.
    pub fn from_config(
        config: Config,
        output_path: PathBuf,
        verbose: bool,
        observer: Arc<dyn ExtractionObserver>,
    ) -> Result<Self> {
        config.validate()?;
        let options = config
            .to_options(observer)
            .context("Invalid extraction options")?;
        let transformer = Transformer::new(options).context("Invalid extraction options")?;

        let root_dir = PathBuf::from(&config.source_root);
        let base_dir = root_dir
            .to_str()
            .ok_or_else(|| anyhow!("Invalid path: {:?}", root_dir))?;

        let scan_result = scan_files(
            base_dir,
            &config.includes,
            &config.ignores,
            config.ignore_test_files,
            verbose,
        );

        if scan_result.skipped_count > 0 {
            eprintln!(
                "Warning: {} path(s) skipped due to access errors{}",
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        Ok(Self {
            config,
            output_path,
            files: scan_result.files,
            verbose,
            transformer,
        })
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// Transform every file and fold the results.
    ///
    /// Files are read, parsed, rewritten and re-printed in parallel. Each
    /// worker owns its file's tree and source map; the only shared step,
    /// folding per-file dictionaries, runs afterwards in file order.
    pub fn run(&self) -> RunReport {
        let results: Vec<_> = self
            .files
            .par_iter()
            .map(|file_path| (file_path, process_file(&self.transformer, file_path)))
            .collect();

        let mut report = RunReport::default();
        for (file_path, result) in results {
            match result {
                Ok(processed) => {
                    if self.verbose {
                        for warning in &processed.warnings {
                            eprintln!("Warning: {} - {}", file_path, warning);
                        }
                    }
                    report.collisions.extend(processed.outcome.collisions());
                    report
                        .collisions
                        .extend(report.dictionary.merge(&processed.outcome.dictionary()));
                    report.processed.push(processed);
                }
                Err(e) => {
                    if self.verbose {
                        eprintln!("Warning: {} - {:#}", file_path, e);
                    }
                    report.failures.push(FailedFile {
                        file_path: file_path.clone(),
                        error: format!("{:#}", e),
                    });
                }
            }
        }
        report
    }
}

/// Read, parse, transform and (if rewritten) re-print one file.
pub fn process_file(transformer: &Transformer, file_path: &str) -> Result<ProcessedFile> {
    let code = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read file: {}", file_path))?;

    GLOBALS.set(&Globals::new(), || {
        let source_map = Arc::new(SourceMap::default());
        let mut parsed = parse_source(code, file_path, source_map)?;
        let warnings = std::mem::take(&mut parsed.recovered);
        let outcome = transformer.transform(file_path, &mut parsed)?;
        let output = if outcome.rewritten {
            Some(print_module(&parsed)?)
        } else {
            None
        };

        Ok(ProcessedFile {
            file_path: file_path.to_string(),
            outcome,
            output,
            warnings,
        })
    })
}

/// Write each rewritten file back in place.
pub fn write_outputs(report: &RunReport) -> Result<usize> {
    let mut written = 0;
    for file in report.rewritten() {
        if let Some(output) = &file.output {
            std::fs::write(Path::new(&file.file_path), output)
                .with_context(|| format!("Failed to write file: {}", file.file_path))?;
            written += 1;
        }
    }
    Ok(written)
}
