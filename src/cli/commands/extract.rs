use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use super::super::{
    args::ExtractCommand,
    exit_status::ExitStatus,
    report::{self, ExtractSummary},
};
use crate::{
    core::{
        Dictionary, EntryStatus, ExtractContext, ExtractionObserver, NoopObserver,
        context::write_outputs,
    },
    json_writer::DictionaryWriter,
    utils::plural,
};

/// Prints how many entries each file produced.
struct VerboseObserver;

impl ExtractionObserver for VerboseObserver {
    fn entries_extracted(&self, file_path: &str, dictionary: &Dictionary) {
        if !dictionary.is_empty() {
            eprintln!(
                "{} {}: {}",
                "note:".bold(),
                file_path,
                plural(dictionary.len(), "string")
            );
        }
    }

    fn rewrite_occurred(&self, _file_path: &str) {}
}

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let args = &cmd.args;
    let verbose = args.common.verbose;

    let observer: Arc<dyn ExtractionObserver> = if verbose {
        Arc::new(VerboseObserver)
    } else {
        Arc::new(NoopObserver)
    };
    let ctx = ExtractContext::new(&args.common, observer)?;

    // A broken artifact must stop the run before any source file changes
    let mut writer = if args.rebuild {
        DictionaryWriter::create_empty(&ctx.output_path)
    } else {
        DictionaryWriter::open_or_create(&ctx.output_path)?
    };

    let report = ctx.run();
    report::print_entries(&report);

    // Only --apply saves; a dry run keeps the merged dictionary in memory
    let mut collisions = report.collisions.clone();
    collisions.extend(writer.merge(&report.dictionary));

    let files_rewritten = if args.apply {
        let written = write_outputs(&report)?;
        writer.save()?;
        written
    } else {
        report.rewritten().count()
    };

    report::print_collisions(&collisions);
    report::print_failures(&report.failures, verbose);

    let statuses = || {
        report
            .processed
            .iter()
            .flat_map(|file| file.outcome.entries.iter().map(|entry| entry.status))
    };
    let summary = ExtractSummary {
        applied: args.apply,
        files_scanned: ctx.files.len(),
        files_rewritten,
        new_entries: statuses().filter(|s| *s == EntryStatus::New).count(),
        updated_entries: statuses().filter(|s| *s == EntryStatus::Updated).count(),
        dictionary_size: writer.dictionary().len(),
        dictionary_path: writer.path().display().to_string(),
    };
    report::print_summary(&summary, report.failures.len());

    if report.failures.is_empty() {
        Ok(ExitStatus::Success)
    } else {
        Ok(ExitStatus::Failure)
    }
}
