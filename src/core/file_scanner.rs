use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;

const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];

/// Patterns without `*` or `?` are literal paths, so `app/[locale]` works
/// without escaping.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

fn warn(verbose: bool, message: std::fmt::Arguments<'_>) {
    if verbose {
        eprintln!("{} {}", "warning:".bold().yellow(), message);
    }
}

/// Source files found under the include roots, in path order.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: BTreeSet<String>,
    pub skipped_count: usize,
}

/// Paths excluded from scanning: literal prefixes and glob patterns.
struct IgnoreSet {
    prefixes: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    fn new(base_dir: &Path, ignores: &[String], ignore_test_files: bool, verbose: bool) -> Self {
        let mut prefixes = Vec::new();
        let mut patterns = Vec::new();

        for ignore in ignores {
            if !is_glob_pattern(ignore) {
                prefixes.push(base_dir.join(ignore));
                continue;
            }
            match Pattern::new(ignore) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => warn(verbose, format_args!("Invalid ignore pattern '{}': {}", ignore, e)),
            }
        }

        if ignore_test_files {
            patterns.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
        }

        Self { prefixes, patterns }
    }

    fn matches(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
            || self.patterns.iter().any(|p| p.matches(&path_str))
    }
}

fn include_roots(base_dir: &Path, includes: &[String], verbose: bool) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![base_dir.to_path_buf()];
    }

    let mut roots = Vec::new();
    for include in includes {
        let full = base_dir.join(include);
        if !is_glob_pattern(include) {
            if full.exists() {
                roots.push(full);
            } else {
                warn(verbose, format_args!("Include path does not exist: {}", full.display()));
            }
            continue;
        }

        match glob(&full.to_string_lossy()) {
            Ok(entries) => roots.extend(entries.flatten().filter(|entry| entry.is_dir())),
            Err(e) => warn(verbose, format_args!("Invalid glob pattern '{}': {}", include, e)),
        }
    }
    roots
}

/// Collect every JS/TS source file under `includes` (relative to
/// `base_dir`) that no ignore rule excludes. Overlapping roots are
/// deduplicated.
pub fn scan_files(
    base_dir: &str,
    includes: &[String],
    ignores: &[String],
    ignore_test_files: bool,
    verbose: bool,
) -> ScanResult {
    let base = Path::new(base_dir);
    let ignore_set = IgnoreSet::new(base, ignores, ignore_test_files, verbose);
    let mut result = ScanResult::default();

    for root in include_roots(base, includes, verbose) {
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| !ignore_set.matches(entry.path()));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    result.skipped_count += 1;
                    warn(verbose, format_args!("Cannot access path: {}", e));
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_file() && is_source_file(path) {
                result.files.insert(path.to_string_lossy().into_owned());
            }
        }
    }

    result
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}
