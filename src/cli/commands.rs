//! Command implementations for the Lexitree CLI.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, bail};
use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::SpellConfig;
use crate::spelling::{FileDictionary, SpellChecker};
use crate::storage::{LoadReport, LoadSource};

/// Execute a CLI command.
pub fn execute_command(args: LexitreeArgs) -> anyhow::Result<()> {
    match &args.command {
        Command::Build(build_args) => build_index(build_args, &args),
        Command::Suggest(suggest_args) => suggest_words(suggest_args, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
        Command::Repl(repl_args) => run_repl(repl_args, &args),
    }
}

/// Merge the configuration file, then command line overrides.
pub fn resolve_config(
    cli_args: &LexitreeArgs,
    index: &IndexArgs,
    tolerance: Option<usize>,
) -> anyhow::Result<SpellConfig> {
    let mut config = match &cli_args.config {
        Some(path) => SpellConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => SpellConfig::default(),
    };

    if let Some(dictionary) = &index.dictionary {
        config.dictionary_path = dictionary.clone();
    }
    if let Some(snapshot) = &index.snapshot {
        config.snapshot_path = snapshot.clone();
    }
    if let Some(tolerance) = tolerance {
        config.tolerance = tolerance;
    }

    config.validate()?;
    Ok(config)
}

fn load_checker(config: SpellConfig) -> (SpellChecker, LoadReport) {
    let dictionary = FileDictionary::new(&config.dictionary_path);
    let mut checker = SpellChecker::new(config);
    let report = checker.load(&dictionary);
    (checker, report)
}

fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().map(|metadata| metadata.len())
}

fn describe_source(report: &LoadReport) -> String {
    match &report.source {
        LoadSource::Snapshot => "snapshot".to_string(),
        LoadSource::Rebuilt(reason) => format!("dictionary ({reason})"),
    }
}

/// Rebuild the index from the dictionary and persist it.
fn build_index(args: &BuildArgs, cli_args: &LexitreeArgs) -> anyhow::Result<()> {
    let config = resolve_config(cli_args, &args.index, None)?;
    let dictionary = FileDictionary::new(&config.dictionary_path);
    let mut checker = SpellChecker::new(config.clone());

    let start = Instant::now();
    let report = checker.rebuild(&dictionary);
    let duration = start.elapsed();

    if let Some(error) = report.dictionary_error {
        bail!("Dictionary could not be read: {error}");
    }
    if !report.persisted {
        bail!(
            "Snapshot could not be written to {}",
            config.snapshot_path.display()
        );
    }

    output_result(
        "Index built successfully",
        &BuildResult {
            dictionary_path: config.dictionary_path.display().to_string(),
            snapshot_path: config.snapshot_path.display().to_string(),
            total_words: report.word_count,
            snapshot_bytes: file_size(&config.snapshot_path).unwrap_or(0),
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Look up suggestions for the given words.
fn suggest_words(args: &SuggestArgs, cli_args: &LexitreeArgs) -> anyhow::Result<()> {
    let config = resolve_config(cli_args, &args.index, args.tolerance)?;
    let (checker, _) = load_checker(config);

    let start = Instant::now();
    let results = args
        .words
        .iter()
        .map(|word| lookup(&checker, word))
        .collect();
    let duration = start.elapsed();

    output_result(
        "Suggestions",
        &SuggestResults {
            results,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

fn lookup(checker: &SpellChecker, word: &str) -> WordSuggestions {
    let suggestions = checker.suggest_word(word);
    WordSuggestions {
        word: word.to_string(),
        matched: !checker.is_sentinel(&suggestions),
        suggestions,
    }
}

/// Load the index and report where it came from.
fn show_stats(args: &StatsArgs, cli_args: &LexitreeArgs) -> anyhow::Result<()> {
    let config = resolve_config(cli_args, &args.index, None)?;
    let snapshot_path = config.snapshot_path.clone();
    let (checker, report) = load_checker(config);

    output_result(
        "Index statistics",
        &IndexStats {
            total_words: checker.total_words(),
            source: describe_source(&report),
            snapshot_path: snapshot_path.display().to_string(),
            snapshot_bytes: file_size(&snapshot_path),
            snapshot_persisted: report.persisted,
            dictionary_error: report.dictionary_error,
        },
        cli_args,
    )
}

/// Answer one query per stdin line until EOF.
fn run_repl(args: &ReplArgs, cli_args: &LexitreeArgs) -> anyhow::Result<()> {
    let config = resolve_config(cli_args, &args.index, args.tolerance)?;
    let (checker, report) = load_checker(config);
    info!(
        "Ready with {} words from {}",
        report.word_count,
        describe_source(&report)
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let word = line.trim();
        if word.is_empty() {
            continue;
        }

        let result = lookup(&checker, word);
        match cli_args.output_format {
            OutputFormat::Human => result.write_human(&mut out)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut out, &result)?;
                writeln!(out)?;
            }
        }
        out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsStr;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_config_overrides() {
        let args = LexitreeArgs::parse_from(["lexitree", "suggest", "-s", "cache.bktree", "cet"]);
        let Command::Suggest(suggest) = &args.command else {
            panic!("Expected suggest command");
        };

        let config = resolve_config(&args, &suggest.index, Some(3)).unwrap();
        assert_eq!(config.snapshot_path, PathBuf::from("cache.bktree"));
        assert_eq!(config.dictionary_path, PathBuf::from("words.txt"));
        assert_eq!(config.tolerance, 3);
    }

    #[test]
    fn test_resolve_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("lexitree.json");
        fs::write(&config_path, r#"{"dictionary_path": "dict.txt", "tolerance": 2}"#).unwrap();

        let args = LexitreeArgs::parse_from([
            OsStr::new("lexitree"),
            OsStr::new("--config"),
            config_path.as_os_str(),
            OsStr::new("stats"),
        ]);
        let config = resolve_config(&args, &IndexArgs::default(), None).unwrap();
        assert_eq!(config.dictionary_path, PathBuf::from("dict.txt"));
        assert_eq!(config.tolerance, 2);
    }

    #[test]
    fn test_build_then_suggest() {
        let temp_dir = TempDir::new().unwrap();
        let dictionary = temp_dir.path().join("words.txt");
        let snapshot = temp_dir.path().join("words.bktree");
        fs::write(&dictionary, "cat\ncats\nbat\nbar\n").unwrap();

        let args = LexitreeArgs::parse_from([
            OsStr::new("lexitree"),
            OsStr::new("-q"),
            OsStr::new("build"),
            OsStr::new("-d"),
            dictionary.as_os_str(),
            OsStr::new("-s"),
            snapshot.as_os_str(),
        ]);
        execute_command(args).unwrap();
        assert!(snapshot.exists());

        let config = SpellConfig {
            dictionary_path: temp_dir.path().join("missing.txt"),
            snapshot_path: snapshot,
            ..Default::default()
        };
        let (checker, report) = load_checker(config);
        assert!(report.from_snapshot());

        let result = lookup(&checker, "cet");
        assert!(result.matched);
        assert_eq!(result.suggestions, vec!["cat".to_string()]);

        let miss = lookup(&checker, "zzzzzz");
        assert!(!miss.matched);
    }

    #[test]
    fn test_build_fails_without_dictionary() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.txt");
        let snapshot = temp_dir.path().join("words.bktree");

        let args = LexitreeArgs::parse_from([
            OsStr::new("lexitree"),
            OsStr::new("build"),
            OsStr::new("-d"),
            missing.as_os_str(),
            OsStr::new("-s"),
            snapshot.as_os_str(),
        ]);
        assert!(execute_command(args).is_err());
        assert!(!snapshot.exists());
    }
}
