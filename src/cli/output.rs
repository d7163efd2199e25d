//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::cli::args::{LexitreeArgs, OutputFormat};

/// Result types that can print themselves for humans.
pub trait HumanOutput {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()>;
}

/// Result structure for index builds.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildResult {
    pub dictionary_path: String,
    pub snapshot_path: String,
    pub total_words: usize,
    pub snapshot_bytes: u64,
    pub duration_ms: u64,
}

/// Suggestions for a single word.
#[derive(Debug, Serialize, Deserialize)]
pub struct WordSuggestions {
    pub word: String,
    pub suggestions: Vec<String>,
    /// False when `suggestions` holds only a sentinel.
    pub matched: bool,
}

/// Result structure for suggestion lookups.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResults {
    pub results: Vec<WordSuggestions>,
    pub duration_ms: u64,
}

/// Index statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_words: usize,
    pub source: String,
    pub snapshot_path: String,
    pub snapshot_bytes: Option<u64>,
    pub snapshot_persisted: bool,
    pub dictionary_error: Option<String>,
}

impl HumanOutput for BuildResult {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Dictionary: {}", self.dictionary_path)?;
        writeln!(out, "Snapshot:   {} ({} bytes)", self.snapshot_path, self.snapshot_bytes)?;
        writeln!(out, "Words:      {}", self.total_words)?;
        writeln!(out, "Took:       {} ms", self.duration_ms)
    }
}

impl HumanOutput for WordSuggestions {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}: {}", self.word, self.suggestions.join(", "))
    }
}

impl HumanOutput for SuggestResults {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for result in &self.results {
            result.write_human(out)?;
        }
        Ok(())
    }
}

impl HumanOutput for IndexStats {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Total words: {}", self.total_words)?;
        writeln!(out, "Loaded from: {}", self.source)?;
        match self.snapshot_bytes {
            Some(bytes) => writeln!(out, "Snapshot:    {} ({bytes} bytes)", self.snapshot_path)?,
            None => writeln!(out, "Snapshot:    {} (missing)", self.snapshot_path)?,
        }
        if self.snapshot_persisted {
            writeln!(out, "Snapshot was rewritten during this load")?;
        }
        if let Some(error) = &self.dictionary_error {
            writeln!(out, "Dictionary error: {error}")?;
        }
        Ok(())
    }
}

/// Print a command result in the selected format.
pub fn output_result<T>(message: &str, result: &T, args: &LexitreeArgs) -> anyhow::Result<()>
where
    T: Serialize + HumanOutput,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, message, result, args)?;
    out.flush()?;
    Ok(())
}

/// Write a command result in the selected format.
pub fn write_result<T, W>(
    out: &mut W,
    message: &str,
    result: &T,
    args: &LexitreeArgs,
) -> anyhow::Result<()>
where
    T: Serialize + HumanOutput,
    W: Write,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                writeln!(out, "{message}")?;
                writeln!(out)?;
            }
            result.write_human(out)?;
        }
        OutputFormat::Json => {
            if args.pretty {
                serde_json::to_writer_pretty(&mut *out, result)?;
            } else {
                serde_json::to_writer(&mut *out, result)?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn suggestions() -> SuggestResults {
        SuggestResults {
            results: vec![WordSuggestions {
                word: "cet".to_string(),
                suggestions: vec!["cat".to_string(), "cot".to_string()],
                matched: true,
            }],
            duration_ms: 0,
        }
    }

    fn render(argv: &[&str]) -> String {
        let args = LexitreeArgs::parse_from(argv);
        let mut buffer = Vec::new();
        write_result(&mut buffer, "Suggestions", &suggestions(), &args).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_human_output() {
        let text = render(&["lexitree", "suggest", "cet"]);
        assert_eq!(text, "cet: cat, cot\n");
    }

    #[test]
    fn test_verbose_human_output_has_message() {
        let text = render(&["lexitree", "-vv", "suggest", "cet"]);
        assert!(text.starts_with("Suggestions\n\n"));
    }

    #[test]
    fn test_json_output() {
        let text = render(&["lexitree", "-f", "json", "suggest", "cet"]);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["results"][0]["suggestions"][0], "cat");
        assert_eq!(value["results"][0]["matched"], true);
    }

    #[test]
    fn test_stats_human_output() {
        let stats = IndexStats {
            total_words: 3,
            source: "snapshot".to_string(),
            snapshot_path: "words.bktree".to_string(),
            snapshot_bytes: None,
            snapshot_persisted: false,
            dictionary_error: None,
        };
        let mut buffer = Vec::new();
        stats.write_human(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Total words: 3"));
        assert!(text.contains("(missing)"));
    }
}
