// Run configuration and corpus selection.
//
// `ModelConfig` is the single knob set for the engine: which corpus to read,
// which token terminates a chorale, which bracketed markers to rewrite
// before tokenizing, and whether to report the corpus summary at info level.
// It loads from JSON the same way the rest of the workspace treats config
// (JSON string in, typed struct out), with every field defaulted so a config
// file only needs to name what it changes.
//
// `CorpusSelection` maps the two corpus choices (voicing and temporal
// encoding) onto the six corpus file names. `prompt_selection` asks for
// those choices interactively; it is generic over reader/writer so it can
// be driven from tests.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BigramError, Result};

/// Conventional start/end-of-chorale token.
pub const DEFAULT_TERMINATOR: &str = ".";

/// Canonical end-of-measure token.
pub const MEASURE_TOKEN: &str = "/";

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Corpus file: one chorale per line, space-separated tokens.
    pub corpus_path: PathBuf,
    /// Token that starts and ends every chorale. Always assigned id 0.
    pub terminator: String,
    /// Marker token -> canonical token, applied to each token before the
    /// vocabulary is built.
    pub marker_substitutions: BTreeMap<String, String>,
    /// Log the corpus summary at info level rather than debug.
    pub verbose: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            corpus_path: PathBuf::new(),
            terminator: DEFAULT_TERMINATOR.to_string(),
            marker_substitutions: BTreeMap::new(),
            verbose: true,
        }
    }
}

impl ModelConfig {
    pub fn new(corpus_path: impl Into<PathBuf>) -> Self {
        ModelConfig {
            corpus_path: corpus_path.into(),
            ..Default::default()
        }
    }

    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ModelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| BigramError::io(e, path))?;
        Self::from_json(&data)
    }

    /// Install the bracketed markers used by the marked-up corpus variants:
    /// start and end of chorale become the terminator, end of measure
    /// becomes `/`.
    pub fn with_standard_markers(mut self) -> Self {
        let terminator = self.terminator.clone();
        self.marker_substitutions
            .insert("[SOC]".to_string(), terminator.clone());
        self.marker_substitutions
            .insert("[EOC]".to_string(), terminator);
        self.marker_substitutions
            .insert("[EOM]".to_string(), MEASURE_TOKEN.to_string());
        self
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.terminator.is_empty() || self.terminator.split_whitespace().count() != 1 {
            return Err(BigramError::Config(format!(
                "terminator must be a single non-whitespace token, got {:?}",
                self.terminator
            )));
        }
        for (marker, replacement) in &self.marker_substitutions {
            if marker.split_whitespace().count() != 1 {
                return Err(BigramError::Config(format!(
                    "marker {marker:?} must be a single token"
                )));
            }
            if replacement.split_whitespace().count() != 1 {
                return Err(BigramError::Config(format!(
                    "replacement {replacement:?} for marker {marker:?} must be a single token"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Corpus selection
// ---------------------------------------------------------------------------

/// Which voices a corpus encodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Voicing {
    /// Soprano-bass reduction.
    SopranoBass,
    /// Full chords.
    FullChords,
}

/// How a corpus samples time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    /// One token per harmonic change, no end-of-measure markers.
    PerChange,
    /// One token per beat.
    PerBeat,
    /// Tokens only at the start of each beat.
    StartOfBeat,
}

/// A resolved (voicing, encoding) pair naming one corpus file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSelection {
    pub voicing: Voicing,
    pub encoding: Encoding,
}

impl CorpusSelection {
    /// File name of the selected corpus, e.g. `all-chorales-SB-per-beat.txt`.
    pub fn file_name(&self) -> String {
        let voicing = match self.voicing {
            Voicing::SopranoBass => "SB",
            Voicing::FullChords => "chords",
        };
        let encoding = match self.encoding {
            Encoding::PerChange => "noeom",
            Encoding::PerBeat => "per-beat",
            Encoding::StartOfBeat => "start-of-beat",
        };
        format!("all-chorales-{voicing}-{encoding}.txt")
    }

    /// Full path of the selected corpus inside `data_dir`.
    pub fn resolve(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }
}

impl fmt::Display for CorpusSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Ask for voicing and encoding until both answers are valid.
///
/// Voicing is answered `y` (soprano-bass) or `n` (full chords), case
/// insensitive; encoding is `1` (per change), `2` (per beat) or `3` (start
/// of beat). Invalid answers repeat the question. Running out of input
/// before both answers are given is an `InvalidSelection` error.
pub fn prompt_selection<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<CorpusSelection> {
    let voicing = loop {
        let answer = ask(input, output, "Soprano-bass (y) or full chords (n)? ")?;
        match answer.to_lowercase().as_str() {
            "y" => break Voicing::SopranoBass,
            "n" => break Voicing::FullChords,
            _ => continue,
        }
    };
    let encoding = loop {
        let answer = ask(
            input,
            output,
            "Encoding for each change (1), each beat (2), or start of beat (3)? ",
        )?;
        match answer.parse::<u8>() {
            Ok(1) => break Encoding::PerChange,
            Ok(2) => break Encoding::PerBeat,
            Ok(3) => break Encoding::StartOfBeat,
            _ => continue,
        }
    };
    Ok(CorpusSelection { voicing, encoding })
}

/// Write `question`, read one line, return it trimmed.
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    let stdio = |e: std::io::Error| BigramError::io(e, "<prompt>");
    output.write_all(question.as_bytes()).map_err(stdio)?;
    output.flush().map_err(stdio)?;
    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(stdio)?;
    if read == 0 {
        return Err(BigramError::InvalidSelection(
            "input ended before a corpus was selected".to_string(),
        ));
    }
    Ok(line.trim().to_string())
}
