use std::fmt;
use thiserror::Error;

/// Errors produced by bit string parsing, transformation and analysis.
#[derive(Debug, Error)]
pub enum BitError {
    /// The input contains a character that is not a bit
    #[error("invalid character '{ch}' at position {position} (expected '0' or '1')")]
    InvalidBit { ch: char, position: usize },

    /// The operation needs at least one bit
    #[error("cannot operate on empty input")]
    EmptyInput,

    /// Input length does not fit the codec's framing
    #[error("invalid length {actual}, expected {expected}")]
    InvalidLength { actual: usize, expected: String },

    /// A range falls outside the bit string
    #[error("range {start}..{end} is out of bounds for {len} bits")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    /// A parameter is outside its valid domain
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Encoded input violates the codec's structure
    #[error("corrupt stream at bit {position}: {reason}")]
    CorruptStream { position: usize, reason: String },

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("compression failed: {0}")]
    Compression(String),
}

impl BitError {
    pub fn invalid_length(actual: usize, expected: impl Into<String>) -> Self {
        BitError::InvalidLength {
            actual,
            expected: expected.into(),
        }
    }

    pub fn corrupt(position: usize, reason: impl Into<String>) -> Self {
        BitError::CorruptStream {
            position,
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        BitError::InvalidParameter(reason.into())
    }
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, BitError>;

/// Error when a named item (codec, metric, preset, ...) is not found
#[derive(Debug)]
pub struct NotFoundError {
    pub kind: &'static str,
    pub name: String,
    pub suggestion: Option<String>,
}

impl NotFoundError {
    pub fn new(kind: &'static str, name: impl Into<String>, suggestion: Option<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            suggestion,
        }
    }

    /// Build the error, looking up a suggestion among `available`.
    pub fn with_candidates<S: AsRef<str>>(
        kind: &'static str,
        name: &str,
        available: &[S],
    ) -> Self {
        let names: Vec<String> = available.iter().map(|s| s.as_ref().to_string()).collect();
        Self::new(kind, name, find_closest(name, &names))
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let use_color = should_use_color();

        if use_color {
            writeln!(
                f,
                "\x1b[1;31merror:\x1b[0m {} '{}' not found",
                self.kind, self.name
            )?;
        } else {
            writeln!(f, "error: {} '{}' not found", self.kind, self.name)?;
        }

        writeln!(f)?;

        if let Some(suggestion) = &self.suggestion {
            if use_color {
                writeln!(f, "\x1b[1;36mhint:\x1b[0m did you mean '{}'?", suggestion)?;
            } else {
                writeln!(f, "hint: did you mean '{}'?", suggestion)?;
            }
        }

        if use_color {
            write!(
                f,
                "      run \x1b[1m`bitlab config list`\x1b[0m to see what is available"
            )?;
        } else {
            write!(f, "      run `bitlab config list` to see what is available")?;
        }

        Ok(())
    }
}

impl std::error::Error for NotFoundError {}

/// Check if colored output should be used
fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for (i, c1) in s1.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, c2) in s2.chars().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}

/// Find the closest matching name, if any is within a small edit distance
pub fn find_closest(name: &str, available: &[String]) -> Option<String> {
    let threshold = if name.len() < 5 { 2 } else { 3 };

    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for candidate in available {
        let distance = levenshtein_distance(name, candidate);
        if distance < best_distance && distance <= threshold {
            best_distance = distance;
            best_match = Some(candidate.clone());
        }
    }

    best_match
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("nrzi", "nrzi"), 0);
        assert_eq!(levenshtein_distance("manchester", "manchster"), 1);
        assert_eq!(levenshtein_distance("", "gray"), 4);
    }

    #[test]
    fn test_find_closest() {
        let codecs = vec![
            "gray".to_string(),
            "nrzi".to_string(),
            "manchester".to_string(),
            "hamming74".to_string(),
        ];

        assert_eq!(find_closest("grey", &codecs), Some("gray".to_string()));
        assert_eq!(
            find_closest("manchestr", &codecs),
            Some("manchester".to_string())
        );
        assert_eq!(find_closest("reed-solomon", &codecs), None);
    }

    #[test]
    fn test_not_found_display_no_color() {
        // Unsafe: environment variable access (not thread-safe)
        unsafe {
            std::env::set_var("NO_COLOR", "1");
        }

        let err = NotFoundError::with_candidates("codec", "grey", &["gray", "nrzi"]);
        let display = format!("{}", err);

        assert!(display.contains("codec 'grey' not found"));
        assert!(display.contains("did you mean 'gray'?"));
        assert!(display.contains("bitlab config list"));

        unsafe {
            std::env::remove_var("NO_COLOR");
        }
    }

    #[test]
    fn test_bit_error_messages() {
        let err = BitError::InvalidBit {
            ch: 'x',
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid character 'x' at position 3 (expected '0' or '1')"
        );

        let err = BitError::invalid_length(13, "a multiple of 7");
        assert!(err.to_string().contains("a multiple of 7"));
    }
}
