//! Parameter sets and the generator config file format.
//!
//! A [`ParameterSet`] is an insertion-ordered mapping of generator keys to
//! string values. It renders to the line-oriented format read by the
//! generator tool:
//!
//! ```text
//! SET COMPRESSION=jpegenc\r\n
//! SET CONTAINER=avimux\r\n
//! ```
//!
//! Values are written verbatim. A value containing `\r\n` produces a file the
//! generator reads differently; callers are responsible for not doing that.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// Directive prefix for every config line.
pub const DIRECTIVE: &str = "SET ";

/// Line terminator used by the generator config format.
pub const LINE_ENDING: &str = "\r\n";

/// Well-known generator keys.
///
/// The generator accepts an open vocabulary; these are the keys the built-in
/// scenarios and the runner defaults use.
pub mod keys {
    pub const COMPRESSION: &str = "COMPRESSION";
    pub const CONTAINER: &str = "CONTAINER";
    pub const AUDIOCOMPRESSION: &str = "AUDIOCOMPRESSION";
    pub const NUM_BUFFERS: &str = "NUM_BUFFERS";
    pub const LIPSYNC: &str = "LIPSYNC";
    pub const CALIBRATION: &str = "CALIBRATION";
    pub const OUTPUT: &str = "OUTPUT";
    pub const INPUT: &str = "INPUT";
    pub const LAYOUT: &str = "LAYOUT";
    pub const PREPROCESS: &str = "PREPROCESS";
}

/// Ordered generator parameters for one test run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a value. An existing key keeps its position and gets the new value.
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Inserts a value only if the key is absent. Returns true if inserted.
    pub fn insert_default(&mut self, key: &str, value: impl Into<String>) -> bool {
        if self.contains_key(key) {
            return false;
        }
        self.entries.push((key.to_string(), value.into()));
        true
    }

    /// Looks up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the set into the generator config format.
    ///
    /// One `SET <KEY>=<VALUE>` line per entry, CRLF-terminated, in insertion
    /// order. No escaping is performed.
    pub fn to_config_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(DIRECTIVE);
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push_str(LINE_ENDING);
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

/// Parses a generator config file back into a parameter set.
///
/// Accepts CRLF or bare LF line endings and skips blank lines. The key ends
/// at the first `=`, so values may themselves contain `=`.
pub fn parse_config(text: &str) -> SpecResult<ParameterSet> {
    let mut set = ParameterSet::new();
    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            continue;
        }

        let body = line
            .strip_prefix(DIRECTIVE)
            .ok_or_else(|| SpecError::malformed_line(index + 1, line))?;
        let (key, value) = body
            .split_once('=')
            .ok_or_else(|| SpecError::malformed_line(index + 1, line))?;
        if key.is_empty() {
            return Err(SpecError::malformed_line(index + 1, line));
        }

        set.insert(key, value);
    }
    Ok(set)
}
