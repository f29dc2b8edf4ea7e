//! Log level definitions
//!
//! A [`Level`] is a named severity whose rank is its ordinal. Two levels are
//! compared by ordinal only, so a custom level set built from any list of
//! names gets a total order for free.

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Names of the process-wide default level sequence, lowest first
pub const DEFAULT_LEVEL_NAMES: [&str; 5] = ["DEBUG", "INFO", "WARN", "ERROR", "FATAL"];

#[derive(Debug, Clone)]
pub struct Level {
    name: Cow<'static, str>,
    ordinal: usize,
}

impl Level {
    pub const DEBUG: Level = Level::from_static("DEBUG", 0);
    pub const INFO: Level = Level::from_static("INFO", 1);
    pub const WARN: Level = Level::from_static("WARN", 2);
    pub const ERROR: Level = Level::from_static("ERROR", 3);
    pub const FATAL: Level = Level::from_static("FATAL", 4);

    const fn from_static(name: &'static str, ordinal: usize) -> Self {
        Self {
            name: Cow::Borrowed(name),
            ordinal,
        }
    }

    pub fn new(name: impl Into<String>, ordinal: usize) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            ordinal,
        }
    }

    /// Build an ordered level sequence; each level's ordinal is its position
    ///
    /// Duplicate names are kept as distinct levels with distinct ordinals.
    ///
    /// # Example
    ///
    /// ```
    /// use ploggy::Level;
    ///
    /// let levels = Level::build(["TRACE", "DEBUG", "NOTICE"]);
    /// assert_eq!(levels[2].ordinal(), 2);
    /// assert!(levels[0] < levels[2]);
    /// ```
    pub fn build<I, S>(names: I) -> Vec<Level>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(ordinal, name)| Level::new(name, ordinal))
            .collect()
    }

    /// Compare two levels by ordinal
    pub fn compare(a: &Level, b: &Level) -> Ordering {
        a.ordinal.cmp(&b.ordinal)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Lower-cased name, used as the lookup key and in JSON output
    pub fn lowercase_name(&self) -> String {
        self.name.to_lowercase()
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> Option<colored::Color> {
        use colored::Color::*;
        match self.name.to_uppercase().as_str() {
            "TRACE" => Some(BrightBlack),
            "DEBUG" => Some(Blue),
            "INFO" => Some(Green),
            "WARN" | "WARNING" => Some(Yellow),
            "ERROR" => Some(Red),
            "FATAL" | "CRITICAL" => Some(BrightRed),
            _ => None,
        }
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal
    }
}

impl Eq for Level {}

impl Hash for Level {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordinal.hash(state);
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        Level::compare(self, other)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// Ordered set of levels owned by one logger
///
/// Lookup by name is case-insensitive. When a name appears more than once,
/// every level is retained but lookup resolves to the last one.
#[derive(Debug, Clone)]
pub struct LevelRegistry {
    levels: Vec<Level>,
    by_name: HashMap<String, usize>,
}

impl LevelRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_levels(Level::build(names))
    }

    pub fn from_levels(levels: Vec<Level>) -> Self {
        let by_name = levels
            .iter()
            .enumerate()
            .map(|(idx, level)| (level.lowercase_name(), idx))
            .collect();
        Self { levels, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&Level> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&idx| &self.levels[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.levels.iter().map(Level::name).collect()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::from_levels(vec![
            Level::DEBUG,
            Level::INFO,
            Level::WARN,
            Level::ERROR,
            Level::FATAL,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ordering() {
        assert!(Level::DEBUG < Level::INFO);
        assert!(Level::INFO < Level::WARN);
        assert!(Level::WARN < Level::ERROR);
        assert!(Level::ERROR < Level::FATAL);
        assert_eq!(Level::compare(&Level::WARN, &Level::WARN), Ordering::Equal);
    }

    #[test]
    fn test_build_assigns_positions() {
        let levels = Level::build(DEFAULT_LEVEL_NAMES);
        assert_eq!(levels.len(), 5);
        for (idx, level) in levels.iter().enumerate() {
            assert_eq!(level.ordinal(), idx);
            assert_eq!(level.name(), DEFAULT_LEVEL_NAMES[idx]);
        }
        assert_eq!(levels[2], Level::WARN);
    }

    #[test]
    fn test_compare_ignores_name() {
        let a = Level::new("LOUD", 3);
        assert_eq!(a, Level::ERROR);
        assert!(Level::new("quiet", 1) < Level::new("AAA", 2));
    }

    #[test]
    fn test_duplicate_names_are_retained() {
        let registry = LevelRegistry::new(["INFO", "INFO"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("info").map(Level::ordinal), Some(1));
    }

    #[test]
    fn test_registry_lookup_is_case_insensitive() {
        let registry = LevelRegistry::default();
        assert_eq!(registry.get("warn"), Some(&Level::WARN));
        assert_eq!(registry.get("Fatal"), Some(&Level::FATAL));
        assert!(registry.get("trace").is_none());
        assert!(registry.contains("DEBUG"));
    }

    #[test]
    fn test_level_serializes_as_name() {
        let json = serde_json::to_string(&Level::ERROR).unwrap();
        assert_eq!(json, "\"ERROR\"");
    }
}
