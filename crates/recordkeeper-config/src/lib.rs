//! Configuration system for recordkeeper.
//!
//! Declares puzzle families (metrics, flags, flag penalty order and
//! leaderboard categories) and the puzzles that belong to them, in TOML or
//! YAML, so new games and categories need no code changes.
//!
//! # Examples
//!
//! Load a catalog from a TOML string:
//!
//! ```
//! use recordkeeper_config::CatalogConfig;
//!
//! let config = CatalogConfig::from_toml_str(r#"
//!     [[families]]
//!     name = "opus"
//!     metrics = ["cost", "cycles", "area"]
//!     flags = [{ name = "overlap", letter = "O" }]
//!
//!     [[families.categories]]
//!     id = "G"
//!     rank = ["cost", "cycles", "area", "flags"]
//!
//!     [[families.categories]]
//!     id = "GNO"
//!     rank = ["cost", "cycles", "area"]
//!     forbid = ["overlap"]
//!
//!     [[puzzles]]
//!     id = "p001"
//!     family = "opus"
//! "#).unwrap();
//!
//! let catalog = config.build().unwrap();
//! let puzzle = catalog.get(&"p001".into()).unwrap();
//! assert_eq!(puzzle.categories().len(), 2);
//! ```
//!
//! Use the built-in catalog when the file is missing:
//!
//! ```
//! use recordkeeper_config::CatalogConfig;
//!
//! let config = CatalogConfig::load("catalog.toml").unwrap_or_default();
//! assert_eq!(config.families[0].name, "spacechem");
//! ```

mod catalog;


use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{Catalog, PuzzleDefinition};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level catalog configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CatalogConfig {
    /// Archive behaviour settings.
    #[serde(default)]
    pub archive: ArchiveSettings,

    /// Puzzle families.
    #[serde(default)]
    pub families: Vec<FamilyConfig>,

    /// Puzzles and the family each belongs to.
    #[serde(default)]
    pub puzzles: Vec<PuzzleConfig>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            archive: ArchiveSettings::default(),
            families: vec![FamilyConfig::spacechem()],
            puzzles: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// Creates the built-in configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing YAML for `.yaml`/`.yml`
    /// extensions and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or fails to parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Adds a family.
    pub fn with_family(mut self, family: FamilyConfig) -> Self {
        self.families.push(family);
        self
    }

    /// Adds a puzzle using every category of its family.
    pub fn with_puzzle(mut self, id: impl Into<String>, family: impl Into<String>) -> Self {
        self.puzzles.push(PuzzleConfig {
            id: id.into(),
            family: family.into(),
            categories: None,
        });
        self
    }

    /// Enables or disables the full frontier check after every mutation.
    pub fn with_verify_frontier(mut self, verify: bool) -> Self {
        self.archive.verify_frontier = verify;
        self
    }

    /// Validates the configuration and resolves it into a [`Catalog`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unknown families or categories,
    /// duplicate ids, and any schema or category misconfiguration.
    pub fn build(&self) -> Result<Catalog, ConfigError> {
        Catalog::from_config(self)
    }
}

/// Archive behaviour settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ArchiveSettings {
    /// Re-check the whole frontier for dominated pairs after every
    /// mutation, in release builds too.
    #[serde(default)]
    pub verify_frontier: bool,

    /// Repair frontiers loaded from storage by replaying them, dropping
    /// dominated records.
    #[serde(default = "default_true")]
    pub repair_on_load: bool,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        ArchiveSettings {
            verify_frontier: false,
            repair_on_load: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A puzzle family: the score shape and categories shared by its puzzles.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FamilyConfig {
    /// Unique family name.
    pub name: String,

    /// Metric names, in comparison order.
    pub metrics: Vec<String>,

    /// Penalty flags, most severe first.
    #[serde(default)]
    pub flags: Vec<FlagConfig>,

    /// Explicit flag penalty order, best to worst, as flag letter strings
    /// (`""` for no flags). Derived from flag order when absent.
    #[serde(default)]
    pub penalty_order: Option<Vec<String>>,

    /// Leaderboard categories, in display order.
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

impl FamilyConfig {
    /// The built-in SpaceChem-style family: cycles, reactors and symbols,
    /// bugged and precognitive flags, and nine categories.
    pub fn spacechem() -> Self {
        let rank = |order: [&str; 3]| {
            order
                .iter()
                .map(|m| m.to_string())
                .chain(std::iter::once("flags".to_string()))
                .collect::<Vec<_>>()
        };
        let primaries = [
            ("C", "Cycles", ["cycles", "reactors", "symbols"]),
            ("R", "Reactors", ["reactors", "cycles", "symbols"]),
            ("S", "Symbols", ["symbols", "reactors", "cycles"]),
        ];
        // Precognition ranks ahead of bugs, so a category may exclude bugs
        // but never precognition alone.
        let restrictions: [(&str, &str, &[&str]); 3] = [
            ("", "", &[]),
            ("NB", " (no bugs)", &["bugged"]),
            ("NBP", " (no bugs, no precognition)", &["bugged", "precognitive"]),
        ];

        let mut categories = Vec::new();
        for (prefix, name, order) in primaries {
            for (suffix, qualifier, forbid) in restrictions {
                categories.push(CategoryConfig {
                    id: format!("{}{}", prefix, suffix),
                    display_name: Some(format!("{}{}", name, qualifier)),
                    rank: rank(order),
                    forbid: forbid.iter().map(|f| f.to_string()).collect(),
                    limits: BTreeMap::new(),
                });
            }
        }

        FamilyConfig {
            name: "spacechem".to_string(),
            metrics: vec![
                "cycles".to_string(),
                "reactors".to_string(),
                "symbols".to_string(),
            ],
            flags: vec![
                FlagConfig {
                    name: "bugged".to_string(),
                    letter: 'B',
                },
                FlagConfig {
                    name: "precognitive".to_string(),
                    letter: 'P',
                },
            ],
            penalty_order: None,
            categories,
        }
    }
}

/// A penalty flag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FlagConfig {
    /// Flag name, e.g. `bugged`.
    pub name: String,

    /// Display letter, e.g. `B`.
    pub letter: char,
}

/// A leaderboard category.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryConfig {
    /// Short id, e.g. `CNB`.
    pub id: String,

    /// Human readable name; defaults to the id.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Ranking chain: metric names and the keyword `flags`.
    pub rank: Vec<String>,

    /// Flags (names or letters) that make a score ineligible.
    #[serde(default)]
    pub forbid: Vec<String>,

    /// Per-metric upper bounds for eligibility.
    #[serde(default)]
    pub limits: BTreeMap<String, u64>,
}

/// A puzzle entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PuzzleConfig {
    /// Unique puzzle id.
    pub id: String,

    /// Family name.
    pub family: String,

    /// Subset of the family's category ids; all when absent.
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}
