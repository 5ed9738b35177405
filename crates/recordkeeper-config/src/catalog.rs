//! Resolved, validated puzzle catalog.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use recordkeeper_core::category::{Category, Eligibility, RankKey};
use recordkeeper_core::error::SchemaError;
use recordkeeper_core::record::PuzzleId;
use recordkeeper_core::score::{FlagDef, FlagPenaltyOrder, FlagSet, ScoreSchema, MAX_FLAGS};

use crate::{ArchiveSettings, CatalogConfig, CategoryConfig, ConfigError, FamilyConfig};

/// A puzzle with its resolved schema and applicable categories.
#[derive(Debug, Clone)]
pub struct PuzzleDefinition {
    id: PuzzleId,
    family: String,
    schema: Arc<ScoreSchema>,
    categories: Arc<[Category]>,
}

impl PuzzleDefinition {
    /// Creates a definition directly, validating every category.
    pub fn new(
        id: impl Into<PuzzleId>,
        schema: Arc<ScoreSchema>,
        categories: Vec<Category>,
    ) -> Result<Self, ConfigError> {
        for category in &categories {
            category
                .validate(&schema)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(PuzzleDefinition {
            id: id.into(),
            family: schema.name().to_string(),
            schema,
            categories: categories.into(),
        })
    }

    pub fn id(&self) -> &PuzzleId {
        &self.id
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn schema(&self) -> &Arc<ScoreSchema> {
        &self.schema
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> &Arc<[Category]> {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id().eq_ignore_ascii_case(id))
    }
}

/// Every configured puzzle, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    settings: ArchiveSettings,
    puzzles: BTreeMap<PuzzleId, PuzzleDefinition>,
}

impl Catalog {
    pub(crate) fn from_config(config: &CatalogConfig) -> Result<Self, ConfigError> {
        let mut families: HashMap<&str, (Arc<ScoreSchema>, Vec<Category>)> = HashMap::new();
        for family in &config.families {
            if families.contains_key(family.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate family '{}'",
                    family.name
                )));
            }
            let resolved = resolve_family(family)?;
            families.insert(family.name.as_str(), resolved);
        }

        let mut puzzles = BTreeMap::new();
        for puzzle in &config.puzzles {
            let (schema, categories) = families.get(puzzle.family.as_str()).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "puzzle '{}' references unknown family '{}'",
                    puzzle.id, puzzle.family
                ))
            })?;

            let selected = match &puzzle.categories {
                None => categories.clone(),
                Some(ids) => select_categories(&puzzle.id, categories, ids)?,
            };

            let definition = PuzzleDefinition {
                id: PuzzleId::new(puzzle.id.clone()),
                family: puzzle.family.clone(),
                schema: Arc::clone(schema),
                categories: selected.into(),
            };
            if definition.id.as_str().trim().is_empty() {
                return Err(ConfigError::Invalid("puzzle id must not be empty".into()));
            }
            if puzzles.insert(definition.id.clone(), definition).is_some() {
                return Err(ConfigError::Invalid(format!(
                    "duplicate puzzle '{}'",
                    puzzle.id
                )));
            }
        }

        Ok(Catalog {
            settings: config.archive.clone(),
            puzzles,
        })
    }

    /// Creates a catalog from already-built definitions.
    pub fn from_definitions(
        settings: ArchiveSettings,
        definitions: impl IntoIterator<Item = PuzzleDefinition>,
    ) -> Result<Self, ConfigError> {
        let mut puzzles = BTreeMap::new();
        for definition in definitions {
            let id = definition.id.clone();
            if puzzles.insert(id.clone(), definition).is_some() {
                return Err(ConfigError::Invalid(format!("duplicate puzzle '{}'", id)));
            }
        }
        Ok(Catalog { settings, puzzles })
    }

    pub fn settings(&self) -> &ArchiveSettings {
        &self.settings
    }

    pub fn get(&self, id: &PuzzleId) -> Option<&PuzzleDefinition> {
        self.puzzles.get(id)
    }

    /// Puzzles ordered by id.
    pub fn puzzles(&self) -> impl Iterator<Item = &PuzzleDefinition> {
        self.puzzles.values()
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}

fn resolve_family(family: &FamilyConfig) -> Result<(Arc<ScoreSchema>, Vec<Category>), ConfigError> {
    let flags: Vec<FlagDef> = family
        .flags
        .iter()
        .map(|f| FlagDef::new(f.name.clone(), f.letter))
        .collect();
    if flags.len() > MAX_FLAGS {
        return Err(invalid(family, SchemaError::TooManyFlags(flags.len())));
    }

    let schema = match &family.penalty_order {
        None => ScoreSchema::new(family.name.clone(), family.metrics.clone(), flags),
        Some(order) => {
            let combinations = order
                .iter()
                .map(|letters| parse_letters(&flags, letters))
                .collect::<Result<Vec<FlagSet>, String>>()
                .map_err(|e| invalid(family, e))?;
            FlagPenaltyOrder::from_best_to_worst(flags.len(), &combinations).and_then(|penalty| {
                ScoreSchema::with_penalty(family.name.clone(), family.metrics.clone(), flags, penalty)
            })
        }
    }
    .map_err(|e| invalid(family, e))?;

    let mut categories: Vec<Category> = Vec::with_capacity(family.categories.len());
    for config in &family.categories {
        if categories.iter().any(|c| c.id().eq_ignore_ascii_case(&config.id)) {
            return Err(invalid(family, format!("duplicate category '{}'", config.id)));
        }
        let category = resolve_category(&schema, config).map_err(|e| invalid(family, e))?;
        category.validate(&schema).map_err(|e| invalid(family, e))?;
        categories.push(category);
    }

    Ok((Arc::new(schema), categories))
}

fn invalid(family: &FamilyConfig, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid(format!("family '{}': {}", family.name, err))
}

fn resolve_category(schema: &ScoreSchema, config: &CategoryConfig) -> Result<Category, String> {
    let ranking = config
        .rank
        .iter()
        .map(|key| {
            if key.eq_ignore_ascii_case("flags") {
                Ok(RankKey::Flags)
            } else {
                schema
                    .metric_index(key)
                    .map(RankKey::Metric)
                    .ok_or_else(|| format!("category '{}': unknown metric '{}'", config.id, key))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut eligibility = Eligibility::any().forbid(flag_set(schema, config, &config.forbid)?);
    for (metric, max) in &config.limits {
        let index = schema
            .metric_index(metric)
            .ok_or_else(|| format!("category '{}': unknown metric '{}'", config.id, metric))?;
        eligibility = eligibility.limit(index, *max);
    }

    let display_name = config.display_name.clone().unwrap_or_else(|| config.id.clone());
    Ok(Category::new(config.id.clone(), ranking)
        .with_display_name(display_name)
        .with_eligibility(eligibility))
}

fn flag_set(
    schema: &ScoreSchema,
    config: &CategoryConfig,
    keys: &[String],
) -> Result<FlagSet, String> {
    keys.iter().try_fold(FlagSet::EMPTY, |set, key| {
        schema
            .flag_index(key)
            .map(|i| set.with(i))
            .ok_or_else(|| format!("category '{}': unknown flag '{}'", config.id, key))
    })
}

fn parse_letters(flags: &[FlagDef], letters: &str) -> Result<FlagSet, String> {
    letters.chars().try_fold(FlagSet::EMPTY, |set, c| {
        flags
            .iter()
            .position(|f| f.letter.eq_ignore_ascii_case(&c))
            .map(|i| set.with(i))
            .ok_or_else(|| format!("penalty order uses unknown flag letter '{}'", c))
    })
}

fn select_categories(
    puzzle: &str,
    family: &[Category],
    ids: &[String],
) -> Result<Vec<Category>, ConfigError> {
    for id in ids {
        if !family.iter().any(|c| c.id().eq_ignore_ascii_case(id)) {
            return Err(ConfigError::Invalid(format!(
                "puzzle '{}' references unknown category '{}'",
                puzzle, id
            )));
        }
    }
    Ok(family
        .iter()
        .filter(|c| ids.iter().any(|id| c.id().eq_ignore_ascii_case(id)))
        .cloned()
        .collect())
}
