//! Leaderboard categories
//!
//! A category is declarative data: an eligibility rule over a score's flags
//! and metrics, and a ranking rule listing which score components to compare
//! in which order. Categories never hold state; the holder of a category is
//! recomputed from the archive whenever it is asked for.

use std::cmp::Ordering;
use std::fmt;

use crate::error::CategoryError;
use crate::score::{FlagSet, Score, ScoreSchema};

/// One step of a category's ranking chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankKey {
    /// Compare the metric at this index, lower first.
    Metric(usize),
    /// Compare flag combinations by the schema's penalty order.
    Flags,
}

impl fmt::Display for RankKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankKey::Metric(index) => write!(f, "metric #{}", index),
            RankKey::Flags => f.write_str("flags"),
        }
    }
}

/// Which scores may compete in a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Eligibility {
    forbidden_flags: FlagSet,
    metric_limits: Vec<(usize, u64)>,
}

impl Eligibility {
    /// Admits every score.
    pub fn any() -> Self {
        Self::default()
    }

    /// Rejects scores carrying any of `flags`.
    pub fn forbid(mut self, flags: FlagSet) -> Self {
        self.forbidden_flags = self.forbidden_flags.union(flags);
        self
    }

    /// Rejects scores whose metric `index` exceeds `max`.
    pub fn limit(mut self, index: usize, max: u64) -> Self {
        self.metric_limits.push((index, max));
        self
    }

    pub fn forbidden_flags(&self) -> FlagSet {
        self.forbidden_flags
    }

    pub fn metric_limits(&self) -> &[(usize, u64)] {
        &self.metric_limits
    }

    pub fn allows(&self, score: &Score) -> bool {
        let flags = score.flags();
        !flags.intersects(self.forbidden_flags)
            && self
                .metric_limits
                .iter()
                .all(|&(index, max)| index < score.arity() && score.metric(index) <= max)
    }
}

/// A named leaderboard view over a puzzle's archive.
///
/// # Examples
///
/// ```
/// use recordkeeper_core::category::{Category, Eligibility, RankKey};
/// use recordkeeper_core::score::{FlagDef, FlagSet, ScoreSchema};
/// use std::cmp::Ordering;
///
/// let schema = ScoreSchema::new(
///     "spacechem",
///     ["cycles", "reactors", "symbols"],
///     vec![FlagDef::new("bugged", 'B'), FlagDef::new("precognitive", 'P')],
/// ).unwrap();
///
/// // Cycles, no bugs allowed
/// let cnb = Category::new(
///     "CNB",
///     vec![RankKey::Metric(0), RankKey::Metric(1), RankKey::Metric(2), RankKey::Flags],
/// )
/// .with_eligibility(Eligibility::any().forbid(FlagSet::of(&[0])));
/// cnb.validate(&schema).unwrap();
///
/// let fast_bugged = schema.parse_score("10/5/5/B").unwrap();
/// let slow_clean = schema.parse_score("20/1/1").unwrap();
/// let slow_precog = schema.parse_score("20/1/1/P").unwrap();
///
/// assert!(!cnb.is_eligible(&fast_bugged));
/// assert!(cnb.is_eligible(&slow_precog));
/// assert_eq!(cnb.rank(&schema, &slow_clean, &slow_precog), Ordering::Less);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    id: String,
    display_name: String,
    eligibility: Eligibility,
    ranking: Vec<RankKey>,
}

impl Category {
    /// Creates a category admitting every score, displayed under its id.
    pub fn new(id: impl Into<String>, ranking: Vec<RankKey>) -> Self {
        let id = id.into();
        Category {
            display_name: id.clone(),
            id,
            eligibility: Eligibility::any(),
            ranking,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_eligibility(mut self, eligibility: Eligibility) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// Short identifier, e.g. `CNB`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn eligibility(&self) -> &Eligibility {
        &self.eligibility
    }

    pub fn ranking(&self) -> &[RankKey] {
        &self.ranking
    }

    #[inline]
    pub fn is_eligible(&self, score: &Score) -> bool {
        self.eligibility.allows(score)
    }

    /// Compares two eligible scores; `Less` means `a` ranks higher.
    pub fn rank(&self, schema: &ScoreSchema, a: &Score, b: &Score) -> Ordering {
        for key in &self.ranking {
            let ordering = match *key {
                RankKey::Metric(index) => a.metric(index).cmp(&b.metric(index)),
                RankKey::Flags => schema.compare_flags(a, b),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Picks the best eligible item.
    ///
    /// Items that rank equal resolve to the one yielded first, so callers
    /// iterating in insertion order get first-inserted-wins tie breaking.
    pub fn best<'a, T, F>(
        &self,
        schema: &ScoreSchema,
        items: impl IntoIterator<Item = &'a T>,
        score_of: F,
    ) -> Option<&'a T>
    where
        T: 'a,
        F: Fn(&T) -> &Score,
    {
        items
            .into_iter()
            .filter(|item| self.is_eligible(score_of(*item)))
            .min_by(|a, b| self.rank(schema, score_of(*a), score_of(*b)))
    }

    /// Checks this category against the schema it will rank.
    ///
    /// Rejects rank keys or limits naming missing metrics, undeclared flags,
    /// duplicate rank keys, and ranking chains that leave distinct eligible
    /// scores tied.
    ///
    /// The accepted flag combinations must also form a prefix of the
    /// schema's penalty order. Otherwise an accepted record could be evicted
    /// by a dominating record the category rejects, leaving the category
    /// without its best eligible holder.
    pub fn validate(&self, schema: &ScoreSchema) -> Result<(), CategoryError> {
        if self.id.trim().is_empty() {
            return Err(CategoryError::EmptyId);
        }

        let arity = schema.arity();
        let declared = FlagSet::all(schema.flag_count());
        let eligibility = &self.eligibility;

        let undeclared = eligibility.forbidden_flags.difference(declared);
        if !undeclared.is_empty() {
            return Err(CategoryError::UnknownFlags {
                category: self.id.clone(),
                flags: undeclared,
            });
        }

        let mut first_rejected = None;
        for combination in schema.penalty().combinations() {
            let accepted = !combination.intersects(eligibility.forbidden_flags);
            match first_rejected {
                None if !accepted => first_rejected = Some(combination),
                Some(rejected) if accepted => {
                    return Err(CategoryError::NotDownClosed {
                        category: self.id.clone(),
                        rejected,
                        accepted: combination,
                    });
                }
                _ => {}
            }
        }

        if let Some(&(index, _)) = eligibility.metric_limits.iter().find(|(i, _)| *i >= arity) {
            return Err(CategoryError::UnknownMetric {
                category: self.id.clone(),
                index,
                arity,
            });
        }

        for (position, key) in self.ranking.iter().enumerate() {
            if let RankKey::Metric(index) = *key {
                if index >= arity {
                    return Err(CategoryError::UnknownMetric {
                        category: self.id.clone(),
                        index,
                        arity,
                    });
                }
            }
            if self.ranking[..position].contains(key) {
                return Err(CategoryError::DuplicateRankKey {
                    category: self.id.clone(),
                    key: key.to_string(),
                });
            }
        }

        if let Some(index) = (0..arity).find(|i| !self.ranking.contains(&RankKey::Metric(*i))) {
            return Err(CategoryError::NotStrict {
                category: self.id.clone(),
                missing: schema.metric_names()[index].clone(),
            });
        }
        let free_flags = declared.difference(eligibility.forbidden_flags);
        if !free_flags.is_empty() && !self.ranking.contains(&RankKey::Flags) {
            return Err(CategoryError::NotStrict {
                category: self.id.clone(),
                missing: "flags".to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}
