//! ScoreSchema - names, arity, and flag ordering of a puzzle family's scores

use std::cmp::Ordering;
use std::fmt;

use super::flags::{FlagSet, MAX_FLAGS};
use super::penalty::FlagPenaltyOrder;
use super::value::{MetricComparison, Score};
use crate::error::{SchemaError, ScoreError, ScoreParseError};

/// A named penalty flag with the letter used in display strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagDef {
    pub name: String,
    pub letter: char,
}

impl FlagDef {
    pub fn new(name: impl Into<String>, letter: char) -> Self {
        FlagDef {
            name: name.into(),
            letter: letter.to_ascii_uppercase(),
        }
    }
}

/// Describes the shape of every score in one puzzle family.
///
/// The schema fixes how many metrics a score has, what they are called,
/// which flags exist, and how flag combinations are ranked. Scores built
/// through a schema are guaranteed to have the right arity and only
/// declared flags, which is what lets the archive compare them freely.
///
/// # Display format
///
/// Metrics are joined by `/`, an unmeasured metric prints as `?`, and the
/// letters of any set flags follow as a final `/`-separated part in
/// declaration order:
///
/// ```
/// use recordkeeper_core::score::{FlagDef, FlagSet, ScoreSchema};
///
/// let schema = ScoreSchema::new(
///     "spacechem",
///     ["cycles", "reactors", "symbols"],
///     vec![FlagDef::new("bugged", 'B'), FlagDef::new("precognitive", 'P')],
/// ).unwrap();
///
/// let score = schema.parse_score("50/50/50/BP").unwrap();
/// assert_eq!(score.flags(), FlagSet::of(&[0, 1]));
/// assert_eq!(schema.display(&score).to_string(), "50/50/50/BP");
///
/// let unknown = schema.parse_score("1/?/3").unwrap();
/// assert!(unknown.has_unknown_metric());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSchema {
    name: String,
    metrics: Vec<String>,
    flags: Vec<FlagDef>,
    penalty: FlagPenaltyOrder,
}

impl ScoreSchema {
    /// Creates a schema whose penalty order follows flag declaration order,
    /// most severe flag first (see [`FlagPenaltyOrder::by_severity`]).
    pub fn new<I, S>(
        name: impl Into<String>,
        metrics: I,
        flags: Vec<FlagDef>,
    ) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if flags.len() > MAX_FLAGS {
            return Err(SchemaError::TooManyFlags(flags.len()));
        }
        let penalty = FlagPenaltyOrder::by_severity(flags.len())?;
        Self::with_penalty(name, metrics, flags, penalty)
    }

    /// Creates a schema with an explicit penalty order.
    pub fn with_penalty<I, S>(
        name: impl Into<String>,
        metrics: I,
        flags: Vec<FlagDef>,
        penalty: FlagPenaltyOrder,
    ) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let metrics: Vec<String> = metrics.into_iter().map(Into::into).collect();
        if metrics.is_empty() {
            return Err(SchemaError::NoMetrics);
        }
        if flags.len() > MAX_FLAGS {
            return Err(SchemaError::TooManyFlags(flags.len()));
        }
        if penalty.flag_count() != flags.len() {
            return Err(SchemaError::PenaltyFlagCount {
                expected: flags.len(),
                actual: penalty.flag_count(),
            });
        }
        check_unique("metric", metrics.iter().map(String::as_str))?;
        check_unique("flag", flags.iter().map(|f| f.name.as_str()))?;
        let letters: Vec<String> = flags.iter().map(|f| f.letter.to_string()).collect();
        check_unique("flag letter", letters.iter().map(String::as_str))?;

        Ok(ScoreSchema {
            name: name.into(),
            metrics,
            flags,
            penalty,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of metrics every score must have.
    pub fn arity(&self) -> usize {
        self.metrics.len()
    }

    pub fn metric_names(&self) -> &[String] {
        &self.metrics
    }

    /// Index of the metric called `name`.
    pub fn metric_index(&self, name: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m.eq_ignore_ascii_case(name))
    }

    pub fn flags(&self) -> &[FlagDef] {
        &self.flags
    }

    pub fn flag_count(&self) -> usize {
        self.flags.len()
    }

    /// Index of the flag matching `key`, by name or by letter.
    pub fn flag_index(&self, key: &str) -> Option<usize> {
        self.flags.iter().position(|f| {
            f.name.eq_ignore_ascii_case(key)
                || (key.chars().count() == 1 && key.eq_ignore_ascii_case(&f.letter.to_string()))
        })
    }

    pub fn penalty(&self) -> &FlagPenaltyOrder {
        &self.penalty
    }

    /// Builds a score, checking arity and flag range.
    pub fn score(&self, metrics: &[u64], flags: FlagSet) -> Result<Score, ScoreError> {
        let score = Score::new(metrics.iter().copied(), flags)?;
        self.check(&score)?;
        Ok(score)
    }

    /// Builds a score from signed values, rejecting negatives.
    pub fn score_signed(&self, metrics: &[i64], flags: FlagSet) -> Result<Score, ScoreError> {
        let score = Score::from_signed(metrics, flags)?;
        self.check(&score)?;
        Ok(score)
    }

    /// Checks that `score` fits this schema.
    pub fn check(&self, score: &Score) -> Result<(), ScoreError> {
        if score.arity() != self.arity() {
            return Err(ScoreError::ArityMismatch {
                expected: self.arity(),
                actual: score.arity(),
            });
        }
        if score.flags().span() > self.flag_count() {
            return Err(ScoreError::UnknownFlags {
                flags: score.flags(),
                flag_count: self.flag_count(),
            });
        }
        Ok(())
    }

    /// Parses flag letters such as `"BP"` into a set.
    ///
    /// Letters must follow declaration order with no repeats, the same way
    /// they are displayed.
    pub fn parse_flags(&self, letters: &str) -> Result<FlagSet, ScoreParseError> {
        let mut set = FlagSet::EMPTY;
        let mut next = 0;
        for c in letters.chars() {
            let index = self
                .flags
                .iter()
                .position(|f| f.letter.eq_ignore_ascii_case(&c))
                .ok_or_else(|| {
                    ScoreParseError::new(format!("unknown flag letter '{}' in '{}'", c, letters))
                })?;
            if index < next {
                return Err(ScoreParseError::new(format!(
                    "flag letter '{}' repeated or out of order in '{}'",
                    c, letters
                )));
            }
            set = set.with(index);
            next = index + 1;
        }
        Ok(set)
    }

    /// Parses a score from its display form.
    pub fn parse_score(&self, s: &str) -> Result<Score, ScoreParseError> {
        let s = s.trim();
        let parts: Vec<&str> = s.split('/').map(str::trim).collect();
        let arity = self.arity();

        let (metric_parts, flags) = if parts.len() == arity {
            (&parts[..], FlagSet::EMPTY)
        } else if parts.len() == arity + 1 && !self.flags.is_empty() && !parts[arity].is_empty() {
            (&parts[..arity], self.parse_flags(parts[arity])?)
        } else {
            return Err(ScoreParseError::new(format!(
                "Invalid {} score '{}': expected {} metrics separated by '/'",
                self.name, s, arity
            )));
        };

        let metrics = metric_parts
            .iter()
            .map(|part| parse_metric(part))
            .collect::<Result<Vec<u64>, _>>()?;
        Ok(self.score(&metrics, flags)?)
    }

    /// Returns a displayable view of `score` in this schema's format.
    pub fn display<'a>(&'a self, score: &'a Score) -> ScoreDisplay<'a> {
        ScoreDisplay {
            schema: self,
            score,
        }
    }

    /// Compares flag combinations under the penalty order.
    #[inline]
    pub fn compare_flags(&self, a: &Score, b: &Score) -> Ordering {
        self.penalty.compare(a.flags(), b.flags())
    }

    /// True if `a` dominates `b`: no worse on every metric, no worse on
    /// flags, and strictly better on at least one of the two.
    pub fn dominates(&self, a: &Score, b: &Score) -> bool {
        let metrics = a.compare_metrics(b);
        let flags = self.compare_flags(a, b);
        metrics.is_no_worse()
            && flags != Ordering::Greater
            && (metrics == MetricComparison::Better || flags == Ordering::Less)
    }
}

fn parse_metric(part: &str) -> Result<u64, ScoreParseError> {
    if part == "?" {
        return Ok(Score::UNKNOWN);
    }
    if let Some(rest) = part.strip_prefix('-') {
        if rest.parse::<u64>().is_ok() {
            return Err(ScoreParseError::new(format!(
                "metric '{}' must not be negative",
                part
            )));
        }
    }
    part.parse::<u64>()
        .map_err(|e| ScoreParseError::new(format!("Invalid metric '{}': {}", part, e)))
}

fn check_unique<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), SchemaError> {
    let mut seen: Vec<String> = Vec::new();
    for name in names {
        let lowered = name.to_ascii_lowercase();
        if seen.contains(&lowered) {
            return Err(SchemaError::Duplicate {
                kind,
                name: name.to_string(),
            });
        }
        seen.push(lowered);
    }
    Ok(())
}

/// A [`Score`] paired with its schema for display.
pub struct ScoreDisplay<'a> {
    schema: &'a ScoreSchema,
    score: &'a Score,
}

impl fmt::Display for ScoreDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.score.metrics().iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            if *value == Score::UNKNOWN {
                f.write_str("?")?;
            } else {
                write!(f, "{}", value)?;
            }
        }

        let flags = self.score.flags();
        if !flags.is_empty() {
            f.write_str("/")?;
            for (i, def) in self.schema.flags.iter().enumerate() {
                if flags.contains(i) {
                    write!(f, "{}", def.letter)?;
                }
            }
        }
        Ok(())
    }
}
