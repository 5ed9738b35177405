//! FlagPenaltyOrder - total order over flag combinations

use std::cmp::Ordering;

use super::flags::{FlagSet, MAX_FLAGS};
use crate::error::SchemaError;

/// A total order over every combination of a schema's flags, best first.
///
/// The order is configuration data: it is either derived by
/// [`FlagPenaltyOrder::by_severity`] or listed explicitly with
/// [`FlagPenaltyOrder::from_best_to_worst`]. Either way two rules hold:
///
/// - every combination has exactly one rank (the order is total);
/// - adding a flag never improves the rank (monotonic).
///
/// # Examples
///
/// ```
/// use recordkeeper_core::score::{FlagPenaltyOrder, FlagSet};
/// use std::cmp::Ordering;
///
/// // flag 0 is the most severe
/// let order = FlagPenaltyOrder::by_severity(2).unwrap();
/// let clean = FlagSet::EMPTY;
/// let mild = FlagSet::of(&[1]);
/// let severe = FlagSet::of(&[0]);
/// let both = FlagSet::of(&[0, 1]);
///
/// assert_eq!(order.combinations(), vec![clean, mild, severe, both]);
/// assert_eq!(order.compare(mild, severe), Ordering::Less);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagPenaltyOrder {
    flag_count: usize,
    // indexed by FlagSet bits
    ranks: Vec<u16>,
}

impl FlagPenaltyOrder {
    /// Derives the order from flag severity.
    ///
    /// Combinations with fewer flags rank better. Among combinations of the
    /// same size, flags declared earlier count as more severe: the
    /// combination holding the earliest differing flag ranks worse.
    pub fn by_severity(flag_count: usize) -> Result<Self, SchemaError> {
        check_flag_count(flag_count)?;
        let mut combinations: Vec<FlagSet> = FlagSet::power_set(flag_count).collect();
        combinations.sort_by_key(|set| (set.len(), set.bits().reverse_bits()));
        Self::from_best_to_worst(flag_count, &combinations)
    }

    /// Builds the order from an explicit best-to-worst list.
    ///
    /// # Errors
    /// Fails if a combination references an undeclared flag, is listed
    /// twice, is missing, or ranks better than one of its subsets.
    pub fn from_best_to_worst(
        flag_count: usize,
        combinations: &[FlagSet],
    ) -> Result<Self, SchemaError> {
        check_flag_count(flag_count)?;
        let size = 1usize << flag_count;
        let mut ranks: Vec<Option<u16>> = vec![None; size];

        for (rank, set) in combinations.iter().enumerate() {
            if set.span() > flag_count {
                return Err(SchemaError::UnknownFlag {
                    index: set.span() - 1,
                    flag_count,
                });
            }
            let slot = &mut ranks[set.bits() as usize];
            if slot.is_some() {
                return Err(SchemaError::DuplicatePenaltyEntry(*set));
            }
            *slot = Some(rank as u16);
        }

        let ranks = ranks
            .into_iter()
            .enumerate()
            .map(|(bits, rank)| {
                rank.ok_or(SchemaError::MissingPenaltyEntry(FlagSet::from_bits(
                    bits as u8,
                )))
            })
            .collect::<Result<Vec<u16>, _>>()?;

        let order = FlagPenaltyOrder { flag_count, ranks };
        order.check_monotonic()?;
        Ok(order)
    }

    fn check_monotonic(&self) -> Result<(), SchemaError> {
        for set in FlagSet::power_set(self.flag_count) {
            for flag in 0..self.flag_count {
                if set.contains(flag) {
                    continue;
                }
                let superset = set.with(flag);
                if self.rank(superset) < self.rank(set) {
                    return Err(SchemaError::NonMonotonicPenalty {
                        better: superset,
                        worse: set,
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of flags this order covers.
    #[inline]
    pub fn flag_count(&self) -> usize {
        self.flag_count
    }

    /// Position of `flags` in the order, 0 being the best.
    ///
    /// Flags outside the declared range rank after every declared
    /// combination.
    #[inline]
    pub fn rank(&self, flags: FlagSet) -> u16 {
        self.ranks
            .get(flags.bits() as usize)
            .copied()
            .unwrap_or(u16::MAX)
    }

    /// Compares two flag combinations; `Less` means `a` is better.
    #[inline]
    pub fn compare(&self, a: FlagSet, b: FlagSet) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }

    /// True if `a` is no worse than `b`.
    #[inline]
    pub fn is_no_worse(&self, a: FlagSet, b: FlagSet) -> bool {
        self.rank(a) <= self.rank(b)
    }

    /// Lists every combination from best to worst.
    pub fn combinations(&self) -> Vec<FlagSet> {
        let mut sets: Vec<FlagSet> = FlagSet::power_set(self.flag_count).collect();
        sets.sort_by_key(|set| self.rank(*set));
        sets
    }
}

fn check_flag_count(flag_count: usize) -> Result<(), SchemaError> {
    if flag_count > MAX_FLAGS {
        Err(SchemaError::TooManyFlags(flag_count))
    } else {
        Ok(())
    }
}
