//! FlagSet - compact set of quality penalty flags

use std::fmt;

/// Maximum number of flags a score schema may declare.
pub const MAX_FLAGS: usize = 8;

/// A set of boolean penalty flags, stored as a bitmask.
///
/// Bit `i` corresponds to the flag at index `i` of the owning
/// [`ScoreSchema`](super::ScoreSchema). The set itself carries no names;
/// it only becomes meaningful together with a schema.
///
/// # Examples
///
/// ```
/// use recordkeeper_core::score::FlagSet;
///
/// let bugged = FlagSet::EMPTY.with(0);
/// let both = bugged.with(1);
///
/// assert!(bugged.is_subset_of(both));
/// assert_eq!(both.len(), 2);
/// assert_eq!(both.iter().collect::<Vec<_>>(), vec![0, 1]);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlagSet(u8);

impl FlagSet {
    /// The set with no flags.
    pub const EMPTY: FlagSet = FlagSet(0);

    /// Creates a set from its raw bitmask.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        FlagSet(bits)
    }

    /// Creates a set containing every index in `indices`.
    ///
    /// # Panics
    /// Panics if an index is `>= MAX_FLAGS`.
    pub fn of(indices: &[usize]) -> Self {
        indices.iter().fold(Self::EMPTY, |set, &i| set.with(i))
    }

    /// Returns the set of all flags `0..count`.
    pub const fn all(count: usize) -> Self {
        assert!(count <= MAX_FLAGS, "flag count exceeds MAX_FLAGS");
        if count == MAX_FLAGS {
            FlagSet(u8::MAX)
        } else {
            FlagSet(((1u16 << count) - 1) as u8)
        }
    }

    /// Returns the raw bitmask.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns a copy of this set with `index` added.
    ///
    /// # Panics
    /// Panics if `index >= MAX_FLAGS`.
    #[inline]
    pub const fn with(self, index: usize) -> Self {
        assert!(index < MAX_FLAGS, "flag index out of range");
        FlagSet(self.0 | (1 << index))
    }

    /// Returns a copy of this set with `index` removed.
    #[inline]
    pub const fn without(self, index: usize) -> Self {
        assert!(index < MAX_FLAGS, "flag index out of range");
        FlagSet(self.0 & !(1 << index))
    }

    #[inline]
    pub const fn contains(self, index: usize) -> bool {
        index < MAX_FLAGS && self.0 & (1 << index) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of flags set.
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_subset_of(self, other: FlagSet) -> bool {
        self.0 & !other.0 == 0
    }

    #[inline]
    pub const fn intersects(self, other: FlagSet) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn union(self, other: FlagSet) -> Self {
        FlagSet(self.0 | other.0)
    }

    #[inline]
    pub const fn difference(self, other: FlagSet) -> Self {
        FlagSet(self.0 & !other.0)
    }

    /// Highest flag index present plus one, or 0 for the empty set.
    pub const fn span(self) -> usize {
        (u8::BITS - self.0.leading_zeros()) as usize
    }

    /// Iterates the flag indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..MAX_FLAGS).filter(move |&i| self.contains(i))
    }

    /// Iterates every subset of `FlagSet::all(count)`, in bitmask order.
    pub fn power_set(count: usize) -> impl Iterator<Item = FlagSet> {
        let upper = 1u16 << count.min(MAX_FLAGS);
        (0..upper).map(|bits| FlagSet(bits as u8))
    }
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<usize> for FlagSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |set, i| set.with(i))
    }
}
