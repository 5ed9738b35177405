//! Records: a score plus authorship and solution content

use std::collections::BTreeSet;
use std::fmt;

use crate::error::RecordError;
use crate::score::Score;

/// Identifies the puzzle a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PuzzleId(String);

impl PuzzleId {
    pub fn new(id: impl Into<String>) -> Self {
        PuzzleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PuzzleId {
    fn from(id: &str) -> Self {
        PuzzleId(id.to_string())
    }
}

impl From<String> for PuzzleId {
    fn from(id: String) -> Self {
        PuzzleId(id)
    }
}

/// An archived solution.
///
/// Records are immutable once built. Two records with equal scores can
/// still differ in content, in which case both may live in an archive.
///
/// # Examples
///
/// ```
/// use recordkeeper_core::record::Record;
/// use recordkeeper_core::score::{FlagSet, Score};
///
/// let score = Score::new([45, 1, 14], FlagSet::EMPTY).unwrap();
/// let a = Record::builder("research_example_1", score.clone())
///     .author("12345ieee")
///     .content("SOLUTION:Of Pancakes and Spaceships\r\nbody  \r\n")
///     .build()
///     .unwrap();
/// let b = Record::builder("research_example_1", score)
///     .author("someone else")
///     .content("SOLUTION:Of Pancakes and Spaceships\nbody")
///     .build()
///     .unwrap();
///
/// assert!(a.is_content_identical(&b));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    puzzle: PuzzleId,
    score: Score,
    author: String,
    display_link: Option<String>,
    content: String,
    markers: BTreeSet<String>,
}

impl Record {
    pub fn builder(puzzle: impl Into<PuzzleId>, score: Score) -> RecordBuilder {
        RecordBuilder::new(puzzle.into(), score)
    }

    pub fn puzzle(&self) -> &PuzzleId {
        &self.puzzle
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Link to a video or image showing the solution, if any.
    pub fn display_link(&self) -> Option<&str> {
        self.display_link.as_deref()
    }

    /// Raw solution body as submitted.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Auxiliary markers, e.g. `linux` for solutions recorded under the
    /// legacy random number generator.
    pub fn markers(&self) -> &BTreeSet<String> {
        &self.markers
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    /// Content after [`normalize_content`].
    pub fn normalized_content(&self) -> String {
        normalize_content(&self.content)
    }

    /// True if both records carry the same solution body.
    ///
    /// Independent of score and metadata equality.
    pub fn is_content_identical(&self, other: &Record) -> bool {
        self.content == other.content || self.normalized_content() == other.normalized_content()
    }
}

/// Normalizes a solution body for comparison.
///
/// Line endings become `\n`, trailing whitespace is stripped from every
/// line, and trailing blank lines are dropped.
pub fn normalize_content(content: &str) -> String {
    let unified = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<&str> = unified.lines().map(str::trim_end).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Builder for [`Record`].
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    puzzle: PuzzleId,
    score: Score,
    author: Option<String>,
    display_link: Option<String>,
    content: String,
    markers: BTreeSet<String>,
}

impl RecordBuilder {
    fn new(puzzle: PuzzleId, score: Score) -> Self {
        RecordBuilder {
            puzzle,
            score,
            author: None,
            display_link: None,
            content: String::new(),
            markers: BTreeSet::new(),
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn display_link(mut self, link: impl Into<String>) -> Self {
        self.display_link = Some(link.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.insert(marker.into());
        self
    }

    /// Builds the record.
    ///
    /// # Errors
    /// Fails if the puzzle id or the author is missing or blank.
    pub fn build(self) -> Result<Record, RecordError> {
        if self.puzzle.as_str().trim().is_empty() {
            return Err(RecordError::MissingPuzzle);
        }
        let author = match self.author {
            Some(author) if !author.trim().is_empty() => author,
            _ => return Err(RecordError::MissingAuthor),
        };

        Ok(Record {
            puzzle: self.puzzle,
            score: self.score,
            author,
            display_link: self.display_link.filter(|link| !link.trim().is_empty()),
            content: self.content,
            markers: self.markers,
        })
    }
}
