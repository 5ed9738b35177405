//! Tests for records and content normalization.

use crate::error::RecordError;
use crate::record::{normalize_content, PuzzleId, Record};
use crate::test_utils::score;

#[test]
fn test_builder() {
    let record = Record::builder("research_example_1", score([45, 1, 14], false, false))
        .author("12345ieee")
        .display_link("https://example.com/video.mp4")
        .content("SOLUTION:Of Pancakes and Spaceships,12345ieee,45-1-14\n")
        .marker("linux")
        .build()
        .unwrap();

    assert_eq!(record.puzzle(), &PuzzleId::from("research_example_1"));
    assert_eq!(record.author(), "12345ieee");
    assert_eq!(record.display_link(), Some("https://example.com/video.mp4"));
    assert!(record.has_marker("linux"));
    assert!(!record.has_marker("windows"));
}

#[test]
fn test_builder_requires_identification() {
    let missing_author = Record::builder("p", score([1, 1, 1], false, false)).build();
    assert_eq!(missing_author.unwrap_err(), RecordError::MissingAuthor);

    let blank_author = Record::builder("p", score([1, 1, 1], false, false))
        .author("   ")
        .build();
    assert_eq!(blank_author.unwrap_err(), RecordError::MissingAuthor);

    let missing_puzzle = Record::builder("", score([1, 1, 1], false, false))
        .author("someone")
        .build();
    assert_eq!(missing_puzzle.unwrap_err(), RecordError::MissingPuzzle);
}

#[test]
fn test_blank_display_link_is_dropped() {
    let record = Record::builder("p", score([1, 1, 1], false, false))
        .author("someone")
        .display_link("")
        .build()
        .unwrap();
    assert_eq!(record.display_link(), None);
}

#[test]
fn test_normalize_content() {
    assert_eq!(normalize_content("a  \r\nb\t\r\n\r\n\n"), "a\nb");
    assert_eq!(normalize_content("a\rb"), "a\nb");
    assert_eq!(normalize_content(""), "");
    assert_eq!(normalize_content("  leading kept"), "  leading kept");
}

#[test]
fn test_content_identity_ignores_metadata() {
    let a = Record::builder("p", score([1, 1, 1], false, false))
        .author("alice")
        .content("body\r\n")
        .build()
        .unwrap();
    let b = Record::builder("p", score([9, 9, 9], true, true))
        .author("bob")
        .content("body")
        .build()
        .unwrap();
    let c = Record::builder("p", score([1, 1, 1], false, false))
        .author("alice")
        .content("other body")
        .build()
        .unwrap();

    assert!(a.is_content_identical(&b));
    assert!(!a.is_content_identical(&c));
    assert_ne!(a, b);
}
