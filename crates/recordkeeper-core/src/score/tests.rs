//! Tests for score types.
