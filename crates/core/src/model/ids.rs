use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::test::OptionLetter;

/// Identifier for a test, matching the catalog's file-name key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestId(String);

impl TestId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestId({})", self.0)
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TestId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for TestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Composite key for per-question records (saved and mistake sets).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionKey {
    pub test_id: TestId,
    pub question_index: u32,
}

impl QuestionKey {
    #[must_use]
    pub fn new(test_id: TestId, question_index: u32) -> Self {
        Self {
            test_id,
            question_index,
        }
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.test_id, self.question_index)
    }
}

/// Error returned when a string is not one of the four option letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLetterError {
    pub provided: String,
}

impl fmt::Display for ParseLetterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not an option letter: {:?}", self.provided)
    }
}

impl std::error::Error for ParseLetterError {}

impl std::str::FromStr for OptionLetter {
    type Err = ParseLetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(OptionLetter::A),
            "B" | "b" => Ok(OptionLetter::B),
            "C" | "c" => Ok(OptionLetter::C),
            "D" | "d" => Ok(OptionLetter::D),
            other => Err(ParseLetterError {
                provided: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_key_display_matches_composite_format() {
        let key = QuestionKey::new(TestId::new("test_3"), 12);
        assert_eq!(key.to_string(), "test_3_12");
    }

    #[test]
    fn option_letter_parses_case_insensitively() {
        assert_eq!("a".parse::<OptionLetter>().unwrap(), OptionLetter::A);
        assert_eq!("D".parse::<OptionLetter>().unwrap(), OptionLetter::D);
    }

    #[test]
    fn option_letter_rejects_anything_else() {
        assert!("E".parse::<OptionLetter>().is_err());
        assert!("".parse::<OptionLetter>().is_err());
        assert!("AB".parse::<OptionLetter>().is_err());
    }
}
