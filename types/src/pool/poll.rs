use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::MIN_POLL_OPTIONS;

/// Built-in polls used when no custom catalog is configured.
const DEFAULT_POLLS: &[(&str, &[&str])] = &[
    (
        "Who takes tonight's scrimmage?",
        &["Team Red", "Team Blue"],
    ),
    ("Will it rain tomorrow?", &["Yes", "No"]),
    (
        "Which snack runs out first at the party?",
        &["Chips", "Cookies", "Fruit", "Pretzels"],
    ),
    (
        "Who finishes the crossword first?",
        &["Dana", "Eli", "Farah"],
    ),
];

#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("catalog has no polls")]
    Empty,
    #[error("poll {index} has {count} options (min={min})", min = MIN_POLL_OPTIONS)]
    TooFewOptions { index: usize, count: usize },
    #[error("poll {index} has a blank option")]
    BlankOption { index: usize },
    #[error("poll {index} lists option {option:?} twice")]
    DuplicateOption { index: usize, option: String },
    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A question with the options players can back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub question: String,
    pub options: Vec<String>,
}

impl Poll {
    pub fn new<I, O>(question: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<String>,
    {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `option` is exactly one of this poll's options.
    pub fn contains(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Option at a 0-based position.
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}

/// Navigation direction through the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Fixed, non-empty list of polls. Every poll is guaranteed to have at least two distinct,
/// non-blank options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    polls: Vec<Poll>,
}

impl Catalog {
    pub fn new(polls: Vec<Poll>) -> Result<Self, CatalogError> {
        if polls.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, poll) in polls.iter().enumerate() {
            if poll.options.len() < MIN_POLL_OPTIONS {
                return Err(CatalogError::TooFewOptions {
                    index,
                    count: poll.options.len(),
                });
            }
            let mut seen = HashSet::with_capacity(poll.options.len());
            for option in &poll.options {
                if option.trim().is_empty() {
                    return Err(CatalogError::BlankOption { index });
                }
                if !seen.insert(option.as_str()) {
                    return Err(CatalogError::DuplicateOption {
                        index,
                        option: option.clone(),
                    });
                }
            }
        }
        Ok(Self { polls })
    }

    /// Parse a catalog from a JSON array of `{ "question": .., "options": [..] }`.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let polls: Vec<Poll> = serde_json::from_str(raw)?;
        Self::new(polls)
    }

    pub fn len(&self) -> usize {
        self.polls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Poll> {
        self.polls.get(index)
    }

    pub fn polls(&self) -> &[Poll] {
        &self.polls
    }

    /// Index reached by moving one step from `index`, wrapping at both ends.
    pub fn step(&self, index: usize, direction: Direction) -> usize {
        let len = self.polls.len();
        let index = index % len;
        match direction {
            Direction::Next => (index + 1) % len,
            Direction::Previous => (index + len - 1) % len,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            polls: DEFAULT_POLLS
                .iter()
                .map(|(question, options)| Poll::new(*question, options.iter().copied()))
                .collect(),
        }
    }
}
