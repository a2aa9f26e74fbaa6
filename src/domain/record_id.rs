use std::{fmt, num::NonZeroUsize, ops::Deref, str::FromStr, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;

static TOPIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+(?:_[a-z]+)*$").expect("this must never fail"));

static RECORD_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]+(?:_[a-z]+)*)_l([0-9]+)_([0-9]+)$").expect("this must never fail")
});

/// A validated collection topic: lowercase ASCII words joined by `_`.
///
/// Examples: `health`, `work`, `self_care`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Topic(NonEmptyString);

impl Topic {
    /// Creates a new `Topic` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Topic`] if the string is empty or is not lowercase
    /// ASCII words joined by underscores.
    pub fn new(s: String) -> Result<Self, Error> {
        if !TOPIC.is_match(&s) {
            return Err(Error::Topic(s));
        }
        NonEmptyString::new(s).map(Self).map_err(Error::Topic)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Topic {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Topic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// The identifier of a question record.
///
/// Format: `{TOPIC}_l{LEVEL}_{SEQ}`, where:
/// - `TOPIC` is the collection topic (e.g. `work`, `health`)
/// - `LEVEL` is a positive non-zero lesson level
/// - `SEQ` is the positive non-zero position of the question within its level
///
/// Examples: `work_l01_01`, `health_l04_012`
///
/// Level and sequence are displayed with at least two digits; wider numbers
/// expand.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId {
    topic: Topic,
    level: NonZeroUsize,
    seq: NonZeroUsize,
}

impl RecordId {
    /// Creates a record identifier from pre-validated parts.
    #[must_use]
    pub const fn new(topic: Topic, level: NonZeroUsize, seq: NonZeroUsize) -> Self {
        Self { topic, level, seq }
    }

    /// The identifier of the record at `position` in a collection where each
    /// level holds `per_level` questions.
    ///
    /// Positions are 0-based; levels and sequence numbers start at 1.
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use lessons::domain::record_id::{RecordId, Topic};
    ///
    /// let topic: Topic = "work".parse().unwrap();
    /// let per_level = NonZeroUsize::new(15).unwrap();
    ///
    /// assert_eq!(RecordId::at_position(topic.clone(), per_level, 0).to_string(), "work_l01_01");
    /// assert_eq!(RecordId::at_position(topic, per_level, 15).to_string(), "work_l02_01");
    /// ```
    #[must_use]
    pub fn at_position(topic: Topic, per_level: NonZeroUsize, position: usize) -> Self {
        let level = NonZeroUsize::MIN.saturating_add(position / per_level);
        let seq = NonZeroUsize::MIN.saturating_add(position % per_level);
        Self::new(topic, level, seq)
    }

    /// Returns the topic component.
    #[must_use]
    pub const fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Returns the level component.
    #[must_use]
    pub const fn level(&self) -> NonZeroUsize {
        self.level
    }

    /// Returns the sequence component.
    #[must_use]
    pub const fn seq(&self) -> NonZeroUsize {
        self.seq
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}_l{:02}_{:02}", self.topic, self.level, self.seq)
    }
}

/// Errors that can occur when parsing a record identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The identifier does not have the `{TOPIC}_l{LEVEL}_{SEQ}` shape.
    #[error("Invalid record ID format: {0}")]
    Syntax(String),

    /// The level or sequence number is zero or too large.
    #[error("Invalid number in record ID '{0}': expected a non-zero integer, got {1}")]
    Number(String, String),

    /// The topic is not lowercase words joined by underscores.
    #[error("Invalid topic '{0}': must be lowercase ASCII words joined by '_'")]
    Topic(String),
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = RECORD_ID
            .captures(s)
            .ok_or_else(|| Error::Syntax(s.to_string()))?;

        let number = |index: usize| {
            let digits = &captures[index];
            digits
                .parse::<usize>()
                .ok()
                .and_then(NonZeroUsize::new)
                .ok_or_else(|| Error::Number(s.to_string(), digits.to_string()))
        };

        let level = number(2)?;
        let seq = number(3)?;
        let topic = Topic::new(captures[1].to_string())?;

        Ok(Self::new(topic, level, seq))
    }
}

impl TryFrom<&str> for RecordId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}
