//! Display conditions: one discrete visual state of a bar.
//!
//! A bar is described by an ordered list of [`Condition`]s. The consuming
//! evaluation engine picks the first condition whose comparator accepts the
//! live signal value, see [`evaluate`].

use std::fmt;

/// Relational operator between the live signal value and a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Comparator {
    /// `value <= threshold`
    LessOrEqual,
    /// `value == threshold`
    #[default]
    Equal,
    /// `value >= threshold`
    GreaterOrEqual,
}

impl Comparator {
    /// Mathematical symbol (`≤`, `=`, `≥`).
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::LessOrEqual => "≤",
            Self::Equal => "=",
            Self::GreaterOrEqual => "≥",
        }
    }

    /// ASCII spelling used in display-panel parameter records.
    #[must_use]
    pub const fn as_ascii(self) -> &'static str {
        match self {
            Self::LessOrEqual => "<=",
            Self::Equal => "=",
            Self::GreaterOrEqual => ">=",
        }
    }

    /// Whether `value` satisfies this comparator against `threshold`.
    #[must_use]
    pub const fn matches(self, value: i64, threshold: i64) -> bool {
        match self {
            Self::LessOrEqual => value <= threshold,
            Self::Equal => value == threshold,
            Self::GreaterOrEqual => value >= threshold,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `(threshold, comparator, text)` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    threshold: i64,
    comparator: Comparator,
    text: String,
}

impl Condition {
    #[must_use]
    pub fn new(threshold: i64, comparator: Comparator, text: impl Into<String>) -> Self {
        Self {
            threshold,
            comparator,
            text: text.into(),
        }
    }

    #[must_use]
    pub const fn threshold(&self) -> i64 {
        self.threshold
    }

    #[must_use]
    pub const fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// Display text including font and color markup.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this condition fires for `value`.
    #[must_use]
    pub const fn matches(&self, value: i64) -> bool {
        self.comparator.matches(value, self.threshold)
    }

    pub(crate) fn set_comparator(&mut self, comparator: Comparator) {
        self.comparator = comparator;
    }

    /// Display-panel parameter record for `signal`.
    ///
    /// ```
    /// # #[cfg(feature = "json")] {
    /// use blockbar::condition::{Comparator, Condition};
    ///
    /// let value = Condition::new(0, Comparator::LessOrEqual, "  0.0%").to_json("parameter-0");
    /// assert_eq!(value["condition"]["comparator"], "<=");
    /// # }
    /// ```
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self, signal: &str) -> serde_json::Value {
        serde_json::json!({
            "condition": {
                "first_signal": { "name": signal },
                "constant": self.threshold,
                "comparator": self.comparator.as_ascii(),
            },
            "icon": { "name": signal },
            "text": self.text,
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {}", self.comparator, self.threshold, self.text)
    }
}

/// The first condition that accepts `value`, in list order.
#[must_use]
pub fn evaluate(conditions: &[Condition], value: i64) -> Option<&Condition> {
    conditions.iter().find(|condition| condition.matches(value))
}
