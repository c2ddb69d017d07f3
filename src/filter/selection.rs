use serde::{Deserialize, Serialize};

/// Reserved dropdown value meaning "no filter applied".
pub const ALL_SENTINEL: &str = "All";

/// A dropdown selection: an ordered list of string identifiers, or the
/// all-sentinel. An empty list means the same thing as the sentinel.
///
/// This is the single place selection semantics live. Every derivation and
/// aggregation goes through [`Selection::is_active`] / [`Selection::permits`]
/// rather than re-checking shape inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }

    /// The explicit "All" selection; equivalent to an empty one.
    pub fn all() -> Self {
        Self(vec![ALL_SENTINEL.to_string()])
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// A selection filters only when it is non-empty and does not contain
    /// the all-sentinel.
    pub fn is_active(&self) -> bool {
        !self.0.is_empty() && !self.0.iter().any(|v| v == ALL_SENTINEL)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    /// True when the value survives this filter: either the selection is
    /// inactive or the value is selected.
    pub fn permits(&self, value: &str) -> bool {
        !self.is_active() || self.contains(value)
    }

    /// [`permits`](Self::permits) for optional row fields: a row that does
    /// not carry the field is untouched by the filter.
    pub fn permits_opt(&self, value: Option<&str>) -> bool {
        match value {
            Some(value) => self.permits(value),
            None => true,
        }
    }

    /// Strict variant for reachability scans: an active filter drops rows
    /// that do not carry the field, since a row naming no value cannot
    /// match a selection.
    pub fn permits_strict(&self, value: Option<&str>) -> bool {
        if !self.is_active() {
            return true;
        }
        value.is_some_and(|v| self.contains(v))
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<String>> for Selection {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}
