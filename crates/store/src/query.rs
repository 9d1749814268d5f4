use chrono::{DateTime, Utc};

use crate::Record;

/// A single condition on a payload field.
///
/// Filters address top-level payload fields by name. A record whose field is
/// missing or has the wrong JSON type never matches.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// The field equals the given JSON value.
    Equals {
        field: String,
        value: serde_json::Value,
    },

    /// The field is a string containing `needle`, ignoring case.
    ContainsIgnoreCase { field: String, needle: String },

    /// The field is a number within `[min, max]`.
    NumberBetween { field: String, min: f64, max: f64 },

    /// The field is an RFC 3339 timestamp within `[from, to]`.
    TimestampBetween {
        field: String,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

impl Filter {
    /// Returns the name of the payload field this filter inspects.
    pub fn field(&self) -> &str {
        match self {
            Filter::Equals { field, .. }
            | Filter::ContainsIgnoreCase { field, .. }
            | Filter::NumberBetween { field, .. }
            | Filter::TimestampBetween { field, .. } => field,
        }
    }

    /// Evaluates the filter against a record.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(actual) = record.field(self.field()) else {
            return false;
        };

        match self {
            Filter::Equals { value, .. } => actual == value,
            Filter::ContainsIgnoreCase { needle, .. } => actual
                .as_str()
                .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
            Filter::NumberBetween { min, max, .. } => actual
                .as_f64()
                .is_some_and(|n| n >= *min && n <= *max),
            Filter::TimestampBetween { from, to, .. } => actual
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|ts| ts.with_timezone(&Utc))
                .is_some_and(|ts| ts >= *from && ts <= *to),
        }
    }
}

/// Builder for constructing record queries.
///
/// All filters must match (logical AND). Results come back in storage order.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    /// The collection to search.
    pub collection: String,

    /// Conditions every returned record satisfies.
    pub filters: Vec<Filter>,

    /// Maximum number of records to return.
    pub limit: Option<usize>,

    /// Number of records to skip.
    pub offset: Option<usize>,
}

impl RecordQuery {
    /// Creates a query over every record of a collection.
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Default::default()
        }
    }

    /// Adds an arbitrary filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Filters by exact field value.
    pub fn eq(self, field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.filter(Filter::Equals {
            field: field.into(),
            value: value.into(),
        })
    }

    /// Filters by case-insensitive substring match.
    pub fn contains_ignore_case(
        self,
        field: impl Into<String>,
        needle: impl Into<String>,
    ) -> Self {
        self.filter(Filter::ContainsIgnoreCase {
            field: field.into(),
            needle: needle.into(),
        })
    }

    /// Filters by inclusive numeric range.
    pub fn number_between(self, field: impl Into<String>, min: f64, max: f64) -> Self {
        self.filter(Filter::NumberBetween {
            field: field.into(),
            min,
            max,
        })
    }

    /// Filters by inclusive timestamp range.
    pub fn timestamp_between(
        self,
        field: impl Into<String>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Self {
        self.filter(Filter::TimestampBetween {
            field: field.into(),
            from,
            to,
        })
    }

    /// Limits the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips a number of results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns true if the record belongs to the collection and passes every filter.
    pub fn matches(&self, record: &Record) -> bool {
        record.collection == self.collection && self.filters.iter().all(|f| f.matches(record))
    }
}
