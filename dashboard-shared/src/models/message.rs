use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Query-string date format understood by `/messages/`.
pub const FILTER_DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the messages log, presented to users as a "report".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Server-assigned identifier.
    pub id: i64,

    /// Server-formatted posting time.
    #[serde(rename = "date")]
    pub timestamp: String,

    /// Message body.
    #[serde(rename = "message")]
    pub text: String,

    /// Label for the author, as rendered by the server.
    #[serde(rename = "user")]
    pub author: String,
}

/// Body posted to `/messages/` to create a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateMessageRequest {
    /// Message body.
    pub message: String,
}

/// Optional date range applied to every page of a reports search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageFilters {
    /// Inclusive lower bound.
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub to_date: Option<NaiveDate>,
}

impl MessageFilters {
    /// Builds a filter set from both bounds.
    #[must_use]
    pub const fn between(from_date: Option<NaiveDate>, to_date: Option<NaiveDate>) -> Self {
        Self { from_date, to_date }
    }

    /// Query pairs for the set bounds; unset bounds are omitted entirely.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(from) = self.from_date {
            pairs.push(("from_date", from.format(FILTER_DATE_FORMAT).to_string()));
        }
        if let Some(to) = self.to_date {
            pairs.push(("to_date", to.format(FILTER_DATE_FORMAT).to_string()));
        }
        pairs
    }

    /// `true` when neither bound is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from_date.is_none() && self.to_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_maps_wire_names() {
        let message: Message = serde_json::from_str(
            r#"{"id":4,"date":"2024-05-01 10:00","message":"hello","user":"alice"}"#,
        )
        .unwrap();
        assert_eq!(message.id, 4);
        assert_eq!(message.timestamp, "2024-05-01 10:00");
        assert_eq!(message.text, "hello");
        assert_eq!(message.author, "alice");
    }

    #[test]
    fn test_filters_omit_unset_bounds() {
        assert!(MessageFilters::default().query_pairs().is_empty());
        assert!(MessageFilters::default().is_empty());

        let from = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let only_from = MessageFilters::between(Some(from), None);
        assert_eq!(only_from.query_pairs(), vec![("from_date", "2024-01-02".to_string())]);
    }

    #[test]
    fn test_filters_format_both_bounds() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let filters = MessageFilters::between(Some(from), Some(to));
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("from_date", "2024-01-02".to_string()),
                ("to_date", "2024-12-31".to_string()),
            ]
        );
    }
}
