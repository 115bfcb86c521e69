use serde::{Deserialize, Serialize};

/// A single glossary row, keyed by `keyword`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub keyword: String,
    pub description: String,
    /// UNIX seconds. `None` for legacy rows and rows created by a partial
    /// description update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl GlossaryEntry {
    /// New entry stamped with the current time.
    pub fn new(keyword: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            description: description.into(),
            created_at: Some(chrono::Utc::now().timestamp()),
        }
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            keyword: self.keyword.clone(),
            created_at: self.created_at,
        }
    }
}

/// Projection of an entry used by listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub keyword: String,
    pub created_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_timestamped() {
        let before = chrono::Utc::now().timestamp();
        let entry = GlossaryEntry::new("rust", "a language");
        assert!(entry.created_at.unwrap() >= before);
    }

    #[test]
    fn test_legacy_row_without_timestamp() {
        let entry: GlossaryEntry =
            serde_json::from_str(r#"{"keyword":"k","description":"d"}"#).unwrap();
        assert_eq!(entry.created_at, None);
        assert_eq!(entry.summary().created_at, None);
    }
}
