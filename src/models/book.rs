use serde::{Deserialize, Deserializer, Serialize};

/// A recommended book as returned by the personalization endpoint
///
/// Counts are signed and unchecked: `available_copies <= total_copies` is the
/// server's contract, not something this crate enforces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub isbn: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default)]
    pub available_copies: i64,
    #[serde(default)]
    pub total_copies: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

/// Reads a nullable text field, mapping `null` to an empty string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl RecommendationItem {
    pub fn availability(&self) -> Availability {
        if self.available_copies > 0 {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }

    pub fn in_stock(&self) -> bool {
        self.availability() == Availability::Available
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    /// CSS class used by the availability badge
    pub fn css_class(self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Unavailable => "unavailable",
        }
    }
}
