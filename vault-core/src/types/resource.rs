//! Resource domain types

use serde::{Deserialize, Serialize};

/// Kind of learning artifact a resource represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Syllabus,
    Lecture,
    Notes,
    Book,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syllabus => "syllabus",
            Self::Lecture => "lecture",
            Self::Notes => "notes",
            Self::Book => "book",
        }
    }
}

/// Allow-listed sort keys for resource listings.
///
/// Client-supplied sort fields never reach a query as raw strings; anything
/// outside this enum fails deserialization at the validation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    CreatedAt,
    QualityScore,
    Title,
    Name,
}

impl SortKey {
    /// Storage field this key sorts by. `name` is an accepted alias for the
    /// resource title.
    pub fn field(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::QualityScore => "quality_score",
            Self::Title | Self::Name => "title",
        }
    }

    /// Newest-first for recency, highest-first for quality, A-Z otherwise.
    pub fn descending(&self) -> bool {
        matches!(self, Self::CreatedAt | Self::QualityScore)
    }
}

/// Per-star rating counts, keyed "1" through "5" on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDistribution {
    #[serde(rename = "1")]
    pub one: u64,
    #[serde(rename = "2")]
    pub two: u64,
    #[serde(rename = "3")]
    pub three: u64,
    #[serde(rename = "4")]
    pub four: u64,
    #[serde(rename = "5")]
    pub five: u64,
}

impl RatingDistribution {
    /// Count the given star value. Out-of-range values are ignored; the
    /// store never accepts them in the first place.
    pub fn record(&mut self, stars: u8) {
        match stars {
            1 => self.one += 1,
            2 => self.two += 1,
            3 => self.three += 1,
            4 => self.four += 1,
            5 => self.five += 1,
            _ => {}
        }
    }

    /// Sum of all buckets
    pub fn total(&self) -> u64 {
        self.one + self.two + self.three + self.four + self.five
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_rejects_unknown_fields() {
        assert!(serde_json::from_str::<SortKey>("\"createdAt\"").is_ok());
        assert!(serde_json::from_str::<SortKey>("\"qualityScore\"").is_ok());
        assert!(serde_json::from_str::<SortKey>("\"__proto__\"").is_err());
        assert!(serde_json::from_str::<SortKey>("\"created_at; DROP\"").is_err());
    }

    #[test]
    fn distribution_buckets_sum_to_total() {
        let mut dist = RatingDistribution::default();
        for stars in [5, 5, 4, 1] {
            dist.record(stars);
        }
        assert_eq!(dist.five, 2);
        assert_eq!(dist.total(), 4);
    }

    #[test]
    fn distribution_serializes_with_numeric_keys() {
        let dist = RatingDistribution {
            one: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(&dist).unwrap();
        assert_eq!(json["1"], 1);
        assert_eq!(json["5"], 0);
    }
}
