//! Core data type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest rating a review may carry
pub const MIN_RATING: u8 = 1;
/// Highest rating a review may carry
pub const MAX_RATING: u8 = 10;

/// A user's assessment of one game
///
/// The owner is set once at creation, from the verified identity of the
/// creating request, and never changes afterwards. Game display fields are
/// snapshotted from the catalog at creation time and are not kept in sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Server-generated unique id
    pub id: String,
    /// Id of the identity that created the review
    pub owner: String,
    /// External catalog id of the reviewed game
    pub game_id: i64,
    /// Game name, snapshotted at creation
    pub game_name: String,
    /// Game cover image URL, snapshotted at creation
    pub game_image: Option<String>,
    /// Numeric rating, 1-10 inclusive
    pub rating: u8,
    /// Free-text opinion
    pub opinion: String,
    /// Platform the game was played on
    pub platform_played: String,
    /// Whether the reviewer recommends the game
    pub recommended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Check that the rating is within bounds
    pub fn rating_in_range(rating: u8) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&rating)
    }
}

/// A review with its owner's display name joined in, as returned by the
/// feed and list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    pub review: Review,
    /// Username of the owning identity
    pub owner_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(!Review::rating_in_range(0));
        assert!(Review::rating_in_range(1));
        assert!(Review::rating_in_range(10));
        assert!(!Review::rating_in_range(11));
    }

    #[test]
    fn test_review_json_shape() {
        let review = Review {
            id: "r-1".to_string(),
            owner: "u-1".to_string(),
            game_id: 42,
            game_name: "Outer Wilds".to_string(),
            game_image: None,
            rating: 9,
            opinion: "Great".to_string(),
            platform_played: "PC".to_string(),
            recommended: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["gameId"], 42);
        assert_eq!(value["platformPlayed"], "PC");
        assert!(value.get("game_id").is_none());
    }

    #[test]
    fn test_author_join_is_flattened() {
        let review = Review {
            id: "r-1".to_string(),
            owner: "u-1".to_string(),
            game_id: 7,
            game_name: "Hades".to_string(),
            game_image: Some("https://example.com/hades.jpg".to_string()),
            rating: 8,
            opinion: "Tight loop".to_string(),
            platform_played: "Switch".to_string(),
            recommended: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let joined = ReviewWithAuthor {
            review,
            owner_name: "sam".to_string(),
        };

        let value = serde_json::to_value(&joined).unwrap();
        assert_eq!(value["ownerName"], "sam");
        assert_eq!(value["gameName"], "Hades");
    }
}
