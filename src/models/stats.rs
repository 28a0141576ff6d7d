//! Per-user reservation counts for the fairness display.
//!
//! Counts are computed fresh from the current date at query time; the
//! fairness label is a pure function of the stats list and is never stored.

use serde::Serialize;

/// Reservation counts for one non-admin user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserStats {
    pub user_id: i64,
    pub user_name: String,
    /// All reservations ever made by this user
    pub total_reservations: i64,
    /// Reservations with `week_start >= today`
    pub upcoming_reservations: i64,
    /// Reservations with `week_start < today`
    pub past_reservations: i64,
}

/// How a user's total compares to the group mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FairnessLabel {
    ContributesALot,
    Average,
    ShouldReserveMore,
}

/// Distance from the mean beyond which a total stops counting as average.
const FAIRNESS_THRESHOLD: f64 = 0.5;

impl FairnessLabel {
    /// Classify `total` against the mean total across all users.
    pub fn classify(total: f64, mean: f64) -> Self {
        if total > mean + FAIRNESS_THRESHOLD {
            FairnessLabel::ContributesALot
        } else if total < mean - FAIRNESS_THRESHOLD {
            FairnessLabel::ShouldReserveMore
        } else {
            FairnessLabel::Average
        }
    }
}

/// Stats entry with the derived fairness label, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct UserStatsEntry {
    pub user_id: i64,
    pub user_name: String,
    pub total_reservations: i64,
    pub upcoming_reservations: i64,
    pub past_reservations: i64,
    pub fairness: FairnessLabel,
}

/// Attach fairness labels to a stats list.
///
/// Preserves the input order (total descending, name ascending as produced
/// by the aggregation query).
pub fn with_fairness(stats: Vec<UserStats>) -> Vec<UserStatsEntry> {
    let mean = if stats.is_empty() {
        0.0
    } else {
        stats
            .iter()
            .map(|s| s.total_reservations as f64)
            .sum::<f64>()
            / stats.len() as f64
    };

    stats
        .into_iter()
        .map(|s| UserStatsEntry {
            fairness: FairnessLabel::classify(s.total_reservations as f64, mean),
            user_id: s.user_id,
            user_name: s.user_name,
            total_reservations: s.total_reservations,
            upcoming_reservations: s.upcoming_reservations,
            past_reservations: s.past_reservations,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_stats(name: &str, total: i64) -> UserStats {
        UserStats {
            user_id: 1,
            user_name: name.to_string(),
            total_reservations: total,
            upcoming_reservations: 0,
            past_reservations: total,
        }
    }

    #[test]
    fn test_labels_around_mean() {
        // Totals 5, 3, 1 -> mean 3
        let entries = with_fairness(vec![
            make_stats("alice", 5),
            make_stats("bob", 3),
            make_stats("carol", 1),
        ]);

        assert_eq!(entries[0].fairness, FairnessLabel::ContributesALot);
        assert_eq!(entries[1].fairness, FairnessLabel::Average);
        assert_eq!(entries[2].fairness, FairnessLabel::ShouldReserveMore);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Mean 3.5: totals 4 and 3 are exactly 0.5 away, still average
        let entries = with_fairness(vec![make_stats("alice", 4), make_stats("bob", 3)]);

        assert_eq!(entries[0].fairness, FairnessLabel::Average);
        assert_eq!(entries[1].fairness, FairnessLabel::Average);
    }

    #[test]
    fn test_single_user_is_average() {
        let entries = with_fairness(vec![make_stats("alice", 42)]);
        assert_eq!(entries[0].fairness, FairnessLabel::Average);
    }

    #[test]
    fn test_empty_list() {
        assert!(with_fairness(vec![]).is_empty());
    }

    #[test]
    fn test_label_serialization() {
        let json = serde_json::to_string(&FairnessLabel::ShouldReserveMore).unwrap();
        assert_eq!(json, "\"should_reserve_more\"");
    }
}
