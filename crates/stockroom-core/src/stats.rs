//! # Dashboard Statistics
//!
//! Summary counters shown above the product table.
//!
//! Windows are open on the old end: a product created exactly 7 days before
//! `now` is no longer "recent".

use chrono::{DateTime, Duration, Utc};

use crate::types::{ActivityEntry, Product, ProductStats};

/// Window for "recently added" and "recently updated".
pub const RECENT_DAYS: i64 = 7;

/// Window for the activity counter.
pub const ACTIVITY_DAYS: i64 = 30;

/// Computes the dashboard counters as of `now`.
pub fn compute_stats(
    products: &[Product],
    history: &[ActivityEntry],
    now: DateTime<Utc>,
) -> ProductStats {
    let recent_cutoff = now - Duration::days(RECENT_DAYS);
    let activity_cutoff = now - Duration::days(ACTIVITY_DAYS);

    let total = products.len();
    let with_secondary = products.iter().filter(|p| p.has_secondary_ean()).count();

    ProductStats {
        total: count(total),
        with_secondary_ean: count(with_secondary),
        secondary_ean_percent: percent(with_secondary, total),
        recently_added: count(
            products
                .iter()
                .filter(|p| p.created_at > recent_cutoff)
                .count(),
        ),
        recently_updated: count(
            products
                .iter()
                .filter(|p| p.updated_at > recent_cutoff && p.was_modified())
                .count(),
        ),
        last_30_days_activity: count(
            history
                .iter()
                .filter(|entry| entry.timestamp > activity_cutoff)
                .count(),
        ),
    }
}

/// Rounded percentage, half away from zero; 0 for an empty whole.
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityAction, ProductChanges};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn product(days_old: i64, days_since_update: i64, secondary: &str) -> Product {
        Product {
            id: format!("{days_old}-{days_since_update}"),
            code: "C".to_string(),
            description: String::new(),
            ean_primary: "4006381333931".to_string(),
            ean_secondary: secondary.to_string(),
            created_at: now() - Duration::days(days_old),
            updated_at: now() - Duration::days(days_since_update),
        }
    }

    fn entry(days_old: i64) -> ActivityEntry {
        ActivityEntry {
            id: format!("a-{days_old}"),
            product_id: "p".to_string(),
            action: ActivityAction::Created,
            timestamp: now() - Duration::days(days_old),
            changes: ProductChanges::default(),
            previous_values: None,
        }
    }

    #[test]
    fn test_empty_catalog() {
        let stats = compute_stats(&[], &[], now());
        assert_eq!(stats, ProductStats::default());
    }

    #[test]
    fn test_counters() {
        let products = vec![
            product(1, 1, ""),                // new, never edited
            product(20, 2, "1234567890128"),  // old, edited recently
            product(30, 30, ""),              // old, untouched
        ];
        let history = vec![entry(0), entry(29), entry(31)];

        let stats = compute_stats(&products, &history, now());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.with_secondary_ean, 1);
        assert_eq!(stats.secondary_ean_percent, 33);
        assert_eq!(stats.recently_added, 1);
        assert_eq!(stats.recently_updated, 1);
        assert_eq!(stats.last_30_days_activity, 2);
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let stats = compute_stats(&[product(7, 7, "")], &[entry(30)], now());
        assert_eq!(stats.recently_added, 0);
        assert_eq!(stats.last_30_days_activity, 0);
    }

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(0, 0), 0);
    }
}
