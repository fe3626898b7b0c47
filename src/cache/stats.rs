//! Stats Aggregator Module
//!
//! Derives count and average price from a collection snapshot.

use serde::Serialize;

use crate::catalog::Record;

// == Stats Snapshot ==
/// Aggregate metrics over the whole collection. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Number of records
    pub total: usize,
    /// Arithmetic mean of all prices, 0 for an empty collection
    pub average_price: f64,
}

impl StatsSnapshot {
    // == Compute ==
    /// Computes the aggregate for `records`.
    ///
    /// Prices are summed left to right in collection order so the result is
    /// bit-for-bit reproducible for the same content.
    pub fn compute(records: &[Record]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let sum = records.iter().fold(0.0_f64, |acc, r| acc + r.price);
        Self {
            total: records.len(),
            average_price: sum / records.len() as f64,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn priced(prices: &[f64]) -> Vec<Record> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| Record {
                id: i as u64 + 1,
                name: format!("Item {}", i),
                category: "Test".to_string(),
                price: *p,
            })
            .collect()
    }

    #[test]
    fn test_stats_empty() {
        let stats = StatsSnapshot::compute(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_price, 0.0);
    }

    #[test]
    fn test_stats_two_items() {
        let stats = StatsSnapshot::compute(&priced(&[100.0, 200.0]));
        assert_eq!(stats.total, 2);
        assert_eq!(stats.average_price, 150.0);
    }

    #[test]
    fn test_stats_three_items() {
        let stats = StatsSnapshot::compute(&priced(&[100.0, 200.0, 300.0]));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.average_price, 200.0);
    }

    #[test]
    fn test_stats_fractional_mean() {
        let stats = StatsSnapshot::compute(&priced(&[0.1, 0.2]));
        assert_eq!(stats.average_price, (0.1 + 0.2) / 2.0);
    }

    #[test]
    fn test_stats_serialize() {
        let json = serde_json::to_string(&StatsSnapshot::compute(&priced(&[10.0]))).unwrap();
        assert!(json.contains("\"total\":1"));
        assert!(json.contains("\"averagePrice\":10.0"));
    }
}
