//! Tests for ownership aggregation

use herd_ledger::algorithm::ownership::{OwnershipAggregator, OwnershipStatistics};
use herd_ledger::models::{GlobalTotals, OwnershipStats};
use herd_ledger::utils::test::{buffalo, buffalo_with_calves, calf, ids};
use serde_json::{Value, json};

fn herd() -> Vec<Value> {
    vec![
        buffalo_with_calves("B1", "1", &[json!({"id": "C1"}), json!({"id": "R5"})]),
        buffalo_with_calves("B2", "2", &[json!({"id": "R5"})]),
        calf("C1", "1"),
        calf("C2", "2"),
        buffalo("B3", "3"),
        json!({"id": "X1", "investor_id": "1", "type": "sheep"}),
    ]
}

#[test]
fn test_buffalo_with_two_embedded_calves() {
    let records = vec![buffalo_with_calves(
        "B1",
        "1",
        &[json!({"id": "C1"}), json!({"id": "C2"})],
    )];
    let outcome = OwnershipAggregator::default().aggregate(&records, &ids(&["1"]));

    assert_eq!(
        outcome.totals,
        GlobalTotals {
            total_animals: 3,
            total_buffaloes: 1,
            total_calves: 2,
        }
    );
    let stats = outcome.stats_for("1");
    assert_eq!((stats.buffalo_count, stats.calf_count, stats.total), (1, 2, 3));
}

#[test]
fn test_calf_listed_top_level_and_embedded_counts_once() {
    let records = vec![
        buffalo_with_calves("B1", "1", &[json!({"id": "C1"})]),
        calf("C1", "1"),
    ];
    let outcome = OwnershipAggregator::default().aggregate(&records, &ids(&["1"]));
    assert_eq!(outcome.stats_for("1").calf_count, 1);
    assert_eq!(outcome.totals.total_calves, 1);
}

#[test]
fn test_calf_embedded_in_two_buffaloes_counts_once() {
    let records = vec![
        buffalo_with_calves("B1", "1", &[json!({"id": "R5"})]),
        buffalo_with_calves("B2", "1", &[json!({"id": "R5"})]),
    ];
    let outcome = OwnershipAggregator::default().aggregate(&records, &ids(&["1"]));
    assert_eq!(outcome.stats_for("1").calf_count, 1);
    assert_eq!(outcome.totals.total_buffaloes, 2);
}

#[test]
fn test_rfid_only_calf_in_two_investors_buffaloes_counts_once() {
    let records = vec![
        buffalo_with_calves("B1", "1", &[json!({"rfid": "R5"})]),
        buffalo_with_calves("B2", "2", &[json!({"rfid": "R5"})]),
    ];
    let outcome = OwnershipAggregator::default().aggregate(&records, &ids(&["1", "2"]));
    assert_eq!(outcome.totals.total_calves, 1);
    assert_eq!(outcome.stats_for("1").calf_count, 1);
    assert_eq!(outcome.stats_for("2").calf_count, 0);
    assert_eq!(outcome.diagnostics.duplicate_calves_skipped, 1);
}

#[test]
fn test_total_calves_equals_distinct_calf_identities() {
    let outcome = OwnershipAggregator::default().aggregate(&herd(), &ids(&["1", "2", "3"]));

    // C1, R5 and C2.
    assert_eq!(outcome.totals.total_calves, 3);
    assert_eq!(outcome.totals.total_buffaloes, 3);
    assert_eq!(outcome.totals.total_animals, 6);

    let per_investor: usize = outcome.by_investor.values().map(|s| s.total).sum();
    assert_eq!(per_investor, outcome.totals.total_animals);
    for stats in outcome.by_investor.values() {
        assert_eq!(stats.total, stats.buffalo_count + stats.calf_count);
        assert!(stats.fetched);
    }
    assert_eq!(outcome.diagnostics.unclassified_records, 1);
}

#[test]
fn test_aggregation_is_idempotent_and_order_independent() {
    let aggregator = OwnershipAggregator::default();
    let scope = ids(&["1", "2", "3"]);
    let first = aggregator.aggregate(&herd(), &scope);
    let second = aggregator.aggregate(&herd(), &scope);
    assert_eq!(first, second);

    let mut reversed = herd();
    reversed.reverse();
    let third = aggregator.aggregate(&reversed, &scope);
    assert_eq!(third.totals, first.totals);
}

#[test]
fn test_zero_investors_are_fetched() {
    let outcome = OwnershipAggregator::default().aggregate(&[], &ids(&["a", "b"]));
    assert_eq!(outcome.stats_for("a"), OwnershipStats::zero("a"));
    assert!(outcome.stats_for("b").fetched);
    assert_eq!(outcome.totals, GlobalTotals::default());
}

#[test]
fn test_summary_lists_largest_holdings() {
    let outcome = OwnershipAggregator::default().aggregate(&herd(), &ids(&["1", "2", "3"]));
    let top = OwnershipStatistics::top_investors(&outcome, 1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].investor_id, "1");

    let summary = OwnershipStatistics::generate_summary(&outcome, 3);
    assert!(summary.contains("Total Animals: 6"));
    assert!(summary.contains("Calves: 3"));
}
