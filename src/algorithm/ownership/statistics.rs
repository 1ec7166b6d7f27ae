//! Ownership statistics summaries
//!
//! Text reports over an aggregation outcome, for logs and the CLI.

use std::fmt::Write;

use itertools::Itertools;

use crate::algorithm::ownership::aggregator::AggregationOutcome;
use crate::models::OwnershipStats;

/// Functions for ownership summaries
pub struct OwnershipStatistics;

impl OwnershipStatistics {
    /// Investors ordered by total holdings, largest first, ties by id
    #[must_use]
    pub fn top_investors(outcome: &AggregationOutcome, limit: usize) -> Vec<&OwnershipStats> {
        outcome
            .by_investor
            .values()
            .filter(|s| s.total > 0)
            .sorted_by(|a, b| b.total.cmp(&a.total).then_with(|| a.investor_id.cmp(&b.investor_id)))
            .take(limit)
            .collect()
    }

    /// Average animals per investor that owns at least one
    #[must_use]
    pub fn average_holding(outcome: &AggregationOutcome) -> f64 {
        let holders: Vec<usize> = outcome
            .by_investor
            .values()
            .map(|s| s.total)
            .filter(|&t| t > 0)
            .collect();
        if holders.is_empty() {
            0.0
        } else {
            holders.iter().sum::<usize>() as f64 / holders.len() as f64
        }
    }

    /// Generate a herd ownership summary
    #[must_use]
    pub fn generate_summary(outcome: &AggregationOutcome, top: usize) -> String {
        let totals = &outcome.totals;
        let diagnostics = &outcome.diagnostics;
        let mut summary = String::new();

        let _ = writeln!(summary, "Herd Ownership Summary:");
        let _ = writeln!(summary, "  Total Animals: {}", totals.total_animals);
        let _ = writeln!(summary, "  Buffaloes: {}", totals.total_buffaloes);
        let _ = writeln!(summary, "  Calves: {}", totals.total_calves);
        let _ = writeln!(summary, "  Investors: {}", outcome.by_investor.len());
        let _ = writeln!(
            summary,
            "  Average Holding: {:.2}",
            Self::average_holding(outcome)
        );

        let leaders = Self::top_investors(outcome, top);
        if !leaders.is_empty() {
            let _ = writeln!(summary, "\nLargest Holdings:");
            for stats in leaders {
                let _ = writeln!(
                    summary,
                    "    {}: {} ({} buffaloes, {} calves)",
                    stats.investor_id, stats.total, stats.buffalo_count, stats.calf_count
                );
            }
        }

        let _ = writeln!(summary, "\nReconciliation:");
        let _ = writeln!(summary, "  Records Seen: {}", diagnostics.records_seen);
        let _ = writeln!(summary, "  Unowned Animals: {}", diagnostics.unowned_animals);
        let _ = writeln!(
            summary,
            "  Unclassified Records: {}",
            diagnostics.unclassified_records
        );
        let _ = writeln!(
            summary,
            "  Positional Identities: {}",
            diagnostics.placeholder_identities
        );
        let _ = writeln!(
            summary,
            "  Duplicate Calves Skipped: {}",
            diagnostics.duplicate_calves_skipped
        );
        if !diagnostics.orphaned_owners.is_empty() {
            let _ = writeln!(
                summary,
                "  Unknown Owners: {}",
                diagnostics.orphaned_owners.join(", ")
            );
        }

        summary
    }
}
