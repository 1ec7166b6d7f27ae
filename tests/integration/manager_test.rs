//! Integration tests for the ownership manager

use std::sync::Arc;
use std::time::Duration;

use herd_ledger::models::{DisplayFilter, Investor, OwnershipStats};
use herd_ledger::utils::test::{Endpoint, FixtureApi, buffalo, buffalo_with_calves, calf, ids};
use herd_ledger::{OwnershipConfig, OwnershipManager};
use serde_json::json;

fn herd_api() -> FixtureApi {
    FixtureApi::new().with_animals(json!({"data": {"items": [
        buffalo_with_calves("B1", "1", &[json!({"id": "C1"}), json!({"id": "C2"})]),
        calf("C1", "1"),
        buffalo("B2", "2"),
        buffalo("B3", "99"),
    ]}}))
}

#[tokio::test]
async fn test_concurrent_page_loads_fetch_once() {
    let api = Arc::new(herd_api().with_delay(Duration::from_millis(25)));
    let manager = OwnershipManager::new(api.clone(), OwnershipConfig::default());

    let page_one = ids(&["1", "2"]);
    let page_two = ids(&["3"]);
    let (first, second, _) = futures::join!(
        manager.load_page(&page_one),
        manager.load_page(&page_two),
        manager.refresh(),
    );

    assert_eq!(api.calls(Endpoint::AllAnimals), 1);
    assert_eq!(first[0].total, 3);
    assert_eq!(first[1].total, 1);
    assert_eq!(second[0], OwnershipStats::zero("3"));
}

#[tokio::test]
async fn test_stats_unavailable_until_fetched() {
    let manager = OwnershipManager::new(Arc::new(herd_api()), OwnershipConfig::default());
    assert_eq!(manager.get_ownership_stats("1"), None);
    assert_eq!(manager.get_global_totals().total_animals, 0);

    manager.load_page(&ids(&["1"])).await;
    let stats = manager.get_ownership_stats("1").unwrap();
    assert_eq!((stats.buffalo_count, stats.calf_count), (1, 2));

    let totals = manager.get_global_totals();
    assert_eq!(totals.total_buffaloes, 3);
    assert_eq!(totals.total_calves, 2);
    assert_eq!(totals.total_animals, 5);
}

#[tokio::test]
async fn test_owners_outside_the_scope_are_reported() {
    let manager = OwnershipManager::new(Arc::new(herd_api()), OwnershipConfig::default());
    manager.load_page(&ids(&["1", "2"])).await;

    let diagnostics = manager.last_diagnostics();
    assert_eq!(diagnostics.orphaned_owners, vec!["99".to_string()]);
    assert_eq!(diagnostics.duplicate_calves_skipped, 1);
    assert_eq!(manager.get_ownership_stats("99").map(|s| s.total), Some(1));
}

#[tokio::test]
async fn test_orphans_reconciled_against_full_investor_list() {
    let manager = OwnershipManager::new(Arc::new(herd_api()), OwnershipConfig::default());
    manager.set_known_investors(&ids(&["1", "2", "3"])).unwrap();

    manager.load_page(&ids(&["1"])).await;
    assert_eq!(manager.last_diagnostics().orphaned_owners, ids(&["99"]));

    manager.refresh().await.unwrap();
    assert_eq!(manager.last_diagnostics().orphaned_owners, ids(&["99"]));
    assert_eq!(manager.get_ownership_stats("2").map(|s| s.total), Some(1));
}

#[tokio::test]
async fn test_detail_view_through_manager() {
    let manager = OwnershipManager::new(Arc::new(herd_api()), OwnershipConfig::default());
    let view = manager
        .compose_investor_detail(&Investor::new("1"), DisplayFilter::Calf)
        .await;

    assert_eq!(view.buffalo_count, 1);
    assert_eq!(view.calf_count, 2);
    assert_eq!(view.rows.len(), 2);
    assert!(view.is_complete());
}

#[tokio::test]
async fn test_scope_token_from_configuration() {
    let config = OwnershipConfig::from_lookup(|key| {
        (key == "HERD_SCOPE_TOKEN").then(|| "herd-2025".to_string())
    })
    .unwrap();
    let api = Arc::new(herd_api());
    let manager = OwnershipManager::new(api.clone(), config);

    manager.load_page(&ids(&["2"])).await;
    manager.invalidate().unwrap();
    manager.load_page(&ids(&["2"])).await;

    assert_eq!(manager.config().scope_token, "herd-2025");
    assert_eq!(api.calls(Endpoint::AllAnimals), 2);
}
