//! Tests for investor detail composition

use herd_ledger::config::OwnershipConfig;
use herd_ledger::detail::InvestorDetailComposer;
use herd_ledger::models::{DisplayFilter, Investor};
use herd_ledger::utils::test::{Endpoint, FixtureApi, calf};
use serde_json::json;

fn investor_api() -> FixtureApi {
    FixtureApi::new()
        .with_animals(json!({"data": [
            {
                "id": "B1", "investor_id": 7, "animal_type": "BUFFALO", "rfid": "R1",
                "farm_id": 1, "shed_id": "s1", "parking_position": "A4",
                "calves": [{"id": "C1"}]
            },
            calf("C1", "7"),
            calf("C3", "7"),
            {"id": "G1", "investor_id": 7, "animal_type": "goat"},
            {"id": "B9", "investor_id": 8, "animal_type": "BUFFALO"}
        ]}))
        .with_calves("R1", json!([
            {"id": "C1", "parent_rfid": "R1"},
            {"id": "C2", "parent_rfid": "R1"}
        ]))
        .with_farms(json!([{"id": 1, "name": "Riverside"}]))
        .with_sheds("1", json!({"data": [{"id": "s1", "shed_name": "East"}]}))
        .with_employees(json!([
            {"id": 1, "first_name": "Asha", "last_name": "Rao", "role": "doctor", "farm_id": 1},
            {"id": 2, "first_name": "Vikram", "roles": ["manager"], "farm_id": 1}
        ]))
}

#[tokio::test]
async fn test_all_filter_nests_linked_calves_and_appends_standalone() {
    let api = investor_api();
    let config = OwnershipConfig::default();
    let view = InvestorDetailComposer::new(&api, &config)
        .compose(&Investor::new("7"), DisplayFilter::All)
        .await;

    assert!(view.is_complete());
    assert_eq!(view.buffalo_count, 1);
    // C1 (embedded and fetched), C2 (fetched), C3 (standalone).
    assert_eq!(view.calf_count, 3);
    assert_eq!(view.rows.len(), 2);

    let buffalo = &view.rows[0];
    assert_eq!(buffalo.id, "B1");
    assert_eq!(buffalo.farm_name, "Riverside");
    assert_eq!(buffalo.shed_name, "East");
    assert_eq!(buffalo.doctor_name, "Asha Rao");
    assert_eq!(buffalo.manager_name, "Vikram");
    let linked: Vec<&str> = buffalo.linked_calves.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(linked, vec!["C1", "C2"]);
    assert_eq!(buffalo.row_count(), 3);

    let standalone = &view.rows[1];
    assert_eq!(standalone.id, "C3");
    assert_eq!(standalone.farm_name, "N/A");
    assert_eq!(standalone.doctor_name, "Not Assigned");
}

#[tokio::test]
async fn test_calf_filter_flattens_with_inherited_location() {
    let api = investor_api();
    let config = OwnershipConfig::default();
    let view = InvestorDetailComposer::new(&api, &config)
        .compose(&Investor::new("7"), DisplayFilter::Calf)
        .await;

    let ids: Vec<&str> = view.rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["C1", "C2", "C3"]);
    let fetched = &view.rows[1];
    assert_eq!(fetched.kind, "CALF");
    assert_eq!(fetched.parent_id.as_deref(), Some("R1"));
    assert_eq!(fetched.farm_name, "Riverside");
    assert_eq!(fetched.shed_name, "East");
    assert_eq!(fetched.position, "A4");
    assert!(view.rows.iter().all(|r| r.linked_calves.is_empty()));
}

#[tokio::test]
async fn test_buffalo_filter_hides_standalone_calves() {
    let api = investor_api();
    let config = OwnershipConfig::default();
    let view = InvestorDetailComposer::new(&api, &config)
        .compose(&Investor::new("7"), DisplayFilter::from("buffalo"))
        .await;

    assert_eq!(view.filter, DisplayFilter::Buffalo);
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].linked_calves.len(), 2);
}

#[tokio::test]
async fn test_farm_lookup_failure_falls_back_to_farm_number() {
    let api = investor_api().failing(Endpoint::Farms);
    let config = OwnershipConfig::default();
    let view = InvestorDetailComposer::new(&api, &config)
        .compose(&Investor::new("7"), DisplayFilter::All)
        .await;

    assert_eq!(view.rows[0].farm_name, "Farm #1");
    assert_eq!(view.rows[0].shed_name, "East");
    assert_eq!(view.degraded, vec!["farms".to_string()]);
}

#[tokio::test]
async fn test_sub_fetch_failures_degrade_gracefully() {
    let api = investor_api()
        .failing(Endpoint::CalvesByTag)
        .failing(Endpoint::Sheds)
        .failing(Endpoint::Employees);
    let config = OwnershipConfig::default().with_calf_fetch_concurrency(1);
    let view = InvestorDetailComposer::new(&api, &config)
        .compose(&Investor::new("7"), DisplayFilter::All)
        .await;

    let buffalo = &view.rows[0];
    assert_eq!(buffalo.linked_calves.len(), 1);
    assert_eq!(buffalo.shed_name, "Shed #s1");
    assert_eq!(buffalo.doctor_name, "Not Assigned");
    assert!(view.degraded.contains(&"calves/R1".to_string()));
    assert!(view.degraded.contains(&"employees".to_string()));
    assert!(view.degraded.contains(&"sheds/1".to_string()));
    assert_eq!(view.calf_count, 2);
}

#[tokio::test]
async fn test_failed_animal_fetch_gives_empty_view() {
    let api = investor_api().failing(Endpoint::InvestorAnimals);
    let config = OwnershipConfig::default();
    let view = InvestorDetailComposer::new(&api, &config)
        .compose(&Investor::new("7"), DisplayFilter::All)
        .await;

    assert!(view.rows.is_empty());
    assert_eq!(view.degraded, vec!["animals/7".to_string()]);
    assert_eq!(api.calls(Endpoint::CalvesByTag), 0);
}

#[tokio::test]
async fn test_calf_lookups_run_once_per_buffalo() {
    let api = FixtureApi::new().with_animals(json!([
        {"id": "B1", "investor_id": 1, "type": "BUFFALO", "rfid": "R1"},
        {"id": "B2", "investor_id": 1, "type": "BUFFALO", "rfid": "R2"},
        {"id": "B3", "investor_id": 1, "type": "BUFFALO"}
    ]));
    let config = OwnershipConfig::default().with_calf_fetch_concurrency(2);
    let view = InvestorDetailComposer::new(&api, &config)
        .compose(&Investor::new("1"), DisplayFilter::Buffalo)
        .await;

    let ids: Vec<&str> = view.rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["B1", "B2", "B3"]);
    assert_eq!(api.calls(Endpoint::CalvesByTag), 2);
}
