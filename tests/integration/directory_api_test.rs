//! End-to-end tests over a directory of JSON exports

use std::path::PathBuf;
use std::sync::Arc;

use herd_ledger::models::{DisplayFilter, Investor};
use herd_ledger::normalize::parse_list;
use herd_ledger::utils::test::ids;
use herd_ledger::{JsonDirectoryApi, LivestockApi, OwnershipConfig, OwnershipManager};
use serde_json::{Value, json};

struct DataDir {
    path: PathBuf,
}

impl DataDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("herd-ledger-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn write(&self, file: &str, payload: &Value) {
        std::fs::write(self.path.join(file), payload.to_string()).unwrap();
    }
}

impl Drop for DataDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn seed(dir: &DataDir) {
    dir.write(
        "animals.json",
        &json!({"data": [
            {"id": "B1", "investor_id": 1, "animal_type": "BUFFALO", "rfid_tag_number": "R1",
             "farm_id": 10, "shed_id": 100, "calves": [{"id": "C1"}]},
            {"id": "C2", "investor_id": 1, "animal_type": "CALF", "parent_rfid": "R1"},
            {"id": "B2", "investor_id": 2, "animal_type": "BUFFALO", "farm_id": 20}
        ]}),
    );
    dir.write(
        "investors.json",
        &json!([{"id": 1, "name": "Meera"}, {"id": 2, "full_name": "Arjun"}]),
    );
    dir.write("farms.json", &json!({"data": [{"id": 10, "farm_name": "Lakeview"}]}));
    dir.write(
        "sheds.json",
        &json!({"10": [{"id": 100, "name": "North Shed"}], "20": []}),
    );
    dir.write(
        "employees.json",
        &json!([{"id": 5, "firstName": "Kiran", "role": "Doctor", "farmId": 10}]),
    );
}

#[tokio::test]
async fn test_counts_from_json_directory() {
    let dir = DataDir::new("counts");
    seed(&dir);
    let api = Arc::new(JsonDirectoryApi::new(&dir.path));

    let investors = parse_list::<Investor>(api.fetch_investors().await.unwrap()).unwrap();
    assert_eq!(investors.len(), 2);
    assert_eq!(investors[1].name.as_deref(), Some("Arjun"));

    let manager = OwnershipManager::new(api, OwnershipConfig::default());
    let page = manager.load_page(&ids(&["1", "2"])).await;
    assert_eq!((page[0].buffalo_count, page[0].calf_count), (1, 2));
    assert_eq!(page[1].total, 1);
    assert_eq!(manager.get_global_totals().total_animals, 4);
}

#[tokio::test]
async fn test_detail_from_json_directory() {
    let dir = DataDir::new("detail");
    seed(&dir);
    let manager = OwnershipManager::new(
        Arc::new(JsonDirectoryApi::new(&dir.path)),
        OwnershipConfig::default(),
    );

    let view = manager
        .compose_investor_detail(&Investor::new("1"), DisplayFilter::All)
        .await;
    assert!(view.is_complete());
    assert_eq!(view.rows.len(), 1);

    let buffalo = &view.rows[0];
    assert_eq!(buffalo.farm_name, "Lakeview");
    assert_eq!(buffalo.shed_name, "North Shed");
    assert_eq!(buffalo.doctor_name, "Kiran");
    assert_eq!(buffalo.manager_name, "Not Assigned");
    let linked: Vec<&str> = buffalo.linked_calves.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(linked, vec!["C1", "C2"]);
}

#[tokio::test]
async fn test_missing_directory_leaves_counts_pending() {
    let manager = OwnershipManager::new(
        Arc::new(JsonDirectoryApi::new("/nonexistent/herd-ledger")),
        OwnershipConfig::default(),
    );
    let page = manager.load_page(&ids(&["1"])).await;
    assert!(!page[0].fetched);

    let view = manager
        .compose_investor_detail(&Investor::new("1"), DisplayFilter::All)
        .await;
    assert!(view.degraded.contains(&"animals/1".to_string()));
    assert!(view.degraded.contains(&"farms".to_string()));
}
