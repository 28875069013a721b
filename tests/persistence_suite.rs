mod common;

use std::fs;

use common::{at, setup_manager};
use gas_ledger::{
    domain::{InputMode, Pricing},
    storage::{JsonStorage, StorageBackend},
};
use serde_json::Value;
use tempfile::tempdir;

#[test]
fn persisted_document_uses_date_keyed_layout() {
    let (manager, _clock, guard) = setup_manager(at(2025, 9, 9, 14));
    manager
        .sell(5.0, InputMode::Weight, &Pricing::new(1000.0, 900.0))
        .unwrap();

    let raw = fs::read_to_string(guard.path().join("gas_sales_data.json")).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    let day = &json["2025-09-09"];
    assert_eq!(day["totalKg"], 5.0);
    assert_eq!(day["totalAmount"], 5000.0);
    assert_eq!(day["totalProfit"], 500.0);
    let sale = &day["sales"][0];
    assert_eq!(sale["kg"], 5.0);
    assert_eq!(sale["amount"], 5000.0);
    assert_eq!(sale["profit"], 500.0);
    assert_eq!(sale["time"], "14:00:00");
}

#[test]
fn reads_documents_written_by_the_browser_app() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), None).unwrap();
    fs::write(
        storage.ledger_path(),
        r#"{"2024-11-02":{"totalKg":1.5,"totalAmount":1500,"totalProfit":150,
            "sales":[{"kg":1.5,"amount":1500,"profit":150,"time":"3:15:42 PM"}]}}"#,
    )
    .unwrap();

    let ledger = storage.try_load().expect("compatible document");
    let (date, record) = ledger.iter().next().unwrap();
    assert_eq!(date.to_string(), "2024-11-02");
    assert_eq!(record.sales[0].time, "3:15:42 PM");
}

#[test]
fn corrupted_document_is_treated_as_no_data() {
    let (manager, _clock, guard) = setup_manager(at(2025, 9, 9, 14));
    fs::write(guard.path().join("gas_sales_data.json"), "{\"2025-09-09\": [").unwrap();

    assert!(manager.load().is_empty());
    let record = manager.get_or_create_today().expect("recreate today");
    assert!(record.is_empty());
    assert_eq!(manager.load().len(), 1);

    let backups = manager.storage().list_backups().unwrap();
    assert_eq!(backups.len(), 1, "got {backups:?}");
    let kept = fs::read_to_string(guard.path().join("backups").join(&backups[0])).unwrap();
    assert_eq!(kept, "{\"2025-09-09\": [");
}

#[test]
fn failed_save_preserves_original_file() {
    let (manager, _clock, guard) = setup_manager(at(2025, 9, 9, 14));
    let pricing = Pricing::new(1000.0, 900.0);
    manager.sell(1.0, InputMode::Weight, &pricing).unwrap();
    let path = guard.path().join("gas_sales_data.json");
    let original = fs::read_to_string(&path).unwrap();

    // A directory at the temp path makes the staged write fail.
    fs::create_dir_all(guard.path().join("gas_sales_data.json.tmp")).unwrap();
    let err = manager
        .sell(2.0, InputMode::Weight, &pricing)
        .expect_err("staged write must fail");
    assert!(err.to_string().contains("Storage unavailable"));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn new_day_writes_recoverable_snapshot() {
    let (manager, _clock, guard) = setup_manager(at(2025, 9, 9, 14));
    manager
        .sell(3.0, InputMode::Weight, &Pricing::new(1000.0, 900.0))
        .unwrap();
    let report = manager.start_new_day().unwrap();
    let backup = report.backup.expect("snapshot taken");
    assert!(backup.ends_with("_before-new-day.json"), "got {backup}");

    let raw = fs::read_to_string(guard.path().join("backups").join(&backup)).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["2025-09-09"]["totalKg"], 3.0);
}

#[test]
fn export_writes_csv_named_after_today() {
    let (manager, _clock, guard) = setup_manager(at(2025, 9, 9, 14));
    let pricing = Pricing::new(1000.0, 900.0);
    manager.sell(2000.0, InputMode::Money, &pricing).unwrap();
    manager.sell(0.5, InputMode::Weight, &pricing).unwrap();

    let out = guard.path().join("exports");
    let path = manager.export_today(&out).unwrap();
    assert_eq!(path.file_name().unwrap(), "GasSales_2025-09-09.csv");
    let csv = fs::read_to_string(path).unwrap();
    assert_eq!(
        csv,
        "Time,KG,Amount,Profit\n14:00:00,2.00,2000.00,200.00\n14:00:00,0.50,500.00,50.00\n"
    );
}

#[test]
fn export_without_sales_fails() {
    let (manager, _clock, guard) = setup_manager(at(2025, 9, 9, 14));
    assert!(manager.export_today(guard.path()).is_err());
    assert!(!guard.path().join("GasSales_2025-09-09.csv").exists());
}
