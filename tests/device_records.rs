//! Inventory drivers through resolution, catalog lookup and metadata folding.

mod common;

use catmeta::{
    CatalogLocator, InMemoryTrustListStore, MetadataScanner, MetadataState, ScanConfig,
    SignedDriver, StaticInventory,
};
use common::trust_list;
use std::fs;

fn driver(name: &str, manufacturer: &str, inf: &str, signed: &str, hwids: &[&str]) -> SignedDriver {
    SignedDriver {
        device_name: name.to_string(),
        version: "1.0.0.1".to_string(),
        manufacturer: manufacturer.to_string(),
        inf_name: inf.to_string(),
        pnp_device_id: format!("ROOT\\{name}\\0000"),
        signed_hardware_id: signed.to_string(),
        hardware_ids: hwids.iter().map(|s| s.to_string()).collect(),
        compatible_ids: vec!["*PNP0C02".to_string()],
    }
}

#[test]
fn locator_maps_inf_names_to_existing_catalogs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("oem7.cat"), b"x").unwrap();
    let locator = CatalogLocator::new(dir.path(), "cat");

    assert_eq!(locator.locate("oem7.inf"), Some(dir.path().join("oem7.cat")));
    assert_eq!(locator.locate("oem7"), Some(dir.path().join("oem7.cat")));
    assert_eq!(locator.locate("oem8.inf"), None);
    assert_eq!(locator.locate("  "), None);
}

#[test]
fn driver_record_combines_resolution_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let cat = dir.path().join("oem7.cat");
    fs::write(&cat, b"x").unwrap();

    let config = ScanConfig {
        catalog_root: dir.path().to_path_buf(),
        ..ScanConfig::default()
    };
    let store = InMemoryTrustListStore::new().with_catalog(
        &cat,
        trust_list(&[("HWID1", "ACPI\\VEN_IDE&DEV_200A"), ("OSAttr", "2:10.0")]),
    );
    let scanner = MetadataScanner::new(config, store);

    let record = scanner.describe_driver(&driver(
        "Touchpad",
        "Contoso",
        "oem7.inf",
        "ACPI\\VEN_IDE&DEV_200A",
        &["ACPI\\VEN_IDE&DEV_200A", "ACPI\\IDE200A", "acpi\\ide200a"],
    ));

    assert_eq!(record.raw_matched_hardware_id, "ACPI\\VEN_IDE&DEV_200A");
    assert_eq!(record.display_matched_hardware_id, "ACPI\\IDE200A");
    assert_eq!(record.hardware_ids.len(), 2);
    assert_eq!(record.catalog_path.as_deref(), Some(cat.as_path()));
    assert_eq!(record.metadata_state, MetadataState::Found);
    assert_eq!(record.metadata.get("OSAttr"), Some("2:10.0"));
    assert_eq!(record.metadata.get("HWID1"), None);

    let shown = record.to_string();
    assert!(shown.contains("► ACPI\\IDE200A   [HIT ID]"));
    assert!(shown.contains("Matched HWID (DISPLAY): ACPI\\IDE200A"));
}

#[test]
fn driver_without_catalog_is_reported_explicitly() {
    let dir = tempfile::tempdir().unwrap();
    let config = ScanConfig {
        catalog_root: dir.path().to_path_buf(),
        ..ScanConfig::default()
    };
    let scanner = MetadataScanner::new(config, InMemoryTrustListStore::new());

    let record = scanner.describe_driver(&driver("Orphan", "Contoso", "", "", &[]));
    assert_eq!(record.metadata_state, MetadataState::NoCatalog);
    assert_eq!(record.raw_matched_hardware_id, "");
    assert_eq!(record.display_matched_hardware_id, "");
    assert!(record.to_string().contains("Catalog: Not found or not signed."));
}

#[test]
fn inventory_scan_applies_manufacturer_filter() {
    let dir = tempfile::tempdir().unwrap();
    let config = ScanConfig {
        catalog_root: dir.path().to_path_buf(),
        manufacturer_filter: Some("lenovo".to_string()),
        ..ScanConfig::default()
    };
    let scanner = MetadataScanner::new(config, InMemoryTrustListStore::new());
    let inventory = StaticInventory::new(vec![
        driver("Camera", "Lenovo", "oem1.inf", "USB\\VID_1&PID_2", &["USB\\VID_1&PID_2"]),
        driver("Audio", "Contoso", "oem2.inf", "HDAUDIO\\X", &["HDAUDIO\\X"]),
    ]);

    let records = scanner.scan_inventory(&inventory).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].device_name, "Camera");
    assert_eq!(records[0].display_matched_hardware_id, "USB\\VID_1&PID_2");

    assert_eq!(scanner.scan_inventory(&inventory).unwrap(), records);
}
