//! Concern store round-trips against the `concerns` table.

use pretty_assertions::assert_eq;
use rv_core::entities::{Concern, ConcernRecord};
use rv_lake::{ConcernFilter, ConcernStore, ConcernValueBatch, InventoryLake};

fn concern(id: &str, label: &str) -> Concern {
    Concern {
        id: id.to_string(),
        label: label.to_string(),
        category: "Critical".to_string(),
        assessment: format!("{label} must be fixed before migration"),
    }
}

fn seed(lake: &InventoryLake) {
    let mut batch = ConcernValueBatch::new();
    batch
        .append("vm-002", &[concern("c-001", "Shared disk")])
        .append("vm-001", &[concern("c-002", "USB controller"), concern("c-001", "Shared disk")]);
    let written = ConcernStore::new(lake.conn()).insert(&batch).unwrap();
    assert_eq!(written, 3);
}

#[test]
fn get_filtered_to_one_vm_returns_its_concerns() {
    let lake = InventoryLake::open_in_memory().unwrap();
    seed(&lake);

    let store = ConcernStore::new(lake.conn());
    let concerns = store
        .get(&ConcernFilter::new().where_vm_id(["vm-001"]))
        .unwrap();

    assert_eq!(
        concerns,
        vec![concern("c-001", "Shared disk"), concern("c-002", "USB controller")]
    );
}

#[test]
fn get_with_empty_filter_matches_everything() {
    let lake = InventoryLake::open_in_memory().unwrap();
    seed(&lake);

    let store = ConcernStore::new(lake.conn());
    // Four-field DISTINCT: the shared-disk concern of both VMs collapses.
    assert_eq!(store.get(&ConcernFilter::new()).unwrap().len(), 2);
    assert_eq!(store.records(&ConcernFilter::new()).unwrap().len(), 3);
}

#[test]
fn get_with_no_match_is_empty_not_error() {
    let lake = InventoryLake::open_in_memory().unwrap();
    seed(&lake);

    let concerns = ConcernStore::new(lake.conn())
        .get(&ConcernFilter::new().where_vm_id(["vm-404"]))
        .unwrap();
    assert!(concerns.is_empty());
}

#[test]
fn duplicate_inserts_are_stored_but_read_once() {
    let lake = InventoryLake::open_in_memory().unwrap();
    let store = ConcernStore::new(lake.conn());
    let mut batch = ConcernValueBatch::new();
    batch.append("vm-001", &[concern("c-001", "Shared disk")]);

    store.insert(&batch).unwrap();
    store.insert(&batch).unwrap();

    assert_eq!(store.row_count(&ConcernFilter::new()).unwrap(), 2);
    assert_eq!(store.get(&ConcernFilter::new()).unwrap().len(), 1);
    assert_eq!(store.records(&ConcernFilter::new()).unwrap().len(), 1);
}

#[test]
fn records_are_ordered_by_vm_then_concern() {
    let lake = InventoryLake::open_in_memory().unwrap();
    seed(&lake);

    let records = ConcernStore::new(lake.conn())
        .records(&ConcernFilter::new())
        .unwrap();
    let keys: Vec<_> = records
        .iter()
        .map(|r| (r.vm_id.as_str(), r.concern_id.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![("vm-001", "c-001"), ("vm-001", "c-002"), ("vm-002", "c-001")]
    );
    assert_eq!(
        records[2],
        ConcernRecord::new("vm-002", &concern("c-001", "Shared disk"))
    );
}

#[test]
fn quotes_survive_the_round_trip() {
    let lake = InventoryLake::open_in_memory().unwrap();
    let store = ConcernStore::new(lake.conn());
    let tricky = concern("c-'7", "Can't snapshot");
    let mut batch = ConcernValueBatch::new();
    batch.append("vm-'o", std::slice::from_ref(&tricky));
    store.insert(&batch).unwrap();

    let back = store
        .get(&ConcernFilter::new().where_vm_id(["vm-'o"]))
        .unwrap();
    assert_eq!(back, vec![tricky]);
}

#[test]
fn delete_by_vm_then_everything() {
    let lake = InventoryLake::open_in_memory().unwrap();
    seed(&lake);
    let store = ConcernStore::new(lake.conn());

    let removed = store
        .delete(&ConcernFilter::new().where_vm_id(["vm-001"]))
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.row_count(&ConcernFilter::new()).unwrap(), 1);

    // An empty filter deletes every row.
    let removed = store.delete(&ConcernFilter::new()).unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.row_count(&ConcernFilter::new()).unwrap(), 0);
}

#[test]
fn concerns_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rvlake.duckdb");
    let path = path.to_str().unwrap();

    {
        let lake = InventoryLake::open_local(path).unwrap();
        seed(&lake);
    }

    let lake = InventoryLake::open_local(path).unwrap();
    assert_eq!(
        ConcernStore::new(lake.conn())
            .row_count(&ConcernFilter::new())
            .unwrap(),
        3
    );
}
