//! Canonical sheet catalog and the `concerns` table DDL.

use rv_core::enums::{TABLE_VDATASTORE, TABLE_VHOST, TABLE_VINFO, TABLE_VNETWORK};

// ── Canonical sheets ───────────────────────────────────────────────────────

/// One expected sheet of the tabular export and the raw table it lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sheet {
    /// Sheet label as written by the inspection tool (case-sensitive).
    pub label: &'static str,
    /// Raw table name in the analytical store.
    pub table: &'static str,
}

pub const TABLE_VCPU: &str = "vcpu";
pub const TABLE_VMEMORY: &str = "vmemory";
pub const TABLE_VDISK: &str = "vdisk";
pub const TABLE_VPARTITION: &str = "vpartition";
pub const TABLE_VCLUSTER: &str = "vcluster";
pub const TABLE_DVSWITCH: &str = "dvswitch";
pub const TABLE_VHBA: &str = "vhba";
pub const TABLE_DVPORT: &str = "dvport";

/// Every sheet the tabular adapter tries to materialize, in load order.
pub const SHEETS: &[Sheet] = &[
    Sheet { label: "vInfo", table: TABLE_VINFO },
    Sheet { label: "vCPU", table: TABLE_VCPU },
    Sheet { label: "vMemory", table: TABLE_VMEMORY },
    Sheet { label: "vDisk", table: TABLE_VDISK },
    Sheet { label: "vPartition", table: TABLE_VPARTITION },
    Sheet { label: "vHost", table: TABLE_VHOST },
    Sheet { label: "vDatastore", table: TABLE_VDATASTORE },
    Sheet { label: "vNetwork", table: TABLE_VNETWORK },
    Sheet { label: "vCluster", table: TABLE_VCLUSTER },
    Sheet { label: "dvSwitch", table: TABLE_DVSWITCH },
    Sheet { label: "vHBA", table: TABLE_VHBA },
    Sheet { label: "dvPort", table: TABLE_DVPORT },
];

/// Whether `table` is one of the canonical raw tables (case-insensitive).
#[must_use]
pub fn is_canonical_table(table: &str) -> bool {
    SHEETS.iter().any(|s| s.table.eq_ignore_ascii_case(table))
}

// ── Concerns table ─────────────────────────────────────────────────────────

pub const CONCERNS_TABLE: &str = "concerns";

pub const VM_ID_COL: &str = "VM_ID";
pub const CONCERN_ID_COL: &str = "Concern_ID";
pub const LABEL_COL: &str = "Label";
pub const CATEGORY_COL: &str = "Category";
pub const ASSESSMENT_COL: &str = "Assessment";

/// Persisted concerns. No uniqueness constraint: readers de-duplicate.
pub const CREATE_CONCERNS: &str = r#"
CREATE TABLE IF NOT EXISTS concerns (
    "VM_ID" VARCHAR,
    "Concern_ID" VARCHAR,
    "Label" VARCHAR,
    "Category" VARCHAR,
    "Assessment" VARCHAR
);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_lowercased_labels() {
        for sheet in SHEETS {
            assert_eq!(sheet.table, sheet.label.to_lowercase());
        }
    }

    #[test]
    fn canonical_lookup_ignores_case() {
        assert!(is_canonical_table("VHBA"));
        assert!(is_canonical_table("dvport"));
        assert!(!is_canonical_table("concerns"));
    }
}
