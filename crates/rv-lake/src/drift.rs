//! Column-drift resolution.
//!
//! Each logical field is declared once as an ordered chain of acceptable raw
//! column names. Resolution walks the chain against a [`SchemaSnapshot`] and
//! takes the first name present; fields resolve independently of each other.
//! A field with no match is projected as a typed NULL, so queries written
//! against the aliases never reference a column the export lacks.

use crate::probe::SchemaSnapshot;
use crate::schemas::{TABLE_DVPORT, TABLE_VCPU, TABLE_VDISK, TABLE_VHBA, TABLE_VMEMORY};
use crate::sql::{NULL_TEXT, ident, qualified};
use rv_core::enums::{TABLE_VDATASTORE, TABLE_VHOST, TABLE_VINFO, TABLE_VNETWORK};

/// Alias every projection CTE selects from.
pub const SOURCE_ALIAS: &str = "q";

/// One logical field and the raw column names that may carry it, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub alias: &'static str,
    pub candidates: &'static [&'static str],
}

impl FieldSpec {
    #[must_use]
    pub const fn new(alias: &'static str, candidates: &'static [&'static str]) -> Self {
        Self { alias, candidates }
    }

    /// The stored spelling of the first candidate `table` carries, if any.
    #[must_use]
    pub fn resolve<'s>(&self, snapshot: &'s SchemaSnapshot, table: &str) -> Option<&'s str> {
        self.candidates
            .iter()
            .find_map(|candidate| snapshot.column(table, candidate))
    }
}

/// The fields a query reads from one raw table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSet {
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
}

/// A field after resolution: its alias and the raw column chosen, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<'s> {
    pub alias: &'static str,
    pub column: Option<&'s str>,
}

impl FieldSet {
    /// Resolve every field against `snapshot`.
    #[must_use]
    pub fn resolve<'s>(&self, snapshot: &'s SchemaSnapshot) -> Vec<Resolved<'s>> {
        self.fields
            .iter()
            .map(|field| Resolved {
                alias: field.alias,
                column: field.resolve(snapshot, self.table),
            })
            .collect()
    }

    /// Select-list text mapping raw columns onto aliases.
    ///
    /// Resolved fields are cast to text so the aliases have one type no
    /// matter how the source was loaded:
    /// `q."Folder ID"::VARCHAR AS "folder", NULL::VARCHAR AS "uuid"`.
    #[must_use]
    pub fn projection(&self, snapshot: &SchemaSnapshot) -> String {
        self.resolve(snapshot)
            .iter()
            .map(|field| {
                let expr = field.column.map_or_else(
                    || NULL_TEXT.to_string(),
                    |col| format!("{}::VARCHAR", qualified(SOURCE_ALIAS, col)),
                );
                format!("{expr} AS {}", ident(field.alias))
            })
            .collect::<Vec<_>>()
            .join(",\n        ")
    }

    /// `FROM` target for a projection CTE: `vinfo q`.
    #[must_use]
    pub fn source(&self) -> String {
        format!("{} {SOURCE_ALIAS}", ident(self.table))
    }
}

// ── Field chains ───────────────────────────────────────────────────────────
//
// Only the folder and UUID chains are documented renames (current name
// first). The guest OS chain falls back from the tools-reported OS to the
// configured one. Everything else carries a single name.

pub const VINFO: FieldSet = FieldSet {
    table: TABLE_VINFO,
    fields: &[
        FieldSpec::new("vm_id", &["VM ID"]),
        FieldSpec::new("name", &["VM"]),
        FieldSpec::new("uuid", &["VM UUID", "SMBIOS UUID"]),
        FieldSpec::new("folder", &["Folder ID", "Folder"]),
        FieldSpec::new("host", &["Host"]),
        FieldSpec::new("cluster", &["Cluster"]),
        FieldSpec::new("datacenter", &["Datacenter"]),
        FieldSpec::new("power_state", &["Powerstate"]),
        FieldSpec::new("cpus", &["CPUs"]),
        FieldSpec::new("memory", &["Memory"]),
        FieldSpec::new(
            "guest_os",
            &[
                "OS according to the VMware Tools",
                "OS according to the configuration file",
            ],
        ),
        FieldSpec::new("firmware", &["Firmware"]),
        FieldSpec::new("template", &["Template"]),
        FieldSpec::new("vcenter_id", &["VI SDK UUID"]),
        FieldSpec::new("vcenter_server", &["VI SDK Server"]),
    ],
};

pub const VCPU: FieldSet = FieldSet {
    table: TABLE_VCPU,
    fields: &[
        FieldSpec::new("name", &["VM"]),
        FieldSpec::new("hot_add", &["Hot Add"]),
    ],
};

pub const VMEMORY: FieldSet = FieldSet {
    table: TABLE_VMEMORY,
    fields: &[
        FieldSpec::new("name", &["VM"]),
        FieldSpec::new("hot_add", &["Hot Add"]),
    ],
};

pub const VDISK: FieldSet = FieldSet {
    table: TABLE_VDISK,
    fields: &[
        FieldSpec::new("name", &["VM"]),
        FieldSpec::new("capacity_mib", &["Capacity MiB"]),
    ],
};

pub const VHOST: FieldSet = FieldSet {
    table: TABLE_VHOST,
    fields: &[
        FieldSpec::new("cluster", &["Cluster"]),
        FieldSpec::new("host", &["Host"]),
        FieldSpec::new("object_id", &["Object ID"]),
        FieldSpec::new("cores", &["# Cores"]),
        FieldSpec::new("sockets", &["# CPU"]),
        FieldSpec::new("memory", &["# Memory"]),
        FieldSpec::new("model", &["Model"]),
        FieldSpec::new("vendor", &["Vendor"]),
    ],
};

pub const VDATASTORE: FieldSet = FieldSet {
    table: TABLE_VDATASTORE,
    fields: &[
        FieldSpec::new("name", &["Name"]),
        FieldSpec::new("address", &["Address"]),
        FieldSpec::new("hosts", &["Hosts"]),
        FieldSpec::new("free_mib", &["Free MiB"]),
        FieldSpec::new("capacity_mib", &["Capacity MiB"]),
        FieldSpec::new("mha", &["MHA"]),
        FieldSpec::new("kind", &["Type"]),
    ],
};

pub const VHBA: FieldSet = FieldSet {
    table: TABLE_VHBA,
    fields: &[
        FieldSpec::new("device", &["Device"]),
        FieldSpec::new("kind", &["Type"]),
    ],
};

pub const VNETWORK: FieldSet = FieldSet {
    table: TABLE_VNETWORK,
    fields: &[
        FieldSpec::new("cluster", &["Cluster"]),
        FieldSpec::new("switch", &["Switch"]),
        FieldSpec::new("network", &["Network"]),
        FieldSpec::new("vm", &["VM"]),
    ],
};

pub const DVPORT: FieldSet = FieldSet {
    table: TABLE_DVPORT,
    fields: &[
        FieldSpec::new("port", &["Port"]),
        FieldSpec::new("vlan", &["VLAN"]),
    ],
};
