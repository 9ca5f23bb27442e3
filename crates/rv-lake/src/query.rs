//! Query synthesis: from a [`SchemaSnapshot`] to a per-domain [`QuerySet`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use rv_core::QueryType;
use serde::Serialize;

use crate::drift::{self, FieldSet};
use crate::error::SynthesisError;
use crate::probe::SchemaSnapshot;
use crate::protocol::{CaseColumns, render_case};
use crate::schemas::{SHEETS, TABLE_DVPORT, TABLE_VDISK, TABLE_VHBA};
use crate::sql::{NULL_TEXT, NULL_TEXT_LIST, ident, literal, qualified};
use crate::templates::QueryTemplates;

/// Schema name the foreign snapshot is attached under while ingesting.
pub const FOREIGN_SCHEMA: &str = "snapshot";

/// Prefix of the numbered per-NIC network columns on the VM sheet.
pub const NETWORK_COLUMN_PREFIX: &str = "Network #";

/// Where an ingest reads from. Exactly one source per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum Source {
    /// A spreadsheet export from the inspection tool.
    Tabular(PathBuf),
    /// A relational (`SQLite`) snapshot from the migration-planning tool.
    Foreign(PathBuf),
}

impl Source {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Tabular(path) | Self::Foreign(path) => path,
        }
    }

    /// Engine extension the adapter for this source needs.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Tabular(_) => "excel",
            Self::Foreign(_) => "sqlite",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tabular(path) => write!(f, "spreadsheet {}", path.display()),
            Self::Foreign(path) => write!(f, "snapshot {}", path.display()),
        }
    }
}

/// Synthesized query text per report domain.
///
/// A domain absent from the set is not reportable for this source. A domain
/// present with an error had its prerequisites but its template failed to
/// render; other domains are unaffected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySet {
    entries: BTreeMap<QueryType, Result<String, SynthesisError>>,
}

impl QuerySet {
    /// Query text for `kind`, if it rendered.
    #[must_use]
    pub fn get(&self, kind: QueryType) -> Option<&str> {
        match self.entries.get(&kind) {
            Some(Ok(sql)) => Some(sql.as_str()),
            _ => None,
        }
    }

    /// The rendering failure for `kind`, if there was one.
    #[must_use]
    pub fn error(&self, kind: QueryType) -> Option<&SynthesisError> {
        self.entries.get(&kind).and_then(|entry| entry.as_ref().err())
    }

    /// Whether `kind` has an entry at all (query or error).
    #[must_use]
    pub fn contains(&self, kind: QueryType) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Domains with an entry, in [`QueryType`] order.
    pub fn iter(&self) -> impl Iterator<Item = (QueryType, Result<&str, &SynthesisError>)> {
        self.entries
            .iter()
            .map(|(kind, entry)| (*kind, entry.as_ref().map(String::as_str)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Composes queries from an immutable template set.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    templates: QueryTemplates,
}

impl QueryBuilder {
    /// A builder over the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder over an alternate template set.
    #[must_use]
    pub const fn with_templates(templates: QueryTemplates) -> Self {
        Self { templates }
    }

    /// Build the query set for everything `snapshot` can support.
    ///
    /// Domains whose prerequisite tables are missing are omitted. Domains
    /// whose template fails to render carry the error instead of text.
    #[must_use]
    pub fn build(&self, snapshot: &SchemaSnapshot) -> QuerySet {
        let mut set = QuerySet::default();
        for kind in QueryType::ALL {
            if !kind
                .prerequisites()
                .iter()
                .all(|table| snapshot.has_table(table))
            {
                tracing::debug!(domain = %kind, "prerequisites missing, domain omitted");
                continue;
            }
            let entry = match kind {
                QueryType::Vm => self.vm_query(snapshot),
                QueryType::Os => self.os_query(snapshot),
                QueryType::VCenter => self.vcenter_query(snapshot),
                QueryType::Host => self.host_query(snapshot),
                QueryType::Datastore => self.datastore_query(snapshot),
                QueryType::Network => self.network_query(snapshot),
            };
            if let Err(error) = &entry {
                tracing::warn!(domain = %kind, %error, "query synthesis failed");
            }
            set.entries.insert(kind, entry);
        }
        set
    }

    /// The setup script that loads `source` into the canonical raw tables.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] if an ingest template fails to render.
    pub fn ingest_script(&self, source: &Source) -> Result<String, SynthesisError> {
        let path = source.path().to_string_lossy();
        let path = literal(&path);
        match source {
            Source::Tabular(_) => SHEETS
                .iter()
                .map(|sheet| {
                    self.templates.tabular_sheet.render(&[
                        ("table", &ident(sheet.table)),
                        ("path", &path),
                        ("sheet", &literal(sheet.label)),
                    ])
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|parts| parts.join("\n")),
            Source::Foreign(_) => {
                let schema = ident(FOREIGN_SCHEMA);
                let mut parts = vec![
                    self.templates
                        .foreign_attach
                        .render(&[("path", &path), ("schema", &schema)])?,
                ];
                for sheet in SHEETS {
                    parts.push(
                        self.templates
                            .drop_table
                            .render(&[("table", &ident(sheet.table))])?,
                    );
                }
                parts.push(self.templates.foreign_remap.render(&[("schema", &schema)])?);
                parts.push(self.templates.foreign_detach.render(&[("schema", &schema)])?);
                Ok(parts.join("\n"))
            }
        }
    }

    fn vm_query(&self, snapshot: &SchemaSnapshot) -> Result<String, SynthesisError> {
        let network_cols = snapshot.columns_like(drift::VINFO.table, NETWORK_COLUMN_PREFIX);
        let network_columns = if network_cols.is_empty() {
            NULL_TEXT_LIST.to_string()
        } else {
            let parts = network_cols
                .iter()
                .map(|col| {
                    format!(
                        "NULLIF(trim({}::VARCHAR), '')",
                        qualified(drift::SOURCE_ALIAS, col)
                    )
                })
                .collect::<Vec<_>>();
            format!("list_value({})", parts.join(", "))
        };

        let mut ctes = String::new();
        let mut joins = String::new();

        let (disk_count, disk_capacity) = if snapshot.has_table(TABLE_VDISK) {
            ctes.push_str(&self.templates.vm_disks.render(&[
                ("vdisk_projection", &drift::VDISK.projection(snapshot)),
                ("vdisk_source", &drift::VDISK.source()),
            ])?);
            joins.push_str("\nLEFT JOIN disks d ON d.name = i.name");
            ("COALESCE(d.disk_count, 0)", "COALESCE(d.capacity_mib, 0)")
        } else {
            ("0", "0")
        };

        let mut cpu_hot_add = "false";
        if let Some(rollup) = self.hot_add(snapshot, &drift::VCPU, "cpu_hot", "c")? {
            ctes.push_str(&rollup.cte);
            joins.push_str(&rollup.join);
            cpu_hot_add = "COALESCE(c.hot_add, false)";
        }
        let mut memory_hot_add = "false";
        if let Some(rollup) = self.hot_add(snapshot, &drift::VMEMORY, "memory_hot", "m")? {
            ctes.push_str(&rollup.cte);
            joins.push_str(&rollup.join);
            memory_hot_add = "COALESCE(m.hot_add, false)";
        }

        self.templates.vm.render(&[
            ("vinfo_projection", &drift::VINFO.projection(snapshot)),
            ("vinfo_source", &drift::VINFO.source()),
            ("network_columns", &network_columns),
            ("extra_ctes", &ctes),
            ("extra_joins", &joins),
            ("disk_count", disk_count),
            ("disk_capacity", disk_capacity),
            ("cpu_hot_add", cpu_hot_add),
            ("memory_hot_add", memory_hot_add),
        ])
    }

    /// Hot-add rollup over `fields.table`, or `None` when the table is absent.
    fn hot_add(
        &self,
        snapshot: &SchemaSnapshot,
        fields: &FieldSet,
        cte: &str,
        alias: &str,
    ) -> Result<Option<Rollup>, SynthesisError> {
        if !snapshot.has_table(fields.table) {
            return Ok(None);
        }
        let text = self.templates.vm_hot_add.render(&[
            ("cte", cte),
            ("projection", &fields.projection(snapshot)),
            ("source", &fields.source()),
        ])?;
        Ok(Some(Rollup {
            cte: text,
            join: format!("\nLEFT JOIN {cte} {alias} ON {alias}.name = i.name"),
        }))
    }

    fn os_query(&self, snapshot: &SchemaSnapshot) -> Result<String, SynthesisError> {
        self.templates.os.render(&[
            ("vinfo_projection", &drift::VINFO.projection(snapshot)),
            ("vinfo_source", &drift::VINFO.source()),
        ])
    }

    fn vcenter_query(&self, snapshot: &SchemaSnapshot) -> Result<String, SynthesisError> {
        self.templates.vcenter.render(&[
            ("vinfo_projection", &drift::VINFO.projection(snapshot)),
            ("vinfo_source", &drift::VINFO.source()),
        ])
    }

    fn host_query(&self, snapshot: &SchemaSnapshot) -> Result<String, SynthesisError> {
        self.templates.host.render(&[
            ("vhost_projection", &drift::VHOST.projection(snapshot)),
            ("vhost_source", &drift::VHOST.source()),
        ])
    }

    fn datastore_query(&self, snapshot: &SchemaSnapshot) -> Result<String, SynthesisError> {
        let datastore_projection = drift::VDATASTORE.projection(snapshot);
        let datastore_source = drift::VDATASTORE.source();
        let host_projection = drift::VHOST.projection(snapshot);
        let host_source = drift::VHOST.source();

        if snapshot.has_table(TABLE_VHBA) {
            let protocol = render_case(CaseColumns {
                kind: "w.kind",
                address: "w.address",
                adapter: Some("w.hba_type"),
            });
            self.templates.datastore.render(&[
                ("vdatastore_projection", &datastore_projection),
                ("vdatastore_source", &datastore_source),
                ("vhost_projection", &host_projection),
                ("vhost_source", &host_source),
                ("vhba_projection", &drift::VHBA.projection(snapshot)),
                ("vhba_source", &drift::VHBA.source()),
                ("protocol_case", &protocol),
            ])
        } else {
            let protocol = render_case(CaseColumns {
                kind: "w.kind",
                address: "w.address",
                adapter: None,
            });
            self.templates.datastore_reduced.render(&[
                ("vdatastore_projection", &datastore_projection),
                ("vdatastore_source", &datastore_source),
                ("vhost_projection", &host_projection),
                ("vhost_source", &host_source),
                ("protocol_case", &protocol),
            ])
        }
    }

    fn network_query(&self, snapshot: &SchemaSnapshot) -> Result<String, SynthesisError> {
        let network_projection = drift::VNETWORK.projection(snapshot);
        let network_source = drift::VNETWORK.source();
        // Rows without a VM are networks nothing is attached to.
        let vms_count = if snapshot.has_column(drift::VNETWORK.table, "VM") {
            "COUNT(vm)"
        } else {
            "COUNT(*)"
        };

        if snapshot.has_table(TABLE_DVPORT) {
            self.templates.network.render(&[
                ("vnetwork_projection", &network_projection),
                ("vnetwork_source", &network_source),
                ("vms_count", vms_count),
                ("dvport_projection", &drift::DVPORT.projection(snapshot)),
                ("dvport_source", &drift::DVPORT.source()),
            ])
        } else {
            self.templates.network_reduced.render(&[
                ("vnetwork_projection", &network_projection),
                ("vnetwork_source", &network_source),
                ("vms_count", vms_count),
            ])
        }
    }
}

/// A CTE to append after the VM projection and the join that reads it.
struct Rollup {
    cte: String,
    join: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rv_core::enums::{TABLE_VDATASTORE, TABLE_VHOST, TABLE_VINFO, TABLE_VNETWORK};

    use crate::schemas::{TABLE_VCPU, TABLE_VDISK};

    use super::*;
    use crate::sql::Template;

    fn snapshot(tables: &[(&str, &[&str])]) -> SchemaSnapshot {
        SchemaSnapshot::from_tables(tables.iter().map(|(t, c)| (*t, c.iter().copied())))
    }

    fn kinds(set: &QuerySet) -> Vec<QueryType> {
        set.iter().map(|(kind, _)| kind).collect()
    }

    #[test]
    fn empty_snapshot_builds_nothing() {
        let set = QueryBuilder::new().build(&SchemaSnapshot::default());
        assert!(set.is_empty());
    }

    #[test]
    fn vinfo_alone_enables_vm_os_vcenter() {
        let set = QueryBuilder::new().build(&snapshot(&[(TABLE_VINFO, &["VM"])]));
        assert_eq!(
            kinds(&set),
            vec![QueryType::Vm, QueryType::Os, QueryType::VCenter]
        );
    }

    #[test]
    fn datastore_needs_both_datastore_and_host_tables() {
        let only_ds = QueryBuilder::new().build(&snapshot(&[(TABLE_VDATASTORE, &["Name"])]));
        assert!(!only_ds.contains(QueryType::Datastore));

        let both = QueryBuilder::new().build(&snapshot(&[
            (TABLE_VDATASTORE, &["Name"]),
            (TABLE_VHOST, &["Host"]),
        ]));
        assert!(both.contains(QueryType::Datastore));
        assert!(both.contains(QueryType::Host));
    }

    #[test]
    fn every_domain_omitted_when_a_prerequisite_is_missing() {
        let all = [
            (TABLE_VINFO, &["VM"][..]),
            (TABLE_VHOST, &["Host"][..]),
            (TABLE_VDATASTORE, &["Name"][..]),
            (TABLE_VNETWORK, &["Network"][..]),
        ];
        for kind in QueryType::ALL {
            for missing in kind.prerequisites() {
                let tables: Vec<_> = all.iter().filter(|(t, _)| t != missing).copied().collect();
                let set = QueryBuilder::new().build(&snapshot(&tables));
                assert!(!set.contains(kind), "{kind} built without {missing}");
            }
        }
    }

    #[test]
    fn network_columns_follow_probed_order() {
        let set = QueryBuilder::new().build(&snapshot(&[(
            TABLE_VINFO,
            &["VM", "Network #2", "Network #10", "Network #1"],
        )]));
        let sql = set.get(QueryType::Vm).unwrap();
        let first = sql.find("\"Network #1\"").unwrap();
        let tenth = sql.find("\"Network #10\"").unwrap();
        let second = sql.find("\"Network #2\"").unwrap();
        assert!(first < tenth && tenth < second);
    }

    #[test]
    fn no_network_columns_projects_null() {
        let set = QueryBuilder::new().build(&snapshot(&[(TABLE_VINFO, &["VM"])]));
        let sql = set.get(QueryType::Vm).unwrap();
        assert!(sql.contains("NULL::VARCHAR[] AS \"networks\""));
        assert!(!sql.contains("list_value"));
    }

    #[test]
    fn vm_joins_only_present_detail_tables() {
        let without = QueryBuilder::new().build(&snapshot(&[(TABLE_VINFO, &["VM"])]));
        let sql = without.get(QueryType::Vm).unwrap();
        assert!(!sql.contains("vdisk"));
        assert!(!sql.contains("vcpu"));
        assert!(!sql.contains("vmemory"));

        let with = QueryBuilder::new().build(&snapshot(&[
            (TABLE_VINFO, &["VM"]),
            (TABLE_VDISK, &["VM", "Capacity MiB"]),
            (TABLE_VCPU, &["VM", "Hot Add"]),
        ]));
        let sql = with.get(QueryType::Vm).unwrap();
        assert!(sql.contains("LEFT JOIN disks d"));
        assert!(sql.contains("LEFT JOIN cpu_hot c"));
        assert!(!sql.contains("vmemory"));
    }

    #[test]
    fn datastore_without_adapters_uses_reduced_query() {
        let set = QueryBuilder::new().build(&snapshot(&[
            (TABLE_VDATASTORE, &["Name", "Hosts", "Address", "Type"]),
            (TABLE_VHOST, &["Host", "Cluster", "Object ID"]),
        ]));
        let sql = set.get(QueryType::Datastore).unwrap();
        assert!(!sql.contains("vhba"));
        assert!(!sql.contains("hba_type"));
        assert!(sql.contains("'iSCSI'"));
    }

    #[test]
    fn network_without_ports_skips_the_join() {
        let set = QueryBuilder::new().build(&snapshot(&[(TABLE_VNETWORK, &["Network"])]));
        let sql = set.get(QueryType::Network).unwrap();
        assert!(!sql.contains("dvport"));
        assert!(!sql.contains("JOIN"));
        assert!(sql.contains("'' AS \"vlanId\""));
    }

    #[test]
    fn broken_template_fails_only_its_domain() {
        let templates = QueryTemplates {
            os: Template::new("os_query", "SELECT {{nope}}"),
            ..QueryTemplates::default()
        };
        let set = QueryBuilder::with_templates(templates).build(&snapshot(&[(TABLE_VINFO, &["VM"])]));

        assert!(set.get(QueryType::Os).is_none());
        assert!(matches!(
            set.error(QueryType::Os),
            Some(SynthesisError::UnboundPlaceholder { .. })
        ));
        assert!(set.get(QueryType::Vm).is_some());
        assert!(set.get(QueryType::VCenter).is_some());
    }

    #[test]
    fn tabular_script_quotes_the_path() {
        let script = QueryBuilder::new()
            .ingest_script(&Source::Tabular(PathBuf::from("/tmp/o'neil.xlsx")))
            .unwrap();
        assert!(script.contains("read_xlsx('/tmp/o''neil.xlsx', sheet = 'vInfo'"));
        assert_eq!(script.matches("CREATE TABLE").count(), SHEETS.len());
        assert_eq!(script.matches("DROP TABLE IF EXISTS").count(), SHEETS.len());
    }

    #[test]
    fn foreign_script_attaches_then_detaches() {
        let script = QueryBuilder::new()
            .ingest_script(&Source::Foreign(PathBuf::from("plan.db")))
            .unwrap();
        assert!(script.starts_with("ATTACH 'plan.db' AS \"snapshot\""));
        assert!(script.trim_end().ends_with("DETACH \"snapshot\";"));
    }

    #[test]
    fn source_extension() {
        assert_eq!(Source::Tabular(PathBuf::new()).extension(), "excel");
        assert_eq!(Source::Foreign(PathBuf::new()).extension(), "sqlite");
    }
}
