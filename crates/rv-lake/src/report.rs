//! Report assembly: run synthesized queries and map rows to entities.
//!
//! Each domain is executed on its own. A domain missing from the query set or
//! failing at execution is recorded on the [`Report`] and never blocks the
//! others.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use duckdb::types::Value;
use duckdb::{Connection, Row};
use rv_core::QueryType;
use rv_core::entities::{Datastore, Host, Network, Os, VCenterSummary, Vm};
use serde::Serialize;

use crate::LakeError;
use crate::query::QuerySet;

/// Narrows the VM section. The default value returns every VM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmQueryOptions {
    pub cluster: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Every assembled section plus what could not be produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vms: Option<Vec<Vm>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datastores: Option<Vec<Datastore>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<Network>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<Host>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<Vec<Os>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcenters: Option<Vec<VCenterSummary>>,
    /// Domains the source cannot support.
    pub unavailable: Vec<QueryType>,
    /// Domains that had a query but failed to synthesize or execute.
    pub errors: BTreeMap<QueryType, String>,
}

impl Report {
    fn empty() -> Self {
        Self {
            generated_at: Utc::now(),
            vms: None,
            datastores: None,
            networks: None,
            hosts: None,
            os: None,
            vcenters: None,
            unavailable: Vec::new(),
            errors: BTreeMap::new(),
        }
    }
}

/// Executes a [`QuerySet`] against the store.
pub struct ReportAssembler<'a> {
    conn: &'a Connection,
    queries: &'a QuerySet,
}

impl<'a> ReportAssembler<'a> {
    #[must_use]
    pub const fn new(conn: &'a Connection, queries: &'a QuerySet) -> Self {
        Self { conn, queries }
    }

    /// Assemble the requested domains (all of them when `domains` is empty).
    #[must_use]
    pub fn assemble(&self, domains: &[QueryType], options: &VmQueryOptions) -> Report {
        let mut report = Report::empty();
        let wanted: &[QueryType] = if domains.is_empty() {
            &QueryType::ALL
        } else {
            domains
        };

        for &kind in wanted {
            if !self.queries.contains(kind) {
                report.unavailable.push(kind);
                continue;
            }
            let result = match kind {
                QueryType::Vm => self.vms(options).map(|rows| report.vms = Some(rows)),
                QueryType::Datastore => self.datastores().map(|rows| report.datastores = Some(rows)),
                QueryType::Network => self.networks().map(|rows| report.networks = Some(rows)),
                QueryType::Host => self.hosts().map(|rows| report.hosts = Some(rows)),
                QueryType::Os => self.os().map(|rows| report.os = Some(rows)),
                QueryType::VCenter => self.vcenters().map(|rows| report.vcenters = Some(rows)),
            };
            if let Err(error) = result {
                tracing::warn!(domain = %kind, %error, "report section failed");
                report.errors.insert(kind, error.to_string());
            }
        }
        report
    }

    /// VMs, optionally narrowed to one cluster and paged.
    ///
    /// # Errors
    ///
    /// [`LakeError::NotReportable`] when the domain is absent,
    /// [`LakeError::Synthesis`] when its query failed to render, and
    /// [`LakeError::DuckDb`] when execution fails.
    pub fn vms(&self, options: &VmQueryOptions) -> Result<Vec<Vm>, LakeError> {
        let base = self.query(QueryType::Vm)?;
        let mut sql = format!("SELECT * FROM ({base}) AS vm");
        let mut params: Vec<Box<dyn duckdb::ToSql>> = Vec::new();

        if let Some(cluster) = &options.cluster {
            sql.push_str(" WHERE \"cluster\" = ?");
            params.push(Box::new(cluster.clone()));
        }
        sql.push_str(" ORDER BY \"name\", \"id\"");
        if let Some(limit) = options.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(i64::try_from(limit).unwrap_or(i64::MAX)));
        }
        if let Some(offset) = options.offset {
            sql.push_str(" OFFSET ?");
            params.push(Box::new(i64::try_from(offset).unwrap_or(i64::MAX)));
        }

        let param_refs: Vec<&dyn duckdb::ToSql> = params.iter().map(AsRef::as_ref).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), map_vm)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// # Errors
    ///
    /// Same as [`Self::vms`].
    pub fn datastores(&self) -> Result<Vec<Datastore>, LakeError> {
        self.run(QueryType::Datastore, |row| {
            Ok(Datastore {
                cluster: text(row, 0)?,
                disk_id: text(row, 1)?,
                free_capacity_gb: int(row, 2)?,
                hardware_accelerated_move: flag(row, 3)?,
                host_id: text(row, 4)?,
                model: text(row, 5)?,
                protocol_type: text(row, 6)?,
                total_capacity_gb: int(row, 7)?,
                kind: text(row, 8)?,
                vendor: text(row, 9)?,
            })
        })
    }

    /// # Errors
    ///
    /// Same as [`Self::vms`].
    pub fn networks(&self) -> Result<Vec<Network>, LakeError> {
        self.run(QueryType::Network, |row| {
            Ok(Network {
                cluster: text(row, 0)?,
                dvswitch: text(row, 1)?,
                name: text(row, 2)?,
                kind: text(row, 3)?,
                vlan_id: text(row, 4)?,
                vms_count: int(row, 5)?,
            })
        })
    }

    /// # Errors
    ///
    /// Same as [`Self::vms`].
    pub fn hosts(&self) -> Result<Vec<Host>, LakeError> {
        self.run(QueryType::Host, |row| {
            Ok(Host {
                cluster: text(row, 0)?,
                cpu_cores: int(row, 1)?,
                cpu_sockets: int(row, 2)?,
                id: text(row, 3)?,
                memory_mb: int(row, 4)?,
                model: text(row, 5)?,
                vendor: text(row, 6)?,
            })
        })
    }

    /// # Errors
    ///
    /// Same as [`Self::vms`].
    pub fn os(&self) -> Result<Vec<Os>, LakeError> {
        self.run(QueryType::Os, |row| {
            Ok(Os {
                name: text(row, 0)?,
                count: int(row, 1)?,
            })
        })
    }

    /// # Errors
    ///
    /// Same as [`Self::vms`].
    pub fn vcenters(&self) -> Result<Vec<VCenterSummary>, LakeError> {
        self.run(QueryType::VCenter, |row| {
            Ok(VCenterSummary {
                id: text(row, 0)?,
                server: text(row, 1)?,
                vm_count: int(row, 2)?,
                cluster_count: int(row, 3)?,
                host_count: int(row, 4)?,
                datacenter_count: int(row, 5)?,
            })
        })
    }

    fn query(&self, kind: QueryType) -> Result<&'a str, LakeError> {
        if let Some(error) = self.queries.error(kind) {
            return Err(error.clone().into());
        }
        self.queries.get(kind).ok_or(LakeError::NotReportable(kind))
    }

    fn run<T, F>(&self, kind: QueryType, map: F) -> Result<Vec<T>, LakeError>
    where
        F: FnMut(&Row<'_>) -> Result<T, duckdb::Error>,
    {
        let sql = self.query(kind)?;
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], map)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn map_vm(row: &Row<'_>) -> Result<Vm, duckdb::Error> {
    Ok(Vm {
        id: text(row, 0)?,
        name: text(row, 1)?,
        uuid: row.get(2)?,
        folder: row.get(3)?,
        host: text(row, 4)?,
        cluster: text(row, 5)?,
        datacenter: text(row, 6)?,
        power_state: text(row, 7)?,
        cpu_count: int(row, 8)?,
        memory_mb: int(row, 9)?,
        guest_os: text(row, 10)?,
        firmware: text(row, 11)?,
        is_template: flag(row, 12)?,
        networks: text_list(row, 13)?,
        disk_count: int(row, 14)?,
        disk_capacity_mib: int(row, 15)?,
        cpu_hot_add: flag(row, 16)?,
        memory_hot_add: flag(row, 17)?,
        vcenter: text(row, 18)?,
    })
}

fn text(row: &Row<'_>, idx: usize) -> Result<String, duckdb::Error> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

/// Non-null entries of a `VARCHAR[]` column, in list order.
fn text_list(row: &Row<'_>, idx: usize) -> Result<Vec<String>, duckdb::Error> {
    let Value::List(items) = row.get::<_, Value>(idx)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Text(name) => Some(name),
            _ => None,
        })
        .collect())
}

fn int(row: &Row<'_>, idx: usize) -> Result<i64, duckdb::Error> {
    Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or_default())
}

fn flag(row: &Row<'_>, idx: usize) -> Result<bool, duckdb::Error> {
    Ok(row.get::<_, Option<bool>>(idx)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_camel_case_and_skips_absent_sections() {
        let mut report = Report::empty();
        report.os = Some(vec![Os {
            name: "Ubuntu".into(),
            count: 2,
        }]);
        report.unavailable.push(QueryType::Datastore);
        report.errors.insert(QueryType::VCenter, "boom".into());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("generatedAt").is_some());
        assert!(json.get("vms").is_none());
        assert_eq!(json["os"][0]["count"], 2);
        assert_eq!(json["unavailable"][0], "datastore");
        assert_eq!(json["errors"]["vcenter"], "boom");
    }

    #[test]
    fn absent_domain_is_not_reportable() {
        let conn = Connection::open_in_memory().unwrap();
        let queries = QuerySet::default();
        let assembler = ReportAssembler::new(&conn, &queries);
        assert!(matches!(
            assembler.hosts(),
            Err(LakeError::NotReportable(QueryType::Host))
        ));

        let report = assembler.assemble(&[], &VmQueryOptions::default());
        assert_eq!(report.unavailable, QueryType::ALL.to_vec());
        assert!(report.errors.is_empty());
    }
}
