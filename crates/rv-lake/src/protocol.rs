//! Datastore protocol classification.
//!
//! The decision chain lives here as data. The datastore query renders it into
//! a SQL `CASE`, and [`classify_protocol`] walks the same rules in process, so
//! the two never disagree.

use crate::sql::literal;

/// Value emitted when no rule assigns a protocol.
pub const PROTOCOL_FALLBACK: &str = "N/A";

/// What a rule tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Datastore type equals the value exactly.
    KindIs(&'static str),
    /// Datastore address starts with the value.
    AddressStartsWith(&'static str),
    /// A host-bus adapter type was resolved for the datastore.
    AdapterResolved,
}

/// What a matching rule yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Literal(&'static str),
    /// The resolved adapter type itself.
    Adapter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub when: Condition,
    pub then: Outcome,
}

/// Evaluated top to bottom, first match wins, [`PROTOCOL_FALLBACK`] otherwise.
pub const PROTOCOL_CHAIN: &[Rule] = &[
    Rule {
        when: Condition::KindIs("NFS"),
        then: Outcome::Literal("N/A"),
    },
    Rule {
        when: Condition::AddressStartsWith("naa."),
        then: Outcome::Literal("iSCSI"),
    },
    Rule {
        when: Condition::AdapterResolved,
        then: Outcome::Adapter,
    },
];

/// Column names the rendered `CASE` refers to.
#[derive(Debug, Clone, Copy)]
pub struct CaseColumns<'a> {
    pub kind: &'a str,
    pub address: &'a str,
    /// `None` when the adapter table is absent; adapter rules are then dropped.
    pub adapter: Option<&'a str>,
}

/// Classify one datastore in process.
///
/// A blank adapter type counts as unresolved, the same as the query treats it.
#[must_use]
pub fn classify_protocol<'a>(
    kind: Option<&str>,
    address: Option<&str>,
    adapter: Option<&'a str>,
) -> &'a str {
    let adapter = adapter.filter(|a| !a.trim().is_empty());
    for rule in PROTOCOL_CHAIN {
        let matched = match rule.when {
            Condition::KindIs(value) => kind == Some(value),
            Condition::AddressStartsWith(prefix) => address.is_some_and(|a| a.starts_with(prefix)),
            Condition::AdapterResolved => adapter.is_some(),
        };
        if matched {
            return match rule.then {
                Outcome::Literal(value) => value,
                Outcome::Adapter => adapter.unwrap_or(PROTOCOL_FALLBACK),
            };
        }
    }
    PROTOCOL_FALLBACK
}

/// Render the chain as a SQL `CASE` expression over `columns`.
#[must_use]
pub fn render_case(columns: CaseColumns<'_>) -> String {
    let mut arms = Vec::with_capacity(PROTOCOL_CHAIN.len());
    for rule in PROTOCOL_CHAIN {
        let test = match rule.when {
            Condition::KindIs(value) => format!("{} = {}", columns.kind, literal(value)),
            Condition::AddressStartsWith(prefix) => {
                format!("starts_with({}, {})", columns.address, literal(prefix))
            }
            Condition::AdapterResolved => match columns.adapter {
                Some(adapter) => format!("{adapter} IS NOT NULL"),
                None => continue,
            },
        };
        let value = match rule.then {
            Outcome::Literal(value) => literal(value),
            Outcome::Adapter => match columns.adapter {
                Some(adapter) => adapter.to_string(),
                None => continue,
            },
        };
        arms.push(format!("WHEN {test} THEN {value}"));
    }

    format!(
        "CASE {} ELSE {} END",
        arms.join(" "),
        literal(PROTOCOL_FALLBACK)
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::nfs_wins_over_everything(Some("NFS"), Some("naa.600"), Some("FC"), "N/A")]
    #[case::naa_address_is_iscsi(Some("block"), Some("naa.600"), None, "iSCSI")]
    #[case::adapter_type_passes_through(Some("block"), Some("vmfs-x"), Some("FC"), "FC")]
    #[case::nothing_resolved(Some("block"), Some("vmfs-x"), None, "N/A")]
    #[case::naa_beats_adapter(Some("VMFS"), Some("naa.6000c29"), Some("Fibre Channel"), "iSCSI")]
    #[case::blank_adapter_is_unresolved(Some("VMFS"), Some("vmhba1:C0:T0:L0"), Some("  "), "N/A")]
    #[case::null_kind_and_address(None, None, Some("Block SCSI"), "Block SCSI")]
    fn classification(
        #[case] kind: Option<&str>,
        #[case] address: Option<&str>,
        #[case] adapter: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(classify_protocol(kind, address, adapter), expected);
    }

    #[test]
    fn case_with_adapter() {
        let sql = render_case(CaseColumns {
            kind: "w.kind",
            address: "w.address",
            adapter: Some("w.hba_type"),
        });
        assert_eq!(
            sql,
            "CASE WHEN w.kind = 'NFS' THEN 'N/A' \
             WHEN starts_with(w.address, 'naa.') THEN 'iSCSI' \
             WHEN w.hba_type IS NOT NULL THEN w.hba_type \
             ELSE 'N/A' END"
        );
    }

    #[test]
    fn case_without_adapter_drops_unreachable_arm() {
        let sql = render_case(CaseColumns {
            kind: "kind",
            address: "address",
            adapter: None,
        });
        assert!(!sql.contains("IS NOT NULL"));
        assert!(sql.ends_with("ELSE 'N/A' END"));
    }
}
