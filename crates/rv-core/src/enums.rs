//! Report domains and their table prerequisites.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Canonical table names
// ---------------------------------------------------------------------------

/// VM information table (`vInfo` sheet).
pub const TABLE_VINFO: &str = "vinfo";
/// Host table (`vHost` sheet).
pub const TABLE_VHOST: &str = "vhost";
/// Datastore table (`vDatastore` sheet).
pub const TABLE_VDATASTORE: &str = "vdatastore";
/// Network table (`vNetwork` sheet).
pub const TABLE_VNETWORK: &str = "vnetwork";

// ---------------------------------------------------------------------------
// QueryType
// ---------------------------------------------------------------------------

/// A report domain. Each domain has a fixed set of tables that must exist
/// before a query for it can be synthesized.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Vm,
    Datastore,
    Network,
    Host,
    Os,
    #[serde(rename = "vcenter")]
    VCenter,
}

impl QueryType {
    /// Every domain, in report order.
    pub const ALL: [Self; 6] = [
        Self::Vm,
        Self::Datastore,
        Self::Network,
        Self::Host,
        Self::Os,
        Self::VCenter,
    ];

    /// Return the string representation used in reports and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vm => "vm",
            Self::Datastore => "datastore",
            Self::Network => "network",
            Self::Host => "host",
            Self::Os => "os",
            Self::VCenter => "vcenter",
        }
    }

    /// Tables that must all be present for this domain to be reportable.
    #[must_use]
    pub const fn prerequisites(self) -> &'static [&'static str] {
        match self {
            Self::Vm | Self::Os | Self::VCenter => &[TABLE_VINFO],
            Self::Datastore => &[TABLE_VDATASTORE, TABLE_VHOST],
            Self::Network => &[TABLE_VNETWORK],
            Self::Host => &[TABLE_VHOST],
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|qt| qt.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|qt| qt.as_str()).collect();
                format!("unknown report domain '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vm_derived_domains_share_the_vinfo_prerequisite() {
        for qt in [QueryType::Vm, QueryType::Os, QueryType::VCenter] {
            assert_eq!(qt.prerequisites(), &[TABLE_VINFO]);
        }
    }

    #[test]
    fn datastore_needs_datastore_and_host_tables() {
        assert_eq!(
            QueryType::Datastore.prerequisites(),
            &[TABLE_VDATASTORE, TABLE_VHOST]
        );
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("VCenter".parse::<QueryType>().unwrap(), QueryType::VCenter);
        assert_eq!(" host ".parse::<QueryType>().unwrap(), QueryType::Host);
    }

    #[test]
    fn parse_rejects_unknown_domain() {
        let err = "cluster".parse::<QueryType>().unwrap_err();
        assert!(err.contains("unknown report domain"));
    }

    #[test]
    fn serde_matches_display_names() {
        let json = serde_json::to_string(&QueryType::VCenter).unwrap();
        assert_eq!(json, "\"vcenter\"");
        let back: QueryType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QueryType::VCenter);
    }
}
