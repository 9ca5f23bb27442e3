//! Built-in query templates.
//!
//! Each template reads raw tables only through a projection CTE whose select
//! list is produced by [`crate::drift`]; the rest of the text refers to
//! aliases. Table names are fixed here, column names never are.

use crate::sql::Template;

// ── Ingest ─────────────────────────────────────────────────────────────────

pub const TABULAR_SHEET: Template = Template::new(
    "tabular_sheet",
    r"
DROP TABLE IF EXISTS {{table}};
CREATE TABLE {{table}} AS
SELECT * FROM read_xlsx({{path}}, sheet = {{sheet}}, header = true, all_varchar = true);
",
);

pub const FOREIGN_ATTACH: Template = Template::new(
    "foreign_attach",
    r"
ATTACH {{path}} AS {{schema}} (TYPE sqlite, READ_ONLY);
",
);

pub const FOREIGN_DETACH: Template = Template::new(
    "foreign_detach",
    r"
DETACH {{schema}};
",
);

pub const DROP_TABLE: Template = Template::new(
    "drop_table",
    r"
DROP TABLE IF EXISTS {{table}};
",
);

pub const FOREIGN_REMAP: Template = Template::new(
    "foreign_remap",
    r##"
CREATE TABLE vinfo AS
SELECT
    CAST(v."id" AS VARCHAR) AS "VM ID",
    CAST(v."name" AS VARCHAR) AS "VM",
    CAST(v."uuid" AS VARCHAR) AS "VM UUID",
    CAST(v."folder" AS VARCHAR) AS "Folder ID",
    CAST(v."power_state" AS VARCHAR) AS "Powerstate",
    CAST(v."cpu_count" AS VARCHAR) AS "CPUs",
    CAST(v."memory_mb" AS VARCHAR) AS "Memory",
    CAST(h."name" AS VARCHAR) AS "Host",
    CAST(c."name" AS VARCHAR) AS "Cluster",
    COALESCE(NULLIF(CAST(v."guest_name_tools" AS VARCHAR), ''), CAST(v."guest_name" AS VARCHAR))
        AS "OS according to the VMware Tools",
    CAST(v."firmware" AS VARCHAR) AS "Firmware",
    CAST(v."is_template" AS VARCHAR) AS "Template"
FROM {{schema}}."vm" v
LEFT JOIN {{schema}}."host" h ON h."id" = v."host_id"
LEFT JOIN {{schema}}."cluster" c ON c."id" = h."cluster_id";

CREATE TABLE vhost AS
SELECT
    CAST(c."name" AS VARCHAR) AS "Cluster",
    CAST(h."name" AS VARCHAR) AS "Host",
    CAST(h."id" AS VARCHAR) AS "Object ID",
    CAST(h."cpu_cores" AS VARCHAR) AS "# Cores",
    CAST(h."cpu_sockets" AS VARCHAR) AS "# CPU",
    CAST(h."memory_mb" AS VARCHAR) AS "# Memory",
    CAST(h."model" AS VARCHAR) AS "Model",
    CAST(h."vendor" AS VARCHAR) AS "Vendor"
FROM {{schema}}."host" h
LEFT JOIN {{schema}}."cluster" c ON c."id" = h."cluster_id";

CREATE TABLE vcluster AS
SELECT
    CAST(c."name" AS VARCHAR) AS "Name",
    CAST(c."id" AS VARCHAR) AS "Object ID"
FROM {{schema}}."cluster" c;

CREATE TABLE vdatastore AS
SELECT
    CAST(d."name" AS VARCHAR) AS "Name",
    CAST(d."type" AS VARCHAR) AS "Type",
    CAST(d."capacity_mib" AS VARCHAR) AS "Capacity MiB",
    CAST(d."free_mib" AS VARCHAR) AS "Free MiB",
    CAST(d."address" AS VARCHAR) AS "Address",
    CAST(d."host_names" AS VARCHAR) AS "Hosts"
FROM {{schema}}."datastore" d;

CREATE TABLE vnetwork AS
SELECT
    "Cluster",
    "Switch",
    "Network",
    CASE WHEN vm_slot < vm_count THEN 'vm-' || CAST(vm_slot + 1 AS VARCHAR) END AS "VM"
FROM (
    SELECT
        CAST(c."name" AS VARCHAR) AS "Cluster",
        CAST(n."switch" AS VARCHAR) AS "Switch",
        CAST(n."name" AS VARCHAR) AS "Network",
        COALESCE(TRY_CAST(n."vm_count" AS BIGINT), 0) AS vm_count,
        unnest(range(greatest(COALESCE(TRY_CAST(n."vm_count" AS BIGINT), 0), 1))) AS vm_slot
    FROM {{schema}}."network" n
    LEFT JOIN {{schema}}."cluster" c ON c."id" = n."cluster_id"
);

CREATE TABLE dvport AS
SELECT DISTINCT
    CAST(n."name" AS VARCHAR) AS "Port",
    CAST(n."vlan" AS VARCHAR) AS "VLAN"
FROM {{schema}}."network" n
WHERE n."vlan" IS NOT NULL;
"##,
);

// ── VM ─────────────────────────────────────────────────────────────────────

pub const VM: Template = Template::new(
    "vm_query",
    r#"
WITH info AS (
    SELECT
        {{vinfo_projection}},
        {{network_columns}} AS "networks"
    FROM {{vinfo_source}}
){{extra_ctes}}
SELECT
    COALESCE(i.vm_id, i.name) AS "id",
    i.name AS "name",
    i.uuid AS "uuid",
    i.folder AS "folder",
    COALESCE(i.host, '') AS "host",
    COALESCE(i.cluster, '') AS "cluster",
    COALESCE(i.datacenter, '') AS "datacenter",
    COALESCE(i.power_state, '') AS "powerState",
    COALESCE(TRY_CAST(i.cpus AS BIGINT), 0) AS "cpuCount",
    COALESCE(TRY_CAST(i.memory AS BIGINT), 0) AS "memoryMB",
    COALESCE(i.guest_os, '') AS "guestOs",
    COALESCE(i.firmware, '') AS "firmware",
    lower(COALESCE(i.template, '')) IN ('true', '1', 'yes') AS "isTemplate",
    COALESCE(i.networks, []::VARCHAR[]) AS "networks",
    {{disk_count}} AS "diskCount",
    {{disk_capacity}} AS "diskCapacityMiB",
    {{cpu_hot_add}} AS "cpuHotAdd",
    {{memory_hot_add}} AS "memoryHotAdd",
    COALESCE(i.vcenter_server, '') AS "vcenter"
FROM info i{{extra_joins}}
WHERE i.name IS NOT NULL
ORDER BY "name", "id"
"#,
);

pub const VM_DISKS: Template = Template::new(
    "vm_disks",
    r#",
disks AS (
    SELECT
        name,
        COUNT(*) AS disk_count,
        COALESCE(trunc(SUM(TRY_CAST(capacity_mib AS DOUBLE))), 0)::BIGINT AS capacity_mib
    FROM (
        SELECT
            {{vdisk_projection}}
        FROM {{vdisk_source}}
    )
    WHERE name IS NOT NULL
    GROUP BY name
)"#,
);

pub const VM_HOT_ADD: Template = Template::new(
    "vm_hot_add",
    r#",
{{cte}} AS (
    SELECT
        name,
        bool_or(lower(COALESCE(hot_add, '')) IN ('true', '1', 'yes')) AS hot_add
    FROM (
        SELECT
            {{projection}}
        FROM {{source}}
    )
    WHERE name IS NOT NULL
    GROUP BY name
)"#,
);

// ── OS histogram ───────────────────────────────────────────────────────────

pub const OS: Template = Template::new(
    "os_query",
    r#"
WITH info AS (
    SELECT
        {{vinfo_projection}}
    FROM {{vinfo_source}}
)
SELECT
    guest_os AS "name",
    COUNT(*) AS "count"
FROM info
WHERE guest_os IS NOT NULL
GROUP BY guest_os
ORDER BY guest_os
"#,
);

// ── vCenter summary ────────────────────────────────────────────────────────

pub const VCENTER: Template = Template::new(
    "vcenter_query",
    r#"
WITH info AS (
    SELECT
        {{vinfo_projection}}
    FROM {{vinfo_source}}
)
SELECT
    COALESCE(vcenter_id, vcenter_server, '') AS "id",
    COALESCE(vcenter_server, '') AS "server",
    COUNT(*) AS "vmCount",
    COUNT(DISTINCT cluster) AS "clusterCount",
    COUNT(DISTINCT host) AS "hostCount",
    COUNT(DISTINCT datacenter) AS "datacenterCount"
FROM info
WHERE name IS NOT NULL
GROUP BY 1, 2
ORDER BY 2, 1
"#,
);

// ── Host ───────────────────────────────────────────────────────────────────

pub const HOST: Template = Template::new(
    "host_query",
    r#"
WITH hosts AS (
    SELECT
        {{vhost_projection}}
    FROM {{vhost_source}}
)
SELECT
    cluster AS "cluster",
    COALESCE(TRY_CAST(cores AS BIGINT), 0) AS "cpuCores",
    COALESCE(TRY_CAST(sockets AS BIGINT), 0) AS "cpuSockets",
    COALESCE(object_id, host, '') AS "id",
    COALESCE(TRY_CAST(memory AS BIGINT), 0) AS "memoryMB",
    COALESCE(model, 'N/A') AS "model",
    COALESCE(vendor, 'N/A') AS "vendor"
FROM hosts
WHERE cluster IS NOT NULL
ORDER BY "cluster", "id"
"#,
);

// ── Datastore ──────────────────────────────────────────────────────────────

/// Full resolution: host expansion, adapter extraction, first adapter type
/// per datastore name. Without an `ORDER BY` in the window the adapter picked
/// for a name with mixed types follows the engine's row order.
pub const DATASTORE: Template = Template::new(
    "datastore_query",
    r#"
WITH ds AS (
    SELECT
        {{vdatastore_projection}}
    FROM {{vdatastore_source}}
),
hosts AS (
    SELECT
        {{vhost_projection}}
    FROM {{vhost_source}}
),
adapters AS (
    SELECT
        {{vhba_projection}}
    FROM {{vhba_source}}
),
split AS (
    SELECT
        ds.*,
        unnest(string_split(ds.hosts, ',')) AS host_entry
    FROM ds
    WHERE ds.hosts IS NOT NULL
),
expanded AS (
    SELECT
        s.*,
        lower(trim(s.host_entry)) AS host_address,
        NULLIF(regexp_extract(s.address, 'vmhba[0-9]+'), '') AS hba_device
    FROM split s
),
with_host AS (
    SELECT DISTINCT
        h.cluster,
        e.name,
        e.address,
        e.free_mib,
        e.capacity_mib,
        e.mha,
        e.kind,
        h.object_id,
        e.hba_device
    FROM expanded e
    JOIN hosts h ON lower(trim(h.host)) = e.host_address
),
with_hba AS (
    SELECT DISTINCT
        w.cluster,
        w.name,
        w.address,
        w.free_mib,
        w.capacity_mib,
        w.mha,
        w.kind,
        w.object_id,
        any_value(NULLIF(trim(a.kind), '')) OVER (PARTITION BY w.name) AS hba_type
    FROM with_host w
    LEFT JOIN adapters a ON a.device = w.hba_device
)
SELECT
    w.cluster AS "cluster",
    COALESCE(w.address, w.name, '') AS "diskId",
    COALESCE(trunc(TRY_CAST(w.free_mib AS DOUBLE) / 1024), 0)::BIGINT AS "freeCapacityGB",
    lower(COALESCE(w.mha, '')) IN ('true', '1', 'yes') AS "hardwareAcceleratedMove",
    COALESCE(string_agg(DISTINCT w.object_id, ', ' ORDER BY w.object_id), 'N/A') AS "hostId",
    'N/A' AS "model",
    {{protocol_case}} AS "protocolType",
    COALESCE(trunc(TRY_CAST(w.capacity_mib AS DOUBLE) / 1024), 0)::BIGINT AS "totalCapacityGB",
    COALESCE(w.kind, 'N/A') AS "type",
    'N/A' AS "vendor"
FROM with_hba w
WHERE w.cluster IS NOT NULL
GROUP BY w.cluster, w.name, w.address, w.free_mib, w.capacity_mib, w.mha, w.kind, w.hba_type
ORDER BY "cluster", "diskId"
"#,
);

/// Resolution without the adapter table.
pub const DATASTORE_REDUCED: Template = Template::new(
    "datastore_reduced_query",
    r#"
WITH ds AS (
    SELECT
        {{vdatastore_projection}}
    FROM {{vdatastore_source}}
),
hosts AS (
    SELECT
        {{vhost_projection}}
    FROM {{vhost_source}}
),
split AS (
    SELECT
        ds.*,
        unnest(string_split(ds.hosts, ',')) AS host_entry
    FROM ds
    WHERE ds.hosts IS NOT NULL
),
expanded AS (
    SELECT
        s.*,
        lower(trim(s.host_entry)) AS host_address
    FROM split s
),
with_host AS (
    SELECT DISTINCT
        h.cluster,
        e.name,
        e.address,
        e.free_mib,
        e.capacity_mib,
        e.mha,
        e.kind,
        h.object_id
    FROM expanded e
    JOIN hosts h ON lower(trim(h.host)) = e.host_address
)
SELECT
    w.cluster AS "cluster",
    COALESCE(w.address, w.name, '') AS "diskId",
    COALESCE(trunc(TRY_CAST(w.free_mib AS DOUBLE) / 1024), 0)::BIGINT AS "freeCapacityGB",
    lower(COALESCE(w.mha, '')) IN ('true', '1', 'yes') AS "hardwareAcceleratedMove",
    COALESCE(string_agg(DISTINCT w.object_id, ', ' ORDER BY w.object_id), 'N/A') AS "hostId",
    'N/A' AS "model",
    {{protocol_case}} AS "protocolType",
    COALESCE(trunc(TRY_CAST(w.capacity_mib AS DOUBLE) / 1024), 0)::BIGINT AS "totalCapacityGB",
    COALESCE(w.kind, 'N/A') AS "type",
    'N/A' AS "vendor"
FROM with_host w
WHERE w.cluster IS NOT NULL
GROUP BY w.cluster, w.name, w.address, w.free_mib, w.capacity_mib, w.mha, w.kind
ORDER BY "cluster", "diskId"
"#,
);

// ── Network ────────────────────────────────────────────────────────────────

pub const NETWORK: Template = Template::new(
    "network_query",
    r#"
WITH nets AS (
    SELECT
        {{vnetwork_projection}}
    FROM {{vnetwork_source}}
),
ports AS (
    SELECT DISTINCT
        {{dvport_projection}}
    FROM {{dvport_source}}
)
SELECT
    n.cluster AS "cluster",
    COALESCE(n.switch, '') AS "dvswitch",
    COALESCE(n.network, '') AS "name",
    'distributed' AS "type",
    COALESCE(p.vlan, '') AS "vlanId",
    {{vms_count}} AS "vmsCount"
FROM nets n
LEFT JOIN ports p ON n.network = p.port
WHERE n.cluster IS NOT NULL
GROUP BY n.cluster, n.switch, n.network, p.vlan
ORDER BY "cluster", "dvswitch", "name"
"#,
);

/// Network resolution when the port table is absent: no join, empty VLAN.
pub const NETWORK_REDUCED: Template = Template::new(
    "network_reduced_query",
    r#"
WITH nets AS (
    SELECT
        {{vnetwork_projection}}
    FROM {{vnetwork_source}}
)
SELECT
    cluster AS "cluster",
    COALESCE(switch, '') AS "dvswitch",
    COALESCE(network, '') AS "name",
    'distributed' AS "type",
    '' AS "vlanId",
    {{vms_count}} AS "vmsCount"
FROM nets
WHERE cluster IS NOT NULL
GROUP BY cluster, switch, network
ORDER BY "cluster", "dvswitch", "name"
"#,
);

/// The template set a [`crate::QueryBuilder`] renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTemplates {
    pub tabular_sheet: Template,
    pub foreign_attach: Template,
    pub foreign_remap: Template,
    pub foreign_detach: Template,
    pub drop_table: Template,
    pub vm: Template,
    pub vm_disks: Template,
    pub vm_hot_add: Template,
    pub os: Template,
    pub vcenter: Template,
    pub host: Template,
    pub datastore: Template,
    pub datastore_reduced: Template,
    pub network: Template,
    pub network_reduced: Template,
}

impl Default for QueryTemplates {
    fn default() -> Self {
        Self {
            tabular_sheet: TABULAR_SHEET,
            foreign_attach: FOREIGN_ATTACH,
            foreign_remap: FOREIGN_REMAP,
            foreign_detach: FOREIGN_DETACH,
            drop_table: DROP_TABLE,
            vm: VM,
            vm_disks: VM_DISKS,
            vm_hot_add: VM_HOT_ADD,
            os: OS,
            vcenter: VCENTER,
            host: HOST,
            datastore: DATASTORE,
            datastore_reduced: DATASTORE_REDUCED,
            network: NETWORK,
            network_reduced: NETWORK_REDUCED,
        }
    }
}
