//! Raw-table fixtures shaped like the inspection tool's sheets.
//!
//! Tables are built with plain SQL so no engine extension is needed.

#![allow(dead_code)]

use rv_lake::{InventoryLake, QueryBuilder, QuerySet, SchemaSnapshot};

pub fn lake_with(sql: &str) -> InventoryLake {
    let lake = InventoryLake::open_in_memory().unwrap();
    lake.conn().execute_batch(sql).unwrap();
    lake
}

pub fn build_queries(lake: &InventoryLake) -> QuerySet {
    let snapshot = SchemaSnapshot::probe(lake.conn()).unwrap();
    QueryBuilder::new().build(&snapshot)
}

// ---------------------------------------------------------------------------
// VM sheets
// ---------------------------------------------------------------------------

/// Current column names (`VM UUID`, `Folder ID`), two numbered NIC columns.
pub const VINFO_CURRENT: &str = r#"
CREATE TABLE vinfo (
    "VM" VARCHAR, "VM ID" VARCHAR, "VM UUID" VARCHAR, "Folder ID" VARCHAR,
    "Host" VARCHAR, "Cluster" VARCHAR, "Datacenter" VARCHAR, "Powerstate" VARCHAR,
    "CPUs" VARCHAR, "Memory" VARCHAR, "OS according to the VMware Tools" VARCHAR,
    "Firmware" VARCHAR, "Template" VARCHAR, "Network #1" VARCHAR, "Network #2" VARCHAR,
    "VI SDK Server" VARCHAR, "VI SDK UUID" VARCHAR
);
INSERT INTO vinfo VALUES
    ('web-01', 'vm-101', '4211-0001', 'group-v10', 'esx1.lab', 'cl-a', 'dc-1', 'poweredOn',
     '4', '8192', 'Ubuntu Linux (64-bit)', 'efi', 'False', 'VM Network', 'backup',
     'vc01.lab', 'vc-uuid-1'),
    ('db-01', 'vm-102', '4211-0002', 'group-v11', 'esx3.lab', 'cl-b', 'dc-1', 'poweredOn',
     '8', '32768', 'Red Hat Enterprise Linux 9 (64-bit)', 'bios', 'False', 'db-net', NULL,
     'vc01.lab', 'vc-uuid-1'),
    ('tmpl-01', 'vm-103', '4211-0003', 'group-v10', 'esx2.lab', 'cl-a', 'dc-1', 'poweredOff',
     '2', '4096', 'Ubuntu Linux (64-bit)', 'efi', 'True', NULL, NULL,
     'vc01.lab', 'vc-uuid-1');
"#;

/// Legacy column names only (`SMBIOS UUID`, `Folder`), no NIC columns, and
/// the guest OS only from the configuration file.
pub const VINFO_LEGACY: &str = r#"
CREATE TABLE vinfo (
    "VM" VARCHAR, "VM ID" VARCHAR, "SMBIOS UUID" VARCHAR, "Folder" VARCHAR,
    "Host" VARCHAR, "Cluster" VARCHAR, "CPUs" VARCHAR, "Memory" VARCHAR,
    "OS according to the configuration file" VARCHAR
);
INSERT INTO vinfo VALUES
    ('legacy-01', 'vm-201', 'smbios-1', '/dc-1/vm/legacy', 'esx1.lab', 'cl-a', '1', '2048',
     'Microsoft Windows Server 2016 (64-bit)');
"#;

pub const VDISK: &str = r#"
CREATE TABLE vdisk ("VM" VARCHAR, "Disk" VARCHAR, "Capacity MiB" VARCHAR);
INSERT INTO vdisk VALUES
    ('web-01', 'Hard disk 1', '10240'),
    ('web-01', 'Hard disk 2', '20480'),
    ('db-01', 'Hard disk 1', '51200');
"#;

pub const VCPU: &str = r#"
CREATE TABLE vcpu ("VM" VARCHAR, "CPUs" VARCHAR, "Hot Add" VARCHAR);
INSERT INTO vcpu VALUES
    ('web-01', '4', 'True'),
    ('db-01', '8', 'False');
"#;

pub const VMEMORY: &str = r#"
CREATE TABLE vmemory ("VM" VARCHAR, "Size MiB" VARCHAR, "Hot Add" VARCHAR);
INSERT INTO vmemory VALUES
    ('db-01', '32768', 'True');
"#;

// ---------------------------------------------------------------------------
// Infrastructure sheets
// ---------------------------------------------------------------------------

pub const VHOST: &str = r##"
CREATE TABLE vhost (
    "Cluster" VARCHAR, "Host" VARCHAR, "Object ID" VARCHAR, "# Cores" VARCHAR,
    "# CPU" VARCHAR, "# Memory" VARCHAR, "Model" VARCHAR, "Vendor" VARCHAR
);
INSERT INTO vhost VALUES
    ('cl-a', 'esx1.lab', 'host-1', '32', '2', '524288', 'PowerEdge R640', 'Dell Inc.'),
    ('cl-a', 'esx2.lab', 'host-2', '32', '2', '524288', 'PowerEdge R640', 'Dell Inc.'),
    ('cl-b', 'esx3.lab', 'host-3', '16', '1', '262144', NULL, NULL),
    (NULL, 'standalone.lab', 'host-9', '4', '1', '16384', 'NUC', 'Intel');
"##;

pub const VDATASTORE: &str = r#"
CREATE TABLE vdatastore (
    "Name" VARCHAR, "Address" VARCHAR, "Hosts" VARCHAR, "Free MiB" VARCHAR,
    "Capacity MiB" VARCHAR, "MHA" VARCHAR, "Type" VARCHAR
);
INSERT INTO vdatastore VALUES
    ('ds-iscsi', 'naa.600508b1', 'esx1.lab, esx2.lab', '51200', '102400', 'True', 'VMFS'),
    ('ds-nfs', 'nfs01:/export/vol1', 'esx1.lab', '2048', '4096', 'False', 'NFS'),
    ('ds-fc', 'vmhba2:C0:T1:L0', 'ESX3.lab', '1536', '3072', NULL, 'VMFS'),
    ('ds-orphan', 'vmhba0:C0:T0:L0', 'gone.lab', '1024', '1024', 'False', 'VMFS'),
    ('ds-nohosts', 'naa.deadbeef', NULL, '1024', '1024', 'False', 'VMFS');
"#;

pub const VHBA: &str = r#"
CREATE TABLE vhba ("Host" VARCHAR, "Device" VARCHAR, "Type" VARCHAR, "Model" VARCHAR);
INSERT INTO vhba VALUES
    ('esx3.lab', 'vmhba2', 'Fibre Channel', 'QLogic 2692'),
    ('esx1.lab', 'vmhba2', 'Fibre Channel', 'QLogic 2692'),
    ('esx1.lab', 'vmhba0', 'Block SCSI', 'PERC H730');
"#;

pub const VNETWORK: &str = r#"
CREATE TABLE vnetwork ("VM" VARCHAR, "Cluster" VARCHAR, "Switch" VARCHAR, "Network" VARCHAR);
INSERT INTO vnetwork VALUES
    ('web-01', 'cl-a', 'dvs-1', 'pg-web'),
    ('tmpl-01', 'cl-a', 'dvs-1', 'pg-web'),
    ('db-01', 'cl-b', 'dvs-2', 'pg-db'),
    ('lost-01', NULL, 'dvs-9', 'pg-lost');
"#;

pub const DVPORT: &str = r#"
CREATE TABLE dvport ("Port" VARCHAR, "Switch" VARCHAR, "VLAN" VARCHAR);
INSERT INTO dvport VALUES
    ('pg-web', 'dvs-1', '100'),
    ('pg-web', 'dvs-1', '100'),
    ('pg-db', 'dvs-2', '200');
"#;
