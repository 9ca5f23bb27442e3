use rv_core::entities::{
    Concern, ConcernRecord, Datastore, Host, Network, Os, VCenterSummary, Vm,
};
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// JSON Schema of an output record type.
fn schema_of(kind: SchemaType) -> Schema {
    match kind {
        SchemaType::Vm => schema_for!(Vm),
        SchemaType::Datastore => schema_for!(Datastore),
        SchemaType::Network => schema_for!(Network),
        SchemaType::Host => schema_for!(Host),
        SchemaType::Os => schema_for!(Os),
        SchemaType::Vcenter => schema_for!(VCenterSummary),
        SchemaType::Concern => schema_for!(Concern),
        SchemaType::ConcernRecord => schema_for!(ConcernRecord),
    }
}

/// Handle `rvl schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_of(args.type_name), flags.format)
}
