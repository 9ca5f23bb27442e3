use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext) -> anyhow::Result<()> {
    match command {
        Commands::Report(args) => commands::report::handle(&args, ctx).await,
        Commands::Probe(args) => commands::probe::handle(&args, ctx).await,
        Commands::Queries(args) => commands::queries::handle(&args, ctx).await,
        Commands::Concerns { action } => commands::concerns::handle(&action, ctx).await,
        Commands::Schema(_) => unreachable!("schema is pre-dispatched in main"),
    }
}
