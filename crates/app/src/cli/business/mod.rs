use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct BusinessCommand {
    #[command(subcommand)]
    command: BusinessSubcommand,
}

#[derive(Debug, Subcommand)]
enum BusinessSubcommand {
    Create(create::CreateBusinessArgs),
}

pub(crate) async fn run(command: BusinessCommand) -> Result<(), String> {
    match command.command {
        BusinessSubcommand::Create(args) => create::run(args).await,
    }
}
