use clap::{Parser, Subcommand};
use marketplace_app::database::{self, Db};

mod business;
mod db;
mod product;
mod user;

#[derive(Debug, Parser)]
#[command(name = "marketplace-app", about = "Marketplace admin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Business(business::BusinessCommand),
    Product(product::ProductCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Business(command) => business::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

/// Admin commands only ever need a couple of connections.
const CLI_MAX_CONNECTIONS: u32 = 2;

async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url, CLI_MAX_CONNECTIONS)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}
