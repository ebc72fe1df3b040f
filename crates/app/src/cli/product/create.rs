use clap::Args;
use marketplace::{businesses::BusinessUuid, inventory::ProductUuid};
use marketplace_app::domain::directory::{PgDirectoryService, data::NewProduct};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// Owning business
    #[arg(long)]
    business_uuid: Uuid,

    /// Product code, unique within the business
    #[arg(long)]
    code: String,

    /// Display name
    #[arg(long)]
    name: String,

    #[arg(long)]
    barcode: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    if args.code.trim().is_empty() || args.name.trim().is_empty() {
        return Err("code and name cannot be empty".to_owned());
    }

    let db = crate::cli::connect(&args.database_url).await?;

    let product = PgDirectoryService::new(db)
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            business_uuid: BusinessUuid::from_uuid(args.business_uuid),
            code: args.code,
            name: args.name,
            barcode: args.barcode.filter(|barcode| !barcode.trim().is_empty()),
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("product_code: {}", product.code);

    Ok(())
}
