use clap::Args;
use marketplace::{
    actors::UserUuid,
    businesses::{Address, BusinessType, BusinessUuid},
};
use marketplace_app::domain::directory::{PgDirectoryService, data::NewBusiness};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateBusinessArgs {
    /// Business name
    #[arg(long)]
    name: String,

    /// One of AccommodationAndFoodServices, RetailTrade,
    /// CharitableOrganisation or NonProfitOrganisation
    #[arg(long = "type")]
    business_type: BusinessType,

    /// User allowed to administer the business; repeatable
    #[arg(long = "admin", required = true)]
    administrators: Vec<Uuid>,

    #[arg(long)]
    street: Option<String>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    region: Option<String>,

    #[arg(long)]
    country: String,

    #[arg(long)]
    postcode: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateBusinessArgs) -> Result<(), String> {
    if args.name.trim().is_empty() {
        return Err("name cannot be empty".to_owned());
    }

    if args.country.trim().is_empty() {
        return Err("country cannot be empty".to_owned());
    }

    let db = crate::cli::connect(&args.database_url).await?;

    let business = PgDirectoryService::new(db)
        .create_business(NewBusiness {
            uuid: BusinessUuid::new(),
            name: args.name,
            business_type: args.business_type,
            address: Address {
                street: args.street,
                city: args.city,
                region: args.region,
                country: args.country,
                postcode: args.postcode,
            },
            administrators: args
                .administrators
                .into_iter()
                .map(UserUuid::from_uuid)
                .collect(),
        })
        .await
        .map_err(|error| format!("failed to create business: {error}"))?;

    println!("business_uuid: {}", business.uuid);
    println!("business_name: {}", business.name);
    println!("address: {}", business.address);

    Ok(())
}
