use clap::Args;
use jiff::{Timestamp, ToSpan};
use marketplace::actors::{Role, UserUuid};
use marketplace_app::domain::directory::{PgDirectoryService, data::NewUser};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Global role: user, admin or default_admin
    #[arg(long, default_value = "user")]
    role: Role,

    /// Days until the issued session expires; never when omitted
    #[arg(long)]
    session_days: Option<i64>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    if args.name.trim().is_empty() {
        return Err("name cannot be empty".to_owned());
    }

    let expires_at = args
        .session_days
        .map(|days| Timestamp::now().checked_add(days.saturating_mul(24).hours()))
        .transpose()
        .map_err(|error| format!("invalid session lifetime: {error}"))?;

    let db = crate::cli::connect(&args.database_url).await?;

    let registered = PgDirectoryService::new(db)
        .register_user(
            NewUser {
                uuid: args.user_uuid.map_or_else(UserUuid::new, UserUuid::from_uuid),
                name: args.name,
                role: args.role,
            },
            expires_at,
        )
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", registered.user.uuid);
    println!("role: {}", registered.user.role);
    println!("session_token: {}", registered.token.expose());
    println!("store this token now; it is only shown once");

    Ok(())
}
