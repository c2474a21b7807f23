use paygate::config::AppConfig;
use paygate::domain::ids;
use paygate::repo::merchants_repo::MerchantsRepo;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

/// Administrative seed: mints credentials and registers a merchant.
/// Usage: create_merchant <name> <email>
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(name), Some(email)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: create_merchant <name> <email>");
    };

    let cfg = AppConfig::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let repo = MerchantsRepo { pool };
    let api_key = ids::api_key();
    let api_secret = ids::api_secret();
    let merchant = repo.create(&name, &email, &api_key, &api_secret).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "id": merchant.id,
            "name": merchant.name,
            "email": merchant.email,
            "api_key": merchant.api_key,
            "api_secret": merchant.api_secret,
        }))?
    );

    Ok(())
}
