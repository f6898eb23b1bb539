use agro_reports::adapters::postgres::PgSchemaSource;
use agro_reports::config::cli::ProbeCli;
use agro_reports::config::resolve_database_url;
use agro_reports::core::schema_probe::{self, ProbeOptions};
use agro_reports::utils::{logger, validation};
use agro_reports::AgroConfig;
use anyhow::{bail, Context};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ProbeCli::parse();
    logger::init_cli_logger(args.verbose);

    let config = AgroConfig::load(args.config.as_deref()).context("could not load configuration")?;

    let Some(database_url) = resolve_database_url(args.database_url.as_deref(), &config.database)
    else {
        bail!("no database URL: pass --database-url, set [database].url or DATABASE_URL");
    };
    validation::validate_database_url("database_url", &database_url)?;

    tracing::info!(
        "🔌 Connecting to {}",
        validation::redact_credentials(&database_url)
    );
    let source = PgSchemaSource::connect(&database_url, config.database.max_connections)
        .await
        .context("could not connect to the database")?;
    tracing::info!("✅ Connected");

    let options = ProbeOptions {
        schema: args.schema.unwrap_or(config.database.schema),
        tables: args.table,
        count_rows: args.count,
    };
    let report = schema_probe::probe(&source, &options).await;
    source.close().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}
