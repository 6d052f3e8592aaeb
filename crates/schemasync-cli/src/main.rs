use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use schemasync_core::{redact_connection_string, Error as CoreError, SchemaSnapshot};
use schemasync_introspect::{PostgresAdapter, StoreAdapter};
use schemasync_reconcile::{reconcile, ReconcileOptions};
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "schemasync", version, about = "Schemasync CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the changes reconciliation would apply, without applying them.
    Check(ReconcileArgs),
    /// Reconcile the live schema against the declared one.
    Apply(ApplyArgs),
    /// Dump the live schema snapshot as JSON.
    Introspect(IntrospectArgs),
}

#[derive(Args, Debug)]
struct ConnArgs {
    /// Database connection string.
    #[arg(long, value_name = "CONNECTION_STRING", env = "DATABASE_URL")]
    conn: String,
    /// Target namespace.
    #[arg(long, default_value = "public")]
    schema: String,
}

#[derive(Args, Debug)]
struct ReconcileArgs {
    #[command(flatten)]
    conn: ConnArgs,
    /// Declared schema snapshot (JSON).
    #[arg(long, value_name = "PATH")]
    schema_file: PathBuf,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    #[command(flatten)]
    reconcile: ReconcileArgs,
    /// Permit drop-column and drop-table operations. Without this flag,
    /// destructive changes are reported but skipped.
    #[arg(long, default_value_t = false)]
    allow_destructive: bool,
}

#[derive(Args, Debug)]
struct IntrospectArgs {
    #[command(flatten)]
    conn: ConnArgs,
    /// Output path; stdout when omitted.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Check(args) => run_check(args).await,
        Command::Apply(args) => run_apply(args).await,
        Command::Introspect(args) => run_introspect(args).await,
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn connect(conn: &ConnArgs) -> Result<PostgresAdapter, CliError> {
    let redacted = redact_connection_string(&conn.conn);
    tracing::info!(url = %redacted.redacted, "connecting");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&conn.conn)
        .await?;
    Ok(PostgresAdapter::with_schema(pool, conn.schema.clone()))
}

async fn run_check(args: ReconcileArgs) -> Result<ExitCode, CliError> {
    let declared = SchemaSnapshot::from_json_file(&args.schema_file)?;
    let adapter = connect(&args.conn).await?;

    let options = ReconcileOptions {
        dry_run: true,
        allow_destructive: true,
    };
    let outcome = reconcile(&adapter, &declared, &options).await?;

    if outcome.diff.is_empty() {
        println!("schema is up to date");
    } else {
        println!("{}", outcome.report);
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_apply(args: ApplyArgs) -> Result<ExitCode, CliError> {
    let ApplyArgs {
        reconcile: args,
        allow_destructive,
    } = args;

    let declared = SchemaSnapshot::from_json_file(&args.schema_file)?;
    let adapter = connect(&args.conn).await?;

    let redacted = redact_connection_string(&args.conn.conn);
    println!(
        "reconciling {} on {}",
        redacted.database.as_deref().unwrap_or("database"),
        redacted.host.as_deref().unwrap_or("localhost"),
    );

    let options = ReconcileOptions {
        allow_destructive,
        dry_run: false,
    };
    let outcome = reconcile(&adapter, &declared, &options).await?;

    if outcome.diff.is_empty() {
        println!("schema is up to date");
    } else {
        println!("{}", outcome.report);
    }

    if outcome.succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

async fn run_introspect(args: IntrospectArgs) -> Result<ExitCode, CliError> {
    let adapter = connect(&args.conn).await?;
    let snapshot = adapter.introspect().await?;
    let json = snapshot.to_json_pretty()?;

    match args.out {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(ExitCode::SUCCESS)
}
