//! Atlas Exec - run Atlas CLI commands and print their typed results.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use atlas_exec::args::{
    MigrateApplyParams, MigrateLintParams, MigrateStatusParams, SchemaInspectParams,
};
use atlas_exec::config::ConfigLoader;
use atlas_exec::{Client, ExecError};

#[derive(Parser)]
#[command(
    name = "atlas-exec",
    about = "Run Atlas CLI commands and print typed results",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file to load instead of the default search paths.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Atlas executable. Overrides the config file.
    #[arg(long)]
    atlas: Option<PathBuf>,

    /// Working directory. Overrides the config file.
    #[arg(short = 'C', long)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Atlas version.
    Version,
    /// Print the logged in organization.
    Whoami,
    /// Migration directory commands.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Schema commands.
    #[command(subcommand)]
    Schema(SchemaCommand),
}

#[derive(Subcommand)]
enum MigrateCommand {
    /// Show the migration status of a database.
    Status {
        #[arg(long)]
        env: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        dir: Option<String>,
    },
    /// Apply pending migrations.
    Apply {
        #[arg(long)]
        env: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        dir: Option<String>,
        #[arg(long)]
        dry_run: bool,
        /// Apply at most this many files.
        #[arg(default_value_t = 0)]
        amount: u64,
    },
    /// Lint the latest migration files.
    Lint {
        #[arg(long)]
        env: Option<String>,
        #[arg(long)]
        dev_url: Option<String>,
        #[arg(long)]
        dir: Option<String>,
        #[arg(long, default_value_t = 0)]
        latest: u64,
    },
}

#[derive(Subcommand)]
enum SchemaCommand {
    /// Inspect a database schema.
    Inspect {
        #[arg(long)]
        env: Option<String>,
        #[arg(long)]
        url: Option<String>,
        /// Output format; `sql` prints DDL.
        #[arg(long)]
        format: Option<String>,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ExecError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(client: &Client, command: Commands) -> Result<(), ExecError> {
    match command {
        Commands::Version => println!("{}", client.version().await?),
        Commands::Whoami => print_json(&client.whoami().await?)?,
        Commands::Migrate(MigrateCommand::Status { env, url, dir }) => {
            let params = MigrateStatusParams {
                env,
                url,
                dir_url: dir,
                ..Default::default()
            };
            print_json(&client.migrate_status(&params).await?)?;
        }
        Commands::Migrate(MigrateCommand::Apply {
            env,
            url,
            dir,
            dry_run,
            amount,
        }) => {
            let params = MigrateApplyParams {
                env,
                url,
                dir_url: dir,
                dry_run,
                amount,
                ..Default::default()
            };
            let apply = client.migrate_apply(&params).await?;
            tracing::info!(summary = %apply.summary(""), "Migration finished");
            print_json(&apply)?;
        }
        Commands::Migrate(MigrateCommand::Lint {
            env,
            dev_url,
            dir,
            latest,
        }) => {
            let params = MigrateLintParams {
                env,
                dev_url,
                dir_url: dir,
                latest,
                ..Default::default()
            };
            let report = client.migrate_lint(&params).await?;
            tracing::info!(diagnostics = report.diagnostics_count(), "Lint finished");
            print_json(&report)?;
        }
        Commands::Schema(SchemaCommand::Inspect { env, url, format }) => {
            let params = SchemaInspectParams {
                env,
                url,
                format,
                ..Default::default()
            };
            println!("{}", client.schema_inspect(&params).await?);
        }
    }
    Ok(())
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loader = cli.config.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let mut config = match loader.load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load config");
            return ExitCode::FAILURE;
        }
    };
    if let Some(atlas) = cli.atlas {
        config.exec_path = atlas;
    }
    if let Some(dir) = cli.dir {
        config.working_dir = Some(dir);
    }

    let client = match Client::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let client = client.with_cancellation(cancel.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping atlas");
            cancel.cancel();
        }
    });

    match run(&client, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_soft_failure() {
                println!("{}", e.stdout());
            } else {
                eprintln!("{e}");
            }
            exit_code(e.exit_code())
        }
    }
}
