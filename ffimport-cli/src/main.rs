use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ffimport_ingest::Statement;
use ffimport_loader::{Config, FireflyClient, StatementLoader, TransactionGroupRequest, prepare};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

mod config;

#[derive(Parser, Debug)]
#[command(
    name = "ffimport",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FFIMPORT_BUILD_SHA"), ")"),
    about = "Import bank/card statement CSVs into Firefly III"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a config template to ~/.ffimport/config.toml (or --config)
    Init {
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Normalize a statement CSV and submit it to Firefly III in batches
    Import {
        /// Statement CSV (UTF-8, header row required)
        #[arg(long)]
        csv: PathBuf,

        /// Name of the Firefly asset/liability account the statement belongs to
        #[arg(long)]
        account: String,

        /// Title attached to every submitted transaction group
        #[arg(long)]
        group: Option<String>,

        /// Config file (default: ~/.ffimport/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the request bodies instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            config: config_path,
        } => {
            config::init_config(config_path.as_deref())?;
        }

        Command::Import {
            csv,
            account,
            group,
            config: config_path,
            dry_run,
        } => {
            let account = account.trim();
            if account.is_empty() {
                bail!("--account must not be empty");
            }
            let group = group.as_deref().map(str::trim).filter(|g| !g.is_empty());

            let cfg = config::load_config(config_path.as_deref())?;
            let statement = read_statement(&csv)?;

            if dry_run {
                dry_run_import(&statement, account, group, &cfg)?;
            } else {
                import(statement, account, group, cfg).await?;
            }
        }
    }

    Ok(())
}

fn read_statement(path: &Path) -> Result<Statement> {
    if !path.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", path.display());
    }
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let text = String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", path.display()))?;
    let statement =
        Statement::from_csv_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    if statement.is_empty() {
        bail!("no transactions in {}", path.display());
    }
    info!("Read {} rows from {}", statement.len(), path.display());
    Ok(statement)
}

async fn import(statement: Statement, account: &str, group: Option<&str>, cfg: Config) -> Result<()> {
    let client = FireflyClient::new(&cfg.firefly)?;
    info!("Submitting to {}", client.endpoint());

    let loader = StatementLoader::new(cfg, client);
    let summary = loader.load(&statement, account, group).await;

    println!(
        "Imported {} of {} transactions into {} ({} outgoing, {} incoming)",
        summary.succeeded,
        summary.rows(),
        account,
        summary.prepared_outgoing,
        summary.prepared_incoming
    );
    println!("{summary}");

    if summary.failed > 0 {
        bail!(
            "{} transactions were not imported ({} failed batches, {} dropped rows; see log)",
            summary.failed,
            summary.batches_failed,
            summary.rejected
        );
    }
    Ok(())
}

fn dry_run_import(statement: &Statement, account: &str, group: Option<&str>, cfg: &Config) -> Result<()> {
    let prepared = prepare(statement, account, cfg);

    for (direction, batch) in prepared.batches(cfg.app.batch_size) {
        let request = TransactionGroupRequest {
            apply_rules: cfg.app.apply_rules,
            group_title: group,
            transactions: batch,
        };
        println!("# {:?} batch ({} txs)", direction, batch.len());
        println!("{}", serde_json::to_string_pretty(&request)?);
    }

    println!(
        "\nDry run: {} outgoing, {} incoming, {} without a date, {} dropped; nothing sent",
        prepared.outgoing.len(),
        prepared.incoming.len(),
        prepared.date_errors,
        prepared.rejected
    );
    Ok(())
}
