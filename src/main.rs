use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use es_pool::conf::Config;
use es_pool::demo::{self, GeoDocument};
use es_pool::{ClientRegistry, EsClient, EsError, EsResponse};

#[derive(Parser, Debug)]
#[command(name = "es-pool", version, about = "Run sample operations against a named cluster")]
struct Args {
    /// TOML or JSON file with `[[clusters]]` entries.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Cluster name to use.
    #[arg(long, default_value = "default")]
    cluster: String,
    /// Comma separated endpoints, used when the cluster is not in the config.
    #[arg(long, value_name = "URLS")]
    hosts: Option<String>,
    #[arg(long, default_value = demo::DEFAULT_INDEX)]
    index: String,
    /// Enable debug logging (raw response bodies).
    #[arg(short, long)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Print node and cluster version info.
    Info,
    CreateIndex,
    DeleteIndex,
    InsertOne,
    InsertBatch,
    Get,
    UpdateSingle,
    UpdateByQuery,
    DeleteSingle,
    DeleteByQuery,
    /// SQL query, newest two ids.
    Query,
    /// Match-all search, newest two ids.
    Search,
    Count,
}

async fn connect(registry: &ClientRegistry, args: &Args) -> Result<Arc<EsClient>, String> {
    let cluster = match &args.config {
        Some(path) => {
            let config = Config::load(path)
                .map_err(|e| format!("Failed to load config file {:?}: {}", path, e))?;
            config.get_cluster(&args.cluster).cloned()
        }
        None => None,
    };

    let client = match (cluster, &args.hosts) {
        (Some(cluster), _) => {
            registry
                .get_or_create_with(cluster.get_name(), cluster.to_builder())
                .await
        }
        (None, Some(hosts)) => registry.get_or_create(&args.cluster, hosts).await,
        (None, None) => {
            return Err(format!(
                "Cluster '{}' not configured and --hosts not given",
                args.cluster
            ))
        }
    };
    client.map_err(|e| e.to_string())
}

async fn execute(client: &EsClient, index: &str, command: Command) -> Result<Option<EsResponse>, EsError> {
    let response = match command {
        Command::Info => {
            client.print_server_info("Cluster").await?;
            return Ok(None);
        }
        Command::Count => {
            let count = client.count(index, &es_pool::models::query::match_all()).await?;
            println!("{}", count);
            return Ok(None);
        }
        Command::CreateIndex => client.create_index(index, &demo::mapping()).await?,
        Command::DeleteIndex => client.delete_index(index).await?,
        Command::InsertOne => {
            client
                .create_document(
                    index,
                    &demo::document_id(1),
                    &GeoDocument::new(1),
                    Some(demo::CREATE_TIMEOUT),
                )
                .await?
        }
        Command::InsertBatch => {
            let body = demo::batch(index, demo::BATCH_IDS)?;
            client.bulk(&body).await?
        }
        Command::Get => client.get_document(index, &demo::document_id(1)).await?,
        Command::UpdateSingle => {
            client
                .update_document(index, &demo::document_id(1), &demo::relocation())
                .await?
        }
        Command::UpdateByQuery => client.update_by_query(index, &demo::renumber()).await?,
        Command::DeleteSingle => client.delete_document(index, &demo::document_id(1)).await?,
        Command::DeleteByQuery => client.delete_by_query(index, &demo::delete_filter()).await?,
        Command::Query => client.sql_query(&demo::sql(index)).await?,
        Command::Search => client.search(index, &demo::first_page()).await?,
    };
    Ok(Some(response))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_file(true)
        .with_line_number(true)
        .init();

    info!(
        "Args cluster={:?}, index={:?}, command={:?}",
        args.cluster, args.index, args.command
    );

    let registry = ClientRegistry::new();
    let client = match connect(&registry, &args).await {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match execute(&client, &args.index, args.command).await {
        Ok(Some(response)) => {
            println!("[{}] {}", response.status(), response.body());
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(EsError::Status { status, body }) => {
            println!("[{}] {}", status, body);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
