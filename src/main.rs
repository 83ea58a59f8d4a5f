/// Version injected at compile time via OSAPI_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("OSAPI_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::TryStreamExt;
use osapi::resource::{get_all_resource_keys, get_resource, parse_filter, QueryOptions, ResourceApi};
use osapi::{format_api_error, Config, OpenStackClient};
use serde_json::Value;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Paginated listing for OpenStack APIs
#[derive(Parser, Debug)]
#[command(name = "osapi", version, about, long_about = None)]
struct Args {
    /// Config file (defaults to <config dir>/osapi/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the resources that can be listed
    Resources,
    /// List a resource, one JSON document per line
    List {
        resource: String,
        /// Filter such as `status=ACTIVE` or `counter_volume>=10` (repeatable)
        #[arg(short, long = "filter")]
        filters: Vec<String>,
        /// Only return these fields (repeatable)
        #[arg(long = "fields")]
        fields: Vec<String>,
        /// Page size
        #[arg(long)]
        limit: Option<u32>,
        /// Start after this marker
        #[arg(long)]
        marker: Option<String>,
        /// Fetch a single page and report the next marker on stderr
        #[arg(long)]
        page: bool,
        /// Stop after this many items
        #[arg(long)]
        max: Option<usize>,
        /// Print reference projections instead of full items
        #[arg(long)]
        refs: bool,
    },
    /// Show one item
    Get { resource: String, id: String },
    /// Delete one item
    Delete { resource: String, id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("osapi {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("osapi").join("osapi.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".osapi").join("osapi.log");
    }
    PathBuf::from("osapi.log")
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path).map_err(|e| anyhow!(format_api_error(&e)))?,
        None => Config::load(),
    };
    Ok(config.with_env())
}

fn resource_api(client: &OpenStackClient, key: &str) -> Result<ResourceApi<Value>> {
    let entry = get_resource(key).ok_or_else(|| {
        anyhow!(
            "Unknown resource '{}'. Available: {}",
            key,
            get_all_resource_keys().join(", ")
        )
    })?;
    Ok(ResourceApi::new(client.clone(), entry.descriptor))
}

fn build_options(
    filters: &[String],
    fields: &[String],
    limit: Option<u32>,
    marker: Option<&str>,
) -> Result<QueryOptions> {
    let mut options = QueryOptions::new();
    for expr in filters {
        let filter = parse_filter(expr)
            .ok_or_else(|| anyhow!("Invalid filter '{}', expected e.g. status=ACTIVE", expr))?;
        options = options.filter_op(&filter.field, filter.op, &filter.value);
    }
    for field in fields {
        options = options.field(field);
    }
    if let Some(limit) = limit {
        options = options.limit(limit);
    }
    if let Some(marker) = marker {
        options = options.marker(marker);
    }
    Ok(options)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn print_resources() {
    for key in get_all_resource_keys() {
        if let Some(entry) = get_resource(key) {
            println!(
                "{:<22} {:<30} {}",
                entry.key, entry.display_name, entry.descriptor.service
            );
        }
    }
}

fn connect(config_path: Option<&PathBuf>) -> Result<OpenStackClient> {
    let config = load_config(config_path)?;
    config.client().map_err(|e| anyhow!(format_api_error(&e)))
}

async fn run(command: Command, config_path: Option<&PathBuf>) -> Result<()> {
    match command {
        Command::Resources => print_resources(),
        Command::List {
            resource,
            filters,
            fields,
            limit,
            marker,
            page,
            max,
            refs,
        } => {
            let client = connect(config_path)?;
            let api = resource_api(&client, &resource)?;
            let options = build_options(&filters, &fields, limit, marker.as_deref())?;

            if page {
                let page = api.list_page_raw(&options).await?;
                for item in &page.items {
                    print_json(item)?;
                }
                match page.next_marker {
                    Some(marker) => eprintln!("next marker: {}", marker),
                    None => eprintln!("last page"),
                }
                return Ok(());
            }

            let mut remaining = max.unwrap_or(usize::MAX);
            if refs {
                let mut items = api.list_references(options);
                while remaining > 0 {
                    let Some(reference) = items.try_next().await? else {
                        break;
                    };
                    print_json(&Value::Object(reference.into_inner()))?;
                    remaining -= 1;
                }
            } else {
                let mut items = api.list_with(options);
                while remaining > 0 {
                    let Some(item) = items.try_next().await? else {
                        break;
                    };
                    print_json(&item)?;
                    remaining -= 1;
                }
            }
        }
        Command::Get { resource, id } => {
            let client = connect(config_path)?;
            let api = resource_api(&client, &resource)?;
            match api.get(&id).await? {
                Some(item) => println!("{}", serde_json::to_string_pretty(&item)?),
                None => bail!("{} '{}': not found", resource, id),
            }
        }
        Command::Delete { resource, id } => {
            let client = connect(config_path)?;
            let api = resource_api(&client, &resource)?;
            if api.delete(&id).await? {
                println!("deleted");
            } else {
                println!("not found");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    if let Err(err) = run(args.command, args.config.as_ref()).await {
        tracing::error!("Command failed: {:?}", err);
        let message = match err.downcast_ref::<osapi::Error>() {
            Some(api_err) => format_api_error(api_err),
            None => err.to_string(),
        };
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }

    Ok(())
}
