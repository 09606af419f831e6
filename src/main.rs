use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use ehcg::azure::auth::AzureCredentials;
use ehcg::azure::client::ArmClient;
use ehcg::azure::http::format_api_error;
use ehcg::config::Config;
use ehcg::provider::{self, Operation, Request};
use ehcg::ProviderError;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage Event Hub consumer groups and authorization rules
#[derive(Parser, Debug)]
#[command(name = "ehcg", version, about, long_about = None)]
struct Args {
    /// Subscription to operate in
    #[arg(short, long, global = true)]
    subscription: Option<String>,

    /// Azure AD tenant of the service principal
    #[arg(long, global = true)]
    tenant_id: Option<String>,

    /// Application (client) ID of the service principal
    #[arg(long, global = true)]
    client_id: Option<String>,

    /// Management endpoint
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a resource from its configuration
    Create(ConfigArgs),
    /// Read a resource by ID
    Read(IdArgs),
    /// Update a resource in place
    Update {
        #[command(flatten)]
        target: IdArgs,
        /// Path to the JSON configuration ('-' for stdin)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Delete a resource by ID
    Delete(IdArgs),
    /// Look up an existing object through a data source
    Lookup(ConfigArgs),
    /// Check a configuration without calling the API
    Validate(ConfigArgs),
    /// List the supported resource types
    Schema,
    /// Remember a subscription for later runs
    UseSubscription {
        subscription_id: String,
    },
}

#[derive(ClapArgs, Debug)]
struct ConfigArgs {
    /// Resource or data source type, e.g. azurerm_eventhub_consumer_group
    resource_type: String,
    /// Path to the JSON configuration ('-' for stdin)
    #[arg(short, long)]
    config: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct IdArgs {
    /// Resource type, e.g. azurerm_eventhub_consumer_group
    resource_type: String,
    /// Resource ID
    #[arg(long)]
    id: String,
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

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        },
    };

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

    tracing::info!("ehcg started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ehcg").join("ehcg.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ehcg").join("ehcg.log");
    }
    PathBuf::from("ehcg.log")
}

fn read_config(path: &PathBuf) -> Result<Value> {
    let content = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read configuration from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {:?}", path))?
    };

    serde_json::from_str(&content).context("Configuration is not valid JSON")
}

fn build_client(args: &Args, config: &Config, id_subscription: Option<&str>) -> Result<(ArmClient, String)> {
    let subscription_id = config.effective_subscription(args.subscription.as_deref(), id_subscription)?;
    let tenant_id = config.effective_tenant(args.tenant_id.as_deref());
    let client_id = config.effective_client_id(args.client_id.as_deref());
    let endpoint = config.effective_endpoint(args.endpoint.as_deref());

    tracing::info!("Using subscription: {}, endpoint: {}", subscription_id, endpoint);

    let credentials = AzureCredentials::from_env(tenant_id.as_deref(), client_id.as_deref())?;
    let client = ArmClient::new(credentials, &endpoint)?;

    Ok((client, subscription_id))
}

/// Render a provider error for the terminal
fn describe_error(err: &ProviderError) -> String {
    match err {
        ProviderError::RemoteCallFailure { action, source } => {
            format!("{}: {}", action, format_api_error(source))
        },
        other => other.to_string(),
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();

    let (resource_type, operation, id, config_path) = match &args.command {
        Command::Schema => {
            for key in provider::get_all_resource_keys() {
                let Some(schema) = provider::get_resource(key) else {
                    continue;
                };
                let force_new = schema.force_new_attributes().join(", ");
                println!("{}\t{}\t(replaced on change of: {})", key, schema.display_name, force_new);
            }
            return Ok(());
        },
        Command::UseSubscription { subscription_id } => {
            config.set_subscription(subscription_id)?;
            println!("Using subscription {}", subscription_id);
            return Ok(());
        },
        Command::Validate(target) => {
            let value = read_config(&target.config)?;
            let result = provider::validate(&target.resource_type, value)
                .map_err(|e| anyhow::anyhow!(describe_error(&e)))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        },
        Command::Create(target) => (
            target.resource_type.as_str(),
            Operation::Create,
            None,
            Some(&target.config),
        ),
        Command::Lookup(target) => (
            target.resource_type.as_str(),
            Operation::Lookup,
            None,
            Some(&target.config),
        ),
        Command::Read(target) => (
            target.resource_type.as_str(),
            Operation::Read,
            Some(target.id.as_str()),
            None,
        ),
        Command::Update {
            target,
            config: config_file,
        } => (
            target.resource_type.as_str(),
            Operation::Update,
            Some(target.id.as_str()),
            Some(config_file),
        ),
        Command::Delete(target) => (
            target.resource_type.as_str(),
            Operation::Delete,
            Some(target.id.as_str()),
            None,
        ),
    };

    let value = match config_path {
        Some(path) => read_config(path)?,
        None => Value::Null,
    };

    // Read, update and delete can run on the subscription in the ID alone
    let id_subscription = id.and_then(|id| provider::subscription_from_id(resource_type, id).ok());
    let (client, subscription_id) = build_client(&args, &config, id_subscription.as_deref())?;

    let request = Request {
        resource_type,
        operation,
        id,
        config: value,
    };

    let result = provider::execute(&client, &subscription_id, request)
        .await
        .map_err(|e| anyhow::anyhow!(describe_error(&e)))?;

    if !result.is_null() {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let code = {
        let _log_guard = setup_logging(args.log_level);

        match run(args).await {
            Ok(()) => 0,
            Err(err) => {
                tracing::error!("{:#}", err);
                eprintln!("Error: {:#}", err);
                1
            },
        }
    };

    std::process::exit(code);
}
