use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vinyl_cache::collection_store::{CatalogEntry, CollectionStore, SqliteCollectionStore};
use vinyl_cache::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_REQUEST_TIMEOUT_SEC,
};
use vinyl_cache::local_store::LocalDatabase;
use vinyl_cache::queue_store::SqliteQueueStore;
use vinyl_cache::remote::{DiscogsClient, TokenAuth, DEFAULT_API_BASE_URL, MAX_PER_PAGE};
use vinyl_cache::session::selection::select_with_count;
use vinyl_cache::session::{CollectionSession, LoadOutcome, QueueSession};
use vinyl_cache::sync::{SyncCoordinator, DEFAULT_STALE_THRESHOLD_MS};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "vinyl-cache")]
#[command(about = "Keeps a local copy of a Discogs collection and a listening queue")]
struct CliArgs {
    /// Path to the SQLite store. Defaults to vinyl.db in the working directory.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file. Its values override command line values.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Discogs username whose collection is cached.
    #[clap(short, long)]
    pub username: Option<String>,

    /// Discogs personal access token.
    #[clap(long, env = "DISCOGS_TOKEN", hide_env_values = true)]
    pub discogs_token: Option<String>,

    /// Base URL of the Discogs API.
    #[clap(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Timeout in seconds for Discogs requests.
    #[clap(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SEC)]
    pub request_timeout_sec: u64,

    /// Age in milliseconds after which the local copy is refreshed.
    #[clap(long, default_value_t = DEFAULT_STALE_THRESHOLD_MS)]
    pub stale_threshold_ms: i64,

    /// Releases requested per collection page (1-100).
    #[clap(long, default_value_t = MAX_PER_PAGE)]
    pub per_page: u32,

    #[command(subcommand)]
    command: Command,
}

impl CliArgs {
    fn cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            username: self.username.clone(),
            discogs_token: self.discogs_token.clone(),
            api_base_url: self.api_base_url.clone(),
            request_timeout_sec: self.request_timeout_sec,
            stale_threshold_ms: self.stale_threshold_ms,
            per_page: self.per_page,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refreshes the local copy if it is stale.
    Sync {
        /// Refresh even if the local copy is fresh.
        #[clap(long)]
        force: bool,
    },

    /// Lists the cached collection by title.
    List,

    /// Picks a random record from the collection.
    Random,

    /// Manages the listening queue.
    #[command(subcommand)]
    Queue(QueueCommand),

    /// Deletes every cached record, the queue and the sync time.
    Reset,

    /// Shows the Discogs user the token belongs to.
    Whoami,
}

#[derive(Subcommand, Debug)]
enum QueueCommand {
    /// Shows the queue in play order.
    List,

    /// Appends a cached record, by its Discogs release id.
    Add { external_id: i64 },

    /// Removes a queue entry by its queue id.
    Remove { queue_id: i64 },

    /// Removes every queue entry.
    Clear,
}

fn describe(entry: &CatalogEntry) -> String {
    let year = entry
        .year
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    format!(
        "[{}] {} - {}{}",
        entry.external_id,
        entry.artist_names(),
        entry.title,
        year
    )
}

fn require_username(config: &AppConfig) -> Result<&str> {
    config
        .username
        .as_deref()
        .ok_or_else(|| anyhow!("Username is required, pass --username or set it in the config file"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(&cli_args.cli_config(), file_config)?;

    info!("Opening local store at {:?}...", config.db_path);
    let db = LocalDatabase::open(&config.db_path)?;
    db.ensure_ready()
        .context("Failed to initialize local store")?;

    let collection_store = Arc::new(SqliteCollectionStore::new(db.clone()));
    let queue_session = QueueSession::new(Arc::new(SqliteQueueStore::new(db)));

    let auth = Arc::new(TokenAuth::new(
        config.discogs_token.clone(),
        config.username.clone(),
    ));
    let client = Arc::new(DiscogsClient::new(
        config.api_base_url.clone(),
        config.request_timeout_sec,
        config.per_page,
        auth,
    )?);
    let coordinator = Arc::new(
        SyncCoordinator::new(collection_store.clone(), client.clone())
            .with_stale_threshold_ms(config.stale_threshold_ms),
    );
    let session = CollectionSession::new(coordinator);

    match cli_args.command {
        Command::Sync { force } => {
            let username = require_username(&config)?;
            match session.load_collection(username, force).await {
                LoadOutcome::Loaded(outcome) => {
                    println!(
                        "Sync {}: {} records cached",
                        outcome,
                        session.records().len()
                    );
                }
                _ => bail!(
                    "{}",
                    session
                        .error()
                        .unwrap_or_else(|| "Failed to load collection".to_string())
                ),
            }
        }
        Command::List => {
            for entry in collection_store.list_all_entries()? {
                println!("{}", describe(&entry));
            }
        }
        Command::Random => {
            let entries = collection_store.list_all_entries()?;
            let selection = select_with_count(&entries);
            match selection.selected {
                Some(entry) => println!(
                    "{} (out of {} records)",
                    describe(&entry),
                    selection.count
                ),
                None => println!("The collection is empty, run sync first"),
            }
        }
        Command::Queue(queue_command) => match queue_command {
            QueueCommand::List => {
                if !queue_session.refresh_queue() {
                    bail!("{}", queue_session.error().unwrap_or_default());
                }
                for entry in queue_session.queue() {
                    println!(
                        "{}. #{} {}",
                        entry.play_order.unwrap_or_default(),
                        entry.id,
                        describe(&entry.record)
                    );
                }
                println!("{} records in queue", queue_session.queue_count());
            }
            QueueCommand::Add { external_id } => {
                let entry = collection_store
                    .get_entry_by_external_id(external_id)?
                    .ok_or_else(|| anyhow!("No cached record with id {}", external_id))?;
                if !queue_session.add_to_queue(&entry) {
                    bail!("{}", queue_session.error().unwrap_or_default());
                }
                println!("Queued {}", describe(&entry));
            }
            QueueCommand::Remove { queue_id } => {
                if !queue_session.remove_from_queue(queue_id) {
                    bail!("{}", queue_session.error().unwrap_or_default());
                }
                println!("{} records in queue", queue_session.queue_count());
            }
            QueueCommand::Clear => match queue_session.clear_queue() {
                Some(removed) => println!("Removed {} records from queue", removed),
                None => bail!("{}", queue_session.error().unwrap_or_default()),
            },
        },
        Command::Reset => {
            collection_store.reset()?;
            println!("Local store cleared");
        }
        Command::Whoami => {
            let username = client.fetch_identity().await?;
            println!("{}", username);
        }
    }

    Ok(())
}
