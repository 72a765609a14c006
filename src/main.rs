use std::path::PathBuf;
use std::sync::Arc;

use wheelhouse::cli::{Cli, Commands, ConfigAction};
use wheelhouse::config::{expand_tilde, Config};
use wheelhouse::error::{Result, WheelhouseError};
use wheelhouse::query::Interpreter;
use wheelhouse::server::Server;
use wheelhouse::storage::StorageManager;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Serve => cmd_serve(cli.config),
        Commands::Seed { force } => cmd_seed(cli.config, force),
        Commands::Parse { query, json } => cmd_parse(cli.config, &query, json),
        Commands::Search { query, limit, json } => cmd_search(cli.config, &query, limit, json),
        Commands::Status => cmd_status(cli.config),
        Commands::Config { action } => cmd_config(cli.config, action),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose {
        "wheelhouse=debug"
    } else {
        "wheelhouse=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn cmd_serve(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let storage = Arc::new(open_storage(&config)?);

    if config.storage.seed_on_start {
        storage.seed_if_empty()?;
    }

    let server = Server::new(config, storage);

    let rt = tokio::runtime::Runtime::new().map_err(|e| WheelhouseError::Io {
        source: e,
        context: "Failed to create tokio runtime".to_string(),
    })?;
    rt.block_on(server.run())
}

fn cmd_seed(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let storage = open_storage(&config)?;

    let inserted = if force {
        storage.seed()?
    } else {
        storage.seed_if_empty()?
    };

    if inserted > 0 {
        println!("✓ Seeded catalog with {} vehicles", inserted);
    } else {
        println!("Catalog already seeded ({} vehicles); use --force to reload",
            storage.stats()?.vehicle_count);
    }
    Ok(())
}

fn cmd_parse(config_path: Option<PathBuf>, query: &str, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let interpreter = interpreter_from(&config);
    let filters = interpreter.interpret(query)?;

    if json {
        println!("{}", to_pretty_json(&filters)?);
        return Ok(());
    }

    println!("Recognized filters");
    println!("==================");
    match (filters.price_min, filters.price_max) {
        (None, None) => println!("Price:      any"),
        (min, max) => println!(
            "Price:      {} — {}",
            min.map_or("any".to_string(), |v| v.to_string()),
            max.map_or("any".to_string(), |v| v.to_string()),
        ),
    }
    println!("Body types: {}", format_set(&filters.body_type));
    println!("Brands:     {}", format_set(&filters.brands));
    println!("Tags:       {}", format_set(&filters.tags));
    println!("Title:      {}", format_set(&filters.title));
    Ok(())
}

fn cmd_search(config_path: Option<PathBuf>, query: &str, limit: usize, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let storage = open_storage(&config)?;
    storage.seed_if_empty()?;

    let interpreter = interpreter_from(&config);
    let filters = interpreter.interpret(query)?;
    let items = storage.catalog.search(&filters)?;
    let shown: Vec<_> = items.iter().take(limit).collect();

    if json {
        println!(
            "{}",
            to_pretty_json(&serde_json::json!({ "filters": filters, "items": shown }))?
        );
        return Ok(());
    }

    println!("{} of {} matching vehicles:", shown.len(), items.len());
    for car in shown {
        println!(
            "  #{:<3} {} ({}, {}) — {} ₽, {}",
            car.id, car.title, car.year, car.body_type, car.price, car.city
        );
    }
    Ok(())
}

fn cmd_status(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let storage = open_storage(&config)?;
    let stats = storage.stats()?;

    println!("Wheelhouse Status");
    println!("=================");
    println!("Database:  {}", storage.db_path().display());
    println!("Vehicles:  {}", stats.vehicle_count);
    println!("Users:     {}", stats.user_count);
    println!("Sessions:  {}", stats.session_count);
    println!("Favorites: {}", stats.favorite_count);
    println!("Reviews:   {}", stats.review_count);
    println!("Posts:     {}", stats.post_count);
    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            println!("{}", to_pretty_json(&config)?);
        }
        ConfigAction::Validate { file } => {
            let path = match file {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = Config::default_path()?;

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| WheelhouseError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if !path.exists() {
        tracing::debug!("Config file not found, using defaults");
        return Ok(Config::default());
    }

    Config::load(&path)
}

fn open_storage(config: &Config) -> Result<StorageManager> {
    StorageManager::new(expand_tilde(&config.storage.data_dir))
}

fn interpreter_from(config: &Config) -> Interpreter {
    Interpreter::new(
        config.search.premium_price_floor,
        config.search.luxury_price_floor,
    )
}

fn format_set(values: &[String]) -> String {
    if values.is_empty() {
        "any".to_string()
    } else {
        values.join(", ")
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| WheelhouseError::Json {
        source: e,
        context: "Failed to serialize output".to_string(),
    })
}
