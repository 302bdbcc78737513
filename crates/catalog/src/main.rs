mod cache;
mod config;
mod refresh;
mod service;
mod state;
mod storage;

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_core::catalog::{Product, SortOrder};

use crate::{config::Config, state::AppState};

/// Catalog - Product catalog with TTL caches and scheduled refresh
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the cache refresher and event logger until interrupted
    Serve,
    /// List every product
    List {
        /// Sort order of the listing
        #[arg(long, value_enum, default_value_t = SortArg::Name)]
        sort: SortArg,
    },
    /// Search products by name, code, release date, price, rating or image
    Search {
        /// Case-insensitive text to look for (empty lists everything)
        text: Option<String>,
    },
    /// Show the product count and the number of products per name
    Stats,
    /// Show a single product
    Get {
        id: i64,
    },
    /// Add a new product
    Add(ProductArgs),
    /// Change fields of an existing product
    Update {
        id: i64,
        #[command(flatten)]
        changes: ProductChanges,
    },
    /// Delete a product
    Delete {
        id: i64,
    },
}

#[derive(clap::Args, Debug)]
struct ProductArgs {
    #[arg(long)]
    name: String,
    /// Product code, e.g. GDN-0011
    #[arg(long)]
    code: String,
    #[arg(long)]
    description: String,
    /// Release date as YYYY-MM-DD
    #[arg(long)]
    release_date: NaiveDate,
    #[arg(long)]
    price: f64,
    #[arg(long)]
    rating: f64,
    /// Path or URL of a .png image
    #[arg(long)]
    image_url: String,
}

impl From<ProductArgs> for Product {
    fn from(args: ProductArgs) -> Self {
        Product::new(
            args.name,
            args.code,
            args.description,
            args.release_date,
            args.price,
            args.rating,
            args.image_url,
        )
    }
}

#[derive(clap::Args, Debug)]
struct ProductChanges {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    code: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    release_date: Option<NaiveDate>,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long)]
    rating: Option<f64>,
    #[arg(long)]
    image_url: Option<String>,
}

impl ProductChanges {
    fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(code) = self.code {
            product.code = code;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(release_date) = self.release_date {
            product.release_date = release_date;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(rating) = self.rating {
            product.star_rating = rating;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = image_url;
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Name,
    Id,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortOrder::Name,
            SortArg::Id => SortOrder::Id,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    // Initialize tracing subscriber; logs go to stderr so stdout stays clean
    let text_layer = (!config.log_json)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let json_layer = config
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog=debug,catalog_core=info".into()),
        )
        .with(text_layer)
        .with(json_layer)
        .init();

    let state = AppState::new(&config).await?;
    state.seed_demo_data().await?;

    match cli.command {
        Command::Serve => serve(state).await?,
        Command::List { sort } => {
            let products = state.service.find_all_sorted(sort.into()).await?;
            print_products(&products, cli.json)?;
        }
        Command::Search { text } => {
            let products = state.service.find_filter_products(text.as_deref()).await?;
            print_products(&products, cli.json)?;
        }
        Command::Stats => {
            let count = state.service.count().await?;
            let by_name = state.service.get_stats().await?;
            print_stats(count, &by_name, cli.json)?;
        }
        Command::Get { id } => {
            let product = state.service.find_product_by_id(id).await?;
            print_products(&[product], cli.json)?;
        }
        Command::Add(args) => {
            let product = state.service.save(&args.into()).await?;
            print_products(&[product], cli.json)?;
        }
        Command::Update { id, changes } => {
            let mut product = state.service.find_product_by_id(id).await?;
            changes.apply(&mut product);
            let product = state.service.update_product(&product).await?;
            print_products(&[product], cli.json)?;
        }
        Command::Delete { id } => {
            let product = state.service.find_product_by_id(id).await?;
            let deleted = state.service.delete_product(&product).await?;
            print_products(&[deleted], cli.json)?;
        }
    }

    Ok(())
}

/// Runs the background tasks until a shutdown signal arrives.
async fn serve(state: AppState) -> Result<()> {
    let tasks = state.start_background_tasks().await?;
    let products = state.service.find_all_products().await?;
    tracing::info!(products = products.len(), "Catalog running, press Ctrl+C to stop");

    shutdown_signal(state.clone()).await;

    let logged = tasks.join().await;
    state.service.cache().clear().await;
    tracing::info!(events_logged = logged, "Catalog stopped");
    Ok(())
}

fn print_products(products: &[Product], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(products)?);
        return Ok(());
    }

    println!(
        "{:>4}  {:<10} {:<24} {:<10} {:>9} {:>6}",
        "ID", "CODE", "NAME", "RELEASED", "PRICE", "RATING"
    );
    for product in products {
        println!(
            "{:>4}  {:<10} {:<24} {:<10} {:>9.2} {:>6.1}",
            product.id.map(|id| id.to_string()).unwrap_or_default(),
            product.code,
            product.name,
            product.release_date.to_string(),
            product.price,
            product.star_rating,
        );
    }
    Ok(())
}

fn print_stats(count: u64, by_name: &BTreeMap<String, usize>, json: bool) -> Result<()> {
    if json {
        let stats = serde_json::json!({ "count": count, "by_name": by_name });
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{count} products");
    for (name, n) in by_name {
        println!("  {name:<24} {n}");
    }
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM) and notify background tasks.
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    state.signal_shutdown();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_sort() {
        let cli = Cli::try_parse_from(["catalog", "list", "--sort", "id"]).unwrap();
        assert!(matches!(cli.command, Command::List { sort: SortArg::Id }));
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_search_with_global_json_flag() {
        let cli = Cli::try_parse_from(["catalog", "search", "gdn", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Search { text } => assert_eq!(text.as_deref(), Some("gdn")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "catalog",
            "add",
            "--name",
            "Hammer",
            "--code",
            "TBX-0048",
            "--description",
            "Curved claw steel hammer",
            "--release-date",
            "2021-05-21",
            "--price",
            "8.9",
            "--rating",
            "4.8",
            "--image-url",
            "assets/images/hammer.png",
        ])
        .unwrap();

        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        let product = Product::from(args);
        assert_eq!(product.id, None);
        assert_eq!(product.release_date, NaiveDate::from_ymd_opt(2021, 5, 21).unwrap());
        assert_eq!(product.star_rating, 4.8);
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let result = Cli::try_parse_from(["catalog", "update", "3", "--release-date", "21/05/2021"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_changes_apply_only_given_fields() {
        let cli = Cli::try_parse_from(["catalog", "update", "3", "--price", "9.5"]).unwrap();
        let Command::Update { id, changes } = cli.command else {
            panic!("expected update");
        };
        let mut product = Product::new(
            "Hammer",
            "TBX-0048",
            "Curved claw steel hammer",
            NaiveDate::from_ymd_opt(2021, 5, 21).unwrap(),
            8.9,
            4.8,
            "assets/images/hammer.png",
        )
        .with_id(id);
        let before = product.clone();

        changes.apply(&mut product);

        assert_eq!(product.price, 9.5);
        assert_eq!(Product { price: 8.9, ..product }, before);
    }

    #[test]
    fn test_sort_arg_maps_to_order() {
        assert_eq!(SortOrder::from(SortArg::Name), SortOrder::Name);
        assert_eq!(SortOrder::from(SortArg::Id), SortOrder::Id);
    }
}
