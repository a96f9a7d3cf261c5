//! Cart CLI - Inspect and edit the on-device cart.
//!
//! Commands:
//! - `cart show` - Print the cart with resolved prices
//! - `cart add` - Add a catalog product
//! - `cart remove` - Remove a line
//! - `cart update` - Set a line's quantity
//! - `cart clear` - Empty the cart
//! - `cart refresh` - Re-fetch catalog data for the cart

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, LineArgs, UpdateArgs};

/// Cart CLI - Inspect and edit the on-device cart
#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Use the signed-in cart instead of the guest cart
    #[arg(long, global = true)]
    auth: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,

    /// Add a product to the cart
    Add(AddArgs),

    /// Remove a line from the cart
    Remove(LineArgs),

    /// Set the quantity of a line
    Update(UpdateArgs),

    /// Remove everything from the cart
    Clear,

    /// Refresh product data from the catalog
    Refresh,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("cart_sync=debug,cart_cli=debug")
        } else {
            EnvFilter::new("cart_sync=info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config, open storage and hydrate the cart
    let ctx = match context::Context::load(cli.config.as_deref(), cli.auth, output.clone()).await {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Show => commands::show::run(&ctx).await,
        Commands::Add(args) => commands::add::run(args, &ctx).await,
        Commands::Remove(args) => commands::remove::run(args, &ctx).await,
        Commands::Update(args) => commands::update::run(args, &ctx).await,
        Commands::Clear => commands::clear::run(&ctx).await,
        Commands::Refresh => commands::refresh::run(&ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
