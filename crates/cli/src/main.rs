//! Toyshop CLI - storefront and admin operations over a local data file.
//!
//! # Usage
//!
//! ```bash
//! # Admin: log in, add a product, check stock
//! toyshop login -u admin -p secret
//! toyshop products add --name "Wooden Train" --description "Pull-along" \
//!     --price 12.50 --size Default=4 --image train.png
//! toyshop dashboard
//!
//! # Shopper: browse, fill the cart, check out
//! toyshop browse --category toys --search train
//! toyshop cart add <product-id> --size Default --quantity 2
//! toyshop checkout
//! ```
//!
//! # Commands
//!
//! - `browse` / `show` - Product listing and detail
//! - `cart` - Add, update, remove, clear, show
//! - `checkout` - WhatsApp order link
//! - `login` / `logout` / `status` / `devices` - Admin session
//! - `products` - Product management (requires login)
//! - `dashboard` - Inventory statistics (requires login)
//!
//! # Environment Variables
//!
//! - `TOYSHOP_DATA_FILE` - Data file path (default: `toyshop-data.json`)
//! - `TOYSHOP_USER_AGENT` - User agent mixed into the device id
//! - `RUST_LOG` - Log filter (default: `toyshop=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use toyshop_core::{Category, Gender, Price, ProductId, SizeVariant};

mod commands;
mod images;
mod store;

#[derive(Parser)]
#[command(name = "toyshop")]
#[command(author, version, about = "Toyshop storefront and admin tools")]
struct Cli {
    /// Data file holding the shop's state
    #[arg(
        long,
        global = true,
        env = "TOYSHOP_DATA_FILE",
        default_value = "toyshop-data.json"
    )]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered
    Browse(BrowseArgs),
    /// Show one product
    Show {
        /// Product ID
        id: ProductId,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Build the WhatsApp order link for the cart
    Checkout {
        /// Print the message and link as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log in to the admin console
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Log out and free this device's slot
    Logout,
    /// Show whether this device is logged in
    Status,
    /// List devices on the admin allow-list
    Devices,
    /// Manage products (requires login)
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Show inventory statistics (requires login)
    Dashboard {
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct BrowseArgs {
    /// Search name, description, and code
    #[arg(short, long, default_value = "")]
    search: String,
    /// Only this category (toys, clothes, supplies)
    #[arg(long)]
    category: Option<Category>,
    /// Only this gender (male, female, unisex)
    #[arg(long)]
    gender: Option<Gender>,
    /// Only this age range, e.g. "0-3 years"
    #[arg(long)]
    age_range: Option<String>,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: ProductId,
        /// Size name
        #[arg(short, long, default_value = toyshop_core::DEFAULT_SIZE_NAME)]
        size: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Change the quantity of a line
    Update {
        /// Line number as shown by `cart show`
        line: usize,
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Line number as shown by `cart show`
        line: usize,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products with stock
    List,
    /// Add a product
    Add(ProductFields),
    /// Edit a product; only given fields change
    Update {
        /// Product ID
        id: ProductId,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: ProductId,
    },
    /// Add every product in a JSON array of product drafts
    Import {
        /// JSON file path
        file: PathBuf,
    },
}

/// Product form fields.
#[derive(Args)]
struct ProductFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, value_parser = parse_price)]
    price: Option<Price>,
    #[arg(long)]
    code: Option<String>,
    /// toys, clothes, or supplies
    #[arg(long)]
    category: Option<Category>,
    /// male, female, or unisex
    #[arg(long)]
    gender: Option<Gender>,
    #[arg(long)]
    age_range: Option<String>,
    /// Size as NAME=COUNT; repeat for several. Replaces existing sizes.
    #[arg(long = "size", value_parser = parse_size)]
    sizes: Vec<SizeVariant>,
    /// Image file or data URL; repeat for several
    #[arg(long = "image")]
    images: Vec<String>,
    /// Image position to remove (1-based); repeat for several
    #[arg(long = "remove-image")]
    remove_images: Vec<usize>,
}

fn parse_price(value: &str) -> Result<Price, String> {
    value
        .trim()
        .trim_start_matches('$')
        .parse()
        .map(Price::new)
        .map_err(|e| format!("invalid price '{value}': {e}"))
}

fn parse_size(value: &str) -> Result<SizeVariant, String> {
    let (name, count) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=COUNT, got '{value}'"))?;
    let count = count
        .trim()
        .parse()
        .map_err(|e| format!("invalid count in '{value}': {e}"))?;
    Ok(SizeVariant::new(name.trim(), count))
}

#[allow(clippy::print_stderr)]
fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("toyshop=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let ctx = commands::Context::open(&cli.data_file)?;

    match cli.command {
        Commands::Browse(args) => commands::shop::browse(&ctx, args.into_filter())?,
        Commands::Show { id } => commands::shop::show(&ctx, &id)?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::shop::cart_show(&ctx)?,
            CartAction::Add { id, size, quantity } => {
                commands::shop::cart_add(&ctx, &id, &size, quantity)?;
            }
            CartAction::Update { line, quantity } => {
                commands::shop::cart_update(&ctx, line, quantity)?;
            }
            CartAction::Remove { line } => commands::shop::cart_remove(&ctx, line)?,
            CartAction::Clear => commands::shop::cart_clear(&ctx)?,
        },
        Commands::Checkout { json } => commands::shop::checkout(&ctx, json)?,
        Commands::Login { username, password } => {
            commands::admin::login(&ctx, &username, &password)?;
        }
        Commands::Logout => commands::admin::logout(&ctx)?,
        Commands::Status => commands::admin::status(&ctx)?,
        Commands::Devices => commands::admin::devices(&ctx)?,
        Commands::Products { action } => match action {
            ProductAction::List => commands::admin::products_list(&ctx)?,
            ProductAction::Add(fields) => commands::admin::products_add(&ctx, fields.into_edit())?,
            ProductAction::Update { id, fields } => {
                commands::admin::products_update(&ctx, &id, fields.into_edit())?;
            }
            ProductAction::Delete { id } => commands::admin::products_delete(&ctx, &id)?,
            ProductAction::Import { file } => commands::admin::products_import(&ctx, &file)?,
        },
        Commands::Dashboard { json } => commands::admin::dashboard(&ctx, json)?,
    }
    Ok(())
}

impl BrowseArgs {
    fn into_filter(self) -> toyshop_storefront::services::CatalogFilter {
        toyshop_storefront::services::CatalogFilter {
            search: self.search,
            category: self.category,
            gender: self.gender,
            age_range: self.age_range,
        }
    }
}

impl ProductFields {
    fn into_edit(self) -> commands::admin::ProductEdit {
        commands::admin::ProductEdit {
            name: self.name,
            description: self.description,
            price: self.price,
            code: self.code,
            category: self.category,
            gender: self.gender,
            age_range: self.age_range,
            sizes: self.sizes,
            images: self.images,
            remove_images: self.remove_images,
        }
    }
}
