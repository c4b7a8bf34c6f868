//! Admin commands: session, product management, dashboard.

#![allow(clippy::print_stdout)]

use std::path::Path;

use toyshop_admin::ProductDraft;
use toyshop_admin::services::auth::require_credentials;
use toyshop_admin::services::dashboard::DashboardStats;
use toyshop_core::{Category, DEFAULT_CURRENCY_SYMBOL, Gender, Price, Product, ProductId, SizeVariant};

use super::{CommandError, Context};
use crate::images;

/// Field changes from the command line. `None` and empty lists leave the
/// draft as it is.
#[derive(Debug, Default)]
pub struct ProductEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub code: Option<String>,
    pub category: Option<Category>,
    pub gender: Option<Gender>,
    pub age_range: Option<String>,
    pub sizes: Vec<SizeVariant>,
    pub images: Vec<String>,
    /// 1-based image positions to drop.
    pub remove_images: Vec<usize>,
}

impl ProductEdit {
    /// Apply the changes to `draft`. Images are removed before new ones are
    /// attached.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if an image cannot be loaded or a removal
    /// position does not exist.
    pub fn apply(self, draft: &mut ProductDraft) -> Result<(), CommandError> {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(code) = self.code {
            draft.code = code;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(gender) = self.gender {
            draft.gender = gender;
        }
        if let Some(age_range) = self.age_range {
            draft.age_range = age_range;
        }
        if !self.sizes.is_empty() {
            draft.sizes = self.sizes;
        }

        let mut positions = self.remove_images;
        positions.sort_unstable();
        positions.dedup();
        for position in positions.into_iter().rev() {
            position
                .checked_sub(1)
                .and_then(|index| draft.remove_image(index))
                .ok_or_else(|| CommandError::InvalidInput(format!("No image at position {position}")))?;
        }

        for source in self.images {
            draft.add_image(images::load_image(&source)?);
        }
        Ok(())
    }
}

/// Log in on this device.
///
/// # Errors
///
/// Returns `CommandError` for wrong credentials or a full device list.
pub fn login(ctx: &Context, username: &str, password: &str) -> Result<(), CommandError> {
    require_credentials(username, password)?;
    let auth = ctx.auth()?;
    if !auth.login(username, password)? {
        return Err(toyshop_admin::AppError::invalid_credentials().into());
    }
    println!("Logged in.");
    Ok(())
}

/// Log out on this device.
///
/// # Errors
///
/// Returns `CommandError` if storage cannot be updated.
pub fn logout(ctx: &Context) -> Result<(), CommandError> {
    ctx.auth()?.logout()?;
    println!("Logged out.");
    Ok(())
}

/// Print whether this device is logged in.
///
/// # Errors
///
/// Returns `CommandError` if the admin configuration is missing.
pub fn status(ctx: &Context) -> Result<(), CommandError> {
    let auth = ctx.auth()?;
    if auth.state().is_authenticated {
        println!("Logged in on device {}.", auth.current_device_id()?);
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

/// List devices on the allow-list.
///
/// # Errors
///
/// Returns `CommandError` if the list cannot be read.
pub fn devices(ctx: &Context) -> Result<(), CommandError> {
    let auth = ctx.auth()?;
    let devices = auth.devices()?;
    let current = auth.current_device_id()?;

    if devices.is_empty() {
        println!("No devices logged in.");
        return Ok(());
    }
    for device in devices {
        let marker = if device.device_id == current {
            "  (this device)"
        } else {
            ""
        };
        println!(
            "{}  last login {}{marker}",
            device.device_id,
            device.last_login.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

/// List products with stock totals.
///
/// # Errors
///
/// Returns `CommandError` if not logged in.
pub fn products_list(ctx: &Context) -> Result<(), CommandError> {
    let products = ctx.admin_products()?.list()?;
    if products.is_empty() {
        println!("No products have been added yet");
        return Ok(());
    }
    for product in &products {
        println!("{}", admin_line(product));
    }
    Ok(())
}

/// Add a product from command-line fields.
///
/// # Errors
///
/// Returns `CommandError` if not logged in or the product is invalid.
pub fn products_add(ctx: &Context, edit: ProductEdit) -> Result<(), CommandError> {
    let service = ctx.admin_products()?;
    let mut draft = ProductDraft::default();
    edit.apply(&mut draft)?;
    let product = service.create(draft)?;
    println!("Created product {}.", product.id);
    Ok(())
}

/// Edit a product.
///
/// # Errors
///
/// Returns `CommandError` if not logged in, the product is unknown, or the
/// result is invalid.
pub fn products_update(ctx: &Context, id: &ProductId, edit: ProductEdit) -> Result<(), CommandError> {
    let service = ctx.admin_products()?;
    let mut draft = ProductDraft::from(service.get(id)?);
    edit.apply(&mut draft)?;
    service.update(id, draft)?;
    println!("Updated product {id}.");
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns `CommandError` if not logged in or the product is unknown.
pub fn products_delete(ctx: &Context, id: &ProductId) -> Result<(), CommandError> {
    ctx.admin_products()?.delete(id)?;
    println!("Deleted product {id}.");
    Ok(())
}

/// Add every draft in a JSON file.
///
/// # Errors
///
/// Returns `CommandError` if not logged in, the file cannot be read, or any
/// draft is invalid (nothing is added).
pub fn products_import(ctx: &Context, file: &Path) -> Result<(), CommandError> {
    let service = ctx.admin_products()?;
    let contents = std::fs::read_to_string(file).map_err(|source| CommandError::ReadFile {
        path: file.to_path_buf(),
        source,
    })?;
    let drafts: Vec<ProductDraft> = serde_json::from_str(&contents)?;
    let created = service.create_many(drafts)?;
    println!("Imported {} product(s).", created.len());
    Ok(())
}

/// Print inventory statistics.
///
/// # Errors
///
/// Returns `CommandError` if not logged in.
pub fn dashboard(ctx: &Context, json: bool) -> Result<(), CommandError> {
    let products = ctx.admin_products()?.list()?;
    let stats = DashboardStats::from_products(&products);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Products:        {}", stats.total_products);
    println!(
        "Catalog value:   {}",
        stats.total_value.format_with(DEFAULT_CURRENCY_SYMBOL)
    );
    println!("Distinct sizes:  {}", stats.unique_sizes);
    println!();

    let inventory = &stats.inventory;
    println!("Inventory Summary");
    println!("  Total items in inventory: {}", inventory.total_units);
    println!("  Low inventory products:   {}", inventory.low_stock.len());
    println!("  Out of stock products:    {}", inventory.out_of_stock.len());
    println!(
        "  Health: {}% healthy, {}% low, {}% out",
        inventory.healthy_percentage,
        inventory.low_stock_percentage,
        inventory.out_of_stock_percentage
    );
    if inventory.needs_attention() {
        println!("  Attention required:");
        for product in inventory.low_stock.iter().chain(&inventory.out_of_stock) {
            println!("    {}", admin_line(product));
        }
    }
    println!();

    let breakdown = &stats.breakdown;
    println!("Categories");
    for slice in &breakdown.categories {
        println!("  {:<10} {}", slice.value.label(), slice.count);
    }
    println!("Genders");
    for slice in &breakdown.genders {
        println!("  {:<10} {}", slice.value.label(), slice.count);
    }
    println!("Age ranges");
    for slice in &breakdown.age_ranges {
        println!("  {:<10} {}", slice.value, slice.count);
    }
    Ok(())
}

fn admin_line(product: &Product) -> String {
    let units = product.total_inventory();
    let status = if product.is_out_of_stock() {
        "Out of stock".to_string()
    } else {
        format!("{units} items")
    };
    format!("{}  {}  ({})  {status}", product.id, product.name, product.code)
}
