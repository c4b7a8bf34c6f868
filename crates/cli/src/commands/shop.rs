//! Shopper commands: browsing, cart, checkout.

#![allow(clippy::print_stdout)]

use toyshop_core::{Product, ProductId};
use toyshop_storefront::services::{CatalogFilter, CatalogView};

use super::{CommandError, Context};

/// List products. Without filters, products are grouped by category.
///
/// # Errors
///
/// Returns `CommandError` if the storefront cannot be opened.
pub fn browse(ctx: &Context, filter: CatalogFilter) -> Result<(), CommandError> {
    let shop = ctx.storefront()?;
    let symbol = &shop.config().checkout.currency_symbol;

    match shop.catalog().browse(&filter) {
        CatalogView::Grouped(groups) if groups.is_empty() => println!("No products yet."),
        CatalogView::Grouped(groups) => {
            for group in groups {
                println!("== {} ==", group.category.label());
                for product in group.products {
                    println!("{}", product_line(product, symbol));
                }
                println!();
            }
        }
        CatalogView::Filtered(products) if products.is_empty() => {
            println!("No products match your filters.");
        }
        CatalogView::Filtered(products) => {
            for product in products {
                println!("{}", product_line(product, symbol));
            }
        }
    }
    Ok(())
}

/// Show one product with per-size stock.
///
/// # Errors
///
/// Returns `CommandError` if the product does not exist.
pub fn show(ctx: &Context, id: &ProductId) -> Result<(), CommandError> {
    let shop = ctx.storefront()?;
    let symbol = &shop.config().checkout.currency_symbol;
    let product = shop
        .catalog()
        .find(id)
        .ok_or_else(|| toyshop_storefront::AppError::NotFound(format!("Product {id}")))?;

    println!("{}", product.name);
    println!("  ID:          {}", product.id);
    println!("  Code:        {}", product.code);
    println!("  Price:       {}", product.price.format_with(symbol));
    println!("  Category:    {}", product.category.label());
    println!("  Gender:      {}", product.gender.label());
    println!("  Age range:   {}", product.age_range);
    println!("  Images:      {}", product.images.len());
    println!("  Description: {}", product.description);
    println!("  Sizes:");
    for size in &product.sizes {
        if size.count == 0 {
            println!("    {:<10} out of stock", size.name);
        } else {
            println!("    {:<10} {} available", size.name, size.count);
        }
    }
    Ok(())
}

/// Print the cart.
///
/// # Errors
///
/// Returns `CommandError` if the storefront cannot be opened.
pub fn cart_show(ctx: &Context) -> Result<(), CommandError> {
    let shop = ctx.storefront()?;
    let symbol = &shop.config().checkout.currency_symbol;
    let cart = shop.cart();

    if cart.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    for (line, item) in cart.items().iter().enumerate() {
        println!(
            "{}. {} ({}) x{}  {}",
            line + 1,
            item.product.name,
            item.selected_size,
            item.quantity,
            item.line_total().format_with(symbol)
        );
    }
    println!(
        "Items: {}  Total: {}",
        cart.total_items(),
        cart.total_price().format_with(symbol)
    );
    Ok(())
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns `CommandError` if the product is unknown or stock is short.
pub fn cart_add(
    ctx: &Context,
    id: &ProductId,
    size: &str,
    quantity: u32,
) -> Result<(), CommandError> {
    let mut shop = ctx.storefront()?;
    shop.add_to_cart(id, quantity, size)?;
    println!("Added to cart. {} item(s) in cart.", shop.cart().total_items());
    Ok(())
}

/// Change a line's quantity.
///
/// # Errors
///
/// Returns `CommandError` if the line does not exist or stock is short.
pub fn cart_update(ctx: &Context, line: usize, quantity: u32) -> Result<(), CommandError> {
    let mut shop = ctx.storefront()?;
    shop.cart_mut().update_item(line_index(line)?, quantity)?;
    println!("Cart updated.");
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns `CommandError` if the line does not exist.
pub fn cart_remove(ctx: &Context, line: usize) -> Result<(), CommandError> {
    let mut shop = ctx.storefront()?;
    let removed = shop.cart_mut().remove_item(line_index(line)?)?;
    println!("Removed {} ({}).", removed.product.name, removed.selected_size);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns `CommandError` if the cart cannot be saved.
pub fn cart_clear(ctx: &Context) -> Result<(), CommandError> {
    let mut shop = ctx.storefront()?;
    shop.cart_mut().clear()?;
    println!("Cart cleared.");
    Ok(())
}

/// Print the WhatsApp order message and link.
///
/// # Errors
///
/// Returns `CommandError` if the cart is empty.
pub fn checkout(ctx: &Context, json: bool) -> Result<(), CommandError> {
    let shop = ctx.storefront()?;
    let link = shop.checkout()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&link)?);
    } else {
        println!("{}", link.message);
        println!();
        println!("Open this link to send your order:");
        println!("{}", link.url);
    }
    Ok(())
}

/// Convert a 1-based line number to a cart index.
fn line_index(line: usize) -> Result<usize, CommandError> {
    line.checked_sub(1)
        .ok_or_else(|| CommandError::InvalidInput("Line numbers start at 1".to_string()))
}

fn product_line(product: &Product, symbol: &str) -> String {
    let stock = if product.is_out_of_stock() {
        "out of stock".to_string()
    } else {
        format!("{} in stock", product.total_inventory())
    };
    format!(
        "{}  {}  {}  [{} / {} / {}]  {}",
        product.id,
        product.name,
        product.price.format_with(symbol),
        product.category.label(),
        product.gender.label(),
        product.age_range,
        stock
    )
}
