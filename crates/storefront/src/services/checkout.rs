//! WhatsApp checkout.
//!
//! There is no order placement. Checkout builds a human-readable order
//! summary and a `wa.me` deep link that opens a chat with the shop with the
//! summary pre-filled.

use serde::Serialize;
use thiserror::Error;

use toyshop_core::{CartItem, Price};

use crate::config::CheckoutConfig;

/// Base URL for WhatsApp click-to-chat links.
const WHATSAPP_BASE_URL: &str = "https://wa.me";

const GREETING: &str = "Hello, I would like to order the following items:";

/// Errors that can occur when building a checkout link.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// A ready-to-open checkout link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutLink {
    /// The plain-text order summary.
    pub message: String,
    /// The deep link with the summary URL-encoded.
    pub url: String,
}

/// Build the order summary for `items`.
///
/// Each line lists the product name in bold, size, quantity, and line total;
/// the summary ends with the bold order total.
#[must_use]
pub fn order_message(items: &[CartItem], currency_symbol: &str) -> String {
    let lines = items
        .iter()
        .map(|item| {
            format!(
                "*{}*\nSize: {}\nQuantity: {}\nPrice: {}",
                item.product.name,
                item.selected_size,
                item.quantity,
                item.line_total().format_with(currency_symbol),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let total: Price = items.iter().map(CartItem::line_total).sum();

    format!(
        "{GREETING}\n\n{lines}\n\n*Total Price: {}*",
        total.format_with(currency_symbol)
    )
}

/// Build a click-to-chat URL for `phone` with `message` pre-filled.
#[must_use]
pub fn whatsapp_url(phone: &str, message: &str) -> String {
    format!(
        "{WHATSAPP_BASE_URL}/{phone}?text={}",
        urlencoding::encode(message)
    )
}

/// Build the checkout link for a cart.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` if `items` is empty.
pub fn checkout(items: &[CartItem], config: &CheckoutConfig) -> Result<CheckoutLink, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let message = order_message(items, &config.currency_symbol);
    let url = whatsapp_url(&config.whatsapp_number, &message);
    tracing::info!(lines = items.len(), "checkout link created");

    Ok(CheckoutLink { message, url })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use toyshop_core::{Category, Gender, Product, ProductId, SizeVariant};

    use super::*;

    fn item(name: &str, size: &str, quantity: u32, cents: i64) -> CartItem {
        CartItem::new(
            Product {
                id: ProductId::new(name),
                name: name.to_string(),
                price: Price::from_cents(cents),
                code: "N/A".to_string(),
                sizes: vec![SizeVariant::new(size, 10)],
                age_range: "0-3 years".to_string(),
                description: String::new(),
                images: Vec::new(),
                category: Category::Clothes,
                gender: Gender::Unisex,
            },
            quantity,
            size,
        )
    }

    fn config() -> CheckoutConfig {
        CheckoutConfig {
            whatsapp_number: "00962791417774".to_string(),
            currency_symbol: "$".to_string(),
        }
    }

    #[test]
    fn test_order_message_format() {
        let items = vec![item("Tee", "M", 2, 1250), item("Cap", "Default", 1, 500)];

        let message = order_message(&items, "$");

        assert_eq!(
            message,
            "Hello, I would like to order the following items:\n\n\
             *Tee*\nSize: M\nQuantity: 2\nPrice: $25.00\n\n\
             *Cap*\nSize: Default\nQuantity: 1\nPrice: $5.00\n\n\
             *Total Price: $30.00*"
        );
    }

    #[test]
    fn test_url_encodes_message() {
        let url = whatsapp_url("123", "Hi there\n*Total: $5*");
        assert_eq!(url, "https://wa.me/123?text=Hi%20there%0A%2ATotal%3A%20%245%2A");
    }

    #[test]
    fn test_checkout_rejects_empty_cart() {
        assert_eq!(checkout(&[], &config()), Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_checkout_link_contains_encoded_message() {
        let link = checkout(&[item("Tee", "M", 1, 999)], &config()).unwrap();

        assert!(link.url.starts_with("https://wa.me/00962791417774?text="));
        assert!(link.url.ends_with(&urlencoding::encode(&link.message).into_owned()));
        assert!(link.message.contains("Price: $9.99"));
    }
}
