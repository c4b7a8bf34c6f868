//! Cart to WhatsApp order link.

#![allow(clippy::unwrap_used)]

use toyshop_integration_tests::{TestShop, draft};
use toyshop_storefront::AppError;
use toyshop_storefront::services::CheckoutError;

#[test]
fn test_checkout_builds_order_link() {
    let shop = TestShop::new();
    let admin = shop.products();
    let tee = admin.create(draft("Tee", &[("M", 3)], 1250)).unwrap();
    let cap = admin.create(draft("Cap", &[("Default", 9)], 500)).unwrap();

    let mut front = shop.storefront(shop.tab());
    front.add_to_cart(&tee.id, 2, "M").unwrap();
    front.add_to_cart(&cap.id, 1, "Default").unwrap();

    let link = front.checkout().unwrap();

    assert_eq!(
        link.message,
        "Hello, I would like to order the following items:\n\n\
         *Tee*\nSize: M\nQuantity: 2\nPrice: $25.00\n\n\
         *Cap*\nSize: Default\nQuantity: 1\nPrice: $5.00\n\n\
         *Total Price: $30.00*"
    );
    assert!(link.url.starts_with("https://wa.me/00962791417774?text=Hello%2C%20I%20would"));
    assert!(!link.url.contains('\n'));
}

#[test]
fn test_checkout_of_empty_cart_is_rejected() {
    let shop = TestShop::new();
    let front = shop.storefront(shop.tab());

    let err = front.checkout().unwrap_err();
    assert!(matches!(err, AppError::Checkout(CheckoutError::EmptyCart)));
    assert_eq!(err.user_message(), "Your cart is empty");
}
