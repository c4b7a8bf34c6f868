//! Device-limited admin login across installations.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::Duration;

use toyshop_admin::services::auth::AuthError;
use toyshop_core::DeviceId;
use toyshop_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestShop};

/// Log in from `count` fresh installations, one second apart.
fn login_devices(shop: &TestShop, count: usize) -> Vec<DeviceId> {
    (0..count)
        .map(|i| {
            shop.new_device().unwrap();
            let auth = shop.auth(&format!("browser-{i}"));
            assert!(auth.login(ADMIN_USERNAME, ADMIN_PASSWORD).unwrap());
            shop.clock().advance(Duration::seconds(1));
            auth.current_device_id().unwrap()
        })
        .collect()
}

#[test]
fn test_sixth_device_is_refused() {
    let shop = TestShop::new();
    login_devices(&shop, 5);

    shop.new_device().unwrap();
    let sixth = shop.auth("browser-5");
    let err = sixth.login(ADMIN_USERNAME, ADMIN_PASSWORD).unwrap_err();

    assert!(matches!(err, AuthError::DeviceLimitReached { max: 5 }));
    assert_eq!(
        err.user_facing_message(),
        "Maximum number of devices (5) reached. Please log out from another device."
    );
    assert!(!sixth.is_authenticated());
    assert_eq!(sixth.devices().unwrap().len(), 5);
}

#[test]
fn test_logout_frees_a_slot() {
    let shop = TestShop::new();
    let devices = login_devices(&shop, 5);

    shop.use_device(&devices[0]).unwrap();
    shop.auth("browser-0").logout().unwrap();

    shop.new_device().unwrap();
    let newcomer = shop.auth("browser-new");
    assert!(newcomer.login(ADMIN_USERNAME, ADMIN_PASSWORD).unwrap());
    assert!(newcomer.is_authenticated());

    let listed: Vec<DeviceId> = newcomer
        .devices()
        .unwrap()
        .into_iter()
        .map(|d| d.device_id)
        .collect();
    assert_eq!(listed.len(), 5);
    assert!(!listed.contains(&devices[0]));
    assert_eq!(listed[0], newcomer.current_device_id().unwrap());
}

#[test]
fn test_listed_device_can_log_in_again_when_full() {
    let shop = TestShop::new();
    let devices = login_devices(&shop, 5);

    shop.use_device(&devices[2]).unwrap();
    let returning = shop.auth("browser-2");
    assert!(returning.login(ADMIN_USERNAME, ADMIN_PASSWORD).unwrap());

    let listed = returning.devices().unwrap();
    assert_eq!(listed[0].device_id, devices[2]);
}

#[test]
fn test_wrong_password_registers_nothing() {
    let shop = TestShop::new();
    let auth = shop.auth("browser");

    assert!(!auth.login(ADMIN_USERNAME, "guess").unwrap());
    assert!(!auth.login("", "").unwrap());
    assert!(!auth.is_authenticated());
    assert!(auth.devices().unwrap().is_empty());
}
