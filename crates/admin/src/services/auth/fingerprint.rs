//! Device fingerprinting.
//!
//! The device id only distinguishes installations for the allow-list. It is
//! random per installation and trivially copied, so it is not a credential.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

use toyshop_core::DeviceId;

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

/// Source of the client traits mixed into a new device id.
pub trait FingerprintProvider: Send + Sync {
    /// The client's user agent string.
    fn user_agent(&self) -> String;

    /// The client's screen dimensions.
    fn screen_size(&self) -> ScreenSize;
}

/// A fixed fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFingerprint {
    user_agent: String,
    screen: ScreenSize,
}

impl StaticFingerprint {
    #[must_use]
    pub fn new(user_agent: impl Into<String>, screen: ScreenSize) -> Self {
        Self {
            user_agent: user_agent.into(),
            screen,
        }
    }
}

impl FingerprintProvider for StaticFingerprint {
    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn screen_size(&self) -> ScreenSize {
        self.screen
    }
}

/// Build a fresh device id: base64 of user agent, screen height, screen
/// width, and a random UUID, concatenated.
#[must_use]
pub fn generate_device_id(provider: &dyn FingerprintProvider) -> DeviceId {
    let screen = provider.screen_size();
    let raw = format!(
        "{}{}{}{}",
        provider.user_agent(),
        screen.height,
        screen.width,
        Uuid::new_v4()
    );
    DeviceId::new(STANDARD.encode(raw))
}
