use serde::{Deserialize, Serialize};

use super::types::WalletAddress;

/// Wallet binding and onboarding status for the current player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WalletState {
    address: Option<WalletAddress>,
    /// Key material handed back by onboarding; opaque to the core.
    user_key: Option<String>,
}

impl WalletState {
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn is_onboarded(&self) -> bool {
        self.user_key.is_some()
    }

    pub fn user_key(&self) -> Option<&str> {
        self.user_key.as_deref()
    }

    pub(crate) fn connect(&mut self, address: WalletAddress) {
        if self.address.as_deref() != Some(address.as_str()) {
            self.user_key = None;
        }
        self.address = Some(address);
    }

    pub(crate) fn set_user_key(&mut self, user_key: String) {
        self.user_key = Some(user_key);
    }

    pub(crate) fn clear(&mut self) {
        self.address = None;
        self.user_key = None;
    }
}

pub fn is_valid_address(address: &str) -> bool {
    address.len() > 2 && address.starts_with("0x")
}

/// Shortened form for log lines: first ten characters.
pub fn short_address(address: &str) -> &str {
    match address.char_indices().nth(10) {
        Some((idx, _)) => &address[..idx],
        None => address,
    }
}
