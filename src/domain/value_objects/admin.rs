//! # Admin Set
//!
//! Injected allow-list of platform administrator wallets.
//!
//! Admin checks go through the single [`AdminSet::is_admin`] capability
//! rather than address literals scattered through call sites; the set
//! is built once from configuration and handed to the services that
//! need it.
//!
//! # Examples
//!
//! ```
//! use wellswap_settlement::domain::value_objects::address::WalletAddress;
//! use wellswap_settlement::domain::value_objects::admin::AdminSet;
//!
//! let admin = WalletAddress::parse("0x8a627a75d04bf3c709154205dfbbb6f4ed10dcb0").unwrap();
//! let admins = AdminSet::new([admin.clone()]);
//! assert!(admins.is_admin(&admin));
//! ```

use crate::domain::value_objects::address::WalletAddress;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The set of wallet addresses with platform-administrator rights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminSet {
    wallets: HashSet<WalletAddress>,
}

impl AdminSet {
    /// Creates an admin set from an iterator of addresses.
    #[must_use]
    pub fn new(wallets: impl IntoIterator<Item = WalletAddress>) -> Self {
        Self {
            wallets: wallets.into_iter().collect(),
        }
    }

    /// Returns true if the address has administrator rights.
    #[must_use]
    pub fn is_admin(&self, address: &WalletAddress) -> bool {
        self.wallets.contains(address)
    }

    /// Returns the number of administrator wallets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// Returns true if no administrator wallets are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

impl FromIterator<WalletAddress> for AdminSet {
    fn from_iter<T: IntoIterator<Item = WalletAddress>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn addr(last_byte: &str) -> WalletAddress {
        WalletAddress::parse(format!(
            "0x00000000000000000000000000000000000000{last_byte}"
        ))
        .unwrap()
    }

    #[test]
    fn membership() {
        let admins = AdminSet::new([addr("01"), addr("02")]);
        assert!(admins.is_admin(&addr("01")));
        assert!(admins.is_admin(&addr("02")));
        assert!(!admins.is_admin(&addr("03")));
        assert_eq!(admins.len(), 2);
    }

    #[test]
    fn empty_set_rejects_everyone() {
        let admins = AdminSet::default();
        assert!(admins.is_empty());
        assert!(!admins.is_admin(&addr("01")));
    }

    #[test]
    fn membership_is_case_insensitive_via_normalization() {
        let mixed =
            WalletAddress::parse("0xABCDEFabcdefABCDEFabcdefABCDEFabcdefABCD").unwrap();
        let lower =
            WalletAddress::parse("0xabcdefabcdefabcdefabcdefabcdefabcdefabcd").unwrap();
        let admins = AdminSet::new([mixed]);
        assert!(admins.is_admin(&lower));
    }
}
