//! Purchasable credit bundles.
//!
//! The catalog is static read-only data; the platform-store collaborator
//! drives the actual purchase flow and reports completions by crediting the
//! ledger. The core never initiates or validates purchases.

use serde::{Deserialize, Serialize};

/// A purchasable bundle of credits, keyed by the store product id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPackage {
    /// Store product identifier.
    pub id: String,
    /// Credits granted when the purchase completes.
    pub credits: u64,
}

/// The bundles offered in the store screen.
pub fn default_packages() -> Vec<CreditPackage> {
    vec![
        CreditPackage {
            id: "credits_10".to_string(),
            credits: 10,
        },
        CreditPackage {
            id: "credits_50".to_string(),
            credits: 50,
        },
        CreditPackage {
            id: "credits_100".to_string(),
            credits: 100,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let packages = default_packages();
        let mut ids: Vec<_> = packages.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), packages.len());
    }

    #[test]
    fn test_packages_grant_credits() {
        assert!(default_packages().iter().all(|p| p.credits > 0));
    }
}
