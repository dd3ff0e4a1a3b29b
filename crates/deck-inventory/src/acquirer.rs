//! One-shot inventory acquisition.

use crate::entry::AppEntry;
use crate::error::{AcquisitionError, ProviderError};
use crate::normalize::{normalize, sort_entries};
use crate::provider::{GenericProvider, ProfileAwareProvider};
use log::{debug, info};

/// Platform the acquirer runs against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Platform {
    /// Android with the given SDK level.
    Android { sdk: u32 },
    /// Anything else, by name.
    Other(String),
}

impl Platform {
    pub fn is_supported(&self) -> bool {
        matches!(self, Platform::Android { .. })
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Android { sdk } => write!(f, "Android (SDK {})", sdk),
            Platform::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Which provider an acquisition cycle reads from.
/// Resolved once at the start of `acquire`.
#[derive(Debug)]
pub enum InventorySource<'a, P, G> {
    ProfileAware(&'a P),
    Generic(&'a G),
}

/// Result of a successful acquisition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inventory {
    /// Normalized apps sorted by display name.
    pub apps: Vec<AppEntry>,
    /// Only ever true when the profile-aware provider confirmed it.
    pub has_work_profile: bool,
}

impl Inventory {
    pub fn work_count(&self) -> usize {
        self.apps.iter().filter(|a| a.is_work_profile).count()
    }

    pub fn personal_count(&self) -> usize {
        self.apps.len() - self.work_count()
    }
}

/// Acquires the inventory from the best available provider.
///
/// The profile-aware provider is optional; `None` means the capability is
/// absent and the generic provider is used instead.
pub struct InventoryAcquirer<P, G> {
    platform: Platform,
    profile_aware: Option<P>,
    generic: G,
}

impl<P, G> InventoryAcquirer<P, G>
where
    P: ProfileAwareProvider,
    G: GenericProvider,
{
    pub fn new(platform: Platform, profile_aware: Option<P>, generic: G) -> Self {
        Self {
            platform,
            profile_aware,
            generic,
        }
    }

    /// The provider `acquire` will read from.
    pub fn source(&self) -> InventorySource<'_, P, G> {
        match &self.profile_aware {
            Some(provider) => InventorySource::ProfileAware(provider),
            None => InventorySource::Generic(&self.generic),
        }
    }

    /// Query providers, normalize and sort. Does not cache.
    pub async fn acquire(&self) -> Result<Inventory, AcquisitionError> {
        if !self.platform.is_supported() {
            return Err(AcquisitionError::PlatformUnsupported(self.platform.to_string()));
        }

        let mut inventory = match self.source() {
            InventorySource::ProfileAware(provider) => read_profile_aware(provider).await?,
            InventorySource::Generic(provider) => {
                info!("Profile-aware provider not available, falling back to generic listing");
                read_generic(provider).await?
            }
        };

        sort_entries(&mut inventory.apps);

        info!(
            "Inventory acquired: {} apps ({} work, {} personal)",
            inventory.apps.len(),
            inventory.work_count(),
            inventory.personal_count()
        );

        Ok(inventory)
    }
}

async fn read_profile_aware<P: ProfileAwareProvider>(provider: &P) -> Result<Inventory, ProviderError> {
    // A failed check is indistinguishable from "no work profile" upstream.
    let has_work_profile = match provider.has_work_profile().await {
        Ok(has) => has,
        Err(e) => {
            debug!("Could not check work profile status: {}", e);
            false
        }
    };
    debug!("Device has work profile: {}", has_work_profile);

    let raw = provider.get_all_apps().await?;
    debug!("Raw apps from profile-aware provider: {}", raw.len());

    Ok(Inventory {
        apps: raw.iter().map(|r| normalize(r, false)).collect(),
        has_work_profile,
    })
}

async fn read_generic<G: GenericProvider>(provider: &G) -> Result<Inventory, ProviderError> {
    let raw = provider.get_installed_applications().await?;

    Ok(Inventory {
        apps: raw.iter().map(|r| normalize(r, true)).collect(),
        has_work_profile: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::RawAppRecord;
    use crate::normalize::compare_display_names;
    use serde_json::json;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeProfileAware {
        has_work: Option<bool>,
        apps: Option<Vec<RawAppRecord>>,
        calls: Cell<u32>,
    }

    impl ProfileAwareProvider for FakeProfileAware {
        async fn has_work_profile(&self) -> Result<bool, ProviderError> {
            self.calls.set(self.calls.get() + 1);
            self.has_work
                .ok_or_else(|| ProviderError::Failed("user manager unavailable".into()))
        }

        async fn get_all_apps(&self) -> Result<Vec<RawAppRecord>, ProviderError> {
            self.calls.set(self.calls.get() + 1);
            self.apps
                .clone()
                .ok_or_else(|| ProviderError::Failed("Failed to get all apps".into()))
        }
    }

    #[derive(Default)]
    struct FakeGeneric {
        apps: Vec<RawAppRecord>,
        calls: Cell<u32>,
    }

    impl GenericProvider for FakeGeneric {
        async fn get_installed_applications(&self) -> Result<Vec<RawAppRecord>, ProviderError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.apps.clone())
        }
    }

    fn records() -> Vec<RawAppRecord> {
        serde_json::from_value(json!([
            {"appName": "Slack", "packageName": "com.slack", "versionCode": "310", "isWorkProfile": true},
            {"packageName": "org.mozilla.firefox", "versionName": "128.0", "isWorkProfile": false},
            {"appName": "Calendar", "packageName": "com.google.calendar", "isWorkProfile": "yes"},
            {"appName": "Slack", "packageName": "com.slack", "isWorkProfile": false}
        ]))
        .unwrap()
    }

    fn android() -> Platform {
        Platform::Android { sdk: 34 }
    }

    #[tokio::test]
    async fn test_unsupported_platform_queries_nothing() {
        let profile = FakeProfileAware::default();
        let generic = FakeGeneric::default();
        let acquirer = InventoryAcquirer::new(Platform::Other("linux".into()), Some(profile), generic);

        let result = acquirer.acquire().await;

        assert!(matches!(result, Err(AcquisitionError::PlatformUnsupported(_))));
        assert_eq!(acquirer.profile_aware.as_ref().unwrap().calls.get(), 0);
        assert_eq!(acquirer.generic.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_profile_aware_inventory_is_sorted_and_tagged() {
        let profile = FakeProfileAware {
            has_work: Some(true),
            apps: Some(records()),
            ..Default::default()
        };
        let acquirer = InventoryAcquirer::new(android(), Some(profile), FakeGeneric::default());
        assert!(matches!(acquirer.source(), InventorySource::ProfileAware(_)));

        let inventory = acquirer.acquire().await.unwrap();

        assert!(inventory.has_work_profile);
        let names: Vec<_> = inventory.apps.iter().map(|a| a.display_name.as_str()).collect();
        assert_eq!(names, ["Calendar", "firefox", "Slack", "Slack"]);
        assert!(!inventory.apps[0].is_work_profile);
        assert_eq!(inventory.work_count(), 1);
        assert_eq!(inventory.personal_count(), 3);
        for pair in inventory.apps.windows(2) {
            assert_ne!(
                compare_display_names(&pair[0].display_name, &pair[1].display_name),
                std::cmp::Ordering::Greater
            );
        }
    }

    #[tokio::test]
    async fn test_same_package_in_both_profiles_keeps_both() {
        let profile = FakeProfileAware {
            has_work: Some(true),
            apps: Some(records()),
            ..Default::default()
        };
        let acquirer = InventoryAcquirer::new(android(), Some(profile), FakeGeneric::default());

        let inventory = acquirer.acquire().await.unwrap();
        let slack: Vec<_> = inventory
            .apps
            .iter()
            .filter(|a| a.package_id == "com.slack")
            .map(|a| a.key())
            .collect();

        assert_eq!(slack, ["com.slack-work", "com.slack-personal"]);
    }

    #[tokio::test]
    async fn test_failed_work_profile_check_is_swallowed() {
        let profile = FakeProfileAware {
            has_work: None,
            apps: Some(records()),
            ..Default::default()
        };
        let acquirer = InventoryAcquirer::new(android(), Some(profile), FakeGeneric::default());

        let inventory = acquirer.acquire().await.unwrap();

        assert!(!inventory.has_work_profile);
        assert_eq!(inventory.apps.len(), 4);
    }

    #[tokio::test]
    async fn test_listing_failure_is_an_error() {
        let profile = FakeProfileAware {
            has_work: Some(true),
            apps: None,
            ..Default::default()
        };
        let acquirer = InventoryAcquirer::new(android(), Some(profile), FakeGeneric::default());

        let err = acquirer.acquire().await.unwrap_err();

        assert_eq!(err.user_message(), "Failed to get all apps");
        assert_eq!(acquirer.generic.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_generic_fallback_marks_everything_personal() {
        let generic = FakeGeneric {
            apps: records(),
            ..Default::default()
        };
        let acquirer = InventoryAcquirer::new(android(), None::<FakeProfileAware>, generic);
        assert!(matches!(acquirer.source(), InventorySource::Generic(_)));

        let inventory = acquirer.acquire().await.unwrap();

        assert!(!inventory.has_work_profile);
        assert_eq!(inventory.apps.len(), 4);
        assert!(inventory.apps.iter().all(|a| !a.is_work_profile));
        assert_eq!(acquirer.generic.calls.get(), 1);
    }
}
