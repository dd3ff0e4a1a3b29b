//! Provider capabilities consumed by the acquirer.

use crate::entry::RawAppRecord;
use crate::error::ProviderError;
use std::future::Future;

/// Inventory source that knows which profile each app belongs to.
pub trait ProfileAwareProvider {
    /// Whether the device has a work profile.
    fn has_work_profile(&self) -> impl Future<Output = Result<bool, ProviderError>>;

    /// All apps across both profiles, each tagged with its profile.
    fn get_all_apps(&self) -> impl Future<Output = Result<Vec<RawAppRecord>, ProviderError>>;
}

/// Lower-fidelity source without profile information.
pub trait GenericProvider {
    fn get_installed_applications(
        &self,
    ) -> impl Future<Output = Result<Vec<RawAppRecord>, ProviderError>>;
}
