//! deck-inventory: installed app inventory for devices with a work profile.
//!
//! Provides:
//! - Raw provider records and the normalized `AppEntry`
//! - Provider traits for profile-aware and generic app listings
//! - A one-shot acquirer that picks the best available provider

mod acquirer;
mod entry;
mod error;
mod normalize;
mod provider;

pub use acquirer::{Inventory, InventoryAcquirer, InventorySource, Platform};
pub use entry::{AppEntry, RawAppRecord};
pub use error::{AcquisitionError, ProviderError};
pub use normalize::{UNKNOWN, UNKNOWN_PACKAGE, compare_display_names, normalize, sort_entries};
pub use provider::{GenericProvider, ProfileAwareProvider};
