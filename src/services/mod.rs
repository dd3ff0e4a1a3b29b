//! Device services backing the inventory and launch capabilities.
//!
//! - `adb` - shell access to the device and output parsing
//! - `device` - platform detection and inventory providers
//! - `launcher` - app launching and store link opening on the device

pub mod adb;
pub mod device;
pub mod launcher;

use crate::config::DeckConfig;
use adb::AdbShell;
use deck_inventory::{InventoryAcquirer, Platform};
use deck_launch::LaunchDispatcher;
use device::{DeviceProvider, GenericDeviceProvider, Listing};
use launcher::{AdbLauncher, AdbStoreOpener};
use log::info;

/// SDK level that introduced managed profiles.
pub const MIN_PROFILE_SDK: u32 = 21;

pub type Acquirer = InventoryAcquirer<DeviceProvider, GenericDeviceProvider>;
pub type Dispatcher = LaunchDispatcher<AdbLauncher, AdbStoreOpener>;

/// Capabilities wired for one session.
pub struct Services {
    pub acquirer: Acquirer,
    pub dispatcher: Dispatcher,
}

/// Detect the platform and build the acquirer and dispatcher.
/// Call this once from main before activating the app list.
pub async fn start_all(config: &DeckConfig) -> Services {
    info!("Starting device services...");

    let shell = AdbShell::new(&config.adb_path, config.serial.clone());

    if let Some(path) = &config.snapshot {
        info!("Reading inventory snapshot from {}", path.display());
        let snapshot = device::SnapshotProvider::load(path);
        let platform = snapshot.platform();
        let generic = GenericDeviceProvider::Snapshot(snapshot.clone());
        return Services {
            acquirer: InventoryAcquirer::new(
                platform,
                Some(DeviceProvider::Snapshot(snapshot)),
                generic,
            ),
            // Snapshots have no device to launch on.
            dispatcher: LaunchDispatcher::new(
                None,
                AdbStoreOpener::new(shell),
                config.store.clone(),
            ),
        };
    }

    let platform = device::detect_platform(&shell).await;
    info!("Detected platform: {}", platform);

    let sdk = match &platform {
        Platform::Android { sdk } => *sdk,
        Platform::Other(_) => 0,
    };
    let listing = Listing {
        sdk,
        include_system_apps: config.include_system_apps,
    };

    let profile_aware = (sdk >= MIN_PROFILE_SDK)
        .then(|| DeviceProvider::Adb(device::AdbProfileProvider::new(shell.clone(), listing)));
    let launcher = platform
        .is_supported()
        .then(|| AdbLauncher::new(shell.clone(), sdk));
    let generic = GenericDeviceProvider::Adb(device::AdbGenericProvider::new(shell.clone(), listing));

    Services {
        acquirer: InventoryAcquirer::new(platform, profile_aware, generic),
        dispatcher: LaunchDispatcher::new(
            launcher,
            AdbStoreOpener::new(shell),
            config.store.clone(),
        ),
    }
}
