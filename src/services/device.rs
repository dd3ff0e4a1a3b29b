//! Platform detection and inventory providers.
//!
//! Providers are enums over the available backends (device over adb, or an
//! inventory snapshot file) so the acquirer stays statically dispatched.

use super::adb::{self, AdbShell, DeviceShell, ListedPackage};
use deck_inventory::{
    GenericProvider, Platform, ProfileAwareProvider, ProviderError, RawAppRecord,
};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Owner (personal) user id.
const PERSONAL_USER: u32 = 0;

/// First SDK level whose `pm list packages` accepts `--show-versioncode`.
const VERSION_CODE_SDK: u32 = 28;

/// Detect the device platform via its SDK level.
/// Any failure to reach the device means an unsupported platform.
pub async fn detect_platform<S: DeviceShell>(shell: &S) -> Platform {
    match shell.shell(&["getprop", "ro.build.version.sdk"]).await {
        Ok(output) => match adb::parse_sdk(&output) {
            Some(sdk) => Platform::Android { sdk },
            None => Platform::Other(format!("unrecognized device ({})", output.trim())),
        },
        Err(e) => {
            warn!("No Android device reachable: {}", e);
            Platform::Other(std::env::consts::OS.to_string())
        }
    }
}

/// Work profile user id, if the device has one.
async fn work_profile_user<S: DeviceShell>(shell: &S) -> Result<Option<u32>, ProviderError> {
    let output = shell.shell(&["pm", "list", "users"]).await?;
    let user = adb::parse_users(&output)
        .into_iter()
        .find(|u| u.is_work_profile());
    if let Some(user) = &user {
        debug!("Work profile: user {} ({})", user.id, user.name);
    }
    Ok(user.map(|u| u.id))
}

/// Settings shared by the adb providers.
#[derive(Clone, Copy, Debug)]
pub struct Listing {
    pub sdk: u32,
    pub include_system_apps: bool,
}

async fn list_packages<S: DeviceShell>(
    shell: &S,
    listing: Listing,
    user: Option<u32>,
) -> Result<Vec<ListedPackage>, ProviderError> {
    let user = user.map(|u| u.to_string());
    let mut args = vec!["pm", "list", "packages"];
    if listing.sdk >= VERSION_CODE_SDK {
        args.push("--show-versioncode");
    }
    if !listing.include_system_apps {
        args.push("-3");
    }
    if let Some(user) = &user {
        args.push("--user");
        args.push(user.as_str());
    }

    let output = shell.shell(&args).await?;
    if let Some(error) = adb::error_line(&output) {
        return Err(ProviderError::Failed(format!("Package listing failed: {}", error)));
    }
    Ok(adb::parse_package_list(&output))
}

/// Version names by package. Best-effort; an empty map leaves them unknown.
async fn version_names<S: DeviceShell>(shell: &S) -> HashMap<String, String> {
    match shell.shell(&["dumpsys", "package", "packages"]).await {
        Ok(output) => adb::parse_version_names(&output),
        Err(e) => {
            debug!("Version names unavailable: {}", e);
            HashMap::new()
        }
    }
}

fn to_record(package: ListedPackage, version_names: &HashMap<String, String>) -> RawAppRecord {
    let mut record = RawAppRecord::from_package(package.package.as_str());
    if let Some(name) = version_names.get(&package.package) {
        record = record.with_version_name(name.as_str());
    }
    match package.version_code {
        Some(code) => record.with_version_code(code),
        None => record,
    }
}

/// Profile-aware listing over adb.
#[derive(Clone, Debug)]
pub struct AdbProfileProvider<S = AdbShell> {
    shell: S,
    listing: Listing,
}

impl<S: DeviceShell> AdbProfileProvider<S> {
    pub fn new(shell: S, listing: Listing) -> Self {
        Self { shell, listing }
    }
}

impl<S: DeviceShell> ProfileAwareProvider for AdbProfileProvider<S> {
    async fn has_work_profile(&self) -> Result<bool, ProviderError> {
        Ok(work_profile_user(&self.shell).await?.is_some())
    }

    async fn get_all_apps(&self) -> Result<Vec<RawAppRecord>, ProviderError> {
        let personal = list_packages(&self.shell, self.listing, Some(PERSONAL_USER)).await?;

        // Work apps are best-effort; personal apps are still returned.
        let work_user = match work_profile_user(&self.shell).await {
            Ok(user) => user,
            Err(e) => {
                debug!("Work profile lookup failed: {}", e);
                None
            }
        };
        let mut work = Vec::new();
        if let Some(user) = work_user {
            match list_packages(&self.shell, self.listing, Some(user)).await {
                Ok(packages) => work = packages,
                Err(e) => warn!("Work profile apps couldn't be retrieved: {}", e),
            }
        }

        let names = version_names(&self.shell).await;
        let personal = personal
            .into_iter()
            .map(|p| to_record(p, &names).with_work_profile(false));
        let work = work
            .into_iter()
            .map(|p| to_record(p, &names).with_work_profile(true));

        Ok(personal.chain(work).collect())
    }
}

/// Listing over adb for the current user, with no profile information.
#[derive(Clone, Debug)]
pub struct AdbGenericProvider<S = AdbShell> {
    shell: S,
    listing: Listing,
}

impl<S: DeviceShell> AdbGenericProvider<S> {
    pub fn new(shell: S, listing: Listing) -> Self {
        Self { shell, listing }
    }
}

impl<S: DeviceShell> GenericProvider for AdbGenericProvider<S> {
    async fn get_installed_applications(&self) -> Result<Vec<RawAppRecord>, ProviderError> {
        let packages = list_packages(&self.shell, self.listing, None).await?;
        let names = version_names(&self.shell).await;

        Ok(packages.into_iter().map(|p| to_record(p, &names)).collect())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFile {
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    sdk: Option<u32>,
    #[serde(default)]
    has_work_profile: Option<bool>,
    #[serde(default)]
    apps: Vec<RawAppRecord>,
}

/// Inventory read from a JSON snapshot of a device.
#[derive(Clone, Debug)]
pub struct SnapshotProvider {
    contents: Arc<Result<SnapshotFile, String>>,
}

impl SnapshotProvider {
    /// Read and parse the snapshot. Errors surface when the inventory is
    /// requested, not here.
    pub fn load(path: &Path) -> Self {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))
            .and_then(|s| Self::parse(&s));
        Self {
            contents: Arc::new(contents),
        }
    }

    #[cfg(test)]
    pub fn from_json(json: &str) -> Self {
        Self {
            contents: Arc::new(Self::parse(json)),
        }
    }

    fn parse(json: &str) -> Result<SnapshotFile, String> {
        serde_json::from_str(json).map_err(|e| format!("Malformed snapshot: {}", e))
    }

    /// Platform recorded in the snapshot; Android unless stated otherwise.
    pub fn platform(&self) -> Platform {
        match self.contents.as_ref() {
            Ok(file) => match file.platform.as_deref() {
                None | Some("android") => Platform::Android {
                    sdk: file.sdk.unwrap_or(super::MIN_PROFILE_SDK),
                },
                Some(other) => Platform::Other(other.to_string()),
            },
            Err(_) => Platform::Android {
                sdk: super::MIN_PROFILE_SDK,
            },
        }
    }

    fn file(&self) -> Result<&SnapshotFile, ProviderError> {
        match self.contents.as_ref() {
            Ok(file) => Ok(file),
            Err(e) => Err(ProviderError::Failed(e.clone())),
        }
    }
}

impl ProfileAwareProvider for SnapshotProvider {
    async fn has_work_profile(&self) -> Result<bool, ProviderError> {
        self.file()?
            .has_work_profile
            .ok_or_else(|| ProviderError::Failed("Snapshot has no work profile status".into()))
    }

    async fn get_all_apps(&self) -> Result<Vec<RawAppRecord>, ProviderError> {
        Ok(self.file()?.apps.clone())
    }
}

impl GenericProvider for SnapshotProvider {
    async fn get_installed_applications(&self) -> Result<Vec<RawAppRecord>, ProviderError> {
        Ok(self.file()?.apps.clone())
    }
}

/// Profile-aware provider backends.
#[derive(Clone, Debug)]
pub enum DeviceProvider {
    Adb(AdbProfileProvider),
    Snapshot(SnapshotProvider),
}

impl ProfileAwareProvider for DeviceProvider {
    async fn has_work_profile(&self) -> Result<bool, ProviderError> {
        match self {
            DeviceProvider::Adb(p) => p.has_work_profile().await,
            DeviceProvider::Snapshot(p) => p.has_work_profile().await,
        }
    }

    async fn get_all_apps(&self) -> Result<Vec<RawAppRecord>, ProviderError> {
        match self {
            DeviceProvider::Adb(p) => p.get_all_apps().await,
            DeviceProvider::Snapshot(p) => p.get_all_apps().await,
        }
    }
}

/// Generic provider backends.
#[derive(Clone, Debug)]
pub enum GenericDeviceProvider {
    Adb(AdbGenericProvider),
    Snapshot(SnapshotProvider),
}

impl GenericProvider for GenericDeviceProvider {
    async fn get_installed_applications(&self) -> Result<Vec<RawAppRecord>, ProviderError> {
        match self {
            GenericDeviceProvider::Adb(p) => p.get_installed_applications().await,
            GenericDeviceProvider::Snapshot(p) => p.get_installed_applications().await,
        }
    }
}
