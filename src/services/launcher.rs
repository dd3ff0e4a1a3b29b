//! App launching and link opening on the device.

use super::adb::{self, AdbShell, DeviceShell, MonkeyResult};
use deck_launch::{LAUNCH_ERROR, LaunchFailure, LaunchService, OpenUrlError, StoreLinkOpener};
use log::{debug, info};
use std::fmt::Display;

const PERSONAL_USER: &str = "0";

/// First SDK level shipping the `cmd` binary.
const CMD_SDK: u32 = 24;

const MAIN_ACTION: &str = "android.intent.action.MAIN";
const LAUNCHER_CATEGORY: &str = "android.intent.category.LAUNCHER";

/// Launches apps through the activity manager.
///
/// Work launches start the launcher activity inside the work profile and fall
/// back to a regular launch in the personal profile when that fails. Devices
/// without `cmd` launch through `monkey`, which only reaches the personal
/// profile.
#[derive(Clone, Debug)]
pub struct AdbLauncher<S = AdbShell> {
    shell: S,
    sdk: u32,
}

impl<S: DeviceShell> AdbLauncher<S> {
    pub fn new(shell: S, sdk: u32) -> Self {
        Self { shell, sdk }
    }

    /// Launcher activity of `package_id` for `user`, if exactly one matches.
    async fn resolve(&self, package_id: &str, user: &str) -> Result<Option<String>, LaunchFailure> {
        let output = self
            .shell
            .shell(&[
                "cmd",
                "package",
                "resolve-activity",
                "--brief",
                "-a",
                MAIN_ACTION,
                "-c",
                LAUNCHER_CATEGORY,
                "--user",
                user,
                package_id,
            ])
            .await
            .map_err(failed)?;

        if let Some(message) = adb::command_not_found(&output) {
            return Err(failed(message));
        }
        Ok(adb::parse_resolved_activity(&output))
    }

    async fn start(&self, component: &str, user: &str) -> Result<(), LaunchFailure> {
        let output = self
            .shell
            .shell(&["am", "start", "--user", user, "-n", component])
            .await
            .map_err(failed)?;

        match adb::error_line(&output) {
            Some(message) => Err(failed(message)),
            None => Ok(()),
        }
    }

    async fn monkey(&self, package_id: &str) -> Result<(), LaunchFailure> {
        let output = self
            .shell
            .shell(&["monkey", "-p", package_id, "-c", LAUNCHER_CATEGORY, "1"])
            .await
            .map_err(failed)?;

        if let Some(message) = adb::command_not_found(&output) {
            return Err(failed(message));
        }
        match adb::parse_monkey(&output) {
            MonkeyResult::Started => Ok(()),
            MonkeyResult::NoActivity => Err(LaunchFailure::not_found(package_id)),
            MonkeyResult::Failed(reason) => Err(failed(reason)),
        }
    }

    async fn launch_in_work_profile(&self, package_id: &str) -> Result<(), String> {
        if self.sdk < CMD_SDK {
            return Err(format!("SDK {} cannot resolve activities per user", self.sdk));
        }

        let output = self
            .shell
            .shell(&["pm", "list", "users"])
            .await
            .map_err(|e| e.to_string())?;
        let user = adb::parse_users(&output)
            .into_iter()
            .find(|u| u.is_work_profile())
            .ok_or("no work profile")?;
        if !user.running {
            debug!("Work profile user {} is not reported as running", user.id);
        }
        let user = user.id.to_string();

        let component = self
            .resolve(package_id, &user)
            .await
            .map_err(|f| f.message.unwrap_or_default())?
            .ok_or("no launcher activity in work profile")?;

        self.start(&component, &user)
            .await
            .map_err(|f| f.message.unwrap_or_default())
    }
}

fn failed(message: impl Display) -> LaunchFailure {
    LaunchFailure::new(LAUNCH_ERROR, format!("Failed to launch app: {}", message))
}

impl<S: DeviceShell> LaunchService for AdbLauncher<S> {
    async fn launch_app(&self, package_id: &str, is_work_profile: bool) -> Result<(), LaunchFailure> {
        if is_work_profile {
            match self.launch_in_work_profile(package_id).await {
                Ok(()) => return Ok(()),
                Err(reason) => {
                    info!(
                        "Work profile launch of {} failed ({}), trying personal profile",
                        package_id, reason
                    );
                }
            }
        }

        if self.sdk < CMD_SDK {
            debug!("Starting {} through monkey", package_id);
            return self.monkey(package_id).await;
        }

        let component = self
            .resolve(package_id, PERSONAL_USER)
            .await?
            .ok_or_else(|| LaunchFailure::not_found(package_id))?;

        debug!("Starting {} in personal profile", component);
        self.start(&component, PERSONAL_USER).await
    }
}

/// Opens URLs with a VIEW intent on the device.
#[derive(Clone, Debug)]
pub struct AdbStoreOpener<S = AdbShell> {
    shell: S,
}

impl<S: DeviceShell> AdbStoreOpener<S> {
    pub fn new(shell: S) -> Self {
        Self { shell }
    }
}

impl<S: DeviceShell> StoreLinkOpener for AdbStoreOpener<S> {
    async fn open_url(&self, url: &str) -> Result<(), OpenUrlError> {
        let quoted = adb::quote(url);
        let output = self
            .shell
            .shell(&["am", "start", "-a", "android.intent.action.VIEW", "-d", &quoted])
            .await
            .map_err(|e| OpenUrlError {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        match adb::error_line(&output) {
            Some(reason) => Err(OpenUrlError {
                url: url.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
