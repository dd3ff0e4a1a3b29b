//! adb shell access and parsing of device command output.

use deck_inventory::ProviderError;
use log::debug;
use std::collections::HashMap;
use std::future::Future;
use tokio::process::Command;

/// User flag marking a managed (work) profile.
const FLAG_MANAGED_PROFILE: u32 = 0x20;

/// adb shell errors
#[derive(Debug, thiserror::Error)]
pub enum AdbError {
    #[error("Failed to run adb: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("adb exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },
}

impl From<AdbError> for ProviderError {
    fn from(e: AdbError) -> Self {
        ProviderError::Failed(e.to_string())
    }
}

/// Runs commands in a device shell and returns their stdout.
pub trait DeviceShell {
    fn shell(&self, args: &[&str]) -> impl Future<Output = Result<String, AdbError>>;
}

/// Runs `adb shell` commands against one device.
#[derive(Clone, Debug)]
pub struct AdbShell {
    adb_path: String,
    serial: Option<String>,
}

impl AdbShell {
    pub fn new(adb_path: &str, serial: Option<String>) -> Self {
        Self {
            adb_path: adb_path.to_string(),
            serial,
        }
    }
}

impl DeviceShell for AdbShell {
    async fn shell(&self, args: &[&str]) -> Result<String, AdbError> {
        let mut command = Command::new(&self.adb_path);
        if let Some(serial) = &self.serial {
            command.arg("-s").arg(serial);
        }
        command.arg("shell").args(args);

        debug!("adb shell {}", args.join(" "));
        let output = command.output().await?;

        if !output.status.success() {
            return Err(AdbError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Quote an argument for the device shell.
pub fn quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// A user on the device, from `pm list users`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceUser {
    pub id: u32,
    pub name: String,
    /// Hex flags; `None` when the line carried none we could read.
    pub flags: Option<u32>,
    pub running: bool,
}

impl DeviceUser {
    /// Non-owner user with the managed-profile flag. Without readable flags
    /// every non-owner user counts.
    pub fn is_work_profile(&self) -> bool {
        if self.id == 0 {
            return false;
        }
        match self.flags {
            Some(flags) => flags & FLAG_MANAGED_PROFILE != 0,
            None => true,
        }
    }
}

/// A package from `pm list packages`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListedPackage {
    pub package: String,
    pub version_code: Option<String>,
}

/// Parse `getprop ro.build.version.sdk`.
pub fn parse_sdk(output: &str) -> Option<u32> {
    output.trim().parse().ok()
}

/// Parse `pm list users` lines like `UserInfo{10:Work profile:1030} running`.
pub fn parse_users(output: &str) -> Vec<DeviceUser> {
    output.lines().filter_map(parse_user_line).collect()
}

fn parse_user_line(line: &str) -> Option<DeviceUser> {
    let line = line.trim();
    let rest = line.strip_prefix("UserInfo{")?;
    let (info, tail) = rest.split_once('}')?;

    let (id, info) = info.split_once(':')?;
    let id = id.trim().parse().ok()?;

    // The name may itself contain ':' so the flags are the last field.
    let (name, flags) = match info.rsplit_once(':') {
        Some((name, flags)) => (name, u32::from_str_radix(flags.trim(), 16).ok()),
        None => (info, None),
    };

    Some(DeviceUser {
        id,
        name: name.to_string(),
        flags,
        running: tail.trim() == "running",
    })
}

/// Parse `pm list packages [--show-versioncode]` output.
pub fn parse_package_list(output: &str) -> Vec<ListedPackage> {
    output
        .lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let package = tokens.next()?.strip_prefix("package:")?;
            if package.is_empty() {
                return None;
            }
            let version_code = tokens
                .find_map(|t| t.strip_prefix("versionCode:"))
                .map(str::to_string);
            Some(ListedPackage {
                package: package.to_string(),
                version_code,
            })
        })
        .collect()
}

/// Parse `package [name]` headers and their `versionName=` from
/// `dumpsys package packages`. The first block for a package wins; later
/// ones describe hidden system versions.
pub fn parse_version_names(output: &str) -> HashMap<String, String> {
    let mut names = HashMap::new();
    let mut current: Option<&str> = None;

    for line in output.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("Package [") {
            current = rest.split_once(']').map(|(name, _)| name);
        } else if let (Some(package), Some(version)) = (current, line.strip_prefix("versionName=")) {
            if !version.is_empty() && version != "null" {
                names
                    .entry(package.to_string())
                    .or_insert_with(|| version.to_string());
            }
            current = None;
        }
    }

    names
}

/// Parse `cmd package resolve-activity --brief` output into a component name.
///
/// The system chooser (`android/...ResolverActivity`) means no single
/// launcher activity matched, which counts as unresolved.
pub fn parse_resolved_activity(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .filter(|l| !l.contains(' '))
        .filter(|l| matches!(l.split_once('/'), Some((package, _)) if package != "android"))
        .map(str::to_string)
}

/// First `Error` line printed by `am` or `pm`, if any. Both report
/// failures on stdout with a zero exit status.
pub fn error_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("Error"))
        .map(str::to_string)
}

/// Shell message for a missing binary, like `/system/bin/sh: cmd: not found`.
pub fn command_not_found(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|l| l.ends_with(": not found") || l.ends_with("inaccessible or not found"))
        .map(str::to_string)
}

/// Outcome of `monkey -p <package> -c android.intent.category.LAUNCHER 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MonkeyResult {
    Started,
    NoActivity,
    Failed(String),
}

pub fn parse_monkey(output: &str) -> MonkeyResult {
    if output.contains("No activities found to run") {
        return MonkeyResult::NoActivity;
    }
    if output.contains("Events injected: 1") {
        return MonkeyResult::Started;
    }
    let reason = output
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .unwrap_or("no output from monkey");
    MonkeyResult::Failed(reason.to_string())
}
