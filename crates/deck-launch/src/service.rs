//! External capabilities used by the dispatcher.

use crate::error::OpenUrlError;
use std::future::Future;

/// Failure code for a package that cannot be resolved or started.
pub const APP_NOT_FOUND: &str = "APP_NOT_FOUND";

/// Failure code for a start request the platform rejected.
pub const LAUNCH_ERROR: &str = "LAUNCH_ERROR";

/// Failure as reported by a launch service, before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchFailure {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl LaunchFailure {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.to_string()),
            message: Some(message.into()),
        }
    }

    pub fn not_found(package_id: &str) -> Self {
        Self::new(APP_NOT_FOUND, format!("Cannot launch app: {}", package_id))
    }

    pub fn is_not_found(&self) -> bool {
        self.code.as_deref() == Some(APP_NOT_FOUND)
    }
}

/// Starts an app by package id in the personal or work profile.
pub trait LaunchService {
    fn launch_app(
        &self,
        package_id: &str,
        is_work_profile: bool,
    ) -> impl Future<Output = Result<(), LaunchFailure>>;
}

/// Opens a URL through the platform's link handling.
pub trait StoreLinkOpener {
    fn open_url(&self, url: &str) -> impl Future<Output = Result<(), OpenUrlError>>;
}
