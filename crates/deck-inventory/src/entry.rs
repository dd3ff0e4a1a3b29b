//! App records as delivered by providers, and the normalized entry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One app exactly as a provider reported it.
///
/// Every field is optional. `version_code` may arrive as a string or a
/// number and `is_work_profile` as any JSON value, so both are kept raw
/// until normalization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAppRecord {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub version_name: Option<String>,
    #[serde(default)]
    pub version_code: Option<Value>,
    #[serde(default)]
    pub is_work_profile: Option<Value>,
}

impl RawAppRecord {
    /// Record with only a package name, as listed by package managers.
    pub fn from_package(package_name: impl Into<String>) -> Self {
        Self {
            package_name: Some(package_name.into()),
            ..Default::default()
        }
    }

    pub fn with_version_name(mut self, name: impl Into<String>) -> Self {
        self.version_name = Some(name.into());
        self
    }

    pub fn with_version_code(mut self, code: impl Into<String>) -> Self {
        self.version_code = Some(Value::String(code.into()));
        self
    }

    pub fn with_work_profile(mut self, is_work_profile: bool) -> Self {
        self.is_work_profile = Some(Value::Bool(is_work_profile));
        self
    }
}

/// A normalized installed app.
///
/// `(package_id, is_work_profile)` identifies an entry for display; the same
/// package can be installed in both profiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppEntry {
    pub display_name: String,
    pub package_id: String,
    pub version_name: String,
    pub version_code: String,
    pub is_work_profile: bool,
}

impl AppEntry {
    /// Display identity, e.g. "com.slack-work".
    pub fn key(&self) -> String {
        format!(
            "{}-{}",
            self.package_id,
            if self.is_work_profile { "work" } else { "personal" }
        )
    }
}
