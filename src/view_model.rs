//! Classification and filtering of the acquired inventory.
//!
//! `AppListView` is the single owner of the list state. It is written once by
//! `activate` and afterwards only the filter selection changes.

use crate::panels::app_list::events::{self, DeckEvent};
use deck_inventory::{
    AcquisitionError, AppEntry, GenericProvider, InventoryAcquirer, ProfileAwareProvider,
};
use log::{error, info, warn};

/// Which profile's apps to show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppFilter {
    #[default]
    All,
    Work,
    Personal,
}

impl AppFilter {
    pub fn label(&self) -> &'static str {
        match self {
            AppFilter::All => "All Apps",
            AppFilter::Work => "Work",
            AppFilter::Personal => "Personal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Some(AppFilter::All),
            "work" => Some(AppFilter::Work),
            "personal" => Some(AppFilter::Personal),
            _ => None,
        }
    }

    fn matches(&self, app: &AppEntry) -> bool {
        match self {
            AppFilter::All => true,
            AppFilter::Work => app.is_work_profile,
            AppFilter::Personal => !app.is_work_profile,
        }
    }
}

impl std::fmt::Display for AppFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppFilter::All => write!(f, "all"),
            AppFilter::Work => write!(f, "work"),
            AppFilter::Personal => write!(f, "personal"),
        }
    }
}

/// Partition tally over the whole inventory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub work: usize,
    pub personal: usize,
}

impl Counts {
    pub fn of(apps: &[AppEntry]) -> Self {
        let work = apps.iter().filter(|a| a.is_work_profile).count();
        Self {
            total: apps.len(),
            work,
            personal: apps.len() - work,
        }
    }
}

/// A user-visible notice, raised where an operation failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Filter `source` by profile, keeping its order.
pub fn derive(source: &[AppEntry], filter: AppFilter) -> Vec<AppEntry> {
    source.iter().filter(|a| filter.matches(a)).cloned().collect()
}

/// List state for one activation.
#[derive(Debug)]
pub struct AppListView {
    source_apps: Vec<AppEntry>,
    filter: AppFilter,
    device_has_work_profile: bool,
    is_loading: bool,
    activated: bool,
}

impl Default for AppListView {
    fn default() -> Self {
        Self {
            source_apps: Vec::new(),
            filter: AppFilter::All,
            device_has_work_profile: false,
            is_loading: true,
            activated: false,
        }
    }
}

impl AppListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the acquisition cycle once and store its result.
    /// Returns the notice to show when acquisition failed.
    pub async fn activate<P, G>(&mut self, acquirer: &InventoryAcquirer<P, G>) -> Option<Notice>
    where
        P: ProfileAwareProvider,
        G: GenericProvider,
    {
        if self.activated {
            warn!("App list already activated, ignoring");
            return None;
        }
        self.activated = true;

        let notice = match acquirer.acquire().await {
            Ok(inventory) => {
                self.source_apps = inventory.apps;
                self.device_has_work_profile = inventory.has_work_profile;
                None
            }
            Err(e) => {
                error!("Error fetching apps: {}", e);
                self.source_apps = Vec::new();
                Some(match e {
                    AcquisitionError::PlatformUnsupported(_) => {
                        Notice::new("Not Supported", e.user_message())
                    }
                    AcquisitionError::Provider(_) => {
                        Notice::new("Error", format!("Failed to fetch apps: {}", e.user_message()))
                    }
                })
            }
        };
        self.is_loading = false;

        let counts = self.counts();
        info!(
            "Total apps found: {} ({} work, {} personal)",
            counts.total, counts.work, counts.personal
        );
        events::send(DeckEvent::InventoryLoaded(counts));
        if let Some(notice) = &notice {
            events::send_notice(notice.clone());
        }

        notice
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn device_has_work_profile(&self) -> bool {
        self.device_has_work_profile
    }

    pub fn filter(&self) -> AppFilter {
        self.filter
    }

    /// Change the filter. Only re-derives, never re-acquires.
    pub fn set_filter(&mut self, filter: AppFilter) {
        if self.filter != filter {
            self.filter = filter;
            events::send(DeckEvent::FilterChanged(filter));
        }
    }

    /// Filter options to offer; Work only when the device has a work profile.
    pub fn available_filters(&self) -> Vec<AppFilter> {
        let mut filters = vec![AppFilter::All, AppFilter::Personal];
        if self.device_has_work_profile {
            filters.push(AppFilter::Work);
        }
        filters
    }

    /// The derived view for the current filter.
    pub fn visible_apps(&self) -> Vec<AppEntry> {
        if self.filter == AppFilter::Work && !self.device_has_work_profile {
            return Vec::new();
        }
        derive(&self.source_apps, self.filter)
    }

    pub fn counts(&self) -> Counts {
        Counts::of(&self.source_apps)
    }

    /// Header line, e.g. "12 apps (4 work, 8 personal)".
    pub fn subtitle(&self) -> String {
        if self.is_loading {
            return "Loading...".to_string();
        }
        let mut subtitle = format!("{} apps", self.visible_apps().len());
        if self.device_has_work_profile {
            let counts = self.counts();
            subtitle.push_str(&format!(" ({} work, {} personal)", counts.work, counts.personal));
        }
        subtitle
    }

    pub fn empty_text(&self) -> String {
        match self.filter {
            AppFilter::All => "No apps found".to_string(),
            filter => format!("No {} apps found", filter),
        }
    }
}
