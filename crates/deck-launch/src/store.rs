//! Marketplace links and the deep-link-then-web open chain.

use crate::service::StoreLinkOpener;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Channel that ended up showing the store listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreChannel {
    /// Native marketplace app via deep link.
    DeepLink,
    /// Browser via web URL.
    Web,
}

/// Marketplace endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreLinks {
    /// Scheme of the marketplace app deep link, e.g. "market".
    pub deep_link_scheme: String,
    /// Host of the web storefront, e.g. "play.google.com".
    pub web_host: String,
}

impl Default for StoreLinks {
    fn default() -> Self {
        Self {
            deep_link_scheme: "market".to_string(),
            web_host: "play.google.com".to_string(),
        }
    }
}

impl StoreLinks {
    pub fn deep_link(&self, package_id: &str) -> String {
        format!("{}://details?id={}", self.deep_link_scheme, package_id)
    }

    pub fn web_url(&self, package_id: &str) -> String {
        format!("https://{}/store/apps/details?id={}", self.web_host, package_id)
    }

    /// Open the listing for `package_id`: deep link first, web URL once if
    /// the deep link is rejected. Failure of both is absorbed and yields `None`.
    pub async fn open_listing<O: StoreLinkOpener>(
        &self,
        opener: &O,
        package_id: &str,
    ) -> Option<StoreChannel> {
        let deep_link = self.deep_link(package_id);
        match opener.open_url(&deep_link).await {
            Ok(()) => return Some(StoreChannel::DeepLink),
            Err(e) => debug!("Marketplace app unavailable ({}), trying web URL", e),
        }

        match opener.open_url(&self.web_url(package_id)).await {
            Ok(()) => Some(StoreChannel::Web),
            Err(e) => {
                warn!("Could not open store listing for {}: {}", package_id, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpenUrlError;
    use std::cell::RefCell;

    struct RecordingOpener {
        reject: Vec<&'static str>,
        opened: RefCell<Vec<String>>,
    }

    impl RecordingOpener {
        fn rejecting(reject: Vec<&'static str>) -> Self {
            Self {
                reject,
                opened: RefCell::new(Vec::new()),
            }
        }
    }

    impl StoreLinkOpener for RecordingOpener {
        async fn open_url(&self, url: &str) -> Result<(), OpenUrlError> {
            self.opened.borrow_mut().push(url.to_string());
            if self.reject.iter().any(|prefix| url.starts_with(prefix)) {
                return Err(OpenUrlError {
                    url: url.to_string(),
                    reason: "no handler".into(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_default_links() {
        let links = StoreLinks::default();
        assert_eq!(links.deep_link("com.a.Foo"), "market://details?id=com.a.Foo");
        assert_eq!(
            links.web_url("com.a.Foo"),
            "https://play.google.com/store/apps/details?id=com.a.Foo"
        );
    }

    #[test]
    fn test_custom_links_from_json() {
        let links: StoreLinks = serde_json::from_str(r#"{"web_host": "store.example.org"}"#).unwrap();
        assert_eq!(links.deep_link_scheme, "market");
        assert_eq!(
            links.web_url("x.y"),
            "https://store.example.org/store/apps/details?id=x.y"
        );
    }

    #[tokio::test]
    async fn test_deep_link_only_when_accepted() {
        let opener = RecordingOpener::rejecting(vec![]);
        let channel = StoreLinks::default().open_listing(&opener, "com.a.Foo").await;

        assert_eq!(channel, Some(StoreChannel::DeepLink));
        assert_eq!(*opener.opened.borrow(), ["market://details?id=com.a.Foo"]);
    }

    #[tokio::test]
    async fn test_web_url_after_deep_link_rejection() {
        let opener = RecordingOpener::rejecting(vec!["market://"]);
        let channel = StoreLinks::default().open_listing(&opener, "com.a.Foo").await;

        assert_eq!(channel, Some(StoreChannel::Web));
        assert_eq!(
            *opener.opened.borrow(),
            [
                "market://details?id=com.a.Foo",
                "https://play.google.com/store/apps/details?id=com.a.Foo"
            ]
        );
    }

    #[tokio::test]
    async fn test_both_rejected_is_absorbed() {
        let opener = RecordingOpener::rejecting(vec!["market://", "https://"]);
        let channel = StoreLinks::default().open_listing(&opener, "com.a.Foo").await;

        assert_eq!(channel, None);
        assert_eq!(opener.opened.borrow().len(), 2);
    }
}
