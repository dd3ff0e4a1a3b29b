//! Launch dispatch state machine.
//!
//! Attempt -> Done on success.
//! Attempt -> OfferFallback on not-found; the user either cancels or the
//! store listing is opened (deep link, then web URL).
//! Attempt -> ReportError on anything else, including a missing service.

use crate::error::LaunchError;
use crate::service::{LaunchFailure, LaunchService, StoreLinkOpener};
use crate::store::{StoreChannel, StoreLinks};
use log::{error, info};
use std::future::Future;

/// An app to launch, as selected from the inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchTarget {
    pub package_id: String,
    pub display_name: String,
    pub is_work_profile: bool,
}

impl LaunchTarget {
    pub fn new(
        package_id: impl Into<String>,
        display_name: impl Into<String>,
        is_work_profile: bool,
    ) -> Self {
        Self {
            package_id: package_id.into(),
            display_name: display_name.into(),
            is_work_profile,
        }
    }

    fn profile_label(&self) -> &'static str {
        if self.is_work_profile { "work" } else { "personal" }
    }
}

/// Asks the user whether to open the store listing for an app that could
/// not be launched.
pub trait FallbackPrompt {
    fn confirm_store_fallback(&self, target: &LaunchTarget) -> impl Future<Output = bool>;
}

/// Terminal state of one dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Launched,
    /// Not found, and the user declined the store fallback.
    Cancelled,
    /// Not found, store listing shown through the given channel.
    StoreOpened(StoreChannel),
    /// Not found, and neither store channel accepted the link.
    StoreUnavailable,
    /// Failure to report to the user.
    Failed(LaunchError),
}

impl DispatchOutcome {
    /// User-facing `(title, message)` for outcomes that need a notice.
    pub fn notice(&self, target: &LaunchTarget) -> Option<(&'static str, String)> {
        match self {
            DispatchOutcome::Failed(LaunchError::Unavailable) => {
                Some(("Error", LaunchError::Unavailable.to_string()))
            }
            DispatchOutcome::Failed(e) => Some((
                "Error",
                format!("Failed to open {}: {}", target.display_name, e),
            )),
            _ => None,
        }
    }
}

/// Dispatches launches to a `LaunchService`, with store fallback.
///
/// `launcher` is optional; `None` means the launch capability is absent and
/// every attempt reports `LaunchError::Unavailable` without a call.
pub struct LaunchDispatcher<L, O> {
    launcher: Option<L>,
    opener: O,
    links: StoreLinks,
}

impl<L, O> LaunchDispatcher<L, O>
where
    L: LaunchService,
    O: StoreLinkOpener,
{
    pub fn new(launcher: Option<L>, opener: O, links: StoreLinks) -> Self {
        Self {
            launcher,
            opener,
            links,
        }
    }

    /// Attempt a single launch and classify the result.
    pub async fn launch(&self, package_id: &str, is_work_profile: bool) -> Result<(), LaunchError> {
        let Some(launcher) = &self.launcher else {
            return Err(LaunchError::Unavailable);
        };

        launcher
            .launch_app(package_id, is_work_profile)
            .await
            .map_err(classify)
    }

    /// Run the full state machine for `target`.
    pub async fn dispatch<P: FallbackPrompt>(
        &self,
        target: &LaunchTarget,
        prompt: &P,
    ) -> DispatchOutcome {
        match self.launch(&target.package_id, target.is_work_profile).await {
            Ok(()) => {
                info!(
                    "Launched {} ({}) in {} profile",
                    target.display_name,
                    target.package_id,
                    target.profile_label()
                );
                DispatchOutcome::Launched
            }
            Err(LaunchError::NotFound(message)) => {
                info!("{}", message);
                if !prompt.confirm_store_fallback(target).await {
                    return DispatchOutcome::Cancelled;
                }
                match self.links.open_listing(&self.opener, &target.package_id).await {
                    Some(channel) => DispatchOutcome::StoreOpened(channel),
                    None => DispatchOutcome::StoreUnavailable,
                }
            }
            Err(e) => {
                error!("Error opening {}: {}", target.package_id, e);
                DispatchOutcome::Failed(e)
            }
        }
    }
}

fn classify(failure: LaunchFailure) -> LaunchError {
    let message = failure
        .message
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "Unknown error".to_string());

    if failure.is_not_found() {
        LaunchError::NotFound(message)
    } else {
        LaunchError::Other(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpenUrlError;
    use crate::service::{APP_NOT_FOUND, LAUNCH_ERROR};
    use std::cell::{Cell, RefCell};

    /// Launch service that answers every call with the same result.
    struct FixedLauncher {
        result: Result<(), LaunchFailure>,
        calls: RefCell<Vec<(String, bool)>>,
    }

    impl FixedLauncher {
        fn new(result: Result<(), LaunchFailure>) -> Self {
            Self {
                result,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl LaunchService for FixedLauncher {
        async fn launch_app(&self, package_id: &str, is_work_profile: bool) -> Result<(), LaunchFailure> {
            self.calls
                .borrow_mut()
                .push((package_id.to_string(), is_work_profile));
            self.result.clone()
        }
    }

    #[derive(Default)]
    struct Opener {
        reject_all: bool,
        reject_deep_link: bool,
        opened: RefCell<Vec<String>>,
    }

    impl StoreLinkOpener for Opener {
        async fn open_url(&self, url: &str) -> Result<(), OpenUrlError> {
            self.opened.borrow_mut().push(url.to_string());
            let rejected = self.reject_all || (self.reject_deep_link && url.starts_with("market://"));
            if rejected {
                Err(OpenUrlError {
                    url: url.to_string(),
                    reason: "no activity".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    struct Answer {
        accept: bool,
        asked: Cell<u32>,
    }

    impl Answer {
        fn new(accept: bool) -> Self {
            Self {
                accept,
                asked: Cell::new(0),
            }
        }
    }

    impl FallbackPrompt for Answer {
        async fn confirm_store_fallback(&self, _target: &LaunchTarget) -> bool {
            self.asked.set(self.asked.get() + 1);
            self.accept
        }
    }

    fn slack_work() -> LaunchTarget {
        LaunchTarget::new("com.slack", "Slack", true)
    }

    fn dispatcher(
        result: Result<(), LaunchFailure>,
        opener: Opener,
    ) -> LaunchDispatcher<FixedLauncher, Opener> {
        LaunchDispatcher::new(Some(FixedLauncher::new(result)), opener, StoreLinks::default())
    }

    #[tokio::test]
    async fn test_success_passes_profile_through() {
        let d = dispatcher(Ok(()), Opener::default());
        let prompt = Answer::new(true);

        let outcome = d.dispatch(&slack_work(), &prompt).await;

        assert_eq!(outcome, DispatchOutcome::Launched);
        assert_eq!(
            *d.launcher.as_ref().unwrap().calls.borrow(),
            [("com.slack".to_string(), true)]
        );
        assert_eq!(prompt.asked.get(), 0);
        assert!(d.opener.opened.borrow().is_empty());
        assert_eq!(outcome.notice(&slack_work()), None);
    }

    #[tokio::test]
    async fn test_missing_service_reports_unavailable() {
        let d: LaunchDispatcher<FixedLauncher, Opener> =
            LaunchDispatcher::new(None, Opener::default(), StoreLinks::default());
        let prompt = Answer::new(true);

        let outcome = d.dispatch(&slack_work(), &prompt).await;

        assert_eq!(outcome, DispatchOutcome::Failed(LaunchError::Unavailable));
        assert_eq!(prompt.asked.get(), 0);
        let (title, message) = outcome.notice(&slack_work()).unwrap();
        assert_eq!(title, "Error");
        assert_eq!(message, "Cannot launch apps - launch service not available");
    }

    #[tokio::test]
    async fn test_not_found_declined() {
        let d = dispatcher(Err(LaunchFailure::not_found("com.slack")), Opener::default());
        let prompt = Answer::new(false);

        let outcome = d.dispatch(&slack_work(), &prompt).await;

        assert_eq!(outcome, DispatchOutcome::Cancelled);
        assert_eq!(prompt.asked.get(), 1);
        assert!(d.opener.opened.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_accepted_opens_deep_link() {
        let d = dispatcher(Err(LaunchFailure::not_found("com.slack")), Opener::default());

        let outcome = d.dispatch(&slack_work(), &Answer::new(true)).await;

        assert_eq!(outcome, DispatchOutcome::StoreOpened(StoreChannel::DeepLink));
        assert_eq!(*d.opener.opened.borrow(), ["market://details?id=com.slack"]);
    }

    #[tokio::test]
    async fn test_not_found_falls_back_to_web() {
        let opener = Opener {
            reject_deep_link: true,
            ..Default::default()
        };
        let d = dispatcher(Err(LaunchFailure::not_found("com.slack")), opener);

        let outcome = d.dispatch(&slack_work(), &Answer::new(true)).await;

        assert_eq!(outcome, DispatchOutcome::StoreOpened(StoreChannel::Web));
        assert_eq!(
            *d.opener.opened.borrow(),
            [
                "market://details?id=com.slack",
                "https://play.google.com/store/apps/details?id=com.slack"
            ]
        );
    }

    #[tokio::test]
    async fn test_store_failure_does_not_escape() {
        let opener = Opener {
            reject_all: true,
            ..Default::default()
        };
        let d = dispatcher(Err(LaunchFailure::not_found("com.slack")), opener);

        let outcome = d.dispatch(&slack_work(), &Answer::new(true)).await;

        assert_eq!(outcome, DispatchOutcome::StoreUnavailable);
        assert_eq!(d.opener.opened.borrow().len(), 2);
        assert_eq!(outcome.notice(&slack_work()), None);
    }

    #[tokio::test]
    async fn test_other_failure_is_reported_with_message() {
        let d = dispatcher(
            Err(LaunchFailure::new(LAUNCH_ERROR, "Failed to launch app: permission denied")),
            Opener::default(),
        );
        let prompt = Answer::new(true);

        let outcome = d.dispatch(&slack_work(), &prompt).await;

        assert_eq!(prompt.asked.get(), 0);
        let (_, message) = outcome.notice(&slack_work()).unwrap();
        assert_eq!(message, "Failed to open Slack: Failed to launch app: permission denied");
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_sentinel() {
        let d = dispatcher(Err(LaunchFailure::default()), Opener::default());

        let result = d.launch("com.slack", false).await;

        assert_eq!(result, Err(LaunchError::Other("Unknown error".into())));
    }

    #[tokio::test]
    async fn test_repeat_launch_classifies_identically() {
        let d = dispatcher(
            Err(LaunchFailure {
                code: Some(APP_NOT_FOUND.into()),
                message: None,
            }),
            Opener::default(),
        );

        let first = d.launch("com.slack", true).await;
        let second = d.launch("com.slack", true).await;

        assert_eq!(first, second);
        assert!(matches!(first, Err(LaunchError::NotFound(_))));
        assert_eq!(d.launcher.as_ref().unwrap().calls.borrow().len(), 2);
    }
}
