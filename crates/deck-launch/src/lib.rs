//! deck-launch: launch dispatch for apps in a personal or work profile.
//!
//! - `LaunchService` / `StoreLinkOpener` capabilities
//! - `LaunchDispatcher` state machine with store fallback on not-found
//! - Store deep link and web URL construction

pub mod dispatcher;
pub mod error;
pub mod service;
pub mod store;

pub use dispatcher::{DispatchOutcome, FallbackPrompt, LaunchDispatcher, LaunchTarget};
pub use error::{LaunchError, OpenUrlError};
pub use service::{APP_NOT_FOUND, LAUNCH_ERROR, LaunchFailure, LaunchService, StoreLinkOpener};
pub use store::{StoreChannel, StoreLinks};
