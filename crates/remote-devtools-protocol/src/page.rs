//! Commands and events for the `Page` domain.

use remote_devtools_core::{Command, EmptyReturns, MethodType};
use serde::{Deserialize, Serialize};

/// Fired when the page `load` event fires.
pub const EVENT_LOAD_EVENT_FIRED: MethodType = MethodType::from_static("Page.loadEventFired");

/// Fired when the page `DOMContentLoaded` event fires.
pub const EVENT_DOM_CONTENT_EVENT_FIRED: MethodType =
    MethodType::from_static("Page.domContentEventFired");

/// Fired once navigation of a frame has completed.
pub const EVENT_FRAME_NAVIGATED: MethodType = MethodType::from_static("Page.frameNavigated");

/// Parameters of [`EVENT_LOAD_EVENT_FIRED`] and
/// [`EVENT_DOM_CONTENT_EVENT_FIRED`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifecycleTimestamp {
    /// Monotonic time in seconds.
    pub timestamp: f64,
}

/// Enables page domain notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enable {}

impl Command for Enable {
    const METHOD: &'static str = "Page.enable";
    type Returns = EmptyReturns;
}

/// Navigates the current page to the given URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigate {
    /// URL to navigate the page to.
    pub url: String,
    /// Referrer URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

impl Navigate {
    /// Navigate to `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            referrer: None,
        }
    }

    /// Set the referrer.
    #[must_use]
    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }
}

/// Result of [`Navigate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateReturns {
    /// Frame id that has navigated (or failed to navigate).
    pub frame_id: String,
    /// Loader identifier; absent for same-document navigations.
    #[serde(default)]
    pub loader_id: Option<String>,
    /// User friendly error message, present if and only if navigation failed.
    #[serde(default)]
    pub error_text: Option<String>,
}

impl Command for Navigate {
    const METHOD: &'static str = "Page.navigate";
    type Returns = NavigateReturns;
}

/// Reloads the given page, optionally ignoring the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reload {
    /// Reload as if the user pressed Shift+Refresh.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_cache: Option<bool>,
    /// Script injected into all frames of the inspected page after reload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_to_evaluate_on_load: Option<String>,
}

impl Command for Reload {
    const METHOD: &'static str = "Page.reload";
    type Returns = EmptyReturns;
}
