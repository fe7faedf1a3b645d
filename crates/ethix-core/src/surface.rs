//! # Display Surface
//!
//! The host platform's embedded page renderer. The orchestrator only needs to
//! point it at a URL, show or hide it, and ask whether it is still visible.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │           DisplaySurface (trait)             │
//! │  ├── navigate_to(url)                        │
//! │  ├── set_visible(bool)                       │
//! │  └── is_visible()                            │
//! └──────────────────────────────────────────────┘
//!          ▲                         ▲
//!  ┌───────┴────────┐        ┌───────┴────────┐
//!  │ HeadlessSurface│        │  host webview  │
//!  └────────────────┘        └────────────────┘
//! ```
//!
//! Events flowing the other way (page loaded, posted messages) are modelled
//! as [`SurfaceEvent`] values that the host pushes into a channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Page display surface supplied by the host
pub trait DisplaySurface: Send + Sync {
    /// Load `url` in the surface
    fn navigate_to(&self, url: &str);

    /// Show or hide the surface
    fn set_visible(&self, visible: bool);

    /// Whether the surface is currently shown
    fn is_visible(&self) -> bool;
}

/// Type alias for a shared display surface (dynamic dispatch)
pub type SharedSurface = Arc<dyn DisplaySurface>;

/// Out-of-band message posted by a hosted page: `{data: {token}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub data: MessageData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl MessageEvent {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            data: MessageData {
                token: Some(token.into()),
            },
        }
    }

    /// The token, if the message carries a non-empty one
    pub fn token(&self) -> Option<&str> {
        self.data.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Event emitted by the display surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Navigation finished loading `url`
    Loaded { url: String },
    /// A hosted page posted a message
    Message(MessageEvent),
}

impl SurfaceEvent {
    /// Parse a raw posted message as forwarded by the host
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw).map(SurfaceEvent::Message)
    }
}

/// Opaque player token captured from the login page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub value: String,
    pub received_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            received_at: Utc::now(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// In-memory surface for headless hosts and tests. Records every URL it is
/// asked to load and logs navigation.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    visible: AtomicBool,
    history: Mutex<Vec<String>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs loaded so far, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn current_url(&self) -> Option<String> {
        self.history().last().cloned()
    }

    /// Simulate the user closing the surface
    pub fn close(&self) {
        self.set_visible(false);
    }
}

impl DisplaySurface for HeadlessSurface {
    fn navigate_to(&self, url: &str) {
        info!(url, "Surface navigating");
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_string());
    }

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}
