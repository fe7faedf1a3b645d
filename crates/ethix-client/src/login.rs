//! # Login Handoff
//!
//! Shows the hosted login page and captures the player token the page posts
//! back. The host forwards surface events (page loaded, posted messages)
//! through the [`LoginChannel`] returned by [`LoginSession::login`]; a
//! listener task records the most recent token.

use ethix_core::{SessionToken, SharedSurface, SurfaceEvent};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Sender half handed to the host for forwarding surface events
#[derive(Debug, Clone)]
pub struct LoginChannel {
    events: mpsc::UnboundedSender<SurfaceEvent>,
}

impl LoginChannel {
    /// Forward an event. Returns `false` once the listener was torn down.
    pub fn send(&self, event: SurfaceEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// Forward a raw posted message, e.g. `{"data": {"token": "..."}}`
    pub fn post_message(&self, raw: &str) -> Result<bool, serde_json::Error> {
        Ok(self.send(SurfaceEvent::from_json(raw)?))
    }

    /// Report that the surface finished loading `url`
    pub fn page_loaded(&self, url: impl Into<String>) -> bool {
        self.send(SurfaceEvent::Loaded { url: url.into() })
    }

    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }
}

/// Login state: the active listener and the captured token
pub struct LoginSession {
    surface: SharedSurface,
    login_url: String,
    token: Arc<watch::Sender<Option<SessionToken>>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl LoginSession {
    pub fn new(surface: SharedSurface, login_url: impl Into<String>) -> Self {
        let (token, _) = watch::channel(None);
        Self {
            surface,
            login_url: login_url.into(),
            token: Arc::new(token),
            listener: Mutex::new(None),
        }
    }

    /// Navigate the surface to the login page and start listening for the
    /// token. A previous listener is replaced. Must be called inside a Tokio
    /// runtime.
    pub fn login(&self) -> LoginChannel {
        self.surface.navigate_to(&self.login_url);
        self.surface.set_visible(true);

        let (events, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(listen(rx, self.token.clone()));

        if let Some(previous) = self.lock_listener().replace(task) {
            debug!("Replacing previous login listener");
            previous.abort();
        }

        LoginChannel { events }
    }

    /// Stop listening for page-load and message events
    pub fn teardown(&self) {
        if let Some(task) = self.lock_listener().take() {
            task.abort();
            debug!("Login listener removed");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.lock_listener()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Most recently captured token
    pub fn token(&self) -> Option<SessionToken> {
        self.token.borrow().clone()
    }

    /// The current token, or the next one to arrive
    pub async fn wait_for_token(&self) -> Option<SessionToken> {
        let mut rx = self.token.subscribe();
        rx.wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|token| token.clone())
    }

    fn lock_listener(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.listener
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for LoginSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn listen(
    mut events: mpsc::UnboundedReceiver<SurfaceEvent>,
    token: Arc<watch::Sender<Option<SessionToken>>>,
) {
    while let Some(event) = events.recv().await {
        match event {
            SurfaceEvent::Loaded { url } => info!(url, "Surface content loaded"),
            SurfaceEvent::Message(message) => match message.token() {
                Some(value) => {
                    info!("Player token received from login page");
                    token.send_replace(Some(SessionToken::new(value)));
                }
                None => warn!("Ignoring posted message without a token"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethix_core::{DisplaySurface, HeadlessSurface, MessageData, MessageEvent};
    use std::time::Duration;

    fn session() -> (LoginSession, Arc<HeadlessSurface>) {
        let surface = Arc::new(HeadlessSurface::new());
        (LoginSession::new(surface.clone(), "https://login.test/"), surface)
    }

    #[tokio::test]
    async fn test_login_navigates_and_captures_token() {
        let (login, surface) = session();
        let channel = login.login();

        assert_eq!(surface.current_url().as_deref(), Some("https://login.test/"));
        assert!(surface.is_visible());

        assert!(channel.page_loaded("https://login.test/"));
        assert!(channel.post_message(r#"{"data": {"token": "tok_1"}}"#).unwrap());

        let token = tokio::time::timeout(Duration::from_secs(1), login.wait_for_token())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(token.as_str(), "tok_1");
        assert!(login.is_listening());
    }

    #[tokio::test]
    async fn test_last_token_wins() {
        let (login, _) = session();
        let channel = login.login();

        channel.send(SurfaceEvent::Message(MessageEvent::with_token("first")));
        channel.send(SurfaceEvent::Message(MessageEvent { data: MessageData::default() }));
        channel.send(SurfaceEvent::Message(MessageEvent::with_token("second")));

        let mut rx = login.token.subscribe();
        tokio::time::timeout(
            Duration::from_secs(1),
            rx.wait_for(|t| t.as_ref().is_some_and(|t| t.value == "second")),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(login.token().unwrap().as_str(), "second");
    }

    #[tokio::test]
    async fn test_teardown_stops_listener() {
        let (login, _) = session();
        let channel = login.login();
        login.teardown();

        // the aborted task drops its receiver
        tokio::time::timeout(Duration::from_secs(1), async {
            while !channel.is_closed() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert!(!channel.send(SurfaceEvent::Message(MessageEvent::with_token("late"))));
        assert!(!login.is_listening());
        assert!(login.token().is_none());
    }

    #[tokio::test]
    async fn test_relogin_replaces_listener() {
        let (login, surface) = session();
        let first = login.login();
        let second = login.login();

        tokio::time::timeout(Duration::from_secs(1), async {
            while !first.is_closed() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert!(second.send(SurfaceEvent::Message(MessageEvent::with_token("tok"))));
        assert_eq!(surface.history().len(), 2);
    }
}
