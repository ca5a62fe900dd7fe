//! Observable request state for "current weather of one city".
//!
//! The controller owns a single [`RequestState`] inside a `tokio::sync::watch`
//! channel: one writer at a time (whichever fetch just finished), any number
//! of readers, and every transition is a whole-value replacement.
//!
//! Requests are never cancelled. With [`CompletionOrder::LastCompletionWins`]
//! a slow earlier request can overwrite the result of a faster later one.

use serde::{Deserialize, Serialize};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    Config, WeatherModel, WeatherQuery,
    provider::{WeatherClient, client_from_config},
};

/// What observers should display right now.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    /// No request has been issued yet.
    #[default]
    Unset,
    Loading,
    Success(WeatherModel),
    Error(String),
}

impl RequestState {
    /// `true` once a request has produced a result (success or error).
    pub fn is_settled(&self) -> bool {
        matches!(self, RequestState::Success(_) | RequestState::Error(_))
    }
}

/// Which completion is allowed to write the state when requests overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionOrder {
    /// Every completion writes; the one that resolves last wins.
    #[default]
    LastCompletionWins,
    /// Completions of superseded requests are dropped.
    LastIssuedWins,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub api_key: String,
    pub default_city: String,
    pub completion_order: CompletionOrder,
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            default_city: config.default_city.clone(),
            completion_order: config.completion_order,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherRequestController {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: Arc<dyn WeatherClient>,
    settings: ControllerSettings,
    state: watch::Sender<RequestState>,
    issued: AtomicU64,
}

impl WeatherRequestController {
    /// Create the controller and immediately start fetching the default city.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(client: Arc<dyn WeatherClient>, settings: ControllerSettings) -> Self {
        let (state, _) = watch::channel(RequestState::Unset);

        let controller = Self {
            inner: Arc::new(Inner { client, settings, state, issued: AtomicU64::new(0) }),
        };

        // The initial fetch runs detached; observers pick it up via `subscribe`.
        drop(controller.reset_to_default());
        controller
    }

    /// Build the weatherapi.com client described by `config` and start it.
    pub fn from_config(config: &Config) -> Self {
        Self::new(client_from_config(config), ControllerSettings::from(config))
    }

    /// Fetch weather for `city`, or the default city when `city` is empty.
    ///
    /// The state is `Loading` by the time this returns. The returned handle
    /// completes after the result has been published; dropping it is fine.
    pub fn request_city(&self, city: &str) -> JoinHandle<()> {
        let query = WeatherQuery::new(city);
        let city = query.resolve(&self.inner.settings.default_city).to_owned();
        self.start(city)
    }

    pub fn reset_to_default(&self) -> JoinHandle<()> {
        self.start(self.inner.settings.default_city.clone())
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RequestState {
        self.inner.state.borrow().clone()
    }

    /// Push-based view of the state; the receiver sees every value that is
    /// current when it checks, not necessarily every intermediate one.
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.inner.state.subscribe()
    }

    /// Wait until the state is `Success` or `Error`, and return it.
    pub async fn settled(&self) -> RequestState {
        let mut rx = self.subscribe();
        if let Ok(state) = rx.wait_for(RequestState::is_settled).await {
            return state.clone();
        }
        // The sender lives in `self`, so the channel cannot close while we wait.
        self.state()
    }

    fn start(&self, city: String) -> JoinHandle<()> {
        let ticket = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_replace(RequestState::Loading);
        debug!(city = %city, ticket, "weather request issued");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let next = match inner.client.fetch_weather(&inner.settings.api_key, &city).await {
                Ok(model) => RequestState::Success(model),
                Err(err) => {
                    warn!(city = %city, ticket, error = %err, "weather request failed");
                    RequestState::Error(err.to_string())
                }
            };
            inner.publish(ticket, next);
        })
    }
}

impl Inner {
    fn publish(&self, ticket: u64, next: RequestState) {
        match self.settings.completion_order {
            CompletionOrder::LastCompletionWins => {
                self.state.send_replace(next);
            }
            CompletionOrder::LastIssuedWins => {
                // Checked under the channel's write lock so a newer `Loading`
                // can't slip in between the check and the write.
                let published = self.state.send_if_modified(|state| {
                    if self.issued.load(Ordering::SeqCst) != ticket {
                        return false;
                    }
                    *state = next;
                    true
                });
                if !published {
                    debug!(ticket, "discarding stale weather result");
                }
            }
        }
    }
}
