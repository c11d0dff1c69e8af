//! Periodic refresh of the open conversation thread.
//!
//! # States
//!
//! ```text
//! Closed --open(t)--> Open{t} --open(u)--> Open{u}   (previous timer torn down)
//!    ^                   |
//!    +------close()------+
//! ```
//!
//! Every fetch is tagged with the transaction id and the open generation it
//! was issued for. A result whose tag no longer matches the active thread is
//! dropped, so a slow response for an old thread never overwrites a new one.

use crate::context::notification_for;
use market_core::gateway::MessageGateway;
use market_core::message::{Message, NewMessage};
use market_core::notification::{Notification, Notifier};
use market_core::{MarketError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Closed,
    Open { transaction_id: i64 },
}

/// The rendered thread: the backend's list, in the backend's order.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadSnapshot {
    pub transaction_id: i64,
    pub messages: Vec<Message>,
}

struct ActiveThread {
    transaction_id: i64,
    viewer: String,
    generation: u64,
}

struct Timer {
    token: CancellationToken,
    #[allow(dead_code)]
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Inner {
    active: Option<ActiveThread>,
    generation: u64,
    timer: Option<Timer>,
}

struct Shared {
    gateway: Arc<dyn MessageGateway>,
    notifier: Arc<dyn Notifier>,
    period: Duration,
    inner: Mutex<Inner>,
    thread: watch::Sender<Option<ThreadSnapshot>>,
    live_timers: Arc<AtomicUsize>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The viewer for `(transaction_id, generation)` if that thread is still active.
    fn viewer_for(&self, transaction_id: i64, generation: u64) -> Option<String> {
        let inner = self.lock();
        inner
            .active
            .as_ref()
            .filter(|a| a.transaction_id == transaction_id && a.generation == generation)
            .map(|a| a.viewer.clone())
    }

    /// Fetches the thread and publishes it if the tag still matches.
    ///
    /// Failures are logged and leave the published thread unchanged.
    async fn refresh(&self, transaction_id: i64, generation: u64) -> bool {
        let Some(viewer) = self.viewer_for(transaction_id, generation) else {
            return false;
        };

        let messages = match self.gateway.list_messages(&viewer, transaction_id).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!(
                    "[MessagePoller] Refresh of transaction {} failed: {}",
                    transaction_id,
                    e
                );
                return false;
            }
        };

        // Checked and published under one lock; close() publishes under it too.
        let inner = self.lock();
        let current = inner
            .active
            .as_ref()
            .is_some_and(|a| a.transaction_id == transaction_id && a.generation == generation);
        if !current {
            tracing::debug!(
                "[MessagePoller] Discarding stale thread for transaction {} (generation {})",
                transaction_id,
                generation
            );
            return false;
        }

        self.thread.send_replace(Some(ThreadSnapshot {
            transaction_id,
            messages,
        }));
        drop(inner);
        true
    }

    fn cancel_timer(inner: &mut Inner) {
        if let Some(timer) = inner.timer.take() {
            timer.token.cancel();
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(|e| e.into_inner());
        Shared::cancel_timer(inner);
    }
}

/// Keeps one conversation thread fresh while it is open.
///
/// Clones share the same state. At most one timer is live at any time.
#[derive(Clone)]
pub struct MessagePoller {
    shared: Arc<Shared>,
}

impl MessagePoller {
    pub fn new(
        gateway: Arc<dyn MessageGateway>,
        notifier: Arc<dyn Notifier>,
        period: Duration,
    ) -> Self {
        let (thread, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                gateway,
                notifier,
                period,
                inner: Mutex::new(Inner::default()),
                thread,
                live_timers: Arc::new(AtomicUsize::new(0)),
            }),
        }
    }

    pub fn state(&self) -> PollerState {
        match &self.shared.lock().active {
            Some(active) => PollerState::Open {
                transaction_id: active.transaction_id,
            },
            None => PollerState::Closed,
        }
    }

    /// The most recently published thread.
    pub fn thread(&self) -> Option<ThreadSnapshot> {
        self.shared.thread.borrow().clone()
    }

    /// Receives every published thread (last write wins).
    pub fn subscribe(&self) -> watch::Receiver<Option<ThreadSnapshot>> {
        self.shared.thread.subscribe()
    }

    /// Number of timer tasks still running.
    pub fn live_timer_count(&self) -> usize {
        self.shared.live_timers.load(Ordering::SeqCst)
    }

    /// Opens the thread of `transaction_id` as seen by `viewer`.
    ///
    /// Any previous thread is closed first. The thread is fetched once
    /// immediately, then every poll period.
    pub async fn open(&self, transaction_id: i64, viewer: impl Into<String>) {
        self.close();

        let generation = {
            let mut inner = self.shared.lock();
            inner.generation += 1;
            inner.active = Some(ActiveThread {
                transaction_id,
                viewer: viewer.into(),
                generation: inner.generation,
            });
            inner.generation
        };
        tracing::debug!(
            "[MessagePoller] Opened transaction {} (generation {})",
            transaction_id,
            generation
        );

        self.shared.refresh(transaction_id, generation).await;

        let timer = self.spawn_timer(transaction_id, generation);
        let mut inner = self.shared.lock();
        if inner.generation == generation && inner.active.is_some() {
            inner.timer = Some(timer);
        } else {
            // Closed or reopened while the first fetch was in flight.
            timer.token.cancel();
        }
    }

    /// Refetches the active thread now. Does nothing when closed.
    pub async fn tick(&self) {
        let tag = {
            let inner = self.shared.lock();
            inner
                .active
                .as_ref()
                .map(|a| (a.transaction_id, a.generation))
        };
        if let Some((transaction_id, generation)) = tag {
            self.shared.refresh(transaction_id, generation).await;
        }
    }

    /// Stops polling and clears the active thread. Idempotent.
    pub fn close(&self) {
        let mut inner = self.shared.lock();
        if let Some(active) = inner.active.take() {
            tracing::debug!("[MessagePoller] Closed transaction {}", active.transaction_id);
        }
        inner.generation += 1;
        Shared::cancel_timer(&mut inner);
        self.shared.thread.send_replace(None);
    }

    /// Sends `input` to the active thread, then refreshes it.
    ///
    /// Blank input is rejected without a request. On success `input` is
    /// cleared; on failure it is left as typed. Failures are notified before
    /// being returned.
    pub async fn send(&self, input: &mut String) -> Result<()> {
        let content = input.trim().to_string();
        if content.is_empty() {
            let err = MarketError::validation("Please enter a message");
            self.shared.notifier.notify(notification_for("Send message", &err));
            return Err(err);
        }

        let active = {
            let inner = self.shared.lock();
            inner
                .active
                .as_ref()
                .map(|a| (a.transaction_id, a.generation, a.viewer.clone()))
        };
        let Some((transaction_id, generation, viewer)) = active else {
            let err = MarketError::validation("No conversation is open");
            self.shared.notifier.notify(notification_for("Send message", &err));
            return Err(err);
        };

        let message = NewMessage {
            transaction_id,
            content,
        };
        if let Err(err) = self.shared.gateway.send_message(&viewer, &message).await {
            self.shared.notifier.notify(notification_for("Send message", &err));
            return Err(err);
        }

        input.clear();
        self.shared.notifier.notify(Notification::success("Message sent"));
        self.shared.refresh(transaction_id, generation).await;
        Ok(())
    }

    fn spawn_timer(&self, transaction_id: i64, generation: u64) -> Timer {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        let period = self.shared.period;
        let live_timers = self.shared.live_timers.clone();

        live_timers.fetch_add(1, Ordering::SeqCst);
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(shared) = shared.upgrade() else { break };
                        shared.refresh(transaction_id, generation).await;
                    }
                }
            }

            live_timers.fetch_sub(1, Ordering::SeqCst);
            tracing::debug!("[MessagePoller] Timer for transaction {} stopped", transaction_id);
        });

        Timer { token, handle }
    }
}
