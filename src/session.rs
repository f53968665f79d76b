//! Per-user session coordination.
//!
//! A [`UserSession`] owns everything that lives and dies with a login:
//! the timer engine, the chat transcript, and the single ticker task that
//! drives the countdown. The [`SessionRegistry`] creates sessions lazily
//! per authenticated user and tears them down at logout.
//!
//! Invariant: at most one ticker task per session. The handle is owned
//! exclusively here; every transition that stops the clock also aborts the
//! task, and the task exits on its own at a zero-crossing. A leaked second
//! ticker would double-decrement the countdown.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::chat::GREETING;
use crate::models::ChatMessage;
use crate::timer::{TimerEngine, TimerEvent, TimerSnapshot};

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// All live sessions, keyed by user id.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<Uuid, Arc<UserSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session for this user, created on first touch.
    pub fn session_for(&self, user_id: Uuid) -> Arc<UserSession> {
        let mut sessions = self.inner.lock().expect("session registry lock poisoned");
        Arc::clone(
            sessions
                .entry(user_id)
                .or_insert_with(|| Arc::new(UserSession::new(user_id))),
        )
    }

    /// Tear down a user's session: ticker aborted, timer and transcript
    /// discarded. Notes are durable and unaffected.
    pub fn end_session(&self, user_id: Uuid) {
        let removed = {
            let mut sessions = self.inner.lock().expect("session registry lock poisoned");
            sessions.remove(&user_id)
        };
        if let Some(session) = removed {
            session.stop_ticker();
            tracing::debug!(user_id = %user_id, "session ended");
        }
    }
}

/// In-memory state for one logged-in user.
pub struct UserSession {
    user_id: Uuid,
    // Shared with the ticker task, which holds its own clone.
    timer: Arc<Mutex<TimerEngine>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    transcript: Mutex<Vec<ChatMessage>>,
    events: broadcast::Sender<TimerEvent>,
}

impl UserSession {
    fn new(user_id: Uuid) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            user_id,
            timer: Arc::new(Mutex::new(TimerEngine::new())),
            ticker: Mutex::new(None),
            transcript: Mutex::new(vec![ChatMessage::from_bot(GREETING)]),
            events,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn timer_snapshot(&self) -> TimerSnapshot {
        self.timer.lock().expect("timer lock poisoned").snapshot()
    }

    /// Mode-transition notifications for this session.
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    /// Start the countdown and make sure exactly one ticker is driving it.
    /// No-op when already running.
    pub fn start_timer(&self) -> TimerSnapshot {
        {
            let mut engine = self.timer.lock().expect("timer lock poisoned");
            if engine.is_running() {
                return engine.snapshot();
            }
            engine.start();
        }

        let mut ticker = self.ticker.lock().expect("ticker lock poisoned");
        if ticker.as_ref().map_or(true, |h| h.is_finished()) {
            *ticker = Some(self.spawn_ticker());
        }

        self.timer_snapshot()
    }

    pub fn pause_timer(&self) -> TimerSnapshot {
        // Engine first: an in-flight tick then sees a paused engine and
        // does nothing, even before the abort lands.
        self.timer.lock().expect("timer lock poisoned").pause();
        self.stop_ticker();
        self.timer_snapshot()
    }

    pub fn reset_timer(&self) -> TimerSnapshot {
        self.timer.lock().expect("timer lock poisoned").reset();
        self.stop_ticker();
        self.timer_snapshot()
    }

    pub fn skip_timer(&self) -> TimerSnapshot {
        self.timer.lock().expect("timer lock poisoned").skip();
        self.stop_ticker();
        self.timer_snapshot()
    }

    pub fn configure_timer(
        &self,
        study_minutes: Option<u32>,
        break_minutes: Option<u32>,
    ) -> TimerSnapshot {
        let mut engine = self.timer.lock().expect("timer lock poisoned");
        if let Some(minutes) = study_minutes {
            engine.configure_study(minutes);
        }
        if let Some(minutes) = break_minutes {
            engine.configure_break(minutes);
        }
        engine.snapshot()
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript
            .lock()
            .expect("transcript lock poisoned")
            .clone()
    }

    pub fn push_message(&self, message: ChatMessage) {
        self.transcript
            .lock()
            .expect("transcript lock poisoned")
            .push(message);
    }

    fn stop_ticker(&self) {
        if let Some(handle) = self
            .ticker
            .lock()
            .expect("ticker lock poisoned")
            .take()
        {
            handle.abort();
        }
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let timer = Arc::clone(&self.timer);
        let events = self.events.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of an interval completes immediately.
            interval.tick().await;

            loop {
                interval.tick().await;
                let (event, still_running) = {
                    let mut engine = timer.lock().expect("timer lock poisoned");
                    let event = engine.tick();
                    (event, engine.is_running())
                };
                if let Some(event) = event {
                    // No receivers is fine; nobody has to be listening.
                    let _ = events.send(event);
                }
                if !still_running {
                    break;
                }
            }
        })
    }
}
