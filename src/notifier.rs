use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// Where the surface anchors its toasts on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Severity of a transient message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// SurfaceOptions
///
/// Display contract of the notification surface. The defaults are the
/// portal's shipped configuration: top-right anchor, 3-second auto-dismiss,
/// newest message on top, click to dismiss, timers paused while hovered or
/// while the window loses focus, draggable, left-to-right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SurfaceOptions {
    pub position: Position,
    /// Milliseconds a toast stays visible, hover/focus holds excluded.
    pub auto_dismiss_ms: i64,
    pub newest_on_top: bool,
    pub dismiss_on_click: bool,
    pub pause_on_hover: bool,
    pub pause_on_focus_loss: bool,
    pub draggable: bool,
    pub rtl: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            position: Position::TopRight,
            auto_dismiss_ms: 3000,
            newest_on_top: true,
            dismiss_on_click: true,
            pause_on_hover: true,
            pause_on_focus_loss: true,
            draggable: true,
            rtl: false,
        }
    }
}

/// Toast
///
/// One transient message. The hold bookkeeping fields never leave the
/// process; clients only see identity, content and age.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Toast {
    pub id: Uuid,
    pub level: Level,
    pub message: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    /// Set while a hover/focus hold is active; an expiry check during a hold
    /// always answers "not expired".
    #[serde(skip)]
    held_since: Option<DateTime<Utc>>,
    /// Total milliseconds spent held so far; extends the dismiss deadline.
    #[serde(skip)]
    held_ms: i64,
}

impl Toast {
    fn new(level: Level, message: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message,
            created_at: now,
            held_since: None,
            held_ms: 0,
        }
    }

    /// A toast expires `auto_dismiss_ms` after creation, with every held
    /// interval pushing the deadline out by its length. A currently held
    /// toast never expires.
    fn is_expired(&self, now: DateTime<Utc>, auto_dismiss_ms: i64) -> bool {
        if self.held_since.is_some() {
            return false;
        }
        let visible_ms = (now - self.created_at).num_milliseconds() - self.held_ms;
        visible_ms >= auto_dismiss_ms
    }
}

/// NotificationSurface
///
/// Process-wide transient-message display. Owns its queue and its display
/// contract; knows nothing about routes, sessions or views. Storage order is
/// display order (front first), so `newest_on_top` is applied at push time.
pub struct NotificationSurface {
    opts: SurfaceOptions,
    toasts: VecDeque<Toast>,
}

/// Shared handle to the one surface instance, registered in the application
/// state alongside the repository.
pub type NotifierState = Arc<RwLock<NotificationSurface>>;

impl Default for NotificationSurface {
    fn default() -> Self {
        Self::new(SurfaceOptions::default())
    }
}

impl NotificationSurface {
    pub fn new(opts: SurfaceOptions) -> Self {
        Self {
            opts,
            toasts: VecDeque::new(),
        }
    }

    /// Wraps a surface in the shared-state handle used by the router.
    pub fn shared(opts: SurfaceOptions) -> NotifierState {
        Arc::new(RwLock::new(Self::new(opts)))
    }

    pub fn options(&self) -> &SurfaceOptions {
        &self.opts
    }

    /// Publishes a toast and returns a snapshot of it.
    pub fn push(&mut self, level: Level, message: impl Into<String>) -> Toast {
        let toast = Toast::new(level, message.into(), Utc::now());
        let snapshot = toast.clone();
        if self.opts.newest_on_top {
            self.toasts.push_front(toast);
        } else {
            self.toasts.push_back(toast);
        }
        snapshot
    }

    /// Drops every toast whose visible lifetime has elapsed.
    pub fn sweep(&mut self, now: DateTime<Utc>) {
        let auto_dismiss_ms = self.opts.auto_dismiss_ms;
        self.toasts
            .retain(|toast| !toast.is_expired(now, auto_dismiss_ms));
    }

    /// Current toasts in display order. Callers wanting expiry applied run
    /// `sweep` first; the two are split so a pure read stays a pure read.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.toasts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Click-dismissal. Refuses when the surface is configured without
    /// `dismiss_on_click`; otherwise removes the toast if present.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        if !self.opts.dismiss_on_click {
            return false;
        }
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() < before
    }

    /// Hover entered a toast: freeze its dismiss timer. No-op when the
    /// surface is configured without `pause_on_hover` or the toast is gone.
    pub fn hold(&mut self, id: Uuid, now: DateTime<Utc>) -> bool {
        if !self.opts.pause_on_hover {
            return false;
        }
        match self.toasts.iter_mut().find(|toast| toast.id == id) {
            Some(toast) => {
                toast.held_since.get_or_insert(now);
                true
            }
            None => false,
        }
    }

    /// Hover left a toast: bank the held interval into its deadline.
    pub fn release(&mut self, id: Uuid, now: DateTime<Utc>) -> bool {
        match self.toasts.iter_mut().find(|toast| toast.id == id) {
            Some(toast) => {
                if let Some(since) = toast.held_since.take() {
                    toast.held_ms += (now - since).num_milliseconds();
                }
                true
            }
            None => false,
        }
    }

    /// Window focus lost: freeze every timer. Gated on `pause_on_focus_loss`.
    pub fn hold_all(&mut self, now: DateTime<Utc>) -> bool {
        if !self.opts.pause_on_focus_loss {
            return false;
        }
        for toast in self.toasts.iter_mut() {
            toast.held_since.get_or_insert(now);
        }
        true
    }

    /// Window focus regained: resume every timer.
    pub fn release_all(&mut self, now: DateTime<Utc>) {
        for toast in self.toasts.iter_mut() {
            if let Some(since) = toast.held_since.take() {
                toast.held_ms += (now - since).num_milliseconds();
            }
        }
    }
}
