use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::media::{MediaId, MediaKey, MediaKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Closed,
    Open { id: MediaId, kind: MediaKind },
}

impl Selection {
    pub fn is_open(&self) -> bool {
        matches!(self, Selection::Open { .. })
    }

    pub fn key(&self) -> Option<MediaKey> {
        match *self {
            Selection::Open { id, kind } => Some(MediaKey::new(kind, id)),
            Selection::Closed => None,
        }
    }
}

/// Blocks scrolling of the page underneath the modal.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    engaged: Arc<AtomicBool>,
}

impl ScrollLock {
    pub fn acquire(&self) -> ScrollGuard {
        self.engaged.store(true, Ordering::SeqCst);
        ScrollGuard {
            engaged: Arc::clone(&self.engaged),
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct ScrollGuard {
    engaged: Arc<AtomicBool>,
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        self.engaged.store(false, Ordering::SeqCst);
    }
}

/// Which title the detail modal shows.
///
/// Mutated only through [`SelectionStore::open`] and [`SelectionStore::close`];
/// the scroll lock is held exactly while the selection is open.
#[derive(Debug)]
pub struct SelectionStore {
    state: watch::Sender<Selection>,
    lock: ScrollLock,
    guard: Option<ScrollGuard>,
}

impl SelectionStore {
    pub fn new(lock: ScrollLock) -> Self {
        let (state, _) = watch::channel(Selection::Closed);
        Self {
            state,
            lock,
            guard: None,
        }
    }

    /// Replaces any open selection.
    pub fn open(&mut self, id: MediaId, kind: MediaKind) {
        self.state.send_replace(Selection::Open { id, kind });
        if self.guard.is_none() {
            self.guard = Some(self.lock.acquire());
        }
        tracing::debug!(id, %kind, "selection opened");
    }

    pub fn close(&mut self) {
        let previous = self.state.send_replace(Selection::Closed);
        self.guard = None;
        if previous.is_open() {
            tracing::debug!("selection closed");
        }
    }

    pub fn current(&self) -> Selection {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.state.subscribe()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.lock.is_engaged()
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new(ScrollLock::default())
    }
}
