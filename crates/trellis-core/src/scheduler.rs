//! Invalidation scheduling for the layout pipeline.
//!
//! Tracks suspension depth, the pending resize kind, and the deferred
//! barrier raised when fresh content arrives, so that bursts of mutations
//! collapse into a single pass and re-entrant invalidations cannot run a
//! second pass inside the first.

use std::sync::atomic::{AtomicU64, Ordering};

/// Which axes a relayout must recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeKind {
    /// Horizontal geometry only.
    Width,
    /// Vertical geometry only.
    Height,
    /// Both axes.
    Both,
}

impl ResizeKind {
    /// Merge two requests; differing single axes widen to `Both`.
    pub fn union(self, other: Self) -> Self {
        if self == other { self } else { Self::Both }
    }

    /// True if this kind touches horizontal geometry.
    pub fn covers_width(self) -> bool {
        matches!(self, Self::Width | Self::Both)
    }

    /// True if this kind touches vertical geometry.
    pub fn covers_height(self) -> bool {
        matches!(self, Self::Height | Self::Both)
    }
}

/// What the scheduler decided to do with an invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// Run a pass now with the given kind.
    Run(ResizeKind),
    /// Fresh content is pending; the pass runs on the next tick.
    Deferred,
    /// Layout is suspended; the request was merged into the pending kind.
    Parked,
}

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// A process-unique pass token. Every grid a pass reaches records the
/// token, so re-entrant invalidations inside the same pass are absorbed
/// instead of recursing.
pub(crate) fn next_token() -> u64 {
    NEXT_TOKEN.fetch_add(1, Ordering::Relaxed)
}

/// Per-grid invalidation state machine.
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    suspend_count: u32,
    pending: Option<ResizeKind>,
    /// Raised when content was added since the last pass; the pass waits
    /// for an explicit tick so a burst of additions costs one layout.
    deferred: bool,
    new_content: bool,
    layout_valid: bool,
    current_token: Option<u64>,
}

impl Scheduler {
    pub fn is_suspended(&self) -> bool {
        self.suspend_count > 0
    }

    pub fn layout_valid(&self) -> bool {
        self.layout_valid
    }

    pub fn suspend(&mut self) {
        self.suspend_count += 1;
    }

    /// Drop one suspension level. Returns the merged pending kind when the
    /// last level is released and work accumulated while suspended.
    pub fn resume(&mut self) -> Option<ResizeKind> {
        if self.suspend_count == 0 {
            return None;
        }
        self.suspend_count -= 1;
        if self.suspend_count == 0 {
            self.pending.take()
        } else {
            None
        }
    }

    /// Note that content was added; the next invalidation defers until a
    /// tick instead of running immediately.
    pub fn note_new_content(&mut self) {
        self.new_content = true;
    }

    /// Record an invalidation and decide whether a pass may run now.
    pub fn invalidate(&mut self, kind: ResizeKind) -> Action {
        self.layout_valid = false;
        if self.suspend_count > 0 {
            self.merge(kind);
            return Action::Parked;
        }
        if self.deferred {
            self.merge(kind);
            return Action::Deferred;
        }
        if self.new_content {
            self.deferred = true;
            self.merge(kind);
            return Action::Deferred;
        }
        Action::Run(kind)
    }

    /// True if a deferred pass is waiting and nothing suspends it.
    pub fn needs_tick(&self) -> bool {
        self.deferred && self.suspend_count == 0
    }

    /// Take the deferred work, if any, clearing the barrier.
    pub fn take_tick(&mut self) -> Option<ResizeKind> {
        if !self.needs_tick() {
            return None;
        }
        self.deferred = false;
        self.new_content = false;
        Some(self.pending.take().unwrap_or(ResizeKind::Both))
    }

    /// Record the pass token; returns false if this grid already ran under
    /// the token, in which case the caller must not re-enter.
    pub fn begin_pass(&mut self, token: u64) -> bool {
        if self.current_token == Some(token) {
            return false;
        }
        self.current_token = Some(token);
        true
    }

    /// A pass completed: clear all accumulated state and mark the layout
    /// valid.
    pub fn absorb_pass(&mut self) {
        self.deferred = false;
        self.new_content = false;
        self.pending = None;
        self.layout_valid = true;
    }

    /// Mark the layout stale without scheduling anything, e.g. when the
    /// outer size changed under us.
    pub fn mark_stale(&mut self) {
        self.layout_valid = false;
    }

    pub fn merge(&mut self, kind: ResizeKind) {
        self.pending = Some(match self.pending {
            Some(p) => p.union(kind),
            None => kind,
        });
    }
}
