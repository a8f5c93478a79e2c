//! Run Flags and Cancellation
//!
//! Every [`Scheduler`](crate::Scheduler) owns one `RunFlags`. Cancellation is
//! cooperative: `cancel()` only raises a flag, and the run observes it at its next
//! checkpoint, after whatever hook or measured call is in flight returns.
//!
//! `clear()` bumps the epoch. A run started under an older epoch treats that as an
//! abort and leaves the flags alone when it unwinds, so it cannot clobber a newer run.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, AtomicUsize, Ordering};

/// Stage of the run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// No run in flight
    Idle = 0,
    /// `before_all` hook
    GlobalSetup = 1,
    /// A case's `before` hook
    Before = 2,
    /// Untimed warm-up iterations
    PreMeasuring = 3,
    /// Inter-phase pause
    Settling = 4,
    /// Timed iterations
    Measuring = 5,
    /// Final mean being reported
    Cycle = 6,
    /// A case's `after` hook
    After = 7,
    /// `after_all` hook
    GlobalTeardown = 8,
    /// Abort observed, unwinding through `after`
    Aborting = 9,
}

impl Phase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Phase::GlobalSetup,
            2 => Phase::Before,
            3 => Phase::PreMeasuring,
            4 => Phase::Settling,
            5 => Phase::Measuring,
            6 => Phase::Cycle,
            7 => Phase::After,
            8 => Phase::GlobalTeardown,
            9 => Phase::Aborting,
            _ => Phase::Idle,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::GlobalSetup => "global-setup",
            Phase::Before => "before",
            Phase::PreMeasuring => "pre-measuring",
            Phase::Settling => "settling",
            Phase::Measuring => "measuring",
            Phase::Cycle => "cycle",
            Phase::After => "after",
            Phase::GlobalTeardown => "global-teardown",
            Phase::Aborting => "aborting",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
pub(crate) struct RunFlags {
    running: AtomicBool,
    aborted: AtomicBool,
    epoch: AtomicU64,
    phase: AtomicU8,
    current_index: AtomicUsize,
}

impl RunFlags {
    /// Claim the run slot. Returns the epoch the run belongs to, or `None` if a run
    /// is already in flight.
    pub(crate) fn try_start(&self) -> Option<u64> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        self.aborted.store(false, Ordering::SeqCst);
        self.current_index.store(0, Ordering::SeqCst);
        Some(self.epoch.load(Ordering::SeqCst))
    }

    pub(crate) fn should_stop(&self, epoch: u64) -> bool {
        self.aborted.load(Ordering::SeqCst) || self.epoch.load(Ordering::SeqCst) != epoch
    }

    /// Release the run slot, unless `clear()` already reset it for a newer epoch.
    pub(crate) fn finish(&self, epoch: u64) {
        if self.epoch.load(Ordering::SeqCst) == epoch {
            self.phase.store(Phase::Idle as u8, Ordering::SeqCst);
            self.aborted.store(false, Ordering::SeqCst);
            self.running.store(false, Ordering::SeqCst);
        }
    }

    pub(crate) fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.phase.store(Phase::Idle as u8, Ordering::SeqCst);
        self.current_index.store(0, Ordering::SeqCst);
        self.aborted.store(false, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
    }

    pub(crate) fn cancel(&self) -> bool {
        if !self.running.load(Ordering::SeqCst) {
            return false;
        }
        self.aborted.store(true, Ordering::SeqCst);
        true
    }

    /// Publish phase progress, ignored once the run's epoch is stale.
    pub(crate) fn enter(&self, epoch: u64, phase: Phase) {
        if self.epoch.load(Ordering::SeqCst) == epoch {
            self.phase.store(phase as u8, Ordering::SeqCst);
        }
    }

    pub(crate) fn set_current_index(&self, epoch: u64, index: usize) {
        if self.epoch.load(Ordering::SeqCst) == epoch {
            self.current_index.store(index, Ordering::SeqCst);
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    pub(crate) fn current_index(&self) -> usize {
        self.current_index.load(Ordering::SeqCst)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

/// Cloneable handle for cancelling a scheduler's run from another task or a hook.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flags: Arc<RunFlags>,
}

impl CancelHandle {
    pub(crate) fn new(flags: Arc<RunFlags>) -> Self {
        Self { flags }
    }

    /// Request cancellation. Returns `false` (and does nothing) when no run is in flight.
    pub fn cancel(&self) -> bool {
        self.flags.cancel()
    }

    /// Whether a run is in flight
    pub fn is_running(&self) -> bool {
        self.flags.is_running()
    }

    /// Whether cancellation has been requested for the current run
    pub fn is_cancelled(&self) -> bool {
        self.flags.is_aborted()
    }
}
