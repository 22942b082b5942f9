//! Cancellable countdown timer for rest periods.
//!
//! The countdown runs on its own worker thread, but it never touches
//! shared state: every observable event is posted to an mpsc channel and
//! drained by the controlling thread. Ticks arrive once per elapsed
//! second as `(remaining, running=true)`; a terminal `(0, running=false)`
//! event is delivered exactly once per countdown, whether it reaches zero
//! naturally or is stopped.
//!
//! Each `start` bumps a generation counter stamped on every event, so a
//! consumer can discard stale events that belong to a countdown that was
//! stopped or replaced.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Pause/stop flags are polled at this interval; observable tick
/// granularity stays whole seconds.
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const SLICES_PER_SECOND: u32 = 10;

/// One observable timer event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerEvent {
    pub remaining: u32,
    /// False only on the terminal event
    pub running: bool,
    /// Countdown instance this event belongs to
    pub generation: u64,
}

impl TimerEvent {
    pub fn is_terminal(&self) -> bool {
        !self.running
    }
}

struct Shared {
    running: AtomicBool,
    paused: AtomicBool,
    generation: AtomicU64,
}

/// Countdown timer with pause/resume/stop semantics.
///
/// At most one countdown is active at a time; a re-entrant `start`
/// implicitly stops (and fully quiesces) the previous one.
pub struct CountdownTimer {
    tx: Sender<TimerEvent>,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    pub fn new(tx: Sender<TimerEvent>) -> Self {
        Self {
            tx,
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                paused: AtomicBool::new(false),
                generation: AtomicU64::new(0),
            }),
            handle: None,
        }
    }

    /// Begin a countdown of `seconds`, stopping any prior countdown first.
    pub fn start(&mut self, seconds: u32) {
        self.stop();

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.paused.store(false, Ordering::SeqCst);
        self.shared.running.store(true, Ordering::SeqCst);

        let shared = Arc::clone(&self.shared);
        let tx = self.tx.clone();
        self.handle = Some(thread::spawn(move || {
            run_countdown(&shared, &tx, seconds, generation);
        }));

        tracing::debug!("Started countdown of {}s (generation {})", seconds, generation);
    }

    /// Halt decrementing without resetting remaining time
    pub fn pause(&self) {
        if self.shared.running.load(Ordering::SeqCst) {
            self.shared.paused.store(true, Ordering::SeqCst);
        }
    }

    /// Resume decrementing after a pause
    pub fn resume(&self) {
        self.shared.paused.store(false, Ordering::SeqCst);
    }

    /// Terminate immediately.
    ///
    /// The worker is joined before the terminal event is posted, so once
    /// this returns no further tick can arrive for the stopped countdown
    /// and a new countdown may start without overlap.
    pub fn stop(&mut self) {
        let generation = self.shared.generation.load(Ordering::SeqCst);
        let was_running = self
            .shared
            .running
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.shared.paused.store(false, Ordering::SeqCst);

        // The CAS decides who delivers the terminal event: if the worker
        // already reached zero it has sent it, otherwise we do.
        if was_running {
            let _ = self.tx.send(TimerEvent {
                remaining: 0,
                running: false,
                generation,
            });
            tracing::debug!("Stopped countdown (generation {})", generation);
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    /// Generation of the most recently started countdown
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_countdown(shared: &Shared, tx: &Sender<TimerEvent>, seconds: u32, generation: u64) {
    let still_current = || {
        shared.running.load(Ordering::SeqCst) && shared.generation.load(Ordering::SeqCst) == generation
    };

    let mut remaining = seconds;
    'countdown: while remaining > 0 {
        // One whole second in poll-sized slices; paused slices don't count
        let mut slices = 0;
        while slices < SLICES_PER_SECOND {
            if !still_current() {
                break 'countdown;
            }
            thread::sleep(POLL_INTERVAL);
            if !shared.paused.load(Ordering::SeqCst) {
                slices += 1;
            }
        }

        if !still_current() {
            break;
        }
        remaining -= 1;
        let _ = tx.send(TimerEvent {
            remaining,
            running: true,
            generation,
        });
    }

    // Natural completion: win the CAS against stop() to deliver the
    // terminal event exactly once.
    if shared.generation.load(Ordering::SeqCst) == generation
        && shared
            .running
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    {
        let _ = tx.send(TimerEvent {
            remaining: 0,
            running: false,
            generation,
        });
    }
}
