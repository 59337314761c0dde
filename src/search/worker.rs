use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tracing::trace;

use crate::{
    search::{
        engine::Shared,
        path::Path,
        statistics::Statistics,
        sync::{Cmd, Poisoned},
    },
    space::{Space, SpaceStatus},
};

/// Backoff after a full steal sweep found nothing.
const STEAL_BACKOFF: Duration = Duration::from_millis(10);

/// State a worker mutates only under its own mutex.
struct Local<S: Space> {
    path: Path<S>,
    cur: Option<S>,
    /// Nodes descended since the last snapshot.
    d: u32,
}

/// One depth-first search worker.
///
/// The mutex guards the path and the exploration state; peers take it in
/// [`steal`](Worker::steal). The counters are relaxed atomics so the engine
/// can read statistics without locking. `idle` is readable lock-free as a
/// quick pre-check for thieves, and is only ever written by the owner while
/// holding the mutex.
pub(crate) struct Worker<S: Space> {
    index: usize,
    local: Mutex<Local<S>>,
    idle: AtomicBool,
    nodes: AtomicU64,
    failures: AtomicU64,
    propagations: AtomicU64,
    steals: AtomicU64,
    peak_depth: AtomicUsize,
    frames: AtomicUsize,
}

/// Registers termination with the engine when the worker's thread exits,
/// even if user space code panicked mid-step.
struct Terminated<'a, S: Space> {
    shared: &'a Shared<S>,
    index: usize,
}

impl<S: Space> Drop for Terminated<'_, S> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.shared.poison();
        }
        trace!(worker = self.index, "worker terminated");
        self.shared.terminated();
    }
}

impl<S: Space> Worker<S> {
    pub(crate) fn new(index: usize, root: Option<S>) -> Self {
        Self {
            index,
            local: Mutex::new(Local {
                path: Path::new(),
                cur: root,
                d: 0,
            }),
            idle: AtomicBool::new(false),
            nodes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            propagations: AtomicU64::new(0),
            steals: AtomicU64::new(0),
            peak_depth: AtomicUsize::new(0),
            frames: AtomicUsize::new(0),
        }
    }

    /// The worker's thread body: dispatch on the engine's current command
    /// until told to terminate.
    pub(crate) fn run(shared: &Shared<S>, index: usize) {
        let _done = Terminated { shared, index };
        let me = &shared.workers[index];
        loop {
            match shared.gate.current() {
                Cmd::Wait => {
                    if shared.gate.hold().is_err() {
                        shared.poison();
                        return;
                    }
                }
                Cmd::Terminate => return,
                Cmd::Work => {
                    if me.step(shared).is_err() {
                        shared.poison();
                        return;
                    }
                }
            }
        }
    }

    /// Best-effort snapshot of this worker's counters.
    pub(crate) fn statistics(&self) -> Statistics {
        Statistics {
            nodes: self.nodes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            propagations: self.propagations.load(Ordering::Relaxed),
            steals: self.steals.load(Ordering::Relaxed),
            peak_depth: self.peak_depth.load(Ordering::Relaxed),
            frames: self.frames.load(Ordering::Relaxed),
        }
    }

    /// Hands over some work to a peer, if any is available.
    ///
    /// Called by other workers' threads.
    pub(crate) fn steal(&self, shared: &Shared<S>) -> Option<S> {
        // A quick unlocked check: if the victim is idle there is nothing to
        // take, and if that changes it will be asked again eventually.
        if self.idle.load(Ordering::Acquire) {
            return None;
        }
        let mut local = self.local.lock().ok()?;
        let space = local.path.steal();
        if space.is_some() {
            // The busy count must rise before the victim can observe an
            // empty path, so the report happens while the victim's mutex is
            // still held.
            shared.busy().ok()?;
        }
        drop(local);
        space
    }

    /// One iteration of the WORK state.
    fn step(&self, shared: &Shared<S>) -> Result<(), Poisoned> {
        if self.idle.load(Ordering::Acquire) {
            self.find(shared);
            return Ok(());
        }
        let mut local = self.local.lock().map_err(|_| Poisoned)?;
        if local.cur.is_some() {
            if shared.should_stop(&self.statistics(), local.path.len()) {
                drop(local);
                return shared.stop();
            }
            let Some(mut cur) = local.cur.take() else {
                return Ok(());
            };
            // Propagation runs with the mutex released: peers may steal from
            // the path while status() is in flight.
            drop(local);
            self.nodes.fetch_add(1, Ordering::Relaxed);
            let mut delta = Statistics::default();
            let status = cur.status(&mut delta);
            self.propagations
                .fetch_add(delta.propagations, Ordering::Relaxed);
            match status {
                SpaceStatus::Failed => {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                }
                SpaceStatus::Solved => {
                    let solution = cur.clone_space(false);
                    drop(cur);
                    shared.solution(solution)?;
                }
                SpaceStatus::Branch => {
                    let mut local = self.local.lock().map_err(|_| Poisoned)?;
                    let snapshot = if local.d == 0 || local.d >= shared.options.commit_distance {
                        local.d = 1;
                        Some(cur.clone_space(true))
                    } else {
                        local.d += 1;
                        None
                    };
                    let desc = local.path.push(&mut cur, snapshot);
                    cur.commit(desc, 0);
                    local.cur = Some(cur);
                    let depth = local.path.len();
                    self.frames.store(depth, Ordering::Relaxed);
                    self.peak_depth.fetch_max(depth, Ordering::Relaxed);
                }
            }
        } else if !local.path.next() {
            debug_assert!(local.path.is_empty());
            self.frames.store(0, Ordering::Relaxed);
            self.idle.store(true, Ordering::Release);
            drop(local);
            shared.idle()?;
        } else {
            let Local { path, cur, d } = &mut *local;
            *cur = path.recompute(d, shared.options.adapt_distance);
            self.frames.store(path.len(), Ordering::Relaxed);
        }
        Ok(())
    }

    /// Sweeps the other workers for stealable work.
    ///
    /// On success the stolen space becomes the new root of this worker's
    /// (empty) path, so the clone distance restarts at 0 and the first push
    /// snapshots it. An unsuccessful full sweep backs off briefly; the run
    /// loop re-enters under WORK.
    fn find(&self, shared: &Shared<S>) {
        for (i, peer) in shared.workers.iter().enumerate() {
            if i == self.index {
                continue;
            }
            if let Some(space) = peer.steal(shared) {
                self.steals.fetch_add(1, Ordering::Relaxed);
                trace!(thief = self.index, victim = i, "stole a subtree");
                if let Ok(mut local) = self.local.lock() {
                    local.cur = Some(space);
                    local.d = 0;
                    self.idle.store(false, Ordering::Release);
                }
                return;
            }
        }
        thread::sleep(STEAL_BACKOFF);
    }
}
