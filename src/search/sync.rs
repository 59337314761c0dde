use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Condvar, Mutex};

/// Raised when an engine lock was poisoned by a panicking thread.
///
/// The engine treats this as fatal: the caller observes a poisoned engine as
/// `next() == None` with `stopped() == true`, and workers exit their loop.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Poisoned;

/// Commands broadcast from the engine to its workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cmd {
    /// Explore, steal, or report idle.
    Work,
    /// Park on the command gate.
    Wait,
    /// Exit the worker loop.
    Terminate,
}

const CMD_WORK: u8 = 0;
const CMD_WAIT: u8 = 1;
const CMD_TERMINATE: u8 = 2;

impl Cmd {
    fn as_u8(self) -> u8 {
        match self {
            Cmd::Work => CMD_WORK,
            Cmd::Wait => CMD_WAIT,
            Cmd::Terminate => CMD_TERMINATE,
        }
    }

    fn from_u8(raw: u8) -> Cmd {
        match raw {
            CMD_WORK => Cmd::Work,
            CMD_TERMINATE => Cmd::Terminate,
            _ => Cmd::Wait,
        }
    }
}

/// The engine-to-worker command channel.
///
/// Workers read the current command lock-free on every loop iteration; while
/// the command is `Wait` they park in [`hold`](CmdGate::hold) until the
/// engine publishes the next command. Transitions are stored under the gate
/// mutex so a parking worker cannot miss a wakeup, which preserves the
/// invariant that a published `Wait` actually parks every worker at its next
/// command check.
pub(crate) struct CmdGate {
    cmd: AtomicU8,
    lock: Mutex<()>,
    unblocked: Condvar,
}

impl CmdGate {
    /// A new gate starts out blocking: the initial command is `Wait`.
    pub(crate) fn new() -> Self {
        Self {
            cmd: AtomicU8::new(CMD_WAIT),
            lock: Mutex::new(()),
            unblocked: Condvar::new(),
        }
    }

    pub(crate) fn current(&self) -> Cmd {
        Cmd::from_u8(self.cmd.load(Ordering::Acquire))
    }

    /// Parks all workers at their next command check.
    pub(crate) fn block(&self) -> Result<(), Poisoned> {
        let _gate = self.lock.lock().map_err(|_| Poisoned)?;
        self.cmd.store(CMD_WAIT, Ordering::Release);
        Ok(())
    }

    /// Publishes `cmd` and wakes every parked worker.
    pub(crate) fn release(&self, cmd: Cmd) -> Result<(), Poisoned> {
        let _gate = self.lock.lock().map_err(|_| Poisoned)?;
        self.cmd.store(cmd.as_u8(), Ordering::Release);
        self.unblocked.notify_all();
        Ok(())
    }

    /// Worker side: blocks until the command is no longer `Wait`.
    pub(crate) fn hold(&self) -> Result<(), Poisoned> {
        let mut gate = self.lock.lock().map_err(|_| Poisoned)?;
        while self.current() == Cmd::Wait {
            gate = self.unblocked.wait(gate).map_err(|_| Poisoned)?;
        }
        Ok(())
    }
}

/// An auto-reset event: `wait` blocks until the event has been signalled and
/// consumes the signal.
///
/// A signal raised before anyone waits is not lost, so the signalling side
/// never needs to know whether the waiter has arrived yet.
pub(crate) struct Event {
    signalled: Mutex<bool>,
    cond: Condvar,
}

impl Event {
    pub(crate) fn new() -> Self {
        Self {
            signalled: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    pub(crate) fn signal(&self) -> Result<(), Poisoned> {
        let mut signalled = self.signalled.lock().map_err(|_| Poisoned)?;
        *signalled = true;
        self.cond.notify_one();
        Ok(())
    }

    pub(crate) fn wait(&self) -> Result<(), Poisoned> {
        let mut signalled = self.signalled.lock().map_err(|_| Poisoned)?;
        while !*signalled {
            signalled = self.cond.wait(signalled).map_err(|_| Poisoned)?;
        }
        *signalled = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn event_keeps_an_early_signal() {
        let event = Event::new();
        event.signal().unwrap();
        event.wait().unwrap();
    }

    #[test]
    fn gate_starts_blocking_and_publishes_transitions() {
        let gate = CmdGate::new();
        assert_eq!(gate.current(), Cmd::Wait);
        gate.release(Cmd::Work).unwrap();
        assert_eq!(gate.current(), Cmd::Work);
        gate.block().unwrap();
        assert_eq!(gate.current(), Cmd::Wait);
    }

    #[test]
    fn gate_releases_parked_threads() {
        let gate = Arc::new(CmdGate::new());
        let parked = Arc::clone(&gate);
        let handle = thread::spawn(move || {
            parked.hold().unwrap();
            parked.current()
        });
        thread::sleep(Duration::from_millis(20));
        gate.release(Cmd::Terminate).unwrap();
        assert_eq!(handle.join().unwrap(), Cmd::Terminate);
    }
}
