//! The shared execution engine behind both driver kinds.
//!
//! An `Engine` owns the state graph, the current state, and the auto-drive
//! control state. It is only ever reached through a driver handle
//! ([`StepDriver`](crate::StepDriver), [`AutoDriver`](crate::AutoDriver)) or a
//! weak handle captured by a hook ([`Controller`](crate::Controller)).
//!
//! # Reentrancy
//! Hooks run while `step` is in progress and are allowed to call back into the
//! engine: stage the next event, pause, stop, reconfigure, or close. The
//! internal lock is therefore only held for bookkeeping and always released
//! before a hook is invoked.
//!
//! # Auto-drive
//! `start`, `resume` and `feed` run a trampoline: pending events are taken one
//! at a time and stepped until nothing is staged or control leaves
//! [`Control::Running`]. Hooks never recurse into the loop; staging from inside
//! a hook only fills the pending slot that the active loop drains next.
//!
//! # Errors
//! Driving methods return [`Error<S, E>`] for closed engines, rejected events,
//! and control-state violations. Nothing in here panics on caller input.
use parking_lot::Mutex;
use std::fmt::{self, Debug};
use std::hash::Hash;
use tracing::{debug, trace, warn};

use crate::action::SharedAction;
use crate::graph::Graph;
use crate::{Error, Result};

/// Control state of the auto-drive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Created, never started
    Idle,
    /// Started; events staged by hooks are executed
    Running,
    /// Halted with an event staged for the next resume
    Paused,
    /// Terminal; nothing is executed any more
    Stopped,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Control::Idle => "idle",
            Control::Running => "running",
            Control::Paused => "paused",
            Control::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

struct Machine<S, E> {
    graph: Graph<S, E>,
    // None once closed
    current: Option<S>,
    pending: Option<E>,
    control: Control,
    driving: bool,
}

pub(crate) struct Engine<S, E> {
    inner: Mutex<Machine<S, E>>,
}

// Clears the drive-loop marker if a hook unwinds. Normal exits clear it
// under the same lock that observed the empty slot, then disarm.
struct DriveGuard<'a, S, E> {
    engine: &'a Engine<S, E>,
    armed: bool,
}

impl<S, E> DriveGuard<'_, S, E> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<S, E> Drop for DriveGuard<'_, S, E> {
    fn drop(&mut self) {
        if self.armed {
            self.engine.inner.lock().driving = false;
        }
    }
}

impl<S, E> Engine<S, E>
where
    S: Clone + Debug + Eq + Hash,
    E: Clone + Debug + Eq + Hash,
{
    /// Create an engine sitting in `initial`, whose node exists from the start
    pub(crate) fn new(initial: S) -> Self {
        let mut graph = Graph::new();
        graph.node_mut(&initial);
        Self {
            inner: Mutex::new(Machine {
                graph,
                current: Some(initial),
                pending: None,
                control: Control::Idle,
                driving: false,
            }),
        }
    }

    /// Apply a configuration change to the graph; ignored once closed.
    ///
    /// Whatever `change` returns (typically a replaced hook) is handed back
    /// after the lock is released, so its drop may call into the engine.
    pub(crate) fn configure<R, F>(&self, change: F) -> Option<R>
    where
        F: FnOnce(&mut Graph<S, E>) -> R,
    {
        let mut m = self.inner.lock();
        if m.current.is_none() {
            drop(m);
            warn!("ignoring configuration of a closed state machine");
            return None;
        }
        Some(change(&mut m.graph))
    }

    pub(crate) fn current_state(&self) -> Option<S> {
        self.inner.lock().current.clone()
    }

    pub(crate) fn control(&self) -> Control {
        self.inner.lock().control
    }

    pub(crate) fn pending_event(&self) -> Option<E> {
        self.inner.lock().pending.clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.inner.lock().current.is_none()
    }

    pub(crate) fn contains_state(&self, id: &S) -> bool {
        self.inner.lock().graph.contains(id)
    }

    pub(crate) fn states(&self) -> Vec<S> {
        self.inner
            .lock()
            .graph
            .nodes()
            .map(|node| node.id().clone())
            .collect()
    }

    /// `(event, target)` pairs registered on `state`
    pub(crate) fn transitions(&self, state: &S) -> Vec<(E, S)> {
        let m = self.inner.lock();
        m.graph.node(state).map_or_else(Vec::new, |node| {
            node.transitions()
                .map(|(event, target)| (event.clone(), target.clone()))
                .collect()
        })
    }

    /// Whether the current state has a transition for `event`
    pub(crate) fn accepts(&self, event: &E) -> bool {
        let m = self.inner.lock();
        m.current
            .as_ref()
            .and_then(|current| m.graph.node(current))
            .is_some_and(|node| node.target(event).is_some())
    }

    /// Read-only access to the graph and current state
    #[cfg(all(feature = "plantuml", debug_assertions))]
    pub(crate) fn inspect<R, F>(&self, view: F) -> R
    where
        F: FnOnce(&Graph<S, E>, Option<&S>) -> R,
    {
        let m = self.inner.lock();
        view(&m.graph, m.current.as_ref())
    }

    /// Deliver one event: exit hook, state change, enter hook
    pub(crate) fn step(&self, event: E) -> Result<(), S, E> {
        let (from, to, exit) = {
            let m = self.inner.lock();
            let from = m.current.clone().ok_or(Error::InvalidState)?;
            let node = m.graph.node(&from).ok_or(Error::InvalidState)?;
            let to = match node.target(&event) {
                Some(to) => to.clone(),
                None => {
                    debug!(state = ?from, event = ?event, "event rejected");
                    return Err(Error::RejectedEvent { state: from, event });
                }
            };
            let exit = node.exit_action(&event);
            (from, to, exit)
        };

        if let Some(action) = exit {
            trace!(state = ?from, event = ?event, "running exit hook");
            action.invoke();
        }

        let enter: Option<SharedAction> = {
            let mut m = self.inner.lock();
            if m.current.is_none() {
                debug!(state = ?from, event = ?event, "closed during exit hook, transition abandoned");
                return Err(Error::InvalidState);
            }
            m.current = Some(to.clone());
            m.graph.node(&to).and_then(|node| node.enter_action(&from))
        };

        debug!(from = ?from, to = ?to, event = ?event, "transition");

        if let Some(action) = enter {
            trace!(state = ?to, from = ?from, "running enter hook");
            action.invoke();
        }
        Ok(())
    }

    /// Begin auto-drive with `event` staged
    pub(crate) fn start(&self, event: E) -> Result<(), S, E> {
        {
            let mut m = self.inner.lock();
            if matches!(m.control, Control::Running | Control::Stopped) {
                return Err(Error::Lifecycle {
                    operation: "start",
                    control: m.control,
                });
            }
            trace!(event = ?event, "staged start event");
            m.control = Control::Running;
            m.pending = Some(event);
        }
        debug!("auto-drive started");
        self.drive()
    }

    /// Stage `event`; runs a drive cycle if running with no loop active
    pub(crate) fn feed(&self, event: E) -> Result<(), S, E> {
        let run_now = {
            let mut m = self.inner.lock();
            if m.control == Control::Stopped {
                warn!(event = ?event, "dropping event fed to a stopped state machine");
                return Ok(());
            }
            trace!(event = ?event, control = %m.control, "staged event");
            m.pending = Some(event);
            m.control == Control::Running && !m.driving
        };
        if run_now {
            self.drive()
        } else {
            Ok(())
        }
    }

    /// Halt auto-drive, keeping `next` for the following resume
    pub(crate) fn pause(&self, next: E) {
        let mut m = self.inner.lock();
        match m.control {
            Control::Running | Control::Paused => {
                trace!(event = ?next, "staged resume event");
                m.control = Control::Paused;
                m.pending = Some(next);
                debug!("auto-drive paused");
            }
            control => debug!(%control, "pause ignored"),
        }
    }

    pub(crate) fn resume(&self) -> Result<(), S, E> {
        {
            let mut m = self.inner.lock();
            if m.control != Control::Paused {
                return Err(Error::Lifecycle {
                    operation: "resume",
                    control: m.control,
                });
            }
            m.control = Control::Running;
        }
        debug!("auto-drive resumed");
        self.drive()
    }

    pub(crate) fn stop(&self) {
        let mut m = self.inner.lock();
        if m.control != Control::Stopped {
            debug!(control = %m.control, "auto-drive stopped");
        }
        m.control = Control::Stopped;
        m.pending = None;
    }

    /// Stop, then drop every node and hook. Idempotent.
    pub(crate) fn close(&self) {
        self.stop();
        let graph = {
            let mut m = self.inner.lock();
            if m.current.take().is_none() {
                return;
            }
            std::mem::replace(&mut m.graph, Graph::new())
        };
        // Hooks may own driver handles; release them outside the lock
        drop(graph);
        debug!("state machine closed");
    }

    fn drive(&self) -> Result<(), S, E> {
        {
            let mut m = self.inner.lock();
            if m.driving {
                return Ok(());
            }
            m.driving = true;
        }
        let mut guard = DriveGuard {
            engine: self,
            armed: true,
        };

        loop {
            let event = {
                let mut m = self.inner.lock();
                let next = match m.control {
                    Control::Running => m.pending.take(),
                    _ => None,
                };
                match next {
                    Some(event) => event,
                    None => {
                        m.driving = false;
                        guard.disarm();
                        return Ok(());
                    }
                }
            };
            if let Err(err) = self.step(event) {
                self.inner.lock().driving = false;
                guard.disarm();
                return Err(err);
            }
        }
    }
}
