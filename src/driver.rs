//! Driver facades over the shared engine
//!
//! [`StepDriver`] and [`AutoDriver`] wrap the same engine type and differ only
//! in which operations they expose. Both are cheap to clone; clones drive the
//! same machine.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use crate::builder::StateConfig;
use crate::fsm::{Control, Engine};
use crate::{Error, Result};

#[cfg(all(feature = "plantuml", debug_assertions))]
fn export<S, E>(engine: &Engine<S, E>) -> String
where
    S: Clone + Debug + Eq + Hash,
    E: Clone + Debug + Eq + Hash,
{
    engine.inspect(|graph, current| crate::plantuml::generate_plantuml(graph, current))
}

#[cfg(not(all(feature = "plantuml", debug_assertions)))]
fn export<S, E>(_engine: &Engine<S, E>) -> String {
    String::from("PlantUML export not available (requires 'plantuml' feature and debug build)")
}

/// A state machine driven one event at a time by the caller.
///
/// The caller owns cadence and sequencing: every transition happens inside a
/// [`step`](StepDriver::step) call. Hooks may call `step` again on a
/// [`WeakStepDriver`]; the nested transition completes before the outer
/// `step` returns.
pub struct StepDriver<S, E> {
    engine: Arc<Engine<S, E>>,
}

impl<S, E> Clone for StepDriver<S, E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<S, E> StepDriver<S, E>
where
    S: Clone + Debug + Eq + Hash,
    E: Clone + Debug + Eq + Hash,
{
    /// Create a machine sitting in `initial`
    pub fn new(initial: S) -> Self {
        Self {
            engine: Arc::new(Engine::new(initial)),
        }
    }

    /// Configure `id`, creating the state if it does not exist yet
    pub fn state(&self, id: S) -> StateConfig<'_, S, E> {
        StateConfig::new(&self.engine, id)
    }

    /// Deliver `event` to the current state.
    ///
    /// # Errors
    /// [`Error::RejectedEvent`] if the current state has no transition for
    /// `event` (the state is left unchanged), [`Error::InvalidState`] once
    /// the machine is closed.
    pub fn step(&self, event: E) -> Result<(), S, E> {
        self.engine.step(event)
    }

    /// Discard the graph and all hooks; the machine is unusable afterwards
    pub fn close(&self) {
        self.engine.close()
    }

    /// Current state, `None` once closed
    pub fn current_state(&self) -> Option<S> {
        self.engine.current_state()
    }

    /// Whether [`close`](StepDriver::close) has been called
    pub fn is_closed(&self) -> bool {
        self.engine.is_closed()
    }

    /// Whether the current state has a transition for `event`
    pub fn accepts(&self, event: &E) -> bool {
        self.engine.accepts(event)
    }

    /// Whether `id` has been configured or referenced as a target
    pub fn contains_state(&self, id: &S) -> bool {
        self.engine.contains_state(id)
    }

    /// Every state known to the graph, in no particular order
    pub fn states(&self) -> Vec<S> {
        self.engine.states()
    }

    /// Transitions registered on `state` as `(event, target)` pairs
    pub fn transitions(&self, state: &S) -> Vec<(E, S)> {
        self.engine.transitions(state)
    }

    /// Weak handle for hooks, which avoids an ownership cycle through the graph
    pub fn downgrade(&self) -> WeakStepDriver<S, E> {
        WeakStepDriver {
            engine: Arc::downgrade(&self.engine),
        }
    }

    /// Render the graph as PlantUML (needs the `plantuml` feature in a debug build)
    pub fn export_plantuml(&self) -> String {
        export(&self.engine)
    }
}

/// Non-owning [`StepDriver`] handle, typically captured by hooks
pub struct WeakStepDriver<S, E> {
    engine: Weak<Engine<S, E>>,
}

impl<S, E> Clone for WeakStepDriver<S, E> {
    fn clone(&self) -> Self {
        Self {
            engine: Weak::clone(&self.engine),
        }
    }
}

impl<S, E> WeakStepDriver<S, E>
where
    S: Clone + Debug + Eq + Hash,
    E: Clone + Debug + Eq + Hash,
{
    /// Strong handle, if the machine is still alive
    pub fn upgrade(&self) -> Option<StepDriver<S, E>> {
        self.engine.upgrade().map(|engine| StepDriver { engine })
    }

    /// [`StepDriver::step`]; fails with [`Error::InvalidState`] if the machine is gone
    pub fn step(&self, event: E) -> Result<(), S, E> {
        match self.engine.upgrade() {
            Some(engine) => engine.step(event),
            None => Err(Error::InvalidState),
        }
    }
}

/// A state machine that drives itself from events staged by its own hooks.
///
/// [`start`](AutoDriver::start) stages the first event and runs the drive
/// loop. Each hook stages the next event through a [`Controller`] (see
/// [`controller`](AutoDriver::controller)); the loop keeps stepping until no
/// event is staged or a hook pauses or stops the machine.
///
/// ```rust
/// use hooked_fsm::{AutoDriver, Control};
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// enum Light { Red, Green, Yellow }
///
/// let lights: AutoDriver<Light, &str> = AutoDriver::new(Light::Red);
/// let ctl = lights.controller();
///
/// lights.state(Light::Red).accept("go", Light::Green);
/// lights
///     .state(Light::Green)
///     .accept("slow", Light::Yellow)
///     .on_enter(move || {
///         let _ = ctl.feed("slow");
///     });
///
/// lights.start("go").unwrap();
/// assert_eq!(lights.current_state(), Some(Light::Yellow));
/// assert_eq!(lights.control(), Control::Running);
/// ```
pub struct AutoDriver<S, E> {
    engine: Arc<Engine<S, E>>,
}

impl<S, E> Clone for AutoDriver<S, E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<S, E> AutoDriver<S, E>
where
    S: Clone + Debug + Eq + Hash,
    E: Clone + Debug + Eq + Hash,
{
    /// Create an idle machine sitting in `initial`
    pub fn new(initial: S) -> Self {
        Self {
            engine: Arc::new(Engine::new(initial)),
        }
    }

    /// Configure `id`, creating the state if it does not exist yet
    pub fn state(&self, id: S) -> StateConfig<'_, S, E> {
        StateConfig::new(&self.engine, id)
    }

    /// Stage `event` and run until nothing is staged or control leaves `Running`.
    ///
    /// # Errors
    /// [`Error::Lifecycle`] if already running or stopped; otherwise any error
    /// from a step taken by the drive loop.
    pub fn start(&self, event: E) -> Result<(), S, E> {
        self.engine.start(event)
    }

    /// Stage `event` as the next one to execute.
    ///
    /// While running with no drive loop active (the previous loop drained),
    /// this runs a new drive cycle on the calling thread. Idle or paused
    /// machines only keep the event; stopped ones drop it.
    pub fn feed(&self, event: E) -> Result<(), S, E> {
        self.engine.feed(event)
    }

    /// Halt before the next step, keeping `next` for [`resume`](AutoDriver::resume)
    pub fn pause(&self, next: E) {
        self.engine.pause(next)
    }

    /// Continue a paused machine from its staged event.
    ///
    /// # Errors
    /// [`Error::Lifecycle`] unless paused; otherwise any error from a step
    /// taken by the drive loop.
    pub fn resume(&self) -> Result<(), S, E> {
        self.engine.resume()
    }

    /// Stop for good, dropping any staged event. Idempotent.
    pub fn stop(&self) {
        self.engine.stop()
    }

    /// Stop, then discard the graph and all hooks
    pub fn close(&self) {
        self.engine.close()
    }

    /// Current control state
    pub fn control(&self) -> Control {
        self.engine.control()
    }

    /// The event staged for the next step, if any
    pub fn pending_event(&self) -> Option<E> {
        self.engine.pending_event()
    }

    /// Current state, `None` once closed
    pub fn current_state(&self) -> Option<S> {
        self.engine.current_state()
    }

    /// Whether [`close`](AutoDriver::close) has been called
    pub fn is_closed(&self) -> bool {
        self.engine.is_closed()
    }

    /// Whether the current state has a transition for `event`
    pub fn accepts(&self, event: &E) -> bool {
        self.engine.accepts(event)
    }

    /// Whether `id` has been configured or referenced as a target
    pub fn contains_state(&self, id: &S) -> bool {
        self.engine.contains_state(id)
    }

    /// Every state known to the graph, in no particular order
    pub fn states(&self) -> Vec<S> {
        self.engine.states()
    }

    /// Transitions registered on `state` as `(event, target)` pairs
    pub fn transitions(&self, state: &S) -> Vec<(E, S)> {
        self.engine.transitions(state)
    }

    /// Weak control handle for hooks
    pub fn controller(&self) -> Controller<S, E> {
        Controller {
            engine: Arc::downgrade(&self.engine),
        }
    }

    /// Render the graph as PlantUML (needs the `plantuml` feature in a debug build)
    pub fn export_plantuml(&self) -> String {
        export(&self.engine)
    }
}

/// Non-owning control handle onto an [`AutoDriver`], meant to be captured by hooks.
///
/// Holding a `Controller` does not keep the machine alive. Once the machine is
/// dropped, `pause` and `stop` do nothing and `feed` returns
/// [`Error::InvalidState`].
pub struct Controller<S, E> {
    engine: Weak<Engine<S, E>>,
}

impl<S, E> Clone for Controller<S, E> {
    fn clone(&self) -> Self {
        Self {
            engine: Weak::clone(&self.engine),
        }
    }
}

impl<S, E> Controller<S, E>
where
    S: Clone + Debug + Eq + Hash,
    E: Clone + Debug + Eq + Hash,
{
    /// See [`AutoDriver::feed`]. From inside a hook this only stages the event.
    pub fn feed(&self, event: E) -> Result<(), S, E> {
        match self.engine.upgrade() {
            Some(engine) => engine.feed(event),
            None => Err(Error::InvalidState),
        }
    }

    /// See [`AutoDriver::pause`]
    pub fn pause(&self, next: E) {
        if let Some(engine) = self.engine.upgrade() {
            engine.pause(next);
        }
    }

    /// See [`AutoDriver::stop`]
    pub fn stop(&self) {
        if let Some(engine) = self.engine.upgrade() {
            engine.stop();
        }
    }

    /// Control state; a dropped machine reads as [`Control::Stopped`]
    pub fn control(&self) -> Control {
        self.engine
            .upgrade()
            .map_or(Control::Stopped, |engine| engine.control())
    }

    /// Current state, `None` once closed or dropped
    pub fn current_state(&self) -> Option<S> {
        self.engine
            .upgrade()
            .and_then(|engine| engine.current_state())
    }

    /// Strong handle, if the machine is still alive
    pub fn upgrade(&self) -> Option<AutoDriver<S, E>> {
        self.engine.upgrade().map(|engine| AutoDriver { engine })
    }
}
