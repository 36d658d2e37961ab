//! Fluent configuration of a single state

use std::fmt::Debug;
use std::hash::Hash;

use crate::action::{share, Action};
use crate::fsm::Engine;

/// Handle for configuring one state, returned by `state(id)` on either driver.
///
/// Every method writes straight into the state graph and returns the handle,
/// so calls can be chained or issued one by one in any order:
///
/// ```rust
/// use hooked_fsm::StepDriver;
///
/// let driver: StepDriver<u8, char> = StepDriver::new(0);
/// driver.state(0).accept('a', 1).accept('b', 2);
///
/// let one = driver.state(1);
/// one.on_enter(|| println!("entered 1"));
/// one.on_enter_from(2, || println!("entered 1 from 2"));
/// ```
pub struct StateConfig<'a, S, E> {
    engine: &'a Engine<S, E>,
    id: S,
}

impl<'a, S, E> StateConfig<'a, S, E>
where
    S: Clone + Debug + Eq + Hash,
    E: Clone + Debug + Eq + Hash,
{
    /// Create the state's node if needed and return a handle to it
    pub(crate) fn new(engine: &'a Engine<S, E>, id: S) -> Self {
        engine.configure(|graph| {
            graph.node_mut(&id);
        });
        Self { engine, id }
    }

    /// The state this handle configures
    pub fn id(&self) -> &S {
        &self.id
    }

    /// Transition to `target` when `event` arrives in this state.
    ///
    /// Registering the same event twice keeps the last target.
    pub fn accept(&self, event: E, target: S) -> &Self {
        self.engine
            .configure(|graph| graph.connect(&self.id, event, target));
        self
    }

    /// Run `action` whenever this state is entered
    pub fn on_enter<A>(&self, action: A) -> &Self
    where
        A: Action + 'static,
    {
        let action = share(action);
        self.engine
            .configure(|graph| graph.node_mut(&self.id).set_enter(action));
        self
    }

    /// Run `action` instead of the generic entry hook when entering from `prev`
    pub fn on_enter_from<A>(&self, prev: S, action: A) -> &Self
    where
        A: Action + 'static,
    {
        let action = share(action);
        self.engine
            .configure(|graph| graph.node_mut(&self.id).set_enter_from(prev, action));
        self
    }

    /// Run `action` whenever this state is exited
    pub fn on_exit<A>(&self, action: A) -> &Self
    where
        A: Action + 'static,
    {
        let action = share(action);
        self.engine
            .configure(|graph| graph.node_mut(&self.id).set_exit(action));
        self
    }

    /// Run `action` instead of the generic exit hook when leaving on `event`
    pub fn on_exit_event<A>(&self, event: E, action: A) -> &Self
    where
        A: Action + 'static,
    {
        let action = share(action);
        self.engine
            .configure(|graph| graph.node_mut(&self.id).set_exit_on(event, action));
        self
    }
}
