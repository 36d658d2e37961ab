//! State graph: per-state transition tables and hook sets

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::action::SharedAction;

/// One state of the graph with its outgoing transitions and hooks.
///
/// Nodes are only ever created by the graph. All maps exist from creation,
/// so hooks and transitions can be configured in any order.
pub(crate) struct StateNode<S, E> {
    id: S,
    enter: Option<SharedAction>,
    enter_from: HashMap<S, SharedAction>,
    exit: Option<SharedAction>,
    exit_on: HashMap<E, SharedAction>,
    next: HashMap<E, S>,
}

impl<S, E> StateNode<S, E>
where
    S: Clone + Debug + Eq + Hash,
    E: Clone + Debug + Eq + Hash,
{
    fn new(id: S) -> Self {
        Self {
            id,
            enter: None,
            enter_from: HashMap::new(),
            exit: None,
            exit_on: HashMap::new(),
            next: HashMap::new(),
        }
    }

    /// Identifier of this state
    pub(crate) fn id(&self) -> &S {
        &self.id
    }

    /// Target state for `event`, if this state accepts it
    pub(crate) fn target(&self, event: &E) -> Option<&S> {
        self.next.get(event)
    }

    /// All `(event, target)` pairs registered on this state
    pub(crate) fn transitions(&self) -> impl Iterator<Item = (&E, &S)> {
        self.next.iter()
    }

    pub(crate) fn set_transition(&mut self, event: E, target: S) {
        self.next.insert(event, target);
    }

    // The hook setters hand back whatever they replace, for the caller to
    // drop outside the engine lock.

    pub(crate) fn set_enter(&mut self, action: SharedAction) -> Option<SharedAction> {
        self.enter.replace(action)
    }

    pub(crate) fn set_enter_from(&mut self, prev: S, action: SharedAction) -> Option<SharedAction> {
        self.enter_from.insert(prev, action)
    }

    pub(crate) fn set_exit(&mut self, action: SharedAction) -> Option<SharedAction> {
        self.exit.replace(action)
    }

    pub(crate) fn set_exit_on(&mut self, event: E, action: SharedAction) -> Option<SharedAction> {
        self.exit_on.insert(event, action)
    }

    /// Entry hook for arriving from `prev`: the per-source override, else the generic one
    pub(crate) fn enter_action(&self, prev: &S) -> Option<SharedAction> {
        self.enter_from
            .get(prev)
            .or(self.enter.as_ref())
            .cloned()
    }

    /// Exit hook for leaving on `event`: the per-event override, else the generic one
    pub(crate) fn exit_action(&self, event: &E) -> Option<SharedAction> {
        self.exit_on.get(event).or(self.exit.as_ref()).cloned()
    }
}

/// Mapping from state id to its node. Referencing an id creates its node.
pub(crate) struct Graph<S, E> {
    nodes: HashMap<S, StateNode<S, E>>,
}

impl<S, E> Graph<S, E>
where
    S: Clone + Debug + Eq + Hash,
    E: Clone + Debug + Eq + Hash,
{
    pub(crate) fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Node for `id`, created empty if absent
    pub(crate) fn node_mut(&mut self, id: &S) -> &mut StateNode<S, E> {
        self.nodes
            .entry(id.clone())
            .or_insert_with(|| StateNode::new(id.clone()))
    }

    pub(crate) fn node(&self, id: &S) -> Option<&StateNode<S, E>> {
        self.nodes.get(id)
    }

    /// Register `from --event--> to`, making sure both nodes exist
    pub(crate) fn connect(&mut self, from: &S, event: E, to: S) {
        self.node_mut(&to);
        self.node_mut(from).set_transition(event, to);
    }

    pub(crate) fn contains(&self, id: &S) -> bool {
        self.nodes.contains_key(id)
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &StateNode<S, E>> {
        self.nodes.values()
    }

    #[cfg(any(test, all(feature = "plantuml", debug_assertions)))]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}
