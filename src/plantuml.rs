//! PlantUML diagram generation

use std::fmt::Debug;
use std::hash::Hash;

use crate::graph::Graph;

/// Render the configured graph as a PlantUML state diagram.
///
/// Lines are sorted so the output is stable across runs.
pub(crate) fn generate_plantuml<S, E>(graph: &Graph<S, E>, current_state: Option<&S>) -> String
where
    S: Clone + Debug + Eq + Hash,
    E: Clone + Debug + Eq + Hash,
{
    let mut plantuml = String::new();
    plantuml.push_str("@startuml\n");
    plantuml.push_str("skinparam state {\n");
    plantuml.push_str("  BackgroundColor<<Current>> YellowGreen\n");
    plantuml.push_str("}\n\n");

    // States without outgoing transitions still get declared
    let mut lines: Vec<String> = Vec::with_capacity(graph.len());
    for node in graph.nodes() {
        let mut has_edges = false;
        for (event, target) in node.transitions() {
            lines.push(format!("{:?} --> {:?} : {:?}", node.id(), target, event));
            has_edges = true;
        }
        if !has_edges {
            lines.push(format!("state {:?}", node.id()));
        }
    }
    lines.sort();

    for line in lines {
        plantuml.push_str(&line);
        plantuml.push('\n');
    }

    // Mark current state
    if let Some(current) = current_state {
        plantuml.push_str(&format!("state {:?} <<Current>>\n", current));
    }

    plantuml.push_str("@enduml\n");
    plantuml
}
