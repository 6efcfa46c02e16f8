//! Read-only export of a machine's configured graph.
//!
//! [`MachineGraph`] is assembled purely from the machine's public accessors
//! and can be rendered as JSON for tooling or as Graphviz DOT.

use crate::core::State;
use crate::engine::{StateMachine, Trigger};
use serde::Serialize;

/// A state node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub name: String,
    /// Timeout configured on the state, in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// A transition edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    /// Debug rendering of the trigger the edge is keyed on.
    pub trigger: Option<String>,
    pub description: String,
    pub internal: bool,
    pub conditional: bool,
}

/// Snapshot of states and transitions, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MachineGraph {
    pub initial: String,
    pub current: String,
    pub states: Vec<GraphNode>,
    pub transitions: Vec<GraphEdge>,
}

impl MachineGraph {
    pub fn from_machine<S: State, C, T: Trigger>(machine: &StateMachine<S, C, T>) -> Self {
        let states = machine
            .states()
            .map(|state| GraphNode {
                name: state.name().to_string(),
                timeout_ms: machine
                    .timeout_of(state)
                    .map(|timeout| u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)),
            })
            .collect();

        let transitions = machine
            .states()
            .filter_map(|state| machine.transitions_of(state))
            .flatten()
            .map(|transition| GraphEdge {
                from: transition.from().name().to_string(),
                to: transition.to().name().to_string(),
                trigger: transition.trigger().map(|trigger| format!("{:?}", trigger)),
                description: transition.description().to_string(),
                internal: transition.is_internal(),
                conditional: !transition.is_unconditional(),
            })
            .collect();

        Self {
            initial: machine.initial_state().name().to_string(),
            current: machine.current_state().name().to_string(),
            states,
            transitions,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render as a Graphviz digraph. The current state is filled; internal
    /// transitions are dashed.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph StateMachine {\n");
        dot.push_str("    __start [shape=point];\n");
        dot.push_str(&format!("    __start -> \"{}\";\n", escape(&self.initial)));

        for node in &self.states {
            let mut label = escape(&node.name);
            if let Some(timeout) = node.timeout_ms {
                label.push_str(&format!("\\ntimeout {}ms", timeout));
            }
            let style = if node.name == self.current {
                ", style=filled"
            } else {
                ""
            };
            dot.push_str(&format!(
                "    \"{}\" [label=\"{}\"{}];\n",
                escape(&node.name),
                label,
                style
            ));
        }

        for edge in &self.transitions {
            let label = match &edge.trigger {
                Some(trigger) => format!("{} [{}]", escape(trigger), escape(&edge.description)),
                None => escape(&edge.description),
            };
            let style = if edge.internal { ", style=dashed" } else { "" };
            dot.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{}\"{}];\n",
                escape(&edge.from),
                escape(&edge.to),
                label,
                style
            ));
        }

        dot.push_str("}\n");
        dot
    }
}

impl<S: State, C, T: Trigger> StateMachine<S, C, T> {
    /// Snapshot of the configured graph.
    pub fn graph(&self) -> MachineGraph {
        MachineGraph::from_machine(self)
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
