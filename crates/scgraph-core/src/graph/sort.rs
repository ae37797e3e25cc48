//! Topological ordering of the emission list.

use std::collections::VecDeque;

use super::Graph;
use crate::error::{Result, SynthDefError};

/// Per-node ordering constraints, indexed by position in the emission list.
#[derive(Debug, Default)]
pub(super) struct SortBundles {
    /// Unique producers each node must follow: input sources first, then
    /// earlier width-first nodes.
    pub antecedents: Vec<Vec<usize>>,
    /// Nodes that must follow each node, in list order.
    pub descendants: Vec<Vec<usize>>,
}

/// Builds the sort bundles for the current emission list.
///
/// Every node follows all width-first nodes that precede it in the list.
/// Edges into a feedback reader from nodes reachable from that reader are
/// dropped, which is what lets `LocalIn`/`LocalOut` loops sort.
pub(super) fn bundles(graph: &Graph) -> SortBundles {
    let positions = graph.positions();
    let count = graph.order.len();

    let mut inputs: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (pos, &id) in graph.order.iter().enumerate() {
        for input in &graph.node(id).inputs {
            let Some(source) = input.node() else { continue };
            let Some(from) = positions.get(source.ugen.slot()).copied().flatten() else {
                continue;
            };
            if !inputs[pos].contains(&from) {
                inputs[pos].push(from);
            }
        }
    }

    let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (pos, sources) in inputs.iter().enumerate() {
        for &from in sources {
            consumers[from].push(pos);
        }
    }

    let mut antecedents = inputs;
    let mut width_first: Vec<usize> = Vec::new();
    for (pos, &id) in graph.order.iter().enumerate() {
        for &w in &width_first {
            if !antecedents[pos].contains(&w) {
                antecedents[pos].push(w);
            }
        }
        let flags = graph.node(id).flags;
        if flags.feedback_reader {
            let reachable = reachable_from(pos, &consumers);
            antecedents[pos].retain(|from| !reachable[*from]);
        }
        if flags.width_first {
            width_first.push(pos);
        }
    }

    let mut descendants: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (pos, sources) in antecedents.iter().enumerate() {
        for &from in sources {
            descendants[from].push(pos);
        }
    }

    SortBundles {
        antecedents,
        descendants,
    }
}

fn reachable_from(start: usize, consumers: &[Vec<usize>]) -> Vec<bool> {
    let mut seen = vec![false; consumers.len()];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;
    while let Some(pos) = queue.pop_front() {
        for &next in &consumers[pos] {
            if !seen[next] {
                seen[next] = true;
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Reorders the emission list so every node follows its antecedents.
///
/// A stack seeded with the free nodes in reverse list order is popped from
/// the end; releasing a node pushes its newly freed descendants in reverse.
/// The result stays close to construction order.
///
/// # Errors
///
/// Returns [`SynthDefError::CyclicGraph`] naming every node left unsorted.
pub(super) fn sort(graph: &mut Graph) -> Result<()> {
    let SortBundles {
        antecedents,
        descendants,
    } = bundles(graph);
    let count = graph.order.len();
    let mut pending: Vec<usize> = antecedents.iter().map(Vec::len).collect();
    let mut queued = vec![false; count];

    let mut available: Vec<usize> = Vec::new();
    for pos in (0..count).rev() {
        if pending[pos] == 0 {
            available.push(pos);
            queued[pos] = true;
        }
    }

    let mut sorted = Vec::with_capacity(count);
    while let Some(pos) = available.pop() {
        for &next in descendants[pos].iter().rev() {
            pending[next] -= 1;
            if pending[next] == 0 && !queued[next] {
                available.push(next);
                queued[next] = true;
            }
        }
        sorted.push(pos);
    }

    if sorted.len() != count {
        let nodes = (0..count)
            .filter(|pos| !queued[*pos])
            .map(|pos| graph.node(graph.order[pos]).class_name().to_string())
            .collect();
        return Err(SynthDefError::CyclicGraph { nodes });
    }

    graph.order = sorted.into_iter().map(|pos| graph.order[pos]).collect();
    Ok(())
}
