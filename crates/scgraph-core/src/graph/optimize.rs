//! Graph optimization passes.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::Graph;
use super::sort::{SortBundles, bundles};
use crate::node::{Input, UGenId, UGenNode};

// ---------------------------------------------------------------------------
// Common subexpressions
// ---------------------------------------------------------------------------

/// Input as seen by the structural key: constants compare by bit pattern
/// with signed zeros unified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum KeyInput {
    Constant(u32),
    Node(UGenId, u32),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct StructuralKey {
    class_name: String,
    rate: u8,
    special_index: u16,
    inputs: Vec<KeyInput>,
    output_count: u32,
}

impl StructuralKey {
    fn of(node: &UGenNode, canonical: &HashMap<UGenId, UGenId>) -> Self {
        let inputs = node
            .inputs
            .iter()
            .map(|input| match *input {
                Input::Constant(value) => {
                    let value = if value == 0.0 { 0.0f32 } else { value };
                    KeyInput::Constant(value.to_bits())
                }
                Input::Node(source) => {
                    let ugen = canonical.get(&source.ugen).copied().unwrap_or(source.ugen);
                    KeyInput::Node(ugen, source.output)
                }
            })
            .collect();
        Self {
            class_name: node.class_name.to_string(),
            rate: node.rate.index(),
            special_index: node.special_index,
            inputs,
            output_count: node.output_count,
        }
    }
}

/// Merges structurally identical pure nodes.
///
/// The earliest node in the emission list survives and every reference to
/// a duplicate is rewritten to it. Repeats until nothing merges. Returns
/// the number of nodes removed.
pub(super) fn fold_common_subexpressions(graph: &mut Graph) -> usize {
    let mut merged = 0;
    loop {
        let mut canonical: HashMap<UGenId, UGenId> = HashMap::new();
        let mut seen: HashMap<StructuralKey, UGenId> = HashMap::new();
        for &id in &graph.order {
            let node = graph.node(id);
            if !node.flags.pure {
                continue;
            }
            match seen.entry(StructuralKey::of(node, &canonical)) {
                Entry::Occupied(entry) => {
                    canonical.insert(id, *entry.get());
                }
                Entry::Vacant(entry) => {
                    entry.insert(id);
                }
            }
        }
        if canonical.is_empty() {
            return merged;
        }

        merged += canonical.len();
        graph.order.retain(|id| !canonical.contains_key(id));
        let live = graph.order.clone();
        for id in live {
            graph.node_mut(id).remap_inputs(|mut source| {
                if let Some(&survivor) = canonical.get(&source.ugen) {
                    source.ugen = survivor;
                }
                source
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Dead UGens
// ---------------------------------------------------------------------------

/// Removes pure nodes nothing depends on, cascading to their producers.
///
/// A node is kept alive by every consumer of its outputs, feedback edges
/// included, and by the later nodes it orders as a width-first UGen.
/// Preserves the relative order of the survivors. Returns the number of
/// nodes removed.
pub(super) fn eliminate_dead_ugens(graph: &mut Graph) -> usize {
    let SortBundles { antecedents, .. } = bundles(graph);
    let positions = graph.positions();
    let count = graph.order.len();

    let mut dependencies = antecedents;
    for (pos, &id) in graph.order.iter().enumerate() {
        for input in &graph.node(id).inputs {
            if let Some(source) = input.node()
                && let Some(from) = positions.get(source.ugen.slot()).copied().flatten()
                && !dependencies[pos].contains(&from)
            {
                dependencies[pos].push(from);
            }
        }
    }

    let mut dependents = vec![0usize; count];
    for sources in &dependencies {
        for &from in sources {
            dependents[from] += 1;
        }
    }

    let pure: Vec<bool> = graph
        .order
        .iter()
        .map(|&id| graph.node(id).flags.pure)
        .collect();
    let mut removed = vec![false; count];
    let mut dead: Vec<usize> = (0..count)
        .filter(|&pos| pure[pos] && dependents[pos] == 0)
        .collect();
    while let Some(pos) = dead.pop() {
        if removed[pos] {
            continue;
        }
        removed[pos] = true;
        for &from in &dependencies[pos] {
            dependents[from] -= 1;
            if dependents[from] == 0 && pure[from] && !removed[from] {
                dead.push(from);
            }
        }
    }

    let before = graph.order.len();
    let mut pos = 0;
    graph.order.retain(|_| {
        let keep = !removed[pos];
        pos += 1;
        keep
    });
    before - graph.order.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{InputKey, NodeRef, UGenFlags};
    use crate::rate::CalculationRate;

    fn node(class: &'static str, flags: UGenFlags, inputs: &[Input]) -> UGenNode {
        let mut node = UGenNode::new(class, CalculationRate::Audio, flags);
        for input in inputs {
            node = node.with_input(InputKey::named("in"), *input);
        }
        node
    }

    fn edge(ugen: u32) -> Input {
        Input::Node(NodeRef {
            ugen: UGenId(ugen),
            output: 0,
        })
    }

    fn ids(graph: &Graph) -> Vec<u32> {
        graph.order.iter().map(|id| id.index()).collect()
    }

    #[test]
    fn dead_chain_is_removed() {
        let pure = UGenFlags::NONE.pure();
        let mut graph = Graph::new(vec![
            node("SinOsc", pure, &[Input::Constant(440.0)]),
            node("BinaryOpUGen", pure, &[edge(0), Input::Constant(0.5)]),
            node("WhiteNoise", pure, &[]),
            node("Out", UGenFlags::NONE.output(), &[Input::Constant(0.0), edge(2)]),
        ]);
        assert_eq!(eliminate_dead_ugens(&mut graph), 2);
        assert_eq!(ids(&graph), vec![2, 3]);
    }

    #[test]
    fn impure_nodes_are_roots() {
        let mut graph = Graph::new(vec![
            node("SinOsc", UGenFlags::NONE.pure(), &[]),
            node("RandSeed", UGenFlags::NONE.width_first(), &[edge(0)]),
        ]);
        assert_eq!(eliminate_dead_ugens(&mut graph), 0);
        assert_eq!(ids(&graph), vec![0, 1]);
    }

    #[test]
    fn feedback_edge_keeps_producer_alive() {
        let mut graph = Graph::new(vec![
            node("LocalIn", UGenFlags::NONE.feedback_reader(), &[edge(2)]),
            node("Out", UGenFlags::NONE.output(), &[edge(0)]),
            node("DelayN", UGenFlags::NONE.pure(), &[edge(0)]),
        ]);
        assert_eq!(eliminate_dead_ugens(&mut graph), 0);
    }

    #[test]
    fn identical_pure_nodes_merge_transitively() {
        let pure = UGenFlags::NONE.pure();
        let mut graph = Graph::new(vec![
            node("SinOsc", pure, &[Input::Constant(440.0)]),
            node("SinOsc", pure, &[Input::Constant(440.0)]),
            node("Neg", pure, &[edge(0)]),
            node("Neg", pure, &[edge(1)]),
            node("Out", UGenFlags::NONE.output(), &[edge(2), edge(3)]),
        ]);
        assert_eq!(fold_common_subexpressions(&mut graph), 2);
        assert_eq!(ids(&graph), vec![0, 2, 4]);
        assert_eq!(graph.node(UGenId(4)).inputs, vec![edge(2), edge(2)]);
    }

    #[test]
    fn impure_and_distinct_nodes_stay() {
        let mut graph = Graph::new(vec![
            node("WhiteNoise", UGenFlags::NONE, &[]),
            node("WhiteNoise", UGenFlags::NONE, &[]),
            node("SinOsc", UGenFlags::NONE.pure(), &[Input::Constant(0.0)]),
            node("SinOsc", UGenFlags::NONE.pure(), &[Input::Constant(-0.0)]),
            node("SinOsc", UGenFlags::NONE.pure(), &[Input::Constant(1.0)]),
        ]);
        assert_eq!(fold_common_subexpressions(&mut graph), 1);
        assert_eq!(ids(&graph), vec![0, 1, 2, 4]);
    }
}
