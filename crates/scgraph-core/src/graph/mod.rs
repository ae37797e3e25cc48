//! SynthDef compilation.
//!
//! Turns a builder snapshot into an immutable [`SynthDef`].
//!
//! # Architecture
//!
//! The snapshot is an arena of [`UGenNode`]s addressed by [`UGenId`] plus an
//! ordered list of live ids. Passes append new nodes to the arena and edit
//! the list; they never move a node, so every `NodeRef` stays valid until
//! the final renumbering.
//!
//! Pipeline:
//!
//! 1. [`controls`]: parameter placeholders become one control UGen per rate
//!    group.
//! 2. [`rewrite`]: `PV_Copy` insertion for shared PV chains, then
//!    `MaxLocalBufs` accounting.
//! 3. [`optimize`]: common-subexpression folding (opt-in).
//! 4. [`sort`]: topological order, then dead-UGen elimination.
//! 5. Controls move to the front, ids become ordinals and the constant table
//!    is collected.

mod controls;
mod optimize;
mod rewrite;
mod sort;

use crate::config::BuildOptions;
use crate::error::Result;
use crate::node::{Input, InputKey, NodeRef, UGenId, UGenNode};
use crate::parameter::Parameter;
use crate::rate::CalculationRate;
use crate::spec::UGenSpec;
use crate::synthdef::SynthDef;

/// Arena of nodes plus the live emission list.
#[derive(Clone, Debug)]
pub(crate) struct Graph {
    nodes: Vec<UGenNode>,
    order: Vec<UGenId>,
}

impl Graph {
    pub(crate) fn new(nodes: Vec<UGenNode>) -> Self {
        let order = (0..nodes.len() as u32).map(UGenId).collect();
        Self { nodes, order }
    }

    pub(crate) fn node(&self, id: UGenId) -> &UGenNode {
        &self.nodes[id.slot()]
    }

    pub(crate) fn node_mut(&mut self, id: UGenId) -> &mut UGenNode {
        &mut self.nodes[id.slot()]
    }

    /// Adds a node to the arena without placing it in the emission list.
    pub(crate) fn push(&mut self, node: UGenNode) -> UGenId {
        let id = UGenId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Position of each live id in the emission list, indexed by slot.
    pub(crate) fn positions(&self) -> Vec<Option<usize>> {
        let mut positions = vec![None; self.nodes.len()];
        for (pos, id) in self.order.iter().enumerate() {
            positions[id.slot()] = Some(pos);
        }
        positions
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}

/// Creates a node for a built-in descriptor with its declared input names.
pub(crate) fn spec_node(
    spec: &'static UGenSpec,
    rate: CalculationRate,
    inputs: &[Input],
) -> UGenNode {
    let mut node = UGenNode::new(spec.name, rate, spec.flags);
    for (input_spec, input) in spec.inputs.iter().zip(inputs) {
        node = node.with_input(InputKey::named(input_spec.name), *input);
    }
    node
}

/// Output reference helper.
pub(crate) fn output(ugen: UGenId, output: u32) -> Input {
    Input::Node(NodeRef { ugen, output })
}

/// Compiles a builder snapshot.
pub(crate) fn compile(
    snapshot: Vec<UGenNode>,
    name: Option<String>,
    options: &BuildOptions,
) -> Result<SynthDef> {
    let mut graph = Graph::new(snapshot);

    // Synthesize controls and remap parameter references.
    controls::synthesize(&mut graph)?;

    // Graph rewrites.
    rewrite::cleanup_pv_chains(&mut graph);
    rewrite::cleanup_local_bufs(&mut graph);

    // Optional structural merge before ordering.
    if options.optimize && options.fold_common_subexpressions {
        let merged = optimize::fold_common_subexpressions(&mut graph);
        tracing::debug!("synthdef_optimize: merged {merged} duplicate ugens");
    }

    sort::sort(&mut graph)?;
    tracing::debug!("synthdef_sort: {} ugens in topo order", graph.len());

    if options.optimize {
        let removed = optimize::eliminate_dead_ugens(&mut graph);
        tracing::debug!("synthdef_optimize: removed {removed}");
    }

    Ok(finish(graph, name))
}

/// Moves controls to the front, renumbers ids to ordinals and collects the
/// constant table.
fn finish(graph: Graph, name: Option<String>) -> SynthDef {
    let Graph { nodes, order } = graph;
    let (controls, rest): (Vec<UGenId>, Vec<UGenId>) =
        order.into_iter().partition(|id| nodes[id.slot()].is_control());
    let order: Vec<UGenId> = controls.into_iter().chain(rest).collect();

    let mut ordinal = vec![0u32; nodes.len()];
    for (pos, id) in order.iter().enumerate() {
        ordinal[id.slot()] = pos as u32;
    }

    let mut ugens = Vec::with_capacity(order.len());
    let mut constants: Vec<f32> = Vec::new();
    let mut parameters: Vec<(Parameter, u32)> = Vec::new();
    for id in &order {
        let mut node = nodes[id.slot()].clone();
        node.remap_inputs(|r| NodeRef {
            ugen: UGenId(ordinal[r.ugen.slot()]),
            output: r.output,
        });
        for input in node.inputs() {
            if let Some(value) = input.constant()
                && !constants.iter().any(|c| same_constant(*c, value))
            {
                constants.push(value);
            }
        }
        let mut slot = u32::from(node.special_index());
        for parameter in node.parameters() {
            parameters.push((parameter.clone(), slot));
            slot += parameter.len() as u32;
        }
        ugens.push(node);
    }
    SynthDef::from_parts(name, ugens, constants, parameters)
}

/// Constant-table equality: `-0.0` and `0.0` share a slot and NaNs compare
/// by bit pattern.
pub(crate) fn same_constant(a: f32, b: f32) -> bool {
    a == b || a.to_bits() == b.to_bits()
}
