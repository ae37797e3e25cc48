//! Structural rewrites applied before optimization.

use super::{Graph, output, spec_node};
use crate::builtins::{BUF_FRAMES, LOCAL_BUF, MAX_LOCAL_BUFS, PV_COPY};
use crate::node::{Input, PvRole, UGenId};
use crate::rate::CalculationRate;

/// Inserts a `PV_Copy` for every extra consumer of a shared PV chain.
///
/// PV UGens transform their FFT buffer in place, so a chain feeding two PV
/// consumers must be copied for all but the last of them. Each copy gets
/// its own `LocalBuf`, sized from the upstream FFT, and is spliced into the
/// emission list right before its consumer.
pub(super) fn cleanup_pv_chains(graph: &mut Graph) {
    let mut mapping: Vec<(UGenId, Vec<(UGenId, usize)>)> = Vec::new();
    for &id in &graph.order {
        let node = graph.node(id);
        if node.flags.pv == PvRole::Copy || !node.flags.pv.is_chain() {
            continue;
        }
        for (index, input) in node.inputs.iter().enumerate() {
            let Some(source) = input.node() else { continue };
            if !graph.node(source.ugen).flags.pv.is_chain() {
                continue;
            }
            match mapping.iter_mut().find(|(antecedent, _)| *antecedent == source.ugen) {
                Some((_, consumers)) => consumers.push((id, index)),
                None => mapping.push((source.ugen, vec![(id, index)])),
            }
        }
    }

    let mut inserted = 0;
    for (antecedent, consumers) in mapping {
        if consumers.len() < 2 {
            continue;
        }
        for &(consumer, index) in &consumers[..consumers.len() - 1] {
            let (fft_size, frames) = fft_size(graph, antecedent);
            let buffer = graph.push(spec_node(
                &LOCAL_BUF,
                CalculationRate::Scalar,
                &[Input::Constant(1.0), fft_size],
            ));
            let copy = graph.push(spec_node(
                &PV_COPY,
                CalculationRate::Control,
                &[output(antecedent, 0), output(buffer, 0)],
            ));
            graph.node_mut(consumer).inputs[index] = output(copy, 0);

            let at = graph
                .order
                .iter()
                .position(|&id| id == consumer)
                .unwrap_or(graph.order.len());
            let splice: Vec<UGenId> = frames.into_iter().chain([buffer, copy]).collect();
            inserted += splice.len();
            graph.order.splice(at..at, splice);
        }
    }
    if inserted > 0 {
        tracing::debug!("synthdef_rewrite: inserted {inserted} ugens for shared PV chains");
    }
}

/// Frame count of the FFT buffer behind a PV chain.
///
/// Walks the chain back to its `FFT` and reads the buffer size with a new
/// `BufFrames`, returned alongside so the caller can place it.
fn fft_size(graph: &mut Graph, chain: UGenId) -> (Input, Option<UGenId>) {
    let mut current = chain;
    loop {
        let node = graph.node(current);
        let is_fft = node.flags.pv == PvRole::Fft;
        let upstream = node.inputs.first().copied();
        match upstream {
            Some(Input::Node(source))
                if !is_fft && graph.node(source.ugen).flags.pv.is_chain() =>
            {
                current = source.ugen;
            }
            Some(buffer) => {
                let frames = graph.push(spec_node(&BUF_FRAMES, CalculationRate::Scalar, &[buffer]));
                return (output(frames, 0), Some(frames));
            }
            None => return (Input::Constant(2048.0), None),
        }
    }
}

/// Rebuilds the `MaxLocalBufs` declaration.
///
/// Existing `MaxLocalBufs` are dropped. When any `LocalBuf` remains a single
/// new one counting them is inserted before the first `LocalBuf`, and every
/// `LocalBuf` takes it as an extra third input.
pub(super) fn cleanup_local_bufs(graph: &mut Graph) {
    let nodes = &graph.nodes;
    graph
        .order
        .retain(|id| nodes[id.slot()].class_name() != MAX_LOCAL_BUFS.name);

    let local_bufs: Vec<UGenId> = graph
        .order
        .iter()
        .copied()
        .filter(|&id| graph.node(id).class_name() == LOCAL_BUF.name)
        .collect();
    let Some(&first) = local_bufs.first() else {
        return;
    };

    let maximum = graph.push(spec_node(
        &MAX_LOCAL_BUFS,
        CalculationRate::Scalar,
        &[Input::Constant(local_bufs.len() as f32)],
    ));
    for &id in &local_bufs {
        let node = graph.node_mut(id);
        node.inputs.truncate(2);
        node.input_keys.truncate(2);
        node.inputs.push(output(maximum, 0));
    }
    let at = graph
        .order
        .iter()
        .position(|&id| id == first)
        .unwrap_or(0);
    graph.order.insert(at, maximum);
    tracing::debug!("synthdef_rewrite: {} local buffers", local_bufs.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{InputKey, NodeRef, UGenFlags, UGenNode};

    fn fft(buffer: Input) -> UGenNode {
        UGenNode::new(
            "FFT",
            CalculationRate::Control,
            UGenFlags::NONE.width_first().pv(PvRole::Fft),
        )
        .with_input(InputKey::named("buffer_id"), buffer)
        .with_input(InputKey::named("source"), Input::Constant(0.0))
    }

    fn pv(class: &'static str, chain: u32) -> UGenNode {
        UGenNode::new(
            class,
            CalculationRate::Control,
            UGenFlags::NONE.width_first().pv(PvRole::Chain),
        )
        .with_input(
            InputKey::named("pv_chain"),
            Input::Node(NodeRef {
                ugen: UGenId(chain),
                output: 0,
            }),
        )
    }

    fn classes(graph: &Graph) -> Vec<String> {
        graph
            .order
            .iter()
            .map(|&id| graph.node(id).class_name().to_string())
            .collect()
    }

    #[test]
    fn shared_chain_gets_a_copy() {
        let mut graph = Graph::new(vec![
            fft(Input::Constant(0.0)),
            pv("PV_A", 0),
            pv("PV_B", 0),
        ]);
        cleanup_pv_chains(&mut graph);
        assert_eq!(
            classes(&graph),
            vec!["FFT", "BufFrames", "LocalBuf", "PV_Copy", "PV_A", "PV_B"]
        );
        // The last consumer keeps the original chain.
        assert_eq!(graph.node(UGenId(2)).inputs[0].node().map(|r| r.ugen), Some(UGenId(0)));
    }

    #[test]
    fn single_consumer_is_untouched() {
        let mut graph = Graph::new(vec![fft(Input::Constant(0.0)), pv("PV_A", 0)]);
        cleanup_pv_chains(&mut graph);
        assert_eq!(classes(&graph), vec!["FFT", "PV_A"]);
    }

    #[test]
    fn local_bufs_share_one_max() {
        let local_buf = || {
            UGenNode::new("LocalBuf", CalculationRate::Scalar, UGenFlags::NONE)
                .with_input(InputKey::named("channel_count"), Input::Constant(1.0))
                .with_input(InputKey::named("frame_count"), Input::Constant(2048.0))
        };
        let stale = UGenNode::new("MaxLocalBufs", CalculationRate::Scalar, UGenFlags::NONE);
        let mut graph = Graph::new(vec![stale, local_buf(), local_buf()]);
        cleanup_local_bufs(&mut graph);
        assert_eq!(classes(&graph), vec!["MaxLocalBufs", "LocalBuf", "LocalBuf"]);
        let max = graph.order[0];
        assert_ne!(max, UGenId(0), "stale MaxLocalBufs is replaced");
        let buf = graph.node(graph.order[1]);
        assert_eq!(buf.inputs.len(), 3);
        assert_eq!(buf.input_keys.len(), 2);
        assert_eq!(graph.node(max).inputs, vec![Input::Constant(2.0)]);
    }
}
