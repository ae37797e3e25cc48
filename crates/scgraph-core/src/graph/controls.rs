//! Control synthesis: parameter placeholders become control UGens.

use std::collections::HashMap;

use super::Graph;
use crate::builtins::{AUDIO_CONTROL, CONTROL, LAG_CONTROL, TRIG_CONTROL};
use crate::error::{Result, SynthDefError};
use crate::node::{Input, InputKey, NodeRef, NodeRole, UGenId, UGenNode};
use crate::parameter::Parameter;
use crate::rate::{CalculationRate, ParameterRate};
use crate::spec::UGenSpec;

/// Replaces parameter placeholders with one control UGen per non-empty rate
/// group and rewires their consumers.
///
/// Groups are emitted scalar, trigger, audio, control; parameters within a
/// group are sorted by name. Each control's special index is the first
/// parameter slot it covers, counted across all groups.
pub(super) fn synthesize(graph: &mut Graph) -> Result<()> {
    let placeholders: Vec<(UGenId, Parameter)> = graph
        .order
        .iter()
        .filter_map(|&id| match &graph.node(id).role {
            NodeRole::Parameter(parameter) => Some((id, parameter.clone())),
            _ => None,
        })
        .collect();
    if placeholders.is_empty() {
        return Ok(());
    }

    let mut mapping: HashMap<NodeRef, NodeRef> = HashMap::new();
    let mut controls = Vec::new();
    let mut start: u32 = 0;

    for rate in ParameterRate::ALL {
        let mut group: Vec<&(UGenId, Parameter)> = placeholders
            .iter()
            .filter(|(_, parameter)| parameter.rate == rate)
            .collect();
        if group.is_empty() {
            continue;
        }
        group.sort_by(|a, b| a.1.name.cmp(&b.1.name));

        let lagged = group
            .iter()
            .any(|(_, parameter)| parameter.lag.is_some_and(|lag| lag != 0.0));
        let (spec, calculation_rate) = control_spec(rate, lagged);
        let special_index = u16::try_from(start).map_err(|_| {
            SynthDefError::invalid_input(spec.name, "special_index", "too many parameter slots")
        })?;

        let slot_count: u32 = group.iter().map(|(_, p)| p.len() as u32).sum();
        let mut node = UGenNode::new(spec.name, calculation_rate, spec.flags)
            .with_special_index(special_index)
            .with_outputs(slot_count);
        if lagged {
            let mut element = 0;
            for (_, parameter) in &group {
                for _ in 0..parameter.len() {
                    node = node.with_input(
                        InputKey::element("lags", element),
                        Input::Constant(parameter.lag_or_zero()),
                    );
                    element += 1;
                }
            }
        }
        node.role = NodeRole::Control(group.iter().map(|(_, p)| p.clone()).collect());
        let control = graph.push(node);

        let mut output = 0;
        for (placeholder, parameter) in &group {
            for channel in 0..parameter.len() as u32 {
                mapping.insert(
                    NodeRef {
                        ugen: *placeholder,
                        output: channel,
                    },
                    NodeRef {
                        ugen: control,
                        output,
                    },
                );
                output += 1;
            }
        }
        start += slot_count;
        controls.push(control);
    }

    tracing::debug!(
        "synthdef_controls: {} parameters in {} controls, {start} slots",
        placeholders.len(),
        controls.len()
    );

    let remaining: Vec<UGenId> = graph
        .order
        .iter()
        .copied()
        .filter(|&id| !graph.node(id).is_parameter())
        .collect();
    for &id in &remaining {
        graph
            .node_mut(id)
            .remap_inputs(|r| mapping.get(&r).copied().unwrap_or(r));
    }
    graph.order = controls.into_iter().chain(remaining).collect();
    Ok(())
}

fn control_spec(rate: ParameterRate, lagged: bool) -> (&'static UGenSpec, CalculationRate) {
    match rate {
        ParameterRate::Scalar => (&CONTROL, CalculationRate::Scalar),
        ParameterRate::Trigger => (&TRIG_CONTROL, CalculationRate::Control),
        ParameterRate::Audio => (&AUDIO_CONTROL, CalculationRate::Audio),
        ParameterRate::Control if lagged => (&LAG_CONTROL, CalculationRate::Control),
        ParameterRate::Control => (&CONTROL, CalculationRate::Control),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::UGenFlags;

    fn placeholder(parameter: Parameter) -> UGenNode {
        let mut node = UGenNode::new(
            "Parameter",
            parameter.rate.calculation_rate(),
            UGenFlags::NONE,
        )
        .with_outputs(parameter.len() as u32);
        node.role = NodeRole::Parameter(parameter);
        node
    }

    fn consumer(inputs: &[(u32, u32)]) -> UGenNode {
        let mut node = UGenNode::new("Sink", CalculationRate::Audio, UGenFlags::NONE.output());
        for &(ugen, output) in inputs {
            node = node.with_input(
                InputKey::named("x"),
                Input::Node(NodeRef {
                    ugen: UGenId(ugen),
                    output,
                }),
            );
        }
        node
    }

    #[test]
    fn groups_by_rate_and_sorts_by_name() {
        let mut graph = Graph::new(vec![
            placeholder(Parameter::new("zebra", 1.0)),
            placeholder(Parameter::new("alpha", 2.0)),
            placeholder(Parameter::new("init", 3.0).with_rate(ParameterRate::Scalar)),
            consumer(&[(0, 0), (1, 0), (2, 0)]),
        ]);
        synthesize(&mut graph).unwrap();

        let first = graph.node(graph.order[0]);
        assert_eq!(first.class_name(), "Control");
        assert_eq!(first.rate(), CalculationRate::Scalar);
        assert_eq!(first.special_index(), 0);

        let second = graph.node(graph.order[1]);
        assert_eq!(second.rate(), CalculationRate::Control);
        assert_eq!(second.special_index(), 1);
        let names: Vec<_> = second.parameters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zebra"]);

        let sink = graph.node(graph.order[2]);
        let refs: Vec<_> = sink.inputs().iter().filter_map(Input::node).collect();
        assert_eq!(refs[0].ugen, graph.order[1]);
        assert_eq!(refs[0].output, 1, "zebra follows alpha");
        assert_eq!(refs[1].output, 0);
        assert_eq!(refs[2].ugen, graph.order[0]);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn lag_selects_lag_control() {
        let mut graph = Graph::new(vec![
            placeholder(Parameter::vector("freqs", [300.0, 400.0]).with_lag(0.5)),
            placeholder(Parameter::new("amp", 0.1)),
        ]);
        synthesize(&mut graph).unwrap();
        let control = graph.node(graph.order[0]);
        assert_eq!(control.class_name(), "LagControl");
        assert_eq!(control.output_count(), 3);
        assert_eq!(
            control.inputs(),
            &[Input::Constant(0.0), Input::Constant(0.5), Input::Constant(0.5)]
        );
    }

    #[test]
    fn trigger_and_audio_groups() {
        let mut graph = Graph::new(vec![
            placeholder(Parameter::new("t", 0.0).with_rate(ParameterRate::Trigger)),
            placeholder(Parameter::new("a", 0.0).with_rate(ParameterRate::Audio)),
        ]);
        synthesize(&mut graph).unwrap();
        let classes: Vec<_> = graph
            .order
            .iter()
            .map(|&id| graph.node(id).class_name().to_string())
            .collect();
        assert_eq!(classes, vec!["TrigControl", "AudioControl"]);
        assert_eq!(graph.node(graph.order[1]).special_index(), 1);
    }
}
