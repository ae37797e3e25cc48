//! Compiled SynthDefs.

use std::borrow::Cow;
use std::fmt::{self, Write as _};

use crate::codec;
use crate::error::Result;
use crate::graph::same_constant;
use crate::node::{Input, NodeRef, UGenNode};
use crate::operator::{BinaryOperator, UnaryOperator};
use crate::parameter::Parameter;
use crate::rate::CalculationRate;

/// An immutable, topologically ordered UGen graph ready for the server.
///
/// Produced by [`SynthDefBuilder::build`](crate::SynthDefBuilder::build) or
/// by the decoder. UGen ids equal ordinal positions, constants are in
/// first-use order and parameters are listed in control order together
/// with their starting slot. The name table written to `SCgf` files lists
/// the same parameters alphabetically.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthDef {
    name: Option<String>,
    ugens: Vec<UGenNode>,
    constants: Vec<f32>,
    parameters: Vec<(Parameter, u32)>,
    /// Positions into `parameters`, in name-table order.
    name_order: Vec<usize>,
}

impl SynthDef {
    pub(crate) fn from_parts(
        name: Option<String>,
        ugens: Vec<UGenNode>,
        constants: Vec<f32>,
        parameters: Vec<(Parameter, u32)>,
    ) -> Self {
        let mut name_order: Vec<usize> = (0..parameters.len()).collect();
        name_order.sort_by(|&a, &b| parameters[a].0.name.cmp(&parameters[b].0.name));
        Self {
            name,
            ugens,
            constants,
            parameters,
            name_order,
        }
    }

    /// Replaces the name-table order, as read from a file.
    pub(crate) fn with_name_order(mut self, name_order: Vec<usize>) -> Self {
        if name_order.len() == self.parameters.len() {
            self.name_order = name_order;
        }
        self
    }

    pub(crate) fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    // --- Accessors ---

    /// Explicit name, `None` for anonymous SynthDefs.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// UGens in emission order.
    pub fn ugens(&self) -> &[UGenNode] {
        &self.ugens
    }

    /// Deduplicated constant table.
    pub fn constants(&self) -> &[f32] {
        &self.constants
    }

    /// Position of `value` in the constant table.
    pub fn constant_index(&self, value: f32) -> Option<usize> {
        self.constants.iter().position(|c| same_constant(*c, value))
    }

    /// Parameters with their starting control slot, in control order.
    pub fn parameters(&self) -> &[(Parameter, u32)] {
        &self.parameters
    }

    /// Looks up a parameter and its starting slot by name.
    pub fn parameter(&self, name: &str) -> Option<(&Parameter, u32)> {
        self.parameters
            .iter()
            .find(|(parameter, _)| parameter.name == name)
            .map(|(parameter, index)| (parameter, *index))
    }

    /// `(name, parameter, starting slot)` triples in name-table order.
    ///
    /// Built SynthDefs list parameters alphabetically across every rate
    /// group. Decoded ones keep the order of the file they came from.
    pub fn indexed_parameters(&self) -> impl Iterator<Item = (&str, &Parameter, u32)> {
        self.name_order.iter().map(|&i| {
            let (parameter, index) = &self.parameters[i];
            (parameter.name.as_str(), parameter, *index)
        })
    }

    /// Total number of parameter slots.
    pub fn parameter_slot_count(&self) -> usize {
        self.parameters.iter().map(|(parameter, _)| parameter.len()).sum()
    }

    /// The synthesized control UGens.
    pub fn controls(&self) -> impl Iterator<Item = &UGenNode> {
        self.ugens.iter().filter(|ugen| ugen.is_control())
    }

    /// Whether a parameter named `gate` exists.
    pub fn has_gate(&self) -> bool {
        self.parameter("gate").is_some()
    }

    // --- Naming ---

    /// Content hash of the compiled graph, excluding the name.
    ///
    /// The first 16 bytes of the SHA-256 digest as lowercase hex. Identical
    /// graphs share an anonymous name.
    pub fn anonymous_name(&self) -> String {
        codec::anonymous_name(self)
    }

    /// The explicit name, falling back to [`anonymous_name`](Self::anonymous_name).
    pub fn effective_name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(self.anonymous_name()),
        }
    }

    // --- Output ---

    /// Encodes this SynthDef as a single-definition `SCgf` file.
    pub fn compile(&self, use_anonymous_name: bool) -> Result<Vec<u8>> {
        codec::encode_synthdefs(std::slice::from_ref(self), use_anonymous_name)
    }

    /// Renders the graph in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        let names = self.ugen_names();
        let mut dot = String::new();
        let _ = writeln!(dot, "digraph synthdef {{");
        let _ = writeln!(dot, "    label=\"{}\";", self.effective_name());
        let _ = writeln!(dot, "    rankdir=LR;");
        let _ = writeln!(dot, "    node [shape=record];");

        for (ordinal, ugen) in self.ugens.iter().enumerate() {
            let mut fields = Vec::new();
            for (slot, input) in ugen.inputs().iter().enumerate() {
                let key = ugen
                    .input_keys()
                    .get(slot)
                    .map_or_else(|| format!("input_{slot}"), ToString::to_string);
                match input {
                    Input::Constant(value) => {
                        fields.push(format!("<i{slot}> {key}: {}", format_float(*value)));
                    }
                    Input::Node(_) => fields.push(format!("<i{slot}> {key}")),
                }
            }
            let label = if fields.is_empty() {
                names[ordinal].clone()
            } else {
                format!("{{{}|{{{}}}}}", names[ordinal], fields.join("|"))
            };
            let _ = writeln!(dot, "    ugen_{ordinal} [label=\"{label}\"];");
        }

        for (ordinal, ugen) in self.ugens.iter().enumerate() {
            for (slot, input) in ugen.inputs().iter().enumerate() {
                if let Some(source) = input.node() {
                    let _ = writeln!(
                        dot,
                        "    ugen_{} -> ugen_{ordinal}:i{slot} [label=\"{}\"];",
                        source.ugen.index(),
                        source.output
                    );
                }
            }
        }
        dot.push('}');
        dot
    }

    /// Dump names: class, operator, rate token and a `/n` suffix when
    /// several UGens share class, rate and special index.
    fn ugen_names(&self) -> Vec<String> {
        fn group_key(ugen: &UGenNode) -> (&str, CalculationRate, u16) {
            (ugen.class_name(), ugen.rate(), ugen.special_index())
        }

        self.ugens
            .iter()
            .enumerate()
            .map(|(ordinal, ugen)| {
                let key = group_key(ugen);
                let mut name = ugen.class_name().to_string();
                let operator = match ugen.class_name() {
                    "BinaryOpUGen" => {
                        BinaryOperator::from_index(ugen.special_index()).map(|op| op.name())
                    }
                    "UnaryOpUGen" => {
                        UnaryOperator::from_index(ugen.special_index()).map(|op| op.name())
                    }
                    _ => None,
                };
                if let Some(operator) = operator {
                    let _ = write!(name, "({operator})");
                }
                let _ = write!(name, ".{}", ugen.rate().token());
                let related = self.ugens.iter().filter(|u| group_key(u) == key).count();
                if related > 1 {
                    let index = self.ugens[..ordinal]
                        .iter()
                        .filter(|u| group_key(u) == key)
                        .count();
                    let _ = write!(name, "/{index}");
                }
                name
            })
            .collect()
    }

    fn reference(&self, names: &[String], source: NodeRef) -> String {
        let mut text = format!("{}[{}", names[source.ugen.slot()], source.output);
        let producer = &self.ugens[source.ugen.slot()];
        let parameters = producer.parameters();
        if producer.is_control() && !parameters.is_empty() {
            let mut start = 0;
            let mut found = &parameters[parameters.len() - 1];
            for parameter in parameters {
                if (source.output as usize) < start + parameter.len() {
                    found = parameter;
                    break;
                }
                start += parameter.len();
            }
            let _ = write!(text, ":{}", found.name);
            if found.len() > 1 {
                let _ = write!(text, "[{}]", source.output as usize - start);
            }
        }
        text.push(']');
        text
    }
}

impl fmt::Display for SynthDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.ugen_names();
        writeln!(f, "synthdef:")?;
        writeln!(f, "    name: {}", self.effective_name())?;
        write!(f, "    ugens:")?;

        for (ordinal, ugen) in self.ugens.iter().enumerate() {
            // Later entries replace earlier ones with the same key.
            let mut entries: Vec<(String, String)> = Vec::new();
            let mut insert = |key: String, value: String| {
                match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
            };

            if ugen.is_control() {
                for parameter in ugen.parameters() {
                    if let [value] = parameter.value.as_slice() {
                        insert(parameter.name.clone(), format_float(*value));
                    } else {
                        for (i, value) in parameter.value.iter().enumerate() {
                            insert(format!("{}[{i}]", parameter.name), format_float(*value));
                        }
                    }
                }
            }
            for (key, input) in ugen.input_keys().iter().zip(ugen.inputs()) {
                let value = match input {
                    Input::Constant(value) => format_float(*value),
                    Input::Node(source) => self.reference(&names, *source),
                };
                insert(key.to_string(), value);
            }

            if entries.is_empty() {
                write!(f, "\n    -   {}: null", names[ordinal])?;
            } else {
                write!(f, "\n    -   {}:", names[ordinal])?;
                for (key, value) in entries {
                    write!(f, "\n            {key}: {value}")?;
                }
            }
        }
        Ok(())
    }
}

/// Formats a float the way the dump prints values: integral values keep a
/// trailing `.0`, everything else uses the shortest round-tripping form.
pub(crate) fn format_float(value: f32) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        String::from(if value > 0.0 { "inf" } else { "-inf" })
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
