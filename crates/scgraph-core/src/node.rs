//! Graph node types: UGen ids, inputs and the node record itself.
//!
//! Nodes never own their inputs. An input either carries a constant or names
//! an output of another node by `(id, output index)`, so rewrites during
//! compilation only ever touch ids.

use std::borrow::Cow;
use std::fmt;

use crate::parameter::Parameter;
use crate::rate::CalculationRate;

/// Identifier of a UGen within one builder or SynthDef.
///
/// Ids are assigned sequentially by the builder. Inside a compiled
/// [`SynthDef`](crate::SynthDef) an id equals the UGen's ordinal position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UGenId(pub(crate) u32);

impl UGenId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UGenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UGenId({})", self.0)
    }
}

/// Reference to one output of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    /// The producing node.
    pub ugen: UGenId,
    /// Output index on the producing node.
    pub output: u32,
}

/// A single UGen input slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    /// A literal value, stored in the SynthDef's constant table.
    Constant(f32),
    /// An output of another node. Only these create graph edges.
    Node(NodeRef),
}

impl Input {
    /// The referenced node, if this input is an edge.
    #[inline]
    pub fn node(&self) -> Option<NodeRef> {
        match self {
            Input::Node(node) => Some(*node),
            Input::Constant(_) => None,
        }
    }

    /// The constant value, if this input is a literal.
    #[inline]
    pub fn constant(&self) -> Option<f32> {
        match self {
            Input::Constant(value) => Some(*value),
            Input::Node(_) => None,
        }
    }
}

/// Name of an input slot as shown in dumps.
///
/// Unexpanded (variadic) inputs contribute one slot per element and carry
/// the element's position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputKey {
    /// Declared input name.
    pub name: Cow<'static, str>,
    /// Element index within an unexpanded input.
    pub element: Option<usize>,
}

impl InputKey {
    /// Key for a plain input.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            element: None,
        }
    }

    /// Key for one element of an unexpanded input.
    pub fn element(name: impl Into<Cow<'static, str>>, element: usize) -> Self {
        Self {
            name: name.into(),
            element: Some(element),
        }
    }
}

impl fmt::Display for InputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element {
            Some(i) => write!(f, "{}[{i}]", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Role of a UGen in an FFT phase-vocoder chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PvRole {
    /// Not part of a PV chain.
    #[default]
    None,
    /// `FFT`: starts a chain; its first input is the frame buffer.
    Fft,
    /// A PV_* UGen whose first input is the upstream chain.
    Chain,
    /// `PV_Copy`, inserted when one chain feeds several consumers.
    Copy,
}

impl PvRole {
    /// Whether this role produces a PV chain signal.
    pub fn is_chain(self) -> bool {
        !matches!(self, PvRole::None)
    }
}

/// Behavioral flags that drive optimization and sorting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct UGenFlags {
    /// No side effects: safe to remove when unused and to merge when identical.
    pub pure: bool,
    /// Sets a done flag other UGens can observe.
    pub done_flag: bool,
    /// Every later node in construction order is ordered after this one.
    pub width_first: bool,
    /// Reads from a bus.
    pub input: bool,
    /// Writes to a bus.
    pub output: bool,
    /// Reads feedback written later in the graph (`LocalIn`).
    pub feedback_reader: bool,
    /// Synthesized parameter control (`Control`, `LagControl`, ...).
    pub control: bool,
    /// Phase-vocoder chain role.
    pub pv: PvRole,
}

impl UGenFlags {
    /// No flags set.
    pub const NONE: UGenFlags = UGenFlags {
        pure: false,
        done_flag: false,
        width_first: false,
        input: false,
        output: false,
        feedback_reader: false,
        control: false,
        pv: PvRole::None,
    };

    /// Marks the UGen pure.
    pub const fn pure(mut self) -> Self {
        self.pure = true;
        self
    }

    /// Marks the UGen as setting a done flag.
    pub const fn done_flag(mut self) -> Self {
        self.done_flag = true;
        self
    }

    /// Marks the UGen width-first.
    pub const fn width_first(mut self) -> Self {
        self.width_first = true;
        self
    }

    /// Marks the UGen as a bus reader.
    pub const fn input(mut self) -> Self {
        self.input = true;
        self
    }

    /// Marks the UGen as a bus writer.
    pub const fn output(mut self) -> Self {
        self.output = true;
        self
    }

    /// Marks the UGen as a feedback reader.
    pub const fn feedback_reader(mut self) -> Self {
        self.feedback_reader = true;
        self
    }

    /// Marks the UGen as a parameter control.
    pub const fn control(mut self) -> Self {
        self.control = true;
        self
    }

    /// Sets the PV chain role.
    pub const fn pv(mut self, role: PvRole) -> Self {
        self.pv = role;
        self
    }
}

/// What a node stands for beyond its wire representation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NodeRole {
    /// An ordinary UGen.
    UGen,
    /// A builder-time parameter placeholder, replaced by a control at build.
    Parameter(Parameter),
    /// A control UGen and the parameters it emits, in output order.
    Control(Vec<Parameter>),
}

/// One UGen in a graph.
#[derive(Clone, Debug, PartialEq)]
pub struct UGenNode {
    pub(crate) class_name: Cow<'static, str>,
    pub(crate) rate: CalculationRate,
    pub(crate) special_index: u16,
    pub(crate) inputs: Vec<Input>,
    pub(crate) input_keys: Vec<InputKey>,
    pub(crate) output_count: u32,
    pub(crate) flags: UGenFlags,
    pub(crate) role: NodeRole,
}

impl UGenNode {
    pub(crate) fn new(
        class_name: impl Into<Cow<'static, str>>,
        rate: CalculationRate,
        flags: UGenFlags,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            rate,
            special_index: 0,
            inputs: Vec::new(),
            input_keys: Vec::new(),
            output_count: 1,
            flags,
            role: NodeRole::UGen,
        }
    }

    pub(crate) fn with_special_index(mut self, special_index: u16) -> Self {
        self.special_index = special_index;
        self
    }

    pub(crate) fn with_outputs(mut self, output_count: u32) -> Self {
        self.output_count = output_count;
        self
    }

    pub(crate) fn with_input(mut self, key: InputKey, input: Input) -> Self {
        self.input_keys.push(key);
        self.inputs.push(input);
        self
    }

    /// UGen class name, e.g. `SinOsc`.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Calculation rate.
    pub fn rate(&self) -> CalculationRate {
        self.rate
    }

    /// Special index (operator id for operator UGens, starting slot for controls).
    pub fn special_index(&self) -> u16 {
        self.special_index
    }

    /// Ordered inputs.
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    /// Input names. May be shorter than [`inputs`](Self::inputs) when a
    /// rewrite appended an unnamed slot.
    pub fn input_keys(&self) -> &[InputKey] {
        &self.input_keys
    }

    /// Number of outputs.
    pub fn output_count(&self) -> u32 {
        self.output_count
    }

    /// Behavioral flags.
    pub fn flags(&self) -> UGenFlags {
        self.flags
    }

    /// Parameters carried by a control UGen, in output order. Empty for
    /// every other UGen.
    pub fn parameters(&self) -> &[Parameter] {
        match &self.role {
            NodeRole::Control(parameters) => parameters,
            _ => &[],
        }
    }

    /// Whether this node is a synthesized parameter control.
    pub fn is_control(&self) -> bool {
        self.flags.control
    }

    /// Looks up the input with the given plain name.
    pub fn input_named(&self, name: &str) -> Option<&Input> {
        self.input_keys
            .iter()
            .position(|key| key.element.is_none() && key.name == name)
            .and_then(|i| self.inputs.get(i))
    }

    pub(crate) fn is_parameter(&self) -> bool {
        matches!(self.role, NodeRole::Parameter(_))
    }

    /// Remaps every node reference through `f`.
    pub(crate) fn remap_inputs(&mut self, mut f: impl FnMut(NodeRef) -> NodeRef) {
        for input in &mut self.inputs {
            if let Input::Node(node) = input {
                *node = f(*node);
            }
        }
    }
}
