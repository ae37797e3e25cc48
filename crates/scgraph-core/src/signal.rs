//! Values flowing between UGen constructors.
//!
//! A [`Signal`] is what constructors accept as arguments and what they
//! return: a constant, one output of a registered UGen, or a (possibly
//! nested) vector of either, which drives multichannel expansion.

use crate::node::{Input, NodeRef, UGenId};
use crate::rate::{CalculationRate, DoneAction};

/// Handle to one output of a UGen registered in a builder.
///
/// Owns no storage. The scope id ties the handle to its builder so it cannot
/// be wired into a different graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutputProxy {
    pub(crate) scope: u32,
    pub(crate) ugen: UGenId,
    pub(crate) output: u32,
    pub(crate) rate: CalculationRate,
}

impl OutputProxy {
    /// Id of the producing UGen.
    pub fn ugen(self) -> UGenId {
        self.ugen
    }

    /// Output index.
    pub fn output(self) -> u32 {
        self.output
    }

    /// Rate of the producing UGen.
    pub fn rate(self) -> CalculationRate {
        self.rate
    }

    pub(crate) fn node_ref(self) -> NodeRef {
        NodeRef {
            ugen: self.ugen,
            output: self.output,
        }
    }
}

/// A constructor argument or result.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    /// Literal value.
    Constant(f32),
    /// One UGen output.
    Output(OutputProxy),
    /// Several signals, expanded into parallel UGens.
    Vector(Vec<Signal>),
}

impl Signal {
    /// Rate of the signal; constants are scalar and vectors take the maximum.
    pub fn rate(&self) -> CalculationRate {
        match self {
            Signal::Constant(_) => CalculationRate::Scalar,
            Signal::Output(proxy) => proxy.rate,
            Signal::Vector(items) => CalculationRate::promote(items.iter().map(Signal::rate)),
        }
    }

    /// The constant value, if this is a literal.
    pub fn as_constant(&self) -> Option<f32> {
        match self {
            Signal::Constant(value) => Some(*value),
            _ => None,
        }
    }

    /// The output proxy, if this is a single UGen output.
    pub fn as_output(&self) -> Option<OutputProxy> {
        match self {
            Signal::Output(proxy) => Some(*proxy),
            _ => None,
        }
    }

    /// True for a literal equal to `value`.
    pub fn is_constant(&self, value: f32) -> bool {
        self.as_constant() == Some(value)
    }

    /// Number of channels: 1 for scalars, the element count for vectors.
    pub fn channel_count(&self) -> usize {
        match self {
            Signal::Vector(items) => items.len(),
            _ => 1,
        }
    }

    /// Flattens nested vectors into scalar signals, depth first.
    pub fn flatten(&self) -> Vec<Signal> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<Signal>) {
        match self {
            Signal::Vector(items) => items.iter().for_each(|item| item.flatten_into(out)),
            scalar => out.push(scalar.clone()),
        }
    }

    /// Channel `index`, cycling for vectors shorter than the index.
    pub fn channel(&self, index: usize) -> Signal {
        match self {
            Signal::Vector(items) if !items.is_empty() => items[index % items.len()].clone(),
            other => other.clone(),
        }
    }

    /// Converts a scalar signal into a wire input. Vectors yield `None`.
    pub(crate) fn to_input(&self) -> Option<Input> {
        match self {
            Signal::Constant(value) => Some(Input::Constant(*value)),
            Signal::Output(proxy) => Some(Input::Node(proxy.node_ref())),
            Signal::Vector(_) => None,
        }
    }
}

impl From<f32> for Signal {
    fn from(value: f32) -> Self {
        Signal::Constant(value)
    }
}

impl From<f64> for Signal {
    fn from(value: f64) -> Self {
        Signal::Constant(value as f32)
    }
}

impl From<i32> for Signal {
    fn from(value: i32) -> Self {
        Signal::Constant(value as f32)
    }
}

impl From<DoneAction> for Signal {
    fn from(action: DoneAction) -> Self {
        Signal::Constant(action.value())
    }
}

impl From<OutputProxy> for Signal {
    fn from(proxy: OutputProxy) -> Self {
        Signal::Output(proxy)
    }
}

impl<T: Into<Signal>> From<Vec<T>> for Signal {
    fn from(items: Vec<T>) -> Self {
        Signal::Vector(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Signal>, const N: usize> From<[T; N]> for Signal {
    fn from(items: [T; N]) -> Self {
        Signal::Vector(items.into_iter().map(Into::into).collect())
    }
}

impl From<&Signal> for Signal {
    fn from(signal: &Signal) -> Self {
        signal.clone()
    }
}
