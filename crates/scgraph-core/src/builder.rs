//! Graph builder and the generic UGen constructor.
//!
//! # Architecture
//!
//! A [`SynthDefBuilder`] is a cheap, cloneable handle onto a node arena.
//! Constructors either name their builder explicitly ([`UGenCall::add_to`])
//! or use the innermost builder on a thread-local stack
//! ([`UGenCall::register`]). [`SynthDefBuilder::enter`] pushes onto that
//! stack and the returned guard pops on drop, including while unwinding.
//!
//! Parameters live in the arena as placeholder nodes. [`build`] snapshots
//! the arena and compiles the copy, so the builder itself is never changed
//! by a build and repeated builds produce identical bytes.
//!
//! [`build`]: SynthDefBuilder::build
//!
//! # Example
//!
//! ```rust,ignore
//! use scgraph_core::{Parameter, SynthDefBuilder};
//!
//! let builder = SynthDefBuilder::new();
//! let freq = builder.add_parameter(Parameter::new("freq", 440.0))?;
//! let sine = SIN_OSC.ar().arg("frequency", freq).add_to(&builder)?;
//! OUT.ar().arg("bus", 0.0).arg("source", sine).add_to(&builder)?;
//! let synthdef = builder.build(Some("sine"), true)?;
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::config::BuildOptions;
use crate::error::{Result, SynthDefError};
use crate::expand::{ExpansionArg, expand};
use crate::graph;
use crate::node::{Input, InputKey, NodeRole, UGenFlags, UGenId, UGenNode};
use crate::parameter::Parameter;
use crate::rate::CalculationRate;
use crate::signal::{OutputProxy, Signal};
use crate::spec::{OutputSpec, RateCheck, UGenSpec};
use crate::synthdef::SynthDef;

static NEXT_SCOPE: AtomicU32 = AtomicU32::new(1);

thread_local! {
    static ACTIVE_BUILDERS: RefCell<Vec<SynthDefBuilder>> = const { RefCell::new(Vec::new()) };
}

struct BuilderState {
    scope: u32,
    nodes: Vec<UGenNode>,
}

/// Mutable context collecting UGens and parameters for one SynthDef.
///
/// Clones share the same graph. The handle is `!Send`; a graph is built on
/// one thread.
#[derive(Clone)]
pub struct SynthDefBuilder {
    state: Rc<RefCell<BuilderState>>,
}

impl std::fmt::Debug for SynthDefBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SynthDefBuilder")
            .field("scope", &state.scope)
            .field("nodes", &state.nodes.len())
            .finish()
    }
}

impl Default for SynthDefBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a builder on the thread's active stack until dropped.
#[must_use = "the builder is only active while the guard is alive"]
#[derive(Debug)]
pub struct BuilderGuard {
    _builder: SynthDefBuilder,
}

impl Drop for BuilderGuard {
    fn drop(&mut self) {
        ACTIVE_BUILDERS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Returns the innermost active builder on this thread.
///
/// # Errors
///
/// Returns [`SynthDefError::NoActiveBuilder`] when no builder is active.
pub fn current_builder() -> Result<SynthDefBuilder> {
    ACTIVE_BUILDERS
        .with(|stack| stack.borrow().last().cloned())
        .ok_or(SynthDefError::NoActiveBuilder)
}

impl SynthDefBuilder {
    /// Creates an empty builder with a fresh scope.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(BuilderState {
                scope: NEXT_SCOPE.fetch_add(1, Ordering::Relaxed),
                nodes: Vec::new(),
            })),
        }
    }

    /// Makes this builder the target of implicit registration until the
    /// guard drops.
    pub fn enter(&self) -> BuilderGuard {
        ACTIVE_BUILDERS.with(|stack| stack.borrow_mut().push(self.clone()));
        BuilderGuard {
            _builder: self.clone(),
        }
    }

    /// Same as [`current_builder`].
    ///
    /// # Errors
    ///
    /// Returns [`SynthDefError::NoActiveBuilder`] when no builder is active.
    pub fn current() -> Result<Self> {
        current_builder()
    }

    fn scope(&self) -> u32 {
        self.state.borrow().scope
    }

    /// Number of registered nodes, parameters included.
    pub fn len(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().nodes.is_empty()
    }

    // --- Parameters ---

    /// Registers a parameter and returns its outputs.
    ///
    /// Registering the same name again with the same rate, channel count
    /// and lag returns the existing parameter.
    ///
    /// # Errors
    ///
    /// - [`SynthDefError::DuplicateParameter`] for a conflicting redefinition
    /// - [`SynthDefError::InvalidInput`] for a parameter without values
    /// - [`SynthDefError::NameTooLong`] for a name over 255 bytes
    pub fn add_parameter(&self, parameter: Parameter) -> Result<Signal> {
        if parameter.is_empty() {
            return Err(SynthDefError::invalid_input(
                "Parameter",
                parameter.name,
                "parameter has no values",
            ));
        }
        if parameter.name.len() > usize::from(u8::MAX) {
            return Err(SynthDefError::NameTooLong {
                len: parameter.name.len(),
                name: parameter.name,
            });
        }
        if let Some((id, existing)) = self.find_parameter(&parameter.name) {
            if existing.rate == parameter.rate
                && existing.len() == parameter.len()
                && existing.lag == parameter.lag
            {
                return Ok(self.parameter_signal(id, &existing));
            }
            return Err(SynthDefError::DuplicateParameter {
                name: parameter.name,
            });
        }

        let mut node = UGenNode::new(
            "Parameter",
            parameter.rate.calculation_rate(),
            UGenFlags::NONE,
        )
        .with_outputs(parameter.len() as u32);
        node.role = NodeRole::Parameter(parameter.clone());

        let id = {
            let mut state = self.state.borrow_mut();
            let id = UGenId(state.nodes.len() as u32);
            state.nodes.push(node);
            id
        };
        Ok(self.parameter_signal(id, &parameter))
    }

    /// Returns the outputs of the named parameter, creating a single-channel
    /// control-rate parameter with value `0.0` when it does not exist.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`add_parameter`](Self::add_parameter).
    pub fn parameter(&self, name: &str) -> Result<Signal> {
        match self.find_parameter(name) {
            Some((id, existing)) => Ok(self.parameter_signal(id, &existing)),
            None => self.add_parameter(Parameter::new(name, 0.0)),
        }
    }

    /// Registered parameters in registration order.
    pub fn parameters(&self) -> Vec<Parameter> {
        self.state
            .borrow()
            .nodes
            .iter()
            .filter_map(|node| match &node.role {
                NodeRole::Parameter(parameter) => Some(parameter.clone()),
                _ => None,
            })
            .collect()
    }

    fn find_parameter(&self, name: &str) -> Option<(UGenId, Parameter)> {
        self.state
            .borrow()
            .nodes
            .iter()
            .enumerate()
            .find_map(|(i, node)| match &node.role {
                NodeRole::Parameter(parameter) if parameter.name == name => {
                    Some((UGenId(i as u32), parameter.clone()))
                }
                _ => None,
            })
    }

    fn parameter_signal(&self, id: UGenId, parameter: &Parameter) -> Signal {
        let rate = parameter.rate.calculation_rate();
        let scope = self.scope();
        let outputs: Vec<Signal> = (0..parameter.len() as u32)
            .map(|output| {
                Signal::Output(OutputProxy {
                    scope,
                    ugen: id,
                    output,
                    rate,
                })
            })
            .collect();
        collapse(outputs)
    }

    // --- Graph edits ---

    /// Rewires input `index` of an existing UGen.
    ///
    /// This is the only way to close a loop in the graph; only loops that
    /// pass through a feedback reader such as `LocalIn` survive sorting.
    ///
    /// # Errors
    ///
    /// - [`SynthDefError::InvalidInput`] for an unknown UGen, an out-of-range
    ///   index or a vector value
    /// - [`SynthDefError::ForeignNode`] for a value from another builder
    pub fn set_input(&self, ugen: UGenId, index: usize, value: impl Into<Signal>) -> Result<()> {
        let value = value.into();
        let scope = self.scope();
        let mut state = self.state.borrow_mut();
        let node_count = state.nodes.len();
        let node = state
            .nodes
            .get_mut(ugen.slot())
            .filter(|node| !node.is_parameter())
            .ok_or_else(|| {
                SynthDefError::invalid_input("UGen", ugen.to_string(), "no such UGen")
            })?;
        let class = node.class_name.to_string();
        if index >= node.inputs.len() {
            return Err(SynthDefError::invalid_input(
                class,
                index.to_string(),
                "input index out of range",
            ));
        }
        let input = checked_input(&class, "input", &value, scope, node_count)?;
        node.inputs[index] = input;
        Ok(())
    }

    // --- Building ---

    /// Compiles a snapshot of the graph.
    ///
    /// With `name` absent the SynthDef is anonymous and is addressed by its
    /// content hash. `optimize` enables dead-UGen elimination.
    ///
    /// # Errors
    ///
    /// See [`build_with`](Self::build_with).
    pub fn build(&self, name: Option<&str>, optimize: bool) -> Result<SynthDef> {
        let mut options = BuildOptions::new().with_optimize(optimize);
        if let Some(name) = name {
            options = options.with_name(name);
        }
        self.build_with(&options)
    }

    /// Compiles a snapshot of the graph with explicit options.
    ///
    /// # Errors
    ///
    /// - [`SynthDefError::EmptyGraph`] when nothing was registered
    /// - [`SynthDefError::CyclicGraph`] for a loop without a feedback reader
    pub fn build_with(&self, options: &BuildOptions) -> Result<SynthDef> {
        let snapshot = self.state.borrow().nodes.clone();
        if snapshot.is_empty() {
            return Err(SynthDefError::EmptyGraph);
        }
        let name = if options.use_anonymous_name {
            None
        } else {
            options.name.clone()
        };
        tracing::debug!(
            "synthdef_build: {} nodes, name={}",
            snapshot.len(),
            name.as_deref().unwrap_or("<anonymous>")
        );
        graph::compile(snapshot, name, options)
    }

    // --- Registration ---

    fn register(&self, call: &UGenCall<'_>) -> Result<Signal> {
        let spec = call.spec;
        if !spec.supports(call.rate) {
            return Err(SynthDefError::rate_mismatch(
                spec.name,
                format!("{} is not a valid rate", call.rate),
            ));
        }
        for (name, _) in &call.args {
            if spec.input(name).is_none() {
                return Err(SynthDefError::UnknownInput {
                    ugen: spec.name.to_string(),
                    input: (*name).to_string(),
                });
            }
        }

        let mut args = Vec::with_capacity(spec.inputs.len());
        for input in spec.inputs {
            let value = call
                .args
                .iter()
                .rev()
                .find(|(name, _)| *name == input.name)
                .map(|(_, value)| value.clone())
                .or_else(|| input.default.map(Signal::Constant))
                .ok_or_else(|| SynthDefError::MissingInput {
                    ugen: spec.name.to_string(),
                    input: input.name.to_string(),
                })?;
            args.push(ExpansionArg {
                name: input.name,
                value,
                unexpanded: input.unexpanded,
            });
        }
        let expanded = expand(spec.name, &args)?;

        let output_count = match spec.outputs {
            OutputSpec::Fixed(count) => count,
            OutputSpec::Channels { default } => call.channels.unwrap_or(default),
        };
        let scope = self.scope();
        let node_count = self.len();

        // Validate everything before touching the arena.
        let mut nodes = Vec::with_capacity(expanded.len());
        for values in &expanded {
            let mut node = UGenNode::new(spec.name, call.rate, spec.flags)
                .with_special_index(call.special_index)
                .with_outputs(output_count);
            for (input, value) in spec.inputs.iter().zip(values) {
                let elements = if input.unexpanded {
                    value.flatten()
                } else {
                    vec![value.clone()]
                };
                for (element, item) in elements.iter().enumerate() {
                    let wire = checked_input(spec.name, input.name, item, scope, node_count)?;
                    if let Signal::Output(proxy) = item {
                        check_rate(spec, call.rate, input.name, input.check, proxy.rate)?;
                    }
                    let key = if input.unexpanded {
                        InputKey::element(input.name, element)
                    } else {
                        InputKey::named(input.name)
                    };
                    node = node.with_input(key, wire);
                }
            }
            nodes.push(node);
        }

        let mut state = self.state.borrow_mut();
        let mut results = Vec::with_capacity(nodes.len());
        for node in nodes {
            let id = UGenId(state.nodes.len() as u32);
            let outputs: Vec<Signal> = (0..node.output_count)
                .map(|output| {
                    Signal::Output(OutputProxy {
                        scope,
                        ugen: id,
                        output,
                        rate: node.rate,
                    })
                })
                .collect();
            results.push(collapse(outputs));
            state.nodes.push(node);
        }
        Ok(collapse(results))
    }
}

/// One element collapses to itself, anything else becomes a vector.
fn collapse(mut items: Vec<Signal>) -> Signal {
    if items.len() == 1 {
        items.remove(0)
    } else {
        Signal::Vector(items)
    }
}

fn checked_input(
    ugen: &str,
    input: &str,
    value: &Signal,
    scope: u32,
    node_count: usize,
) -> Result<Input> {
    if let Signal::Output(proxy) = value
        && (proxy.scope != scope || proxy.ugen.slot() >= node_count)
    {
        return Err(SynthDefError::ForeignNode {
            ugen: ugen.to_string(),
        });
    }
    value
        .to_input()
        .ok_or_else(|| SynthDefError::invalid_input(ugen, input, "expected a single channel"))
}

fn check_rate(
    spec: &UGenSpec,
    rate: CalculationRate,
    input: &str,
    check: RateCheck,
    source: CalculationRate,
) -> Result<()> {
    let ok = match check {
        RateCheck::Any => true,
        RateCheck::AudioWhenAudio => rate != CalculationRate::Audio || source == CalculationRate::Audio,
        RateCheck::NotFaster => source <= rate || source == CalculationRate::Demand,
    };
    if ok {
        Ok(())
    } else {
        Err(SynthDefError::rate_mismatch(
            spec.name,
            format!("input '{input}' is {source} but {} runs at {rate}", spec.name),
        ))
    }
}

// ---------------------------------------------------------------------------
// Generic constructor
// ---------------------------------------------------------------------------

/// A pending UGen constructor call.
///
/// Arguments are matched to the descriptor's inputs by name; omitted inputs
/// take their defaults. Sequence-valued arguments expand into several UGens.
#[derive(Clone, Debug)]
#[must_use = "a UGen call does nothing until it is added to a builder"]
pub struct UGenCall<'a> {
    spec: &'a UGenSpec,
    rate: CalculationRate,
    args: Vec<(&'a str, Signal)>,
    special_index: u16,
    channels: Option<u32>,
}

impl<'a> UGenCall<'a> {
    /// Starts a call for `spec` at `rate`.
    pub fn new(spec: &'a UGenSpec, rate: CalculationRate) -> Self {
        Self {
            spec,
            rate,
            args: Vec::new(),
            special_index: 0,
            channels: None,
        }
    }

    /// Sets the named input.
    pub fn arg(mut self, name: &'a str, value: impl Into<Signal>) -> Self {
        self.args.push((name, value.into()));
        self
    }

    /// Sets the special index written with the UGen.
    pub fn special_index(mut self, special_index: u16) -> Self {
        self.special_index = special_index;
        self
    }

    /// Sets the output count of a UGen with a selectable channel count.
    pub fn channels(mut self, channels: u32) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Registers the UGen (or UGens, after expansion) in `builder`.
    ///
    /// Returns one output, a vector of outputs for multi-output UGens, or a
    /// vector of per-UGen results when the call expanded.
    ///
    /// # Errors
    ///
    /// - [`SynthDefError::RateMismatch`] for an unsupported rate or an input
    ///   rate violation
    /// - [`SynthDefError::UnknownInput`] / [`SynthDefError::MissingInput`]
    /// - [`SynthDefError::EmptyInput`] for an empty sequence argument
    /// - [`SynthDefError::ForeignNode`] for an output of another builder
    pub fn add_to(&self, builder: &SynthDefBuilder) -> Result<Signal> {
        builder.register(self)
    }

    /// Registers the UGen in the innermost active builder.
    ///
    /// # Errors
    ///
    /// [`SynthDefError::NoActiveBuilder`] when no builder is active, plus
    /// everything [`add_to`](Self::add_to) returns.
    pub fn register(&self) -> Result<Signal> {
        self.add_to(&current_builder()?)
    }
}
