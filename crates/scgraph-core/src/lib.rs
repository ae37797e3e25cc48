//! scgraph Core - UGen graph model, SynthDef compiler and binary codec
//!
//! This crate builds unit-generator graphs for the SuperCollider synthesis
//! server, compiles them into ordered, optimized SynthDefs and reads and
//! writes the `SCgf` version 2 file format. It never computes audio.
//!
//! # Core Abstractions
//!
//! ## Building
//!
//! - [`SynthDefBuilder`] - Scoped graph context collecting UGens and parameters
//! - [`UGenCall`] - Generic constructor driven by a [`UGenSpec`] descriptor
//! - [`Signal`] - Constant, UGen output or multichannel vector used as an input
//! - [`Parameter`] - Named, externally settable SynthDef input
//! - [`Envelope`] - Breakpoint envelope serialized into `EnvGen` inputs
//!
//! ## Operators
//!
//! Arithmetic on signals simplifies at construction time
//! (`x * 1 == x`, `x + 0 == x`, constant folding) before any node exists:
//!
//! - [`SynthDefBuilder::binary_op`] / [`SynthDefBuilder::unary_op`]
//! - [`SynthDefBuilder::mul_add`], [`SynthDefBuilder::sum3`], [`SynthDefBuilder::sum4`]
//! - [`SynthDefBuilder::mix`] - Sum any number of signals
//!
//! ## Compilation
//!
//! [`SynthDefBuilder::build`] synthesizes controls, rewrites shared PV
//! chains and local buffers, optionally optimizes, then orders the graph
//! topologically. The result is an immutable [`SynthDef`].
//!
//! ## Binary Format
//!
//! - [`encode_synthdefs`] / [`SynthDef::compile`] - Write `SCgf` bytes
//! - [`decode_synthdefs`] / [`decode_synthdef`] - Read them back through a [`UGenCatalog`]
//!
//! # Example
//!
//! ```rust,ignore
//! use scgraph_core::{Parameter, SynthDefBuilder};
//!
//! let builder = SynthDefBuilder::new();
//! let _guard = builder.enter();
//! let freq = builder.add_parameter(Parameter::new("frequency", 440.0))?;
//! let sine = SIN_OSC.ar().arg("frequency", freq).register()?;
//! let quiet = builder.mul(sine, 0.1)?;
//! OUT.ar().arg("bus", 0.0).arg("source", quiet).register()?;
//!
//! let synthdef = builder.build(Some("sine"), true)?;
//! println!("{synthdef}");
//! let bytes = synthdef.compile(false)?;
//! ```

pub mod builder;
pub mod builtins;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod expand;
mod graph;
pub mod node;
pub mod operator;
pub mod ops;
pub mod parameter;
pub mod rate;
pub mod signal;
pub mod spec;
pub mod synthdef;

// Re-export main types at crate root
pub use builder::{BuilderGuard, SynthDefBuilder, UGenCall, current_builder};
pub use builtins::{BUILTINS, BuiltinCatalog};
pub use codec::{decode_synthdef, decode_synthdefs, encode_synthdefs};
pub use config::BuildOptions;
pub use envelope::{Envelope, EnvelopeCurve, EnvelopeSegment};
pub use error::{Result, SynthDefError};
pub use expand::{ExpansionArg, expand};
pub use node::{Input, InputKey, NodeRef, PvRole, UGenFlags, UGenId, UGenNode};
pub use operator::{BinaryOperator, UnaryOperator};
pub use parameter::Parameter;
pub use rate::{CalculationRate, DoneAction, EnvelopeShape, ParameterRate};
pub use signal::{OutputProxy, Signal};
pub use spec::{InputSpec, OutputSpec, RateCheck, UGenCatalog, UGenCategory, UGenSpec};
pub use synthdef::SynthDef;
