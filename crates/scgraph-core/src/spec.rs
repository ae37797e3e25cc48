//! Declarative UGen descriptors.
//!
//! Every UGen class is described by a static [`UGenSpec`] record: its inputs
//! with defaults, the rates it may run at, how many outputs it has and the
//! flags that steer optimization. A single generic constructor
//! ([`UGenCall`](crate::UGenCall)) consumes these records, so adding a UGen
//! to a catalog never needs new code.
//!
//! # Example
//!
//! ```rust,ignore
//! use scgraph_core::{CalculationRate, InputSpec, OutputSpec, UGenCategory, UGenFlags, UGenSpec};
//!
//! pub static SIN_OSC: UGenSpec = UGenSpec {
//!     name: "SinOsc",
//!     description: "Sine oscillator",
//!     category: UGenCategory::Oscillator,
//!     inputs: &[InputSpec::new("frequency", 440.0), InputSpec::new("phase", 0.0)],
//!     rates: &[CalculationRate::Audio, CalculationRate::Control],
//!     outputs: OutputSpec::Fixed(1),
//!     flags: UGenFlags::NONE.pure(),
//! };
//! ```

use crate::builder::UGenCall;
use crate::node::UGenFlags;
use crate::rate::CalculationRate;

/// Category of UGen for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UGenCategory {
    /// Periodic signal generators
    Oscillator,
    /// Random and noise sources
    Noise,
    /// Filters and lags
    Filter,
    /// Delay lines and combs
    Delay,
    /// Envelopes, lines and synth lifecycle
    Envelope,
    /// Bus reads and writes, including local feedback buses
    InputOutput,
    /// Buffer allocation and queries
    Buffer,
    /// FFT and phase-vocoder chains
    Spectral,
    /// Stereo and multichannel panners
    Panning,
    /// Operator and summing UGens synthesized from expressions
    Operator,
    /// Parameter controls synthesized at build time
    Control,
}

impl UGenCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            UGenCategory::Oscillator => "Oscillator",
            UGenCategory::Noise => "Noise",
            UGenCategory::Filter => "Filter",
            UGenCategory::Delay => "Delay",
            UGenCategory::Envelope => "Envelope",
            UGenCategory::InputOutput => "I/O",
            UGenCategory::Buffer => "Buffer",
            UGenCategory::Spectral => "Spectral",
            UGenCategory::Panning => "Panning",
            UGenCategory::Operator => "Operator",
            UGenCategory::Control => "Control",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            UGenCategory::Oscillator => "Sine, sawtooth, pulse, and other periodic generators",
            UGenCategory::Noise => "White, pink, and brown noise, dust, and random values",
            UGenCategory::Filter => "Lowpass, highpass, bandpass, lags, and decays",
            UGenCategory::Delay => "Delay lines, comb filters, and allpass delays",
            UGenCategory::Envelope => "Envelope generators, lines, and synth lifecycle triggers",
            UGenCategory::InputOutput => "Bus reads and writes, including local feedback buses",
            UGenCategory::Buffer => "Buffer allocation, playback, and queries",
            UGenCategory::Spectral => "FFT, IFFT, and phase-vocoder chain processors",
            UGenCategory::Panning => "Stereo and multichannel panners",
            UGenCategory::Operator => "Operator and summing UGens built from expressions",
            UGenCategory::Control => "Parameter controls synthesized at build time",
        }
    }
}

/// Constraint on the rate of signals fed into an input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RateCheck {
    /// Any rate is accepted.
    #[default]
    Any,
    /// When the UGen runs at audio rate, UGen outputs feeding this input
    /// must be audio rate as well.
    AudioWhenAudio,
    /// UGen outputs feeding this input may not be faster than the UGen
    /// itself, except demand-rate sources.
    NotFaster,
}

/// One declared input of a UGen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSpec {
    /// Input name, used for keyword construction and in dumps.
    pub name: &'static str,
    /// Default value; `None` makes the input required.
    pub default: Option<f32>,
    /// Variadic input: a flat sequence becomes several consecutive slots
    /// instead of driving multichannel expansion.
    pub unexpanded: bool,
    /// Rate constraint for signals fed into the input.
    pub check: RateCheck,
}

impl InputSpec {
    /// Input with a default value.
    pub const fn new(name: &'static str, default: f32) -> Self {
        Self {
            name,
            default: Some(default),
            unexpanded: false,
            check: RateCheck::Any,
        }
    }

    /// Input without a default.
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            unexpanded: false,
            check: RateCheck::Any,
        }
    }

    /// Marks the input variadic.
    pub const fn unexpanded(mut self) -> Self {
        self.unexpanded = true;
        self
    }

    /// Attaches a rate constraint.
    pub const fn checked(mut self, check: RateCheck) -> Self {
        self.check = check;
        self
    }
}

/// Output count of a UGen class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputSpec {
    /// Always this many outputs.
    Fixed(u32),
    /// Caller-selectable channel count.
    Channels {
        /// Count used when the caller does not choose one.
        default: u32,
    },
}

/// Static descriptor of a UGen class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UGenSpec {
    /// Class name written to the binary format.
    pub name: &'static str,
    /// Brief description.
    pub description: &'static str,
    /// Category for organization.
    pub category: UGenCategory,
    /// Declared inputs in wire order.
    pub inputs: &'static [InputSpec],
    /// Rates the UGen may be constructed at.
    pub rates: &'static [CalculationRate],
    /// Output count.
    pub outputs: OutputSpec,
    /// Optimization and ordering flags.
    pub flags: UGenFlags,
}

impl UGenSpec {
    /// Whether the UGen may run at `rate`.
    pub fn supports(&self, rate: CalculationRate) -> bool {
        self.rates.contains(&rate)
    }

    /// Finds a declared input by name.
    pub fn input(&self, name: &str) -> Option<(usize, &InputSpec)> {
        self.inputs
            .iter()
            .enumerate()
            .find(|(_, input)| input.name == name)
    }

    /// Starts a constructor call at the given rate.
    pub fn at(&self, rate: CalculationRate) -> UGenCall<'_> {
        UGenCall::new(self, rate)
    }

    /// Starts an audio-rate constructor call.
    pub fn ar(&self) -> UGenCall<'_> {
        self.at(CalculationRate::Audio)
    }

    /// Starts a control-rate constructor call.
    pub fn kr(&self) -> UGenCall<'_> {
        self.at(CalculationRate::Control)
    }

    /// Starts a scalar-rate constructor call.
    pub fn ir(&self) -> UGenCall<'_> {
        self.at(CalculationRate::Scalar)
    }

    /// Starts a demand-rate constructor call.
    pub fn dr(&self) -> UGenCall<'_> {
        self.at(CalculationRate::Demand)
    }
}

/// Read-only lookup of UGen descriptors by class name.
///
/// The decoder uses a catalog to recover input names and flags for the
/// classes it reads. Unknown classes still decode, with positional input
/// names.
pub trait UGenCatalog {
    /// Returns the descriptor for `name`, if known.
    fn lookup(&self, name: &str) -> Option<&UGenSpec>;
}

impl<C: UGenCatalog + ?Sized> UGenCatalog for &C {
    fn lookup(&self, name: &str) -> Option<&UGenSpec> {
        (**self).lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_OSC: UGenSpec = UGenSpec {
        name: "TestOsc",
        description: "test oscillator",
        category: UGenCategory::Oscillator,
        inputs: &[
            InputSpec::new("frequency", 440.0),
            InputSpec::required("phase"),
            InputSpec::required("extra").unexpanded(),
        ],
        rates: &[CalculationRate::Audio],
        outputs: OutputSpec::Fixed(1),
        flags: UGenFlags::NONE.pure(),
    };

    #[test]
    fn input_lookup() {
        let (index, input) = TEST_OSC.input("phase").unwrap();
        assert_eq!(index, 1);
        assert!(input.default.is_none());
        assert!(TEST_OSC.input("missing").is_none());
        assert!(TEST_OSC.inputs[2].unexpanded);
    }

    #[test]
    fn supported_rates() {
        assert!(TEST_OSC.supports(CalculationRate::Audio));
        assert!(!TEST_OSC.supports(CalculationRate::Control));
    }

    #[test]
    fn category_names() {
        assert_eq!(UGenCategory::InputOutput.name(), "I/O");
        assert_eq!(UGenCategory::Spectral.name(), "Spectral");
        assert!(UGenCategory::Delay.description().contains("comb"));
    }
}
