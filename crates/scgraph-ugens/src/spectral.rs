//! FFT, IFFT and phase-vocoder chains.
//!
//! Every PV UGen transforms its FFT buffer in place and outputs the buffer
//! id. The compiler relies on the [`PvRole`] flags set here to copy chains
//! that feed several consumers, and on `width_first` so that all UGens of a
//! chain are emitted before anything downstream of the chain.
//!
//! `FFT` needs a buffer. [`FftCall`] allocates a synth-local one sized from
//! the window when no buffer is given:
//!
//! ```rust,ignore
//! let chain = FftCall::new(source).add_to(&builder)?;
//! let frozen = PV_MAG_FREEZE.kr().arg("pv_chain", chain).add_to(&builder)?;
//! let resynth = IFFT.ar().arg("pv_chain", frozen).add_to(&builder)?;
//! ```

use scgraph_core::builtins::LOCAL_BUF;
use scgraph_core::{
    CalculationRate, InputSpec, OutputSpec, PvRole, Result, Signal, SynthDefBuilder,
    UGenCategory, UGenFlags, UGenSpec, current_builder,
};

use crate::{AR_KR, KR};

/// Frame count of an implicit FFT buffer when no window size is given.
pub const DEFAULT_FFT_SIZE: f32 = 2048.0;

const PV_CHAIN: UGenFlags = UGenFlags::NONE.width_first().pv(PvRole::Chain);

/// `FFT`: forward transform into a buffer.
pub static FFT: UGenSpec = UGenSpec {
    name: "FFT",
    description: "Fast Fourier transform",
    category: UGenCategory::Spectral,
    inputs: &[
        InputSpec::required("buffer_id"),
        InputSpec::required("source"),
        InputSpec::new("hop", 0.5),
        InputSpec::new("window_type", 0.0),
        InputSpec::new("active", 1.0),
        InputSpec::new("window_size", 0.0),
    ],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.width_first().pv(PvRole::Fft),
};

/// `IFFT`: inverse transform of a PV chain back to a signal.
pub static IFFT: UGenSpec = UGenSpec {
    name: "IFFT",
    description: "Inverse fast Fourier transform",
    category: UGenCategory::Spectral,
    inputs: &[
        InputSpec::required("pv_chain"),
        InputSpec::new("window_type", 0.0),
        InputSpec::new("window_size", 0.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.width_first(),
};

/// `PV_BinScramble`: randomly swaps bins.
pub static PV_BIN_SCRAMBLE: UGenSpec = UGenSpec {
    name: "PV_BinScramble",
    description: "Scramble bins",
    category: UGenCategory::Spectral,
    inputs: &[
        InputSpec::required("pv_chain"),
        InputSpec::new("wipe", 0.0),
        InputSpec::new("width", 0.2),
        InputSpec::new("trigger", 0.0),
    ],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: PV_CHAIN,
};

/// `PV_BrickWall`: zeroes bins above or below a wipe point.
pub static PV_BRICK_WALL: UGenSpec = UGenSpec {
    name: "PV_BrickWall",
    description: "Spectral brick-wall filter",
    category: UGenCategory::Spectral,
    inputs: &[InputSpec::required("pv_chain"), InputSpec::new("wipe", 0.0)],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: PV_CHAIN,
};

/// `PV_MagAbove`: passes bins whose magnitude exceeds a threshold.
pub static PV_MAG_ABOVE: UGenSpec = UGenSpec {
    name: "PV_MagAbove",
    description: "Magnitude gate",
    category: UGenCategory::Spectral,
    inputs: &[InputSpec::required("pv_chain"), InputSpec::new("threshold", 0.0)],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: PV_CHAIN,
};

/// `PV_MagFreeze`: holds magnitudes while `freeze` is positive.
pub static PV_MAG_FREEZE: UGenSpec = UGenSpec {
    name: "PV_MagFreeze",
    description: "Freeze magnitudes",
    category: UGenCategory::Spectral,
    inputs: &[InputSpec::required("pv_chain"), InputSpec::new("freeze", 0.0)],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: PV_CHAIN,
};

/// `PV_RandComb`: randomly clears bins.
pub static PV_RAND_COMB: UGenSpec = UGenSpec {
    name: "PV_RandComb",
    description: "Random bin comb",
    category: UGenCategory::Spectral,
    inputs: &[
        InputSpec::required("pv_chain"),
        InputSpec::new("wipe", 0.0),
        InputSpec::new("trigger", 0.0),
    ],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: PV_CHAIN,
};

/// `PV_PhaseShift`: rotates every bin's phase.
pub static PV_PHASE_SHIFT: UGenSpec = UGenSpec {
    name: "PV_PhaseShift",
    description: "Phase shift",
    category: UGenCategory::Spectral,
    inputs: &[
        InputSpec::required("pv_chain"),
        InputSpec::required("shift"),
        InputSpec::new("integrate", 0.0),
    ],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: PV_CHAIN,
};

/// `PV_MagMul`: multiplies the magnitudes of two chains.
pub static PV_MAG_MUL: UGenSpec = UGenSpec {
    name: "PV_MagMul",
    description: "Multiply magnitudes",
    category: UGenCategory::Spectral,
    inputs: &[
        InputSpec::required("pv_chain_a"),
        InputSpec::required("pv_chain_b"),
    ],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: PV_CHAIN,
};

/// `PV_Add`: complex addition of two chains.
pub static PV_ADD: UGenSpec = UGenSpec {
    name: "PV_Add",
    description: "Add spectra",
    category: UGenCategory::Spectral,
    inputs: &[
        InputSpec::required("pv_chain_a"),
        InputSpec::required("pv_chain_b"),
    ],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: PV_CHAIN,
};

/// `PV_Mul`: complex multiplication of two chains.
pub static PV_MUL: UGenSpec = UGenSpec {
    name: "PV_Mul",
    description: "Multiply spectra",
    category: UGenCategory::Spectral,
    inputs: &[
        InputSpec::required("pv_chain_a"),
        InputSpec::required("pv_chain_b"),
    ],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: PV_CHAIN,
};

/// Every spectral descriptor defined here (`PV_Copy` is a built-in).
pub static UGENS: &[&UGenSpec] = &[
    &FFT,
    &IFFT,
    &PV_BIN_SCRAMBLE,
    &PV_BRICK_WALL,
    &PV_MAG_ABOVE,
    &PV_MAG_FREEZE,
    &PV_RAND_COMB,
    &PV_PHASE_SHIFT,
    &PV_MAG_MUL,
    &PV_ADD,
    &PV_MUL,
];

// ---------------------------------------------------------------------------
// FFT constructor
// ---------------------------------------------------------------------------

/// A pending `FFT.kr` call.
///
/// Without an explicit buffer, [`add_to`](Self::add_to) first registers a
/// one-channel `LocalBuf` whose frame count is the window size, or
/// [`DEFAULT_FFT_SIZE`] when the window size is zero.
#[derive(Clone, Debug)]
#[must_use = "an FFT call does nothing until it is added to a builder"]
pub struct FftCall {
    source: Signal,
    buffer_id: Option<Signal>,
    hop: Signal,
    window_type: Signal,
    active: Signal,
    window_size: Signal,
}

impl FftCall {
    /// Starts an FFT of `source` with default settings.
    pub fn new(source: impl Into<Signal>) -> Self {
        Self {
            source: source.into(),
            buffer_id: None,
            hop: Signal::Constant(0.5),
            window_type: Signal::Constant(0.0),
            active: Signal::Constant(1.0),
            window_size: Signal::Constant(0.0),
        }
    }

    /// Transforms into an existing buffer instead of a local one.
    pub fn buffer_id(mut self, buffer_id: impl Into<Signal>) -> Self {
        self.buffer_id = Some(buffer_id.into());
        self
    }

    /// Sets the hop size as a fraction of the window.
    pub fn hop(mut self, hop: impl Into<Signal>) -> Self {
        self.hop = hop.into();
        self
    }

    /// Sets the window type (0 sine, 1 Hann, -1 rectangular).
    pub fn window_type(mut self, window_type: impl Into<Signal>) -> Self {
        self.window_type = window_type.into();
        self
    }

    /// Sets the active flag.
    pub fn active(mut self, active: impl Into<Signal>) -> Self {
        self.active = active.into();
        self
    }

    /// Sets the window size; zero means the whole buffer.
    pub fn window_size(mut self, window_size: impl Into<Signal>) -> Self {
        self.window_size = window_size.into();
        self
    }

    /// Registers the FFT (and its implicit buffer) in `builder`.
    pub fn add_to(&self, builder: &SynthDefBuilder) -> Result<Signal> {
        let buffer_id = match &self.buffer_id {
            Some(buffer_id) => buffer_id.clone(),
            None => {
                let frame_count = if self.window_size.is_constant(0.0) {
                    Signal::Constant(DEFAULT_FFT_SIZE)
                } else {
                    self.window_size.clone()
                };
                LOCAL_BUF
                    .at(CalculationRate::Scalar)
                    .arg("frame_count", frame_count)
                    .add_to(builder)?
            }
        };
        FFT.kr()
            .arg("buffer_id", buffer_id)
            .arg("source", &self.source)
            .arg("hop", &self.hop)
            .arg("window_type", &self.window_type)
            .arg("active", &self.active)
            .arg("window_size", &self.window_size)
            .add_to(builder)
    }

    /// Registers the FFT in the innermost active builder.
    pub fn register(&self) -> Result<Signal> {
        self.add_to(&current_builder()?)
    }
}
