//! Periodic signal generators.
//!
//! All oscillators are pure: two with identical inputs produce identical
//! signals and may be merged by common-subexpression folding.

use scgraph_core::{InputSpec, OutputSpec, UGenCategory, UGenFlags, UGenSpec};

use crate::AR_KR;

const OSCILLATOR: UGenFlags = UGenFlags::NONE.pure();

/// `SinOsc`: table-lookup sine oscillator.
pub static SIN_OSC: UGenSpec = UGenSpec {
    name: "SinOsc",
    description: "Sine oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[InputSpec::new("frequency", 440.0), InputSpec::new("phase", 0.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// `Saw`: band-limited sawtooth.
pub static SAW: UGenSpec = UGenSpec {
    name: "Saw",
    description: "Band-limited sawtooth oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[InputSpec::new("frequency", 440.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// `Pulse`: band-limited pulse wave with variable width.
pub static PULSE: UGenSpec = UGenSpec {
    name: "Pulse",
    description: "Band-limited pulse oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[InputSpec::new("frequency", 440.0), InputSpec::new("width", 0.5)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// `Blip`: band-limited impulse train.
pub static BLIP: UGenSpec = UGenSpec {
    name: "Blip",
    description: "Band-limited impulse oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[
        InputSpec::new("frequency", 440.0),
        InputSpec::new("harmonic_count", 200.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// `Impulse`: non-band-limited single-sample impulses.
pub static IMPULSE: UGenSpec = UGenSpec {
    name: "Impulse",
    description: "Impulse oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[InputSpec::new("frequency", 440.0), InputSpec::new("phase", 0.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// `LFSaw`: non-band-limited sawtooth.
pub static LF_SAW: UGenSpec = UGenSpec {
    name: "LFSaw",
    description: "Low-frequency sawtooth oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[
        InputSpec::new("frequency", 440.0),
        InputSpec::new("initial_phase", 0.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// `LFTri`: non-band-limited triangle.
pub static LF_TRI: UGenSpec = UGenSpec {
    name: "LFTri",
    description: "Low-frequency triangle oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[
        InputSpec::new("frequency", 440.0),
        InputSpec::new("initial_phase", 0.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// `LFCub`: sine-like oscillator built from cubic segments.
pub static LF_CUB: UGenSpec = UGenSpec {
    name: "LFCub",
    description: "Low-frequency cubic oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[
        InputSpec::new("frequency", 440.0),
        InputSpec::new("initial_phase", 0.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// `LFPar`: sine-like oscillator built from parabolic segments.
pub static LF_PAR: UGenSpec = UGenSpec {
    name: "LFPar",
    description: "Low-frequency parabolic oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[
        InputSpec::new("frequency", 440.0),
        InputSpec::new("initial_phase", 0.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// `LFPulse`: non-band-limited pulse.
pub static LF_PULSE: UGenSpec = UGenSpec {
    name: "LFPulse",
    description: "Low-frequency pulse oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[
        InputSpec::new("frequency", 440.0),
        InputSpec::new("initial_phase", 0.0),
        InputSpec::new("width", 0.5),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// `VarSaw`: sawtooth morphing into a triangle as `width` moves.
pub static VAR_SAW: UGenSpec = UGenSpec {
    name: "VarSaw",
    description: "Variable-width sawtooth oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[
        InputSpec::new("frequency", 440.0),
        InputSpec::new("initial_phase", 0.0),
        InputSpec::new("width", 0.5),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// `SyncSaw`: hard-synced sawtooth.
pub static SYNC_SAW: UGenSpec = UGenSpec {
    name: "SyncSaw",
    description: "Hard-sync sawtooth oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[
        InputSpec::new("sync_frequency", 440.0),
        InputSpec::new("saw_frequency", 440.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: OSCILLATOR,
};

/// Every oscillator descriptor.
pub static UGENS: &[&UGenSpec] = &[
    &SIN_OSC, &SAW, &PULSE, &BLIP, &IMPULSE, &LF_SAW, &LF_TRI, &LF_CUB, &LF_PAR, &LF_PULSE,
    &VAR_SAW, &SYNC_SAW,
];
