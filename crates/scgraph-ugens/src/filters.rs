//! Filters, lags and decays.

use scgraph_core::{InputSpec, OutputSpec, UGenCategory, UGenFlags, UGenSpec};

use crate::AR_KR;

const FILTER: UGenFlags = UGenFlags::NONE.pure();

/// `LPF`: second-order Butterworth lowpass.
pub static LPF: UGenSpec = UGenSpec {
    name: "LPF",
    description: "Lowpass filter",
    category: UGenCategory::Filter,
    inputs: &[InputSpec::required("source"), InputSpec::new("frequency", 440.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `HPF`: second-order Butterworth highpass.
pub static HPF: UGenSpec = UGenSpec {
    name: "HPF",
    description: "Highpass filter",
    category: UGenCategory::Filter,
    inputs: &[InputSpec::required("source"), InputSpec::new("frequency", 440.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `BPF`: second-order bandpass.
pub static BPF: UGenSpec = UGenSpec {
    name: "BPF",
    description: "Bandpass filter",
    category: UGenCategory::Filter,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("frequency", 440.0),
        InputSpec::new("reciprocal_of_q", 1.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `BRF`: second-order band reject.
pub static BRF: UGenSpec = UGenSpec {
    name: "BRF",
    description: "Band-reject filter",
    category: UGenCategory::Filter,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("frequency", 440.0),
        InputSpec::new("reciprocal_of_q", 1.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `RLPF`: resonant lowpass.
pub static RLPF: UGenSpec = UGenSpec {
    name: "RLPF",
    description: "Resonant lowpass filter",
    category: UGenCategory::Filter,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("frequency", 440.0),
        InputSpec::new("reciprocal_of_q", 1.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `RHPF`: resonant highpass.
pub static RHPF: UGenSpec = UGenSpec {
    name: "RHPF",
    description: "Resonant highpass filter",
    category: UGenCategory::Filter,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("frequency", 440.0),
        InputSpec::new("reciprocal_of_q", 1.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `Lag`: exponential lag.
pub static LAG: UGenSpec = UGenSpec {
    name: "Lag",
    description: "Exponential lag",
    category: UGenCategory::Filter,
    inputs: &[InputSpec::required("source"), InputSpec::new("lag_time", 0.1)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `Lag2`: two cascaded lags.
pub static LAG2: UGenSpec = UGenSpec {
    name: "Lag2",
    description: "Cascaded exponential lag",
    category: UGenCategory::Filter,
    inputs: &[InputSpec::required("source"), InputSpec::new("lag_time", 0.1)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `Decay`: exponential decay of impulses.
pub static DECAY: UGenSpec = UGenSpec {
    name: "Decay",
    description: "Exponential decay",
    category: UGenCategory::Filter,
    inputs: &[InputSpec::required("source"), InputSpec::new("decay_time", 1.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `Decay2`: exponential decay with an attack.
pub static DECAY2: UGenSpec = UGenSpec {
    name: "Decay2",
    description: "Exponential attack and decay",
    category: UGenCategory::Filter,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("attack_time", 0.01),
        InputSpec::new("decay_time", 1.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `LeakDC`: DC blocker.
pub static LEAK_DC: UGenSpec = UGenSpec {
    name: "LeakDC",
    description: "DC blocking filter",
    category: UGenCategory::Filter,
    inputs: &[InputSpec::required("source"), InputSpec::new("coefficient", 0.995)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `OnePole`: one-pole filter.
pub static ONE_POLE: UGenSpec = UGenSpec {
    name: "OnePole",
    description: "One-pole filter",
    category: UGenCategory::Filter,
    inputs: &[InputSpec::required("source"), InputSpec::new("coefficient", 0.5)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// `Integrator`: leaky integrator.
pub static INTEGRATOR: UGenSpec = UGenSpec {
    name: "Integrator",
    description: "Leaky integrator",
    category: UGenCategory::Filter,
    inputs: &[InputSpec::required("source"), InputSpec::new("coefficient", 1.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: FILTER,
};

/// Every filter descriptor.
pub static UGENS: &[&UGenSpec] = &[
    &LPF,
    &HPF,
    &BPF,
    &BRF,
    &RLPF,
    &RHPF,
    &LAG,
    &LAG2,
    &DECAY,
    &DECAY2,
    &LEAK_DC,
    &ONE_POLE,
    &INTEGRATOR,
];
