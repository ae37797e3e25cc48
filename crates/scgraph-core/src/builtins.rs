//! Descriptors for the UGens the compiler itself synthesizes.
//!
//! Controls, operator UGens, summing UGens and the buffer UGens inserted by
//! the PV-chain and LocalBuf rewrites live here so that graph compilation
//! never depends on an external catalog.

use crate::node::{PvRole, UGenFlags};
use crate::rate::CalculationRate;
use crate::spec::{InputSpec, OutputSpec, UGenCatalog, UGenCategory, UGenSpec};

const ALL_RATES: &[CalculationRate] = &[
    CalculationRate::Scalar,
    CalculationRate::Control,
    CalculationRate::Audio,
    CalculationRate::Demand,
];

const SIGNAL_RATES: &[CalculationRate] = &[
    CalculationRate::Scalar,
    CalculationRate::Control,
    CalculationRate::Audio,
];

/// `Control`: scalar- or control-rate parameter outputs.
pub static CONTROL: UGenSpec = UGenSpec {
    name: "Control",
    description: "Parameter outputs",
    category: UGenCategory::Control,
    inputs: &[],
    rates: &[CalculationRate::Scalar, CalculationRate::Control],
    outputs: OutputSpec::Channels { default: 1 },
    flags: UGenFlags::NONE.control(),
};

/// `LagControl`: control-rate parameters with per-slot lag times as inputs.
pub static LAG_CONTROL: UGenSpec = UGenSpec {
    name: "LagControl",
    description: "Lagged parameter outputs",
    category: UGenCategory::Control,
    inputs: &[InputSpec::required("lags").unexpanded()],
    rates: &[CalculationRate::Control],
    outputs: OutputSpec::Channels { default: 1 },
    flags: UGenFlags::NONE.control(),
};

/// `TrigControl`: trigger parameters.
pub static TRIG_CONTROL: UGenSpec = UGenSpec {
    name: "TrigControl",
    description: "Trigger parameter outputs",
    category: UGenCategory::Control,
    inputs: &[],
    rates: &[CalculationRate::Control],
    outputs: OutputSpec::Channels { default: 1 },
    flags: UGenFlags::NONE.control(),
};

/// `AudioControl`: audio-rate parameters.
pub static AUDIO_CONTROL: UGenSpec = UGenSpec {
    name: "AudioControl",
    description: "Audio-rate parameter outputs",
    category: UGenCategory::Control,
    inputs: &[],
    rates: &[CalculationRate::Audio],
    outputs: OutputSpec::Channels { default: 1 },
    flags: UGenFlags::NONE.control(),
};

/// `BinaryOpUGen`: two-operand operator; the operator is the special index.
pub static BINARY_OP_UGEN: UGenSpec = UGenSpec {
    name: "BinaryOpUGen",
    description: "Binary operator",
    category: UGenCategory::Operator,
    inputs: &[InputSpec::required("left"), InputSpec::required("right")],
    rates: ALL_RATES,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

/// `UnaryOpUGen`: one-operand operator; the operator is the special index.
pub static UNARY_OP_UGEN: UGenSpec = UGenSpec {
    name: "UnaryOpUGen",
    description: "Unary operator",
    category: UGenCategory::Operator,
    inputs: &[InputSpec::required("source")],
    rates: ALL_RATES,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

/// `MulAdd`: fused `source * multiplier + addend`.
pub static MUL_ADD: UGenSpec = UGenSpec {
    name: "MulAdd",
    description: "Multiply then add",
    category: UGenCategory::Operator,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("multiplier", 1.0),
        InputSpec::new("addend", 0.0),
    ],
    rates: SIGNAL_RATES,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

/// `Sum3`: three-input sum.
pub static SUM3: UGenSpec = UGenSpec {
    name: "Sum3",
    description: "Three-input sum",
    category: UGenCategory::Operator,
    inputs: &[
        InputSpec::required("input_one"),
        InputSpec::required("input_two"),
        InputSpec::required("input_three"),
    ],
    rates: ALL_RATES,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

/// `Sum4`: four-input sum.
pub static SUM4: UGenSpec = UGenSpec {
    name: "Sum4",
    description: "Four-input sum",
    category: UGenCategory::Operator,
    inputs: &[
        InputSpec::required("input_one"),
        InputSpec::required("input_two"),
        InputSpec::required("input_three"),
        InputSpec::required("input_four"),
    ],
    rates: ALL_RATES,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

/// `LocalBuf`: synth-local buffer allocation.
pub static LOCAL_BUF: UGenSpec = UGenSpec {
    name: "LocalBuf",
    description: "Synth-local buffer",
    category: UGenCategory::Buffer,
    inputs: &[
        InputSpec::new("channel_count", 1.0),
        InputSpec::new("frame_count", 1.0),
    ],
    rates: &[CalculationRate::Scalar],
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `MaxLocalBufs`: declares how many LocalBufs a synth allocates.
pub static MAX_LOCAL_BUFS: UGenSpec = UGenSpec {
    name: "MaxLocalBufs",
    description: "LocalBuf count",
    category: UGenCategory::Buffer,
    inputs: &[InputSpec::new("maximum", 0.0)],
    rates: &[CalculationRate::Scalar],
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `BufFrames`: frame count of a buffer.
pub static BUF_FRAMES: UGenSpec = UGenSpec {
    name: "BufFrames",
    description: "Buffer frame count",
    category: UGenCategory::Buffer,
    inputs: &[InputSpec::required("buffer_id")],
    rates: &[CalculationRate::Scalar, CalculationRate::Control],
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

/// `PV_Copy`: copies one PV chain into a second buffer.
pub static PV_COPY: UGenSpec = UGenSpec {
    name: "PV_Copy",
    description: "Copy an FFT frame",
    category: UGenCategory::Spectral,
    inputs: &[
        InputSpec::required("pv_chain_a"),
        InputSpec::required("pv_chain_b"),
    ],
    rates: &[CalculationRate::Control],
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.width_first().pv(PvRole::Copy),
};

/// Every built-in descriptor.
pub static BUILTINS: &[&UGenSpec] = &[
    &CONTROL,
    &LAG_CONTROL,
    &TRIG_CONTROL,
    &AUDIO_CONTROL,
    &BINARY_OP_UGEN,
    &UNARY_OP_UGEN,
    &MUL_ADD,
    &SUM3,
    &SUM4,
    &LOCAL_BUF,
    &MAX_LOCAL_BUFS,
    &BUF_FRAMES,
    &PV_COPY,
];

/// Catalog holding only the built-in descriptors.
///
/// Enough to decode anything the compiler synthesizes by itself; richer
/// catalogs should chain to it for the built-in names.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinCatalog;

impl UGenCatalog for BuiltinCatalog {
    fn lookup(&self, name: &str) -> Option<&UGenSpec> {
        BUILTINS.iter().copied().find(|spec| spec.name == name)
    }
}
