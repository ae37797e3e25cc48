//! Envelopes, lines and synth lifecycle.
//!
//! `EnvGen` and `IEnvGen` take a whole [`Envelope`] as one variadic input.
//! [`env_gen`] and [`i_env_gen`] serialize the envelope into that input so
//! callers only supply the scalar arguments.
//!
//! # Example
//!
//! ```rust,ignore
//! let envelope = Envelope::percussive(0.01, 1.0, 1.0, -4.0);
//! let amplitude = env_gen(CalculationRate::Control, &envelope)
//!     .arg("done_action", DoneAction::FreeSynth)
//!     .add_to(&builder)?;
//! ```

use scgraph_core::{
    CalculationRate, Envelope, InputSpec, OutputSpec, Signal, UGenCall, UGenCategory, UGenFlags,
    UGenSpec,
};

use crate::{AR_KR, KR};

/// `EnvGen`: breakpoint envelope generator.
pub static ENV_GEN: UGenSpec = UGenSpec {
    name: "EnvGen",
    description: "Envelope generator",
    category: UGenCategory::Envelope,
    inputs: &[
        InputSpec::new("gate", 1.0),
        InputSpec::new("level_scale", 1.0),
        InputSpec::new("level_bias", 0.0),
        InputSpec::new("time_scale", 1.0),
        InputSpec::new("done_action", 0.0),
        InputSpec::required("envelope").unexpanded(),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.done_flag(),
};

/// `IEnvGen`: envelope read at an arbitrary time index.
pub static I_ENV_GEN: UGenSpec = UGenSpec {
    name: "IEnvGen",
    description: "Indexed envelope generator",
    category: UGenCategory::Envelope,
    inputs: &[
        InputSpec::required("index"),
        InputSpec::required("envelope").unexpanded(),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

/// `Linen`: trapezoid envelope with a gate.
pub static LINEN: UGenSpec = UGenSpec {
    name: "Linen",
    description: "Linear attack, sustain, release envelope",
    category: UGenCategory::Envelope,
    inputs: &[
        InputSpec::new("gate", 1.0),
        InputSpec::new("attack_time", 0.01),
        InputSpec::new("sustain_level", 1.0),
        InputSpec::new("release_time", 1.0),
        InputSpec::new("done_action", 0.0),
    ],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.done_flag(),
};

/// `Line`: linear ramp between two values.
pub static LINE: UGenSpec = UGenSpec {
    name: "Line",
    description: "Linear ramp",
    category: UGenCategory::Envelope,
    inputs: &[
        InputSpec::new("start", 0.0),
        InputSpec::new("stop", 1.0),
        InputSpec::new("duration", 1.0),
        InputSpec::new("done_action", 0.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.done_flag(),
};

/// `XLine`: exponential ramp between two values of the same sign.
pub static X_LINE: UGenSpec = UGenSpec {
    name: "XLine",
    description: "Exponential ramp",
    category: UGenCategory::Envelope,
    inputs: &[
        InputSpec::new("start", 1.0),
        InputSpec::new("stop", 2.0),
        InputSpec::new("duration", 1.0),
        InputSpec::new("done_action", 0.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.done_flag(),
};

/// `FreeSelf`: frees the enclosing synth on a positive trigger.
pub static FREE_SELF: UGenSpec = UGenSpec {
    name: "FreeSelf",
    description: "Free the synth on trigger",
    category: UGenCategory::Envelope,
    inputs: &[InputSpec::required("trigger")],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `PauseSelf`: pauses the enclosing synth on a positive trigger.
pub static PAUSE_SELF: UGenSpec = UGenSpec {
    name: "PauseSelf",
    description: "Pause the synth on trigger",
    category: UGenCategory::Envelope,
    inputs: &[InputSpec::required("trigger")],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `Done`: outputs 1 once its source UGen has set its done flag.
pub static DONE: UGenSpec = UGenSpec {
    name: "Done",
    description: "Done-flag monitor",
    category: UGenCategory::Envelope,
    inputs: &[InputSpec::required("source")],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `FreeSelfWhenDone`: frees the synth once its source is done.
pub static FREE_SELF_WHEN_DONE: UGenSpec = UGenSpec {
    name: "FreeSelfWhenDone",
    description: "Free the synth when the source is done",
    category: UGenCategory::Envelope,
    inputs: &[InputSpec::required("source")],
    rates: KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `DetectSilence`: runs a done action after its source stays quiet.
pub static DETECT_SILENCE: UGenSpec = UGenSpec {
    name: "DetectSilence",
    description: "Silence detector",
    category: UGenCategory::Envelope,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("threshold", 0.0001),
        InputSpec::new("time", 0.1),
        InputSpec::new("done_action", 0.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// Every envelope descriptor.
pub static UGENS: &[&UGenSpec] = &[
    &ENV_GEN,
    &I_ENV_GEN,
    &LINEN,
    &LINE,
    &X_LINE,
    &FREE_SELF,
    &PAUSE_SELF,
    &DONE,
    &FREE_SELF_WHEN_DONE,
    &DETECT_SILENCE,
];

/// Starts an `EnvGen` call with `envelope` already serialized.
pub fn env_gen(rate: CalculationRate, envelope: &Envelope) -> UGenCall<'static> {
    ENV_GEN.at(rate).arg("envelope", envelope)
}

/// Starts an `IEnvGen` call reading `envelope` at `index` seconds.
pub fn i_env_gen(
    rate: CalculationRate,
    envelope: &Envelope,
    index: impl Into<Signal>,
) -> UGenCall<'static> {
    let layout: Vec<Signal> = envelope
        .serialize_interpolated()
        .into_iter()
        .map(Signal::Constant)
        .collect();
    I_ENV_GEN
        .at(rate)
        .arg("index", index)
        .arg("envelope", layout)
}
