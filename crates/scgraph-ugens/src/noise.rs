//! Random and noise sources.
//!
//! None of these are pure. Two `WhiteNoise.ar` nodes are independent
//! streams, so the optimizer must never fold them together, and a `Rand.ir`
//! draws a fresh value per synth.

use scgraph_core::{InputSpec, OutputSpec, UGenCategory, UGenFlags, UGenSpec};

use crate::{AR_KR, IR};

/// `WhiteNoise`: flat-spectrum noise.
pub static WHITE_NOISE: UGenSpec = UGenSpec {
    name: "WhiteNoise",
    description: "White noise",
    category: UGenCategory::Noise,
    inputs: &[],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `PinkNoise`: -3 dB per octave noise.
pub static PINK_NOISE: UGenSpec = UGenSpec {
    name: "PinkNoise",
    description: "Pink noise",
    category: UGenCategory::Noise,
    inputs: &[],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `BrownNoise`: -6 dB per octave noise.
pub static BROWN_NOISE: UGenSpec = UGenSpec {
    name: "BrownNoise",
    description: "Brown noise",
    category: UGenCategory::Noise,
    inputs: &[],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `ClipNoise`: random values of either -1 or 1.
pub static CLIP_NOISE: UGenSpec = UGenSpec {
    name: "ClipNoise",
    description: "Clipped noise",
    category: UGenCategory::Noise,
    inputs: &[],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `GrayNoise`: noise from flipping random bits.
pub static GRAY_NOISE: UGenSpec = UGenSpec {
    name: "GrayNoise",
    description: "Gray noise",
    category: UGenCategory::Noise,
    inputs: &[],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `Dust`: random positive impulses.
pub static DUST: UGenSpec = UGenSpec {
    name: "Dust",
    description: "Random unipolar impulses",
    category: UGenCategory::Noise,
    inputs: &[InputSpec::new("density", 0.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `Dust2`: random impulses in [-1, 1].
pub static DUST2: UGenSpec = UGenSpec {
    name: "Dust2",
    description: "Random bipolar impulses",
    category: UGenCategory::Noise,
    inputs: &[InputSpec::new("density", 0.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `LFNoise0`: step noise.
pub static LF_NOISE0: UGenSpec = UGenSpec {
    name: "LFNoise0",
    description: "Sample-and-hold noise",
    category: UGenCategory::Noise,
    inputs: &[InputSpec::new("frequency", 500.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `LFNoise1`: linearly interpolated noise.
pub static LF_NOISE1: UGenSpec = UGenSpec {
    name: "LFNoise1",
    description: "Ramp noise",
    category: UGenCategory::Noise,
    inputs: &[InputSpec::new("frequency", 500.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `LFNoise2`: quadratically interpolated noise.
pub static LF_NOISE2: UGenSpec = UGenSpec {
    name: "LFNoise2",
    description: "Quadratic noise",
    category: UGenCategory::Noise,
    inputs: &[InputSpec::new("frequency", 500.0)],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `Rand`: uniform random value drawn once per synth.
pub static RAND: UGenSpec = UGenSpec {
    name: "Rand",
    description: "Uniform random value",
    category: UGenCategory::Noise,
    inputs: &[InputSpec::new("minimum", 0.0), InputSpec::new("maximum", 1.0)],
    rates: IR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `ExpRand`: exponentially distributed random value.
pub static EXP_RAND: UGenSpec = UGenSpec {
    name: "ExpRand",
    description: "Exponential random value",
    category: UGenCategory::Noise,
    inputs: &[InputSpec::new("minimum", 0.0), InputSpec::new("maximum", 1.0)],
    rates: IR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// `IRand`: uniform random integer.
pub static I_RAND: UGenSpec = UGenSpec {
    name: "IRand",
    description: "Integer random value",
    category: UGenCategory::Noise,
    inputs: &[InputSpec::new("minimum", 0.0), InputSpec::new("maximum", 127.0)],
    rates: IR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

/// Every noise descriptor.
pub static UGENS: &[&UGenSpec] = &[
    &WHITE_NOISE,
    &PINK_NOISE,
    &BROWN_NOISE,
    &CLIP_NOISE,
    &GRAY_NOISE,
    &DUST,
    &DUST2,
    &LF_NOISE0,
    &LF_NOISE1,
    &LF_NOISE2,
    &RAND,
    &EXP_RAND,
    &I_RAND,
];
