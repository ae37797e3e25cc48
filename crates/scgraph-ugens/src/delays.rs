//! Delay lines, combs and allpass delays.
//!
//! The `N`, `L` and `C` suffixes select no, linear and cubic interpolation.

use scgraph_core::{InputSpec, OutputSpec, UGenCategory, UGenFlags, UGenSpec};

use crate::AR_KR;

const DELAY_INPUTS: &[InputSpec] = &[
    InputSpec::required("source"),
    InputSpec::new("maximum_delay_time", 0.2),
    InputSpec::new("delay_time", 0.2),
];

const FEEDBACK_DELAY_INPUTS: &[InputSpec] = &[
    InputSpec::required("source"),
    InputSpec::new("maximum_delay_time", 0.2),
    InputSpec::new("delay_time", 0.2),
    InputSpec::new("decay_time", 1.0),
];

const fn delay(
    name: &'static str,
    description: &'static str,
    inputs: &'static [InputSpec],
) -> UGenSpec {
    UGenSpec {
        name,
        description,
        category: UGenCategory::Delay,
        inputs,
        rates: AR_KR,
        outputs: OutputSpec::Fixed(1),
        flags: UGenFlags::NONE.pure(),
    }
}

/// `DelayN`: simple delay line.
pub static DELAY_N: UGenSpec = delay("DelayN", "Delay line", DELAY_INPUTS);
/// `DelayL`: linear-interpolating delay line.
pub static DELAY_L: UGenSpec = delay("DelayL", "Linear delay line", DELAY_INPUTS);
/// `DelayC`: cubic-interpolating delay line.
pub static DELAY_C: UGenSpec = delay("DelayC", "Cubic delay line", DELAY_INPUTS);
/// `CombN`: comb filter.
pub static COMB_N: UGenSpec = delay("CombN", "Comb delay", FEEDBACK_DELAY_INPUTS);
/// `CombL`: linear-interpolating comb filter.
pub static COMB_L: UGenSpec = delay("CombL", "Linear comb delay", FEEDBACK_DELAY_INPUTS);
/// `CombC`: cubic-interpolating comb filter.
pub static COMB_C: UGenSpec = delay("CombC", "Cubic comb delay", FEEDBACK_DELAY_INPUTS);
/// `AllpassN`: allpass delay.
pub static ALLPASS_N: UGenSpec = delay("AllpassN", "Allpass delay", FEEDBACK_DELAY_INPUTS);
/// `AllpassL`: linear-interpolating allpass delay.
pub static ALLPASS_L: UGenSpec =
    delay("AllpassL", "Linear allpass delay", FEEDBACK_DELAY_INPUTS);
/// `AllpassC`: cubic-interpolating allpass delay.
pub static ALLPASS_C: UGenSpec = delay("AllpassC", "Cubic allpass delay", FEEDBACK_DELAY_INPUTS);

/// Every delay descriptor.
pub static UGENS: &[&UGenSpec] = &[
    &DELAY_N, &DELAY_L, &DELAY_C, &COMB_N, &COMB_L, &COMB_C, &ALLPASS_N, &ALLPASS_L, &ALLPASS_C,
];
