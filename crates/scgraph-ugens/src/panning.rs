//! Stereo and multichannel panners.

use scgraph_core::{InputSpec, OutputSpec, UGenCategory, UGenFlags, UGenSpec};

use crate::AR_KR;

/// `Pan2`: equal-power stereo panner.
pub static PAN2: UGenSpec = UGenSpec {
    name: "Pan2",
    description: "Equal-power stereo panner",
    category: UGenCategory::Panning,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("position", 0.0),
        InputSpec::new("level", 1.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(2),
    flags: UGenFlags::NONE,
};

/// `LinPan2`: linear stereo panner.
pub static LIN_PAN2: UGenSpec = UGenSpec {
    name: "LinPan2",
    description: "Linear stereo panner",
    category: UGenCategory::Panning,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("position", 0.0),
        InputSpec::new("level", 1.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(2),
    flags: UGenFlags::NONE,
};

/// `Balance2`: stereo balance of two inputs.
pub static BALANCE2: UGenSpec = UGenSpec {
    name: "Balance2",
    description: "Stereo balance",
    category: UGenCategory::Panning,
    inputs: &[
        InputSpec::required("left"),
        InputSpec::required("right"),
        InputSpec::new("position", 0.0),
        InputSpec::new("level", 1.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(2),
    flags: UGenFlags::NONE,
};

/// `Pan4`: two-dimensional quad panner.
pub static PAN4: UGenSpec = UGenSpec {
    name: "Pan4",
    description: "Quad panner",
    category: UGenCategory::Panning,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("x_position", 0.0),
        InputSpec::new("y_position", 0.0),
        InputSpec::new("gain", 1.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(4),
    flags: UGenFlags::NONE,
};

/// `PanAz`: azimuth panner over a ring of speakers.
pub static PAN_AZ: UGenSpec = UGenSpec {
    name: "PanAz",
    description: "Azimuth panner",
    category: UGenCategory::Panning,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("position", 0.0),
        InputSpec::new("amplitude", 1.0),
        InputSpec::new("width", 2.0),
        InputSpec::new("orientation", 0.5),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Channels { default: 2 },
    flags: UGenFlags::NONE,
};

/// Every panner descriptor.
pub static UGENS: &[&UGenSpec] = &[&PAN2, &LIN_PAN2, &BALANCE2, &PAN4, &PAN_AZ];
