//! Buffer playback, recording and queries.
//!
//! `LocalBuf`, `MaxLocalBufs` and `BufFrames` are synthesized by the
//! compiler and live in [`scgraph_core::builtins`]; the registry lists them
//! under this category as well.

use scgraph_core::{InputSpec, OutputSpec, UGenCategory, UGenFlags, UGenSpec};

use crate::{AR_KR, IR_KR};

/// `PlayBuf`: plays a sample buffer.
pub static PLAY_BUF: UGenSpec = UGenSpec {
    name: "PlayBuf",
    description: "Buffer playback",
    category: UGenCategory::Buffer,
    inputs: &[
        InputSpec::required("buffer_id"),
        InputSpec::new("rate", 1.0),
        InputSpec::new("trigger", 1.0),
        InputSpec::new("start_position", 0.0),
        InputSpec::new("loop", 0.0),
        InputSpec::new("done_action", 0.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Channels { default: 1 },
    flags: UGenFlags::NONE.done_flag(),
};

/// `BufRd`: reads a buffer at an arbitrary phase.
pub static BUF_RD: UGenSpec = UGenSpec {
    name: "BufRd",
    description: "Buffer reader",
    category: UGenCategory::Buffer,
    inputs: &[
        InputSpec::required("buffer_id"),
        InputSpec::new("phase", 0.0),
        InputSpec::new("loop", 1.0),
        InputSpec::new("interpolation", 2.0),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Channels { default: 1 },
    flags: UGenFlags::NONE,
};

/// `RecordBuf`: records its source into a buffer.
pub static RECORD_BUF: UGenSpec = UGenSpec {
    name: "RecordBuf",
    description: "Buffer recorder",
    category: UGenCategory::Buffer,
    inputs: &[
        InputSpec::required("buffer_id"),
        InputSpec::new("offset", 0.0),
        InputSpec::new("record_level", 1.0),
        InputSpec::new("preexisting_level", 0.0),
        InputSpec::new("run", 1.0),
        InputSpec::new("loop", 1.0),
        InputSpec::new("trigger", 1.0),
        InputSpec::new("done_action", 0.0),
        InputSpec::required("source").unexpanded(),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.done_flag(),
};

/// `BufDur`: buffer duration in seconds.
pub static BUF_DUR: UGenSpec = UGenSpec {
    name: "BufDur",
    description: "Buffer duration",
    category: UGenCategory::Buffer,
    inputs: &[InputSpec::required("buffer_id")],
    rates: IR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

/// `BufRateScale`: playback ratio correcting for the buffer sample rate.
pub static BUF_RATE_SCALE: UGenSpec = UGenSpec {
    name: "BufRateScale",
    description: "Buffer rate scale",
    category: UGenCategory::Buffer,
    inputs: &[InputSpec::required("buffer_id")],
    rates: IR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

/// `BufSampleRate`: buffer sample rate.
pub static BUF_SAMPLE_RATE: UGenSpec = UGenSpec {
    name: "BufSampleRate",
    description: "Buffer sample rate",
    category: UGenCategory::Buffer,
    inputs: &[InputSpec::required("buffer_id")],
    rates: IR_KR,
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

/// Every buffer descriptor defined here.
pub static UGENS: &[&UGenSpec] = &[
    &PLAY_BUF,
    &BUF_RD,
    &RECORD_BUF,
    &BUF_DUR,
    &BUF_RATE_SCALE,
    &BUF_SAMPLE_RATE,
];
