//! Bus reads and writes.
//!
//! Writers (`Out` and friends) have no outputs and are never eliminated.
//! `LocalIn` reads what `LocalOut` wrote one block earlier, so the sorter
//! treats it as a feedback reader and lets it precede its own writer.

use scgraph_core::{
    CalculationRate, InputSpec, OutputSpec, RateCheck, Result, Signal, SynthDefBuilder, UGenCall,
    UGenCategory, UGenFlags, UGenSpec,
};

use crate::AR_KR;

const WRITER_INPUTS: &[InputSpec] = &[
    InputSpec::new("bus", 0.0),
    InputSpec::required("source")
        .unexpanded()
        .checked(RateCheck::AudioWhenAudio),
];

/// `Out`: mixes signals onto consecutive buses.
pub static OUT: UGenSpec = UGenSpec {
    name: "Out",
    description: "Bus write",
    category: UGenCategory::InputOutput,
    inputs: WRITER_INPUTS,
    rates: AR_KR,
    outputs: OutputSpec::Fixed(0),
    flags: UGenFlags::NONE.output(),
};

/// `ReplaceOut`: overwrites buses instead of mixing.
pub static REPLACE_OUT: UGenSpec = UGenSpec {
    name: "ReplaceOut",
    description: "Bus overwrite",
    category: UGenCategory::InputOutput,
    inputs: WRITER_INPUTS,
    rates: AR_KR,
    outputs: OutputSpec::Fixed(0),
    flags: UGenFlags::NONE.output(),
};

/// `OffsetOut`: sample-accurate bus write for scheduled synths.
pub static OFFSET_OUT: UGenSpec = UGenSpec {
    name: "OffsetOut",
    description: "Sample-offset bus write",
    category: UGenCategory::InputOutput,
    inputs: WRITER_INPUTS,
    rates: AR_KR,
    outputs: OutputSpec::Fixed(0),
    flags: UGenFlags::NONE.output(),
};

/// `XOut`: crossfades between the bus contents and the source.
pub static X_OUT: UGenSpec = UGenSpec {
    name: "XOut",
    description: "Crossfading bus write",
    category: UGenCategory::InputOutput,
    inputs: &[
        InputSpec::new("bus", 0.0),
        InputSpec::new("crossfade", 0.0),
        InputSpec::required("source")
            .unexpanded()
            .checked(RateCheck::AudioWhenAudio),
    ],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(0),
    flags: UGenFlags::NONE.output(),
};

/// `In`: reads consecutive buses.
pub static IN: UGenSpec = UGenSpec {
    name: "In",
    description: "Bus read",
    category: UGenCategory::InputOutput,
    inputs: &[InputSpec::new("bus", 0.0)],
    rates: AR_KR,
    outputs: OutputSpec::Channels { default: 1 },
    flags: UGenFlags::NONE.input(),
};

/// `InFeedback`: reads audio buses including what was written last block.
pub static IN_FEEDBACK: UGenSpec = UGenSpec {
    name: "InFeedback",
    description: "Bus read with feedback",
    category: UGenCategory::InputOutput,
    inputs: &[InputSpec::new("bus", 0.0)],
    rates: &[CalculationRate::Audio],
    outputs: OutputSpec::Channels { default: 1 },
    flags: UGenFlags::NONE.input(),
};

/// `LocalIn`: reads the synth-local feedback bus.
pub static LOCAL_IN: UGenSpec = UGenSpec {
    name: "LocalIn",
    description: "Local feedback bus read",
    category: UGenCategory::InputOutput,
    inputs: &[InputSpec::new("default", 0.0).unexpanded()],
    rates: AR_KR,
    outputs: OutputSpec::Channels { default: 1 },
    flags: UGenFlags::NONE.input().feedback_reader(),
};

/// `LocalOut`: writes the synth-local feedback bus.
pub static LOCAL_OUT: UGenSpec = UGenSpec {
    name: "LocalOut",
    description: "Local feedback bus write",
    category: UGenCategory::InputOutput,
    inputs: &[InputSpec::required("source").unexpanded()],
    rates: AR_KR,
    outputs: OutputSpec::Fixed(0),
    flags: UGenFlags::NONE.output(),
};

/// Every bus I/O descriptor.
pub static UGENS: &[&UGenSpec] = &[
    &OUT,
    &REPLACE_OUT,
    &OFFSET_OUT,
    &X_OUT,
    &IN,
    &IN_FEEDBACK,
    &LOCAL_IN,
    &LOCAL_OUT,
];

/// Writes `source` to consecutive buses starting at `bus`.
///
/// Runs at audio rate when any channel of `source` is audio rate and at
/// control rate otherwise, so control signals never trip the audio-rate
/// input check.
pub fn out(
    builder: &SynthDefBuilder,
    bus: impl Into<Signal>,
    source: impl Into<Signal>,
) -> Result<()> {
    let source = source.into();
    let rate = match source.rate() {
        CalculationRate::Audio => CalculationRate::Audio,
        _ => CalculationRate::Control,
    };
    OUT.at(rate)
        .arg("bus", bus)
        .arg("source", source)
        .add_to(builder)?;
    Ok(())
}

/// Starts a `LocalIn` call with `channels` outputs.
///
/// `default` is repeated cyclically to one value per channel.
pub fn local_in(
    rate: CalculationRate,
    channels: u32,
    default: impl Into<Signal>,
) -> UGenCall<'static> {
    let default = default.into().flatten();
    let values: Vec<Signal> = if default.is_empty() {
        vec![Signal::Constant(0.0); channels as usize]
    } else {
        default.iter().cycle().take(channels as usize).cloned().collect()
    };
    LOCAL_IN
        .at(rate)
        .channels(channels)
        .arg("default", values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scgraph_core::Input;

    #[test]
    fn out_follows_the_source_rate() {
        let builder = SynthDefBuilder::new();
        let audio = IN.ar().channels(2).add_to(&builder).unwrap();
        out(&builder, 0.0, audio).unwrap();
        let control = IN.kr().arg("bus", 4.0).add_to(&builder).unwrap();
        out(&builder, 1.0, control).unwrap();

        let synthdef = builder.build(Some("router"), true).unwrap();
        let mut writers: Vec<_> = synthdef
            .ugens()
            .iter()
            .filter(|u| u.class_name() == "Out")
            .map(|u| (u.rate(), u.inputs().len()))
            .collect();
        writers.sort_by_key(|(_, inputs)| *inputs);
        assert_eq!(
            writers,
            vec![(CalculationRate::Control, 2), (CalculationRate::Audio, 3)]
        );
    }

    #[test]
    fn constant_source_writes_at_control_rate() {
        let builder = SynthDefBuilder::new();
        out(&builder, 0.0, 0.5).unwrap();
        let synthdef = builder.build(Some("dc"), true).unwrap();
        assert_eq!(synthdef.ugens()[0].rate(), CalculationRate::Control);
    }

    #[test]
    fn local_in_repeats_its_default() {
        let builder = SynthDefBuilder::new();
        let feedback = local_in(CalculationRate::Audio, 3, [0.25, 0.5])
            .add_to(&builder)
            .unwrap();
        assert_eq!(feedback.channel_count(), 3);
        LOCAL_OUT.ar().arg("source", feedback).add_to(&builder).unwrap();

        let synthdef = builder.build(Some("loop"), false).unwrap();
        let reader = &synthdef.ugens()[0];
        assert_eq!(reader.class_name(), "LocalIn");
        assert_eq!(reader.output_count(), 3);
        assert_eq!(
            reader.inputs(),
            &[Input::Constant(0.25), Input::Constant(0.5), Input::Constant(0.25)]
        );
    }
}
