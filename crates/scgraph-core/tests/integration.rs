//! Integration tests for scgraph-core.
//!
//! Builds small graphs through the public API with test-local UGen
//! descriptors, then checks the compiled bytes against known-good
//! SuperCollider output, the human-readable dump and decoder round-trips.

use scgraph_core::{
    BuildOptions, CalculationRate, InputSpec, OutputSpec, Parameter, ParameterRate, RateCheck,
    Signal, SynthDef, SynthDefBuilder, SynthDefError, UGenCatalog, UGenCategory, UGenFlags,
    UGenSpec, decode_synthdef, decode_synthdefs, encode_synthdefs,
};

static SIN_OSC: UGenSpec = UGenSpec {
    name: "SinOsc",
    description: "Sine oscillator",
    category: UGenCategory::Oscillator,
    inputs: &[InputSpec::new("frequency", 440.0), InputSpec::new("phase", 0.0)],
    rates: &[CalculationRate::Audio, CalculationRate::Control],
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

static WHITE_NOISE: UGenSpec = UGenSpec {
    name: "WhiteNoise",
    description: "White noise",
    category: UGenCategory::Noise,
    inputs: &[],
    rates: &[CalculationRate::Audio, CalculationRate::Control],
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE,
};

static DELAY_N: UGenSpec = UGenSpec {
    name: "DelayN",
    description: "Delay line",
    category: UGenCategory::Delay,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("maximum_delay_time", 0.2),
        InputSpec::new("delay_time", 0.2),
    ],
    rates: &[CalculationRate::Audio, CalculationRate::Control],
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

static LOCAL_IN: UGenSpec = UGenSpec {
    name: "LocalIn",
    description: "Local feedback bus read",
    category: UGenCategory::InputOutput,
    inputs: &[InputSpec::new("default", 0.0).unexpanded()],
    rates: &[CalculationRate::Audio, CalculationRate::Control],
    outputs: OutputSpec::Channels { default: 1 },
    flags: UGenFlags::NONE.input().feedback_reader(),
};

static LOCAL_OUT: UGenSpec = UGenSpec {
    name: "LocalOut",
    description: "Local feedback bus write",
    category: UGenCategory::InputOutput,
    inputs: &[InputSpec::required("source").unexpanded()],
    rates: &[CalculationRate::Audio, CalculationRate::Control],
    outputs: OutputSpec::Fixed(0),
    flags: UGenFlags::NONE.output(),
};

static OUT: UGenSpec = UGenSpec {
    name: "Out",
    description: "Bus write",
    category: UGenCategory::InputOutput,
    inputs: &[
        InputSpec::new("bus", 0.0),
        InputSpec::required("source")
            .unexpanded()
            .checked(RateCheck::AudioWhenAudio),
    ],
    rates: &[CalculationRate::Audio, CalculationRate::Control],
    outputs: OutputSpec::Fixed(0),
    flags: UGenFlags::NONE.output(),
};

static DECAY2: UGenSpec = UGenSpec {
    name: "Decay2",
    description: "Attack and decay envelope follower",
    category: UGenCategory::Filter,
    inputs: &[
        InputSpec::required("source"),
        InputSpec::new("attack_time", 0.01),
        InputSpec::new("decay_time", 1.0),
    ],
    rates: &[CalculationRate::Audio, CalculationRate::Control],
    outputs: OutputSpec::Fixed(1),
    flags: UGenFlags::NONE.pure(),
};

struct TestCatalog;

impl UGenCatalog for TestCatalog {
    fn lookup(&self, name: &str) -> Option<&UGenSpec> {
        [&SIN_OSC, &WHITE_NOISE, &DELAY_N, &DECAY2, &LOCAL_IN, &LOCAL_OUT, &OUT]
            .into_iter()
            .find(|spec| spec.name == name)
    }
}

fn bytes(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

fn roundtrip(synthdef: &SynthDef) -> Vec<u8> {
    let encoded = synthdef.compile(false).unwrap();
    let decoded = decode_synthdef(&encoded, &TestCatalog).unwrap();
    let reencoded = decoded.compile(false).unwrap();
    assert_eq!(reencoded, encoded, "decode then encode must reproduce the bytes");
    encoded
}

fn build_foo() -> SynthDef {
    let builder = SynthDefBuilder::new();
    let _guard = builder.enter();
    let sine_one = SIN_OSC.ar().arg("frequency", 420.0).register().unwrap();
    let sine_two = SIN_OSC.ar().arg("frequency", 440.0).register().unwrap();
    let sines = builder.mul(sine_one, sine_two).unwrap();
    OUT.ar()
        .arg("bus", 0.0)
        .arg("source", sines)
        .register()
        .unwrap();
    builder.build(Some("foo"), true).unwrap()
}

fn simple_sine(builder: &SynthDefBuilder) {
    let amplitude = builder.add_parameter(Parameter::new("amplitude", 0.0)).unwrap();
    let bus = builder.add_parameter(Parameter::new("bus", 0.0)).unwrap();
    let frequency = builder.add_parameter(Parameter::new("frequency", 440.0)).unwrap();
    let sine = SIN_OSC.ar().arg("frequency", frequency).add_to(builder).unwrap();
    let source = builder.mul(sine, amplitude).unwrap();
    OUT.ar()
        .arg("bus", bus)
        .arg("source", source)
        .add_to(builder)
        .unwrap();
}

// ============================================================================
// 1. Byte fixtures
// ============================================================================

#[test]
fn foo_matches_sclang_bytes() {
    let expected = bytes(&[
        b"SCgf",
        b"\x00\x00\x00\x02",
        b"\x00\x01",
        b"\x03foo",
        b"\x00\x00\x00\x03",
        b"C\xd2\x00\x00",
        b"\x00\x00\x00\x00",
        b"C\xdc\x00\x00",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x04",
        b"\x06SinOsc",
        b"\x02",
        b"\x00\x00\x00\x02",
        b"\x00\x00\x00\x01",
        b"\x00\x00",
        b"\xff\xff\xff\xff",
        b"\x00\x00\x00\x00",
        b"\xff\xff\xff\xff",
        b"\x00\x00\x00\x01",
        b"\x02",
        b"\x06SinOsc",
        b"\x02",
        b"\x00\x00\x00\x02",
        b"\x00\x00\x00\x01",
        b"\x00\x00",
        b"\xff\xff\xff\xff",
        b"\x00\x00\x00\x02",
        b"\xff\xff\xff\xff",
        b"\x00\x00\x00\x01",
        b"\x02",
        b"\x0cBinaryOpUGen",
        b"\x02",
        b"\x00\x00\x00\x02",
        b"\x00\x00\x00\x01",
        b"\x00\x02",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x01",
        b"\x00\x00\x00\x00",
        b"\x02",
        b"\x03Out",
        b"\x02",
        b"\x00\x00\x00\x02",
        b"\x00\x00\x00\x00",
        b"\x00\x00",
        b"\xff\xff\xff\xff",
        b"\x00\x00\x00\x01",
        b"\x00\x00\x00\x02",
        b"\x00\x00\x00\x00",
        b"\x00\x00",
    ]);
    let synthdef = build_foo();
    assert_eq!(synthdef.constants(), &[420.0, 0.0, 440.0]);
    assert_eq!(synthdef.compile(false).unwrap(), expected);
    roundtrip(&synthdef);
}

#[test]
fn freq_parameter_matches_sclang_bytes() {
    let expected = bytes(&[
        b"SCgf",
        b"\x00\x00\x00\x02",
        b"\x00\x01",
        b"\x04test",
        b"\x00\x00\x00\x01",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x01",
        b"C\xdc\x00\x00",
        b"\x00\x00\x00\x01",
        b"\x04freq",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x03",
        b"\x07Control",
        b"\x01",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x01",
        b"\x00\x00",
        b"\x01",
        b"\x06SinOsc",
        b"\x02",
        b"\x00\x00\x00\x02",
        b"\x00\x00\x00\x01",
        b"\x00\x00",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x00",
        b"\xff\xff\xff\xff",
        b"\x00\x00\x00\x00",
        b"\x02",
        b"\x03Out",
        b"\x02",
        b"\x00\x00\x00\x02",
        b"\x00\x00\x00\x00",
        b"\x00\x00",
        b"\xff\xff\xff\xff",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x01",
        b"\x00\x00\x00\x00",
        b"\x00\x00",
    ]);
    let builder = SynthDefBuilder::new();
    let freq = builder.add_parameter(Parameter::new("freq", 440.0)).unwrap();
    let sine = SIN_OSC.ar().arg("frequency", freq).add_to(&builder).unwrap();
    OUT.ar()
        .arg("bus", 0.0)
        .arg("source", sine)
        .add_to(&builder)
        .unwrap();
    let synthdef = builder.build(Some("test"), true).unwrap();
    assert_eq!(synthdef.compile(false).unwrap(), expected);

    let decoded = decode_synthdef(&expected, &TestCatalog).unwrap();
    let (freq, slot) = decoded.parameter("freq").unwrap();
    assert_eq!(freq.value, vec![440.0]);
    assert_eq!(slot, 0);
}

// ============================================================================
// 2. Dump format
// ============================================================================

#[test]
fn simple_sine_dump() {
    let builder = SynthDefBuilder::new();
    simple_sine(&builder);
    let synthdef = builder.build(Some("simple_sine"), true).unwrap();
    let expected = "\
synthdef:
    name: simple_sine
    ugens:
    -   Control.kr:
            amplitude: 0.0
            bus: 0.0
            frequency: 440.0
    -   SinOsc.ar:
            frequency: Control.kr[2:frequency]
            phase: 0.0
    -   BinaryOpUGen(MULTIPLICATION).ar:
            left: SinOsc.ar[0]
            right: Control.kr[0:amplitude]
    -   Out.ar:
            bus: Control.kr[1:bus]
            source[0]: BinaryOpUGen(MULTIPLICATION).ar[0]";
    assert_eq!(synthdef.to_string(), expected);
}

#[test]
fn anonymous_build_is_idempotent() {
    let builder = SynthDefBuilder::new();
    simple_sine(&builder);
    let a = builder.build(None, true).unwrap();
    let b = builder.build(None, true).unwrap();
    let c = builder.build(None, true).unwrap();
    assert_eq!(a.to_string(), b.to_string());
    assert_eq!(b.to_string(), c.to_string());
    assert!(a.name().is_none());
    assert!(a.to_string().contains(&format!("name: {}", a.anonymous_name())));
}

// ============================================================================
// 3. Construction-time simplification
// ============================================================================

#[test]
fn algebraic_identities_allocate_nothing() {
    let builder = SynthDefBuilder::new();
    let x = SIN_OSC.ar().add_to(&builder).unwrap();
    assert_eq!(builder.mul(&x, 0.0).unwrap(), Signal::Constant(0.0));
    assert_eq!(builder.mul(&x, 1.0).unwrap(), x);
    assert_eq!(builder.add(&x, 0.0).unwrap(), x);
    assert_eq!(builder.add(2.0, 3.0).unwrap(), Signal::Constant(5.0));
    assert_eq!(builder.len(), 1);

    let negated = builder.mul(&x, -1.0).unwrap();
    assert_ne!(negated, x);
    assert_eq!(builder.len(), 2);
    OUT.ar()
        .arg("source", negated)
        .add_to(&builder)
        .unwrap();
    let synthdef = builder.build(Some("neg"), true).unwrap();
    assert!(synthdef.to_string().contains("UnaryOpUGen(NEGATIVE).ar:"));
}

#[test]
fn multichannel_argument_expands_to_parallel_nodes() {
    let builder = SynthDefBuilder::new();
    let sines = SIN_OSC
        .ar()
        .arg("frequency", [220.0, 330.0, 440.0])
        .add_to(&builder)
        .unwrap();
    assert_eq!(sines.channel_count(), 3);
    OUT.ar()
        .arg("source", sines)
        .add_to(&builder)
        .unwrap();
    let synthdef = builder.build(Some("chord"), true).unwrap();
    let sine_count = synthdef
        .ugens()
        .iter()
        .filter(|ugen| ugen.class_name() == "SinOsc")
        .count();
    assert_eq!(sine_count, 3);
    assert_eq!(synthdef.ugens().last().unwrap().inputs().len(), 4);
}

// ============================================================================
// 4. Optimization policy
// ============================================================================

fn twin_sines() -> SynthDefBuilder {
    let builder = SynthDefBuilder::new();
    let a = SIN_OSC.ar().add_to(&builder).unwrap();
    let b = SIN_OSC.ar().add_to(&builder).unwrap();
    let sum = builder.add(a, b).unwrap();
    OUT.ar().arg("source", sum).add_to(&builder).unwrap();
    builder
}

#[test]
fn identical_pure_nodes_stay_separate_by_default() {
    let synthdef = twin_sines().build(Some("twins"), true).unwrap();
    let dump = synthdef.to_string();
    assert!(dump.contains("SinOsc.ar/0:"));
    assert!(dump.contains("SinOsc.ar/1:"));
    assert_eq!(synthdef.ugens().len(), 4);
}

#[test]
fn folding_merges_identical_pure_nodes() {
    let options = BuildOptions::new()
        .with_name("twins")
        .with_fold_common_subexpressions(true);
    let synthdef = twin_sines().build_with(&options).unwrap();
    assert_eq!(synthdef.ugens().len(), 3);
    let dump = synthdef.to_string();
    assert!(dump.contains("-   SinOsc.ar:"));
    assert!(dump.contains("left: SinOsc.ar[0]\n            right: SinOsc.ar[0]"));
}

#[test]
fn noise_sources_never_merge() {
    let builder = SynthDefBuilder::new();
    let a = WHITE_NOISE.ar().add_to(&builder).unwrap();
    let b = WHITE_NOISE.ar().add_to(&builder).unwrap();
    let sum = builder.add(a, b).unwrap();
    OUT.ar().arg("source", sum).add_to(&builder).unwrap();
    let options = BuildOptions::new().with_fold_common_subexpressions(true);
    let synthdef = builder.build_with(&options).unwrap();
    assert_eq!(synthdef.ugens().len(), 4);
}

#[test]
fn unused_pure_nodes_are_eliminated_only_when_optimizing() {
    let builder = SynthDefBuilder::new();
    SIN_OSC.ar().arg("frequency", 110.0).add_to(&builder).unwrap();
    let kept = SIN_OSC.ar().add_to(&builder).unwrap();
    OUT.ar().arg("source", kept).add_to(&builder).unwrap();

    let optimized = builder.build(Some("dce"), true).unwrap();
    assert_eq!(optimized.ugens().len(), 2);
    let raw = builder.build(Some("dce"), false).unwrap();
    assert_eq!(raw.ugens().len(), 3);
}

#[test]
fn options_loaded_from_toml_drive_the_build() {
    let options = BuildOptions::from_toml(
        r#"
name = "from_toml"
fold_common_subexpressions = true
"#,
    )
    .unwrap();
    let synthdef = twin_sines().build_with(&options).unwrap();
    assert_eq!(synthdef.name(), Some("from_toml"));
    assert_eq!(synthdef.ugens().len(), 3);
}

// ============================================================================
// 5. Parameters
// ============================================================================

#[test]
fn parameters_are_ordered_by_name() {
    let builder = SynthDefBuilder::new();
    let zebra = builder.add_parameter(Parameter::new("zebra", 1.0)).unwrap();
    let alpha = builder.add_parameter(Parameter::new("alpha", 2.0)).unwrap();
    let sine = SIN_OSC
        .ar()
        .arg("frequency", zebra)
        .arg("phase", alpha)
        .add_to(&builder)
        .unwrap();
    OUT.ar().arg("source", sine).add_to(&builder).unwrap();
    let synthdef = builder.build(Some("order"), true).unwrap();

    let names: Vec<_> = synthdef.indexed_parameters().map(|(name, _, i)| (name, i)).collect();
    assert_eq!(names, vec![("alpha", 0), ("zebra", 1)]);
    assert!(synthdef.to_string().contains("frequency: Control.kr[1:zebra]"));
}

#[test]
fn parameter_rates_get_separate_controls() {
    let builder = SynthDefBuilder::new();
    let gate = builder
        .add_parameter(Parameter::new("gate", 1.0).with_rate(ParameterRate::Trigger))
        .unwrap();
    let offset = builder
        .add_parameter(Parameter::new("offset", 0.0).with_rate(ParameterRate::Scalar))
        .unwrap();
    let input = builder
        .add_parameter(Parameter::new("input", 0.0).with_rate(ParameterRate::Audio))
        .unwrap();
    let freq = builder.add_parameter(Parameter::new("freq", 440.0)).unwrap();
    let sine = SIN_OSC
        .ar()
        .arg("frequency", freq)
        .arg("phase", offset)
        .add_to(&builder)
        .unwrap();
    let gated = builder.mul(sine, gate).unwrap();
    let mixed = builder.add(gated, input).unwrap();
    OUT.ar().arg("source", mixed).add_to(&builder).unwrap();
    let synthdef = builder.build(Some("rates"), true).unwrap();

    let controls: Vec<(&str, CalculationRate, u16)> = synthdef
        .controls()
        .map(|c| (c.class_name(), c.rate(), c.special_index()))
        .collect();
    assert_eq!(
        controls,
        vec![
            ("Control", CalculationRate::Scalar, 0),
            ("TrigControl", CalculationRate::Control, 1),
            ("AudioControl", CalculationRate::Audio, 2),
            ("Control", CalculationRate::Control, 3),
        ]
    );
    assert!(synthdef.has_gate());

    let decoded = decode_synthdef(&roundtrip(&synthdef), &TestCatalog).unwrap();
    let (gate, slot) = decoded.parameter("gate").unwrap();
    assert_eq!(gate.rate, ParameterRate::Trigger);
    assert_eq!(slot, 1);
}

fn build_trig_test() -> SynthDef {
    let builder = SynthDefBuilder::new();
    let freq = builder.add_parameter(Parameter::new("freq", 440.0)).unwrap();
    let trig_b = builder
        .add_parameter(Parameter::new("t_trig_b", 0.0).with_rate(ParameterRate::Trigger))
        .unwrap();
    let phase = builder
        .add_parameter(Parameter::new("a_phase", 0.0).with_rate(ParameterRate::Audio))
        .unwrap();
    let trig_a = builder
        .add_parameter(Parameter::new("t_trig_a", 0.0).with_rate(ParameterRate::Trigger))
        .unwrap();
    let decay_time = builder
        .add_parameter(Parameter::new("i_decay_time", 1.0).with_rate(ParameterRate::Scalar))
        .unwrap();
    let decay = DECAY2
        .kr()
        .arg("source", vec![trig_a, trig_b])
        .arg("attack_time", 0.005)
        .arg("decay_time", decay_time)
        .add_to(&builder)
        .unwrap();
    let sine = SIN_OSC
        .ar()
        .arg("frequency", freq)
        .arg("phase", phase)
        .add_to(&builder)
        .unwrap();
    let enveloped = builder.mul(sine, decay).unwrap();
    OUT.ar().arg("source", enveloped).add_to(&builder).unwrap();
    builder.build(Some("trigTest"), true).unwrap()
}

#[test]
fn name_table_is_alphabetical_across_rate_groups() {
    // Header, constants, values in slot order, then names alphabetically,
    // as sclang writes them. The UGen section differs: controls come first.
    let expected_prefix = bytes(&[
        b"SCgf",
        b"\x00\x00\x00\x02",
        b"\x00\x01",
        b"\x08trigTest",
        b"\x00\x00\x00\x02",
        b";\xa3\xd7\n",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x05",
        b"?\x80\x00\x00",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x00",
        b"\x00\x00\x00\x00",
        b"C\xdc\x00\x00",
        b"\x00\x00\x00\x05",
        b"\x07a_phase",
        b"\x00\x00\x00\x03",
        b"\x04freq",
        b"\x00\x00\x00\x04",
        b"\x0ci_decay_time",
        b"\x00\x00\x00\x00",
        b"\x08t_trig_a",
        b"\x00\x00\x00\x01",
        b"\x08t_trig_b",
        b"\x00\x00\x00\x02",
        b"\x00\x00\x00\x0a",
    ]);
    let synthdef = build_trig_test();
    let encoded = roundtrip(&synthdef);
    assert_eq!(&encoded[..expected_prefix.len()], expected_prefix.as_slice());

    let names: Vec<_> = synthdef.indexed_parameters().map(|(name, _, i)| (name, i)).collect();
    assert_eq!(
        names,
        vec![
            ("a_phase", 3),
            ("freq", 4),
            ("i_decay_time", 0),
            ("t_trig_a", 1),
            ("t_trig_b", 2),
        ]
    );
    let slots: Vec<_> = synthdef.parameters().iter().map(|(p, i)| (p.name.as_str(), *i)).collect();
    assert_eq!(
        slots,
        vec![
            ("i_decay_time", 0),
            ("t_trig_a", 1),
            ("t_trig_b", 2),
            ("a_phase", 3),
            ("freq", 4),
        ]
    );
}

#[test]
fn scalar_parameter_sorts_after_control_in_name_table() {
    let builder = SynthDefBuilder::new();
    let zebra = builder
        .add_parameter(Parameter::new("zebra", 1.0).with_rate(ParameterRate::Scalar))
        .unwrap();
    let alpha = builder.add_parameter(Parameter::new("alpha", 2.0)).unwrap();
    let sine = SIN_OSC
        .ar()
        .arg("frequency", zebra)
        .arg("phase", alpha)
        .add_to(&builder)
        .unwrap();
    OUT.ar().arg("source", sine).add_to(&builder).unwrap();
    let synthdef = builder.build(Some("p"), false).unwrap();

    let encoded = synthdef.compile(false).unwrap();
    let find = |needle: &[u8]| encoded.windows(needle.len()).position(|w| w == needle).unwrap();
    let alpha_at = find(b"\x05alpha\x00\x00\x00\x01");
    let zebra_at = find(b"\x05zebra\x00\x00\x00\x00");
    assert_eq!(zebra_at, alpha_at + 10);
    // The value table stays in slot order: scalar zebra first.
    assert_eq!(synthdef.parameter("zebra").map(|(_, i)| i), Some(0));
}

#[test]
fn decoded_name_table_keeps_file_order() {
    let builder = SynthDefBuilder::new();
    let zebra = builder
        .add_parameter(Parameter::new("zebra", 1.0).with_rate(ParameterRate::Scalar))
        .unwrap();
    let alpha = builder.add_parameter(Parameter::new("alpha", 2.0)).unwrap();
    let sine = SIN_OSC
        .ar()
        .arg("frequency", zebra)
        .arg("phase", alpha)
        .add_to(&builder)
        .unwrap();
    OUT.ar().arg("source", sine).add_to(&builder).unwrap();
    let mut encoded = builder.build(Some("p"), false).unwrap().compile(false).unwrap();

    // Rewrite the name table in slot order, as another producer might.
    let alpha_entry: &[u8] = b"\x05alpha\x00\x00\x00\x01";
    let zebra_entry: &[u8] = b"\x05zebra\x00\x00\x00\x00";
    let at = encoded
        .windows(alpha_entry.len())
        .position(|w| w == alpha_entry)
        .unwrap();
    encoded[at..at + 10].copy_from_slice(zebra_entry);
    encoded[at + 10..at + 20].copy_from_slice(alpha_entry);

    let decoded = decode_synthdef(&encoded, &TestCatalog).unwrap();
    let names: Vec<_> = decoded.indexed_parameters().map(|(name, _, i)| (name, i)).collect();
    assert_eq!(names, vec![("zebra", 0), ("alpha", 1)]);
    assert_eq!(decoded.compile(false).unwrap(), encoded);
}

#[test]
fn lagged_vector_parameter_uses_lag_control() {
    let builder = SynthDefBuilder::new();
    let amp = builder.add_parameter(Parameter::new("amp", 0.1)).unwrap();
    let freqs = builder
        .add_parameter(Parameter::vector("freqs", [300.0, 400.0]).with_lag(0.5))
        .unwrap();
    let sines = SIN_OSC.ar().arg("frequency", freqs).add_to(&builder).unwrap();
    let mixed = builder.mix(sines).unwrap();
    let scaled = builder.mul(mixed, amp).unwrap();
    OUT.ar().arg("source", scaled).add_to(&builder).unwrap();
    let synthdef = builder.build(Some("arrayarg"), true).unwrap();

    let control = &synthdef.ugens()[0];
    assert_eq!(control.class_name(), "LagControl");
    assert_eq!(control.output_count(), 3);
    assert_eq!(synthdef.constants(), &[0.0, 0.5]);

    let decoded = decode_synthdef(&roundtrip(&synthdef), &TestCatalog).unwrap();
    let (freqs, slot) = decoded.parameter("freqs").unwrap();
    assert_eq!(freqs.value, vec![300.0, 400.0]);
    assert_eq!(freqs.lag, Some(0.5));
    assert_eq!(slot, 1);
}

// ============================================================================
// 6. Feedback and cycles
// ============================================================================

#[test]
fn local_feedback_loop_sorts_and_roundtrips() {
    let builder = SynthDefBuilder::new();
    let feedback = LOCAL_IN.ar().add_to(&builder).unwrap();
    let reader = feedback.as_output().unwrap().ugen();
    let sine = SIN_OSC.ar().add_to(&builder).unwrap();
    let mixed = builder.add(sine, &feedback).unwrap();
    let delayed = DELAY_N.ar().arg("source", mixed).add_to(&builder).unwrap();
    LOCAL_OUT.ar().arg("source", &delayed).add_to(&builder).unwrap();
    OUT.ar().arg("source", &delayed).add_to(&builder).unwrap();
    builder.set_input(reader, 0, &delayed).unwrap();

    let synthdef = builder.build(Some("feedback"), true).unwrap();
    let classes: Vec<&str> = synthdef.ugens().iter().map(|u| u.class_name()).collect();
    let local_in = classes.iter().position(|c| *c == "LocalIn").unwrap();
    let delay = classes.iter().position(|c| *c == "DelayN").unwrap();
    assert!(local_in < delay);
    assert_eq!(classes.len(), 6);
    roundtrip(&synthdef);
}

#[test]
fn cycle_without_feedback_reader_is_rejected() {
    let builder = SynthDefBuilder::new();
    let a = SIN_OSC.ar().add_to(&builder).unwrap();
    let b = SIN_OSC.ar().arg("frequency", &a).add_to(&builder).unwrap();
    OUT.ar().arg("source", &b).add_to(&builder).unwrap();
    builder
        .set_input(a.as_output().unwrap().ugen(), 0, &b)
        .unwrap();

    let err = builder.build(Some("cycle"), true).unwrap_err();
    match err {
        SynthDefError::CyclicGraph { nodes } => {
            assert_eq!(nodes, vec!["SinOsc", "SinOsc", "Out"]);
        }
        other => panic!("expected CyclicGraph, got {other:?}"),
    }
}

// ============================================================================
// 7. Naming and multi-definition files
// ============================================================================

#[test]
fn builds_are_deterministic_across_builders() {
    let a = build_foo();
    let b = build_foo();
    assert_eq!(a.compile(false).unwrap(), b.compile(false).unwrap());
    assert_eq!(a.anonymous_name(), b.anonymous_name());
    assert_eq!(a.compile(true).unwrap(), b.compile(true).unwrap());
}

#[test]
fn anonymous_encoding_hides_the_name() {
    let synthdef = build_foo();
    let encoded = synthdef.compile(true).unwrap();
    let decoded = decode_synthdef(&encoded, &TestCatalog).unwrap();
    assert!(decoded.name().is_none());
    assert_eq!(decoded.effective_name(), synthdef.anonymous_name());
}

#[test]
fn several_synthdefs_share_one_file() {
    let foo = build_foo();
    let builder = SynthDefBuilder::new();
    simple_sine(&builder);
    let sine = builder.build(Some("simple_sine"), true).unwrap();

    let encoded = encode_synthdefs(&[foo.clone(), sine.clone()], false).unwrap();
    assert_eq!(&encoded[8..10], &[0, 2]);
    let decoded = decode_synthdefs(&encoded, &TestCatalog).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].name(), Some("foo"));
    assert_eq!(decoded[1].name(), Some("simple_sine"));
    assert_eq!(decoded[1].to_string(), sine.to_string());

    assert!(matches!(
        decode_synthdef(&encoded, &TestCatalog),
        Err(SynthDefError::MalformedBinary { .. })
    ));
}

#[test]
fn decoded_dump_matches_built_dump() {
    let synthdef = build_foo();
    let decoded = decode_synthdef(&synthdef.compile(false).unwrap(), &TestCatalog).unwrap();
    assert_eq!(decoded.to_string(), synthdef.to_string());
}
