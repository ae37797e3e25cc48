//! SynthDef compile demo: build a voice, dump it, encode it, decompile it.
//!
//! Run with: cargo run -p scgraph-ugens --example compile_demo
//! Set RUST_LOG=debug to see the compiler passes.

use scgraph_core::{
    BuildOptions, CalculationRate, DoneAction, Envelope, Parameter, ParameterRate, SynthDefBuilder,
    SynthDefError, UGenCategory,
};
use scgraph_ugens::{
    FftCall, IFFT, LPF, PAN2, PV_MAG_FREEZE, SAW, UGenRegistry, WHITE_NOISE, decompile, env_gen,
    out, write_synthdefs,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SynthDefError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // --- Registry ---
    println!("=== UGen Registry ===\n");

    let registry = UGenRegistry::new();
    println!("{} descriptors", registry.len());
    for category in [
        UGenCategory::Oscillator,
        UGenCategory::Filter,
        UGenCategory::Spectral,
    ] {
        let names: Vec<&str> = registry.in_category(category).iter().map(|s| s.name).collect();
        println!("  {:<12} {}", category.name(), names.join(", "));
    }

    // --- Subtractive voice ---
    println!("\n=== Subtractive Voice ===\n");

    let builder = SynthDefBuilder::new();
    let frequency = builder.add_parameter(Parameter::new("frequency", 220.0).with_lag(0.1))?;
    let amplitude = builder.add_parameter(Parameter::new("amplitude", 0.2))?;
    let cutoff = builder.add_parameter(Parameter::new("cutoff", 1200.0))?;
    let pan = builder.add_parameter(Parameter::new("pan", 0.0))?;
    let gate = builder
        .add_parameter(Parameter::new("gate", 1.0).with_rate(ParameterRate::Trigger))?;

    let envelope = Envelope::adsr(0.01, 0.3, 0.5, 1.0, 1.0, -4.0, 0.0);
    let level = env_gen(CalculationRate::Control, &envelope)
        .arg("gate", gate)
        .arg("done_action", DoneAction::FreeSynth)
        .add_to(&builder)?;

    let detuned = builder.mul(&frequency, [1.0, 1.005])?;
    let saws = SAW.ar().arg("frequency", detuned).add_to(&builder)?;
    let mixed = builder.mix(saws)?;
    let filtered = LPF
        .ar()
        .arg("source", mixed)
        .arg("frequency", cutoff)
        .add_to(&builder)?;
    let scaled = builder.mul(builder.mul(filtered, level)?, amplitude)?;
    let stereo = PAN2
        .ar()
        .arg("source", scaled)
        .arg("position", pan)
        .add_to(&builder)?;
    out(&builder, 0.0, stereo)?;

    let voice = builder.build_with(&BuildOptions::new().with_name("saw_voice"))?;
    println!("{voice}");

    let bytes = voice.compile(false)?;
    println!("\nEncoded {} bytes", bytes.len());
    println!("Anonymous name: {}", voice.anonymous_name());

    // --- Spectral freeze ---
    println!("\n=== Spectral Freeze ===\n");

    let builder = SynthDefBuilder::new();
    let freeze = builder.add_parameter(Parameter::new("freeze", 0.0))?;
    let noise = WHITE_NOISE.ar().add_to(&builder)?;
    let chain = FftCall::new(noise).window_size(1024.0).add_to(&builder)?;
    let frozen = PV_MAG_FREEZE
        .kr()
        .arg("pv_chain", chain)
        .arg("freeze", freeze)
        .add_to(&builder)?;
    let resynthesized = IFFT.ar().arg("pv_chain", frozen).add_to(&builder)?;
    out(&builder, 0.0, builder.mul(resynthesized, 0.1)?)?;

    let spectral = builder.build(None, true)?;
    println!("{spectral}");

    // --- Decompile ---
    println!("\n=== Decompile ===\n");

    let decoded = decompile(&bytes)?;
    println!("Decoded '{}' with {} UGens", decoded.effective_name(), decoded.ugens().len());
    println!("Byte-identical: {}", decoded.compile(false)? == bytes);

    println!("\n=== Graphviz ===\n");
    println!("{}", decoded.to_dot());

    // --- Files ---
    let dir = std::env::temp_dir().join("scgraph_demo");
    let paths = write_synthdefs(&dir, &[voice, spectral])?;
    println!("\n=== Files ===\n");
    for path in &paths {
        println!("  {}", path.display());
    }

    Ok(())
}
