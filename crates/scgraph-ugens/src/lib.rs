//! UGen descriptor catalog and registry for scgraph.
//!
//! This crate holds the [`UGenSpec`](scgraph_core::UGenSpec) records for the
//! common SuperCollider unit generators and a registry that looks them up by
//! class name. The registry implements
//! [`UGenCatalog`](scgraph_core::UGenCatalog), so decoding a `.scsyndef`
//! file through it recovers input names and optimization flags.
//!
//! # Features
//!
//! - **Descriptor Catalog**: Oscillators, noise, filters, delays, envelopes,
//!   bus I/O, buffers, panners and FFT/PV chains as static records
//! - **Registry**: Lookup by class name and listing by category
//! - **Helpers**: Constructors that need more than a descriptor
//!   ([`env_gen`], [`FftCall`], [`out`])
//! - **Decompiling**: [`decompile`] and [`decompile_all`] decode with the
//!   full catalog; [`write_synthdefs`] / [`read_synthdefs`] persist files
//!
//! # Example
//!
//! ```rust,ignore
//! use scgraph_core::{Parameter, SynthDefBuilder};
//! use scgraph_ugens::{SIN_OSC, decompile, out};
//!
//! let builder = SynthDefBuilder::new();
//! let freq = builder.add_parameter(Parameter::new("freq", 440.0))?;
//! let sine = SIN_OSC.ar().arg("frequency", freq).add_to(&builder)?;
//! out(&builder, 0.0, builder.mul(sine, 0.1)?)?;
//!
//! let bytes = builder.build(Some("sine"), true)?.compile(false)?;
//! let synthdef = decompile(&bytes)?;
//! println!("{synthdef}");
//! ```

pub mod buffers;
pub mod delays;
pub mod envelopes;
pub mod file;
pub mod filters;
pub mod io;
pub mod noise;
pub mod oscillators;
pub mod panning;
pub mod registry;
pub mod spectral;

use scgraph_core::CalculationRate;

// Re-export main types at crate root
pub use buffers::{BUF_DUR, BUF_RATE_SCALE, BUF_RD, BUF_SAMPLE_RATE, PLAY_BUF, RECORD_BUF};
pub use delays::{
    ALLPASS_C, ALLPASS_L, ALLPASS_N, COMB_C, COMB_L, COMB_N, DELAY_C, DELAY_L, DELAY_N,
};
pub use envelopes::{
    DETECT_SILENCE, DONE, ENV_GEN, FREE_SELF, FREE_SELF_WHEN_DONE, I_ENV_GEN, LINE, LINEN,
    PAUSE_SELF, X_LINE, env_gen, i_env_gen,
};
pub use file::{read_synthdefs, write_synthdefs};
pub use filters::{
    BPF, BRF, DECAY, DECAY2, HPF, INTEGRATOR, LAG, LAG2, LEAK_DC, LPF, ONE_POLE, RHPF, RLPF,
};
pub use io::{
    IN, IN_FEEDBACK, LOCAL_IN, LOCAL_OUT, OFFSET_OUT, OUT, REPLACE_OUT, X_OUT, local_in, out,
};
pub use noise::{
    BROWN_NOISE, CLIP_NOISE, DUST, DUST2, EXP_RAND, GRAY_NOISE, I_RAND, LF_NOISE0, LF_NOISE1,
    LF_NOISE2, PINK_NOISE, RAND, WHITE_NOISE,
};
pub use oscillators::{
    BLIP, IMPULSE, LF_CUB, LF_PAR, LF_PULSE, LF_SAW, LF_TRI, PULSE, SAW, SIN_OSC, SYNC_SAW, VAR_SAW,
};
pub use panning::{BALANCE2, LIN_PAN2, PAN_AZ, PAN2, PAN4};
pub use registry::{UGenRegistry, decompile, decompile_all};
pub use spectral::{
    DEFAULT_FFT_SIZE, FFT, FftCall, IFFT, PV_ADD, PV_BIN_SCRAMBLE, PV_BRICK_WALL, PV_MAG_ABOVE,
    PV_MAG_FREEZE, PV_MAG_MUL, PV_MUL, PV_PHASE_SHIFT, PV_RAND_COMB,
};

/// Audio and control rate.
pub(crate) const AR_KR: &[CalculationRate] = &[CalculationRate::Audio, CalculationRate::Control];

/// Control rate only.
pub(crate) const KR: &[CalculationRate] = &[CalculationRate::Control];

/// Scalar rate only.
pub(crate) const IR: &[CalculationRate] = &[CalculationRate::Scalar];

/// Scalar and control rate.
pub(crate) const IR_KR: &[CalculationRate] = &[CalculationRate::Scalar, CalculationRate::Control];
