//! Breakpoint envelopes and their flat serialization for `EnvGen`/`IEnvGen`.
//!
//! An [`Envelope`] is an initial amplitude followed by segments of
//! `(amplitude, duration, curve)`. It serializes into the flat list of
//! numbers envelope UGens take as their unexpanded `envelope` input.
//!
//! # Example
//!
//! ```rust,ignore
//! use scgraph_core::Envelope;
//!
//! let env = Envelope::percussive(0.01, 1.0, 1.0, -4.0);
//! assert_eq!(
//!     env.serialize(),
//!     vec![0.0, 2.0, -99.0, -99.0, 1.0, 0.01, 5.0, -4.0, 0.0, 1.0, 5.0, -4.0]
//! );
//! ```

use crate::error::{Result, SynthDefError};
use crate::rate::EnvelopeShape;
use crate::signal::Signal;

/// Placeholder written for an absent release or loop node.
const NO_NODE: f32 = -99.0;

/// Curve of one envelope segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnvelopeCurve {
    /// A named shape.
    Shape(EnvelopeShape),
    /// Custom curvature; 0 is linear, negative bends toward the start.
    Curvature(f32),
}

impl EnvelopeCurve {
    /// `(shape id, curvature)` pair written per segment.
    fn encode(self) -> (f32, f32) {
        match self {
            EnvelopeCurve::Shape(shape) => (shape.id(), 0.0),
            EnvelopeCurve::Curvature(value) => (EnvelopeShape::Custom.id(), value),
        }
    }
}

impl From<EnvelopeShape> for EnvelopeCurve {
    fn from(shape: EnvelopeShape) -> Self {
        EnvelopeCurve::Shape(shape)
    }
}

impl From<f32> for EnvelopeCurve {
    fn from(value: f32) -> Self {
        EnvelopeCurve::Curvature(value)
    }
}

/// One breakpoint segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeSegment {
    /// Target amplitude at the end of the segment.
    pub amplitude: f32,
    /// Segment duration in seconds.
    pub duration: f32,
    /// Segment curve.
    pub curve: EnvelopeCurve,
}

/// A breakpoint envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    initial_amplitude: f32,
    segments: Vec<EnvelopeSegment>,
    release_node: Option<u32>,
    loop_node: Option<u32>,
    offset: f32,
}

impl Envelope {
    /// Creates an envelope from amplitude, duration and curve lists.
    ///
    /// `amplitudes` needs at least two entries and `durations` exactly one
    /// fewer. Curves cycle over the segments; an empty curve list means
    /// linear segments.
    ///
    /// # Errors
    ///
    /// Returns [`SynthDefError::InvalidEnvelope`] for inconsistent lengths.
    pub fn new(amplitudes: &[f32], durations: &[f32], curves: &[EnvelopeCurve]) -> Result<Self> {
        if amplitudes.len() < 2 {
            return Err(SynthDefError::InvalidEnvelope(format!(
                "need at least 2 amplitudes, got {}",
                amplitudes.len()
            )));
        }
        if durations.len() != amplitudes.len() - 1 {
            return Err(SynthDefError::InvalidEnvelope(format!(
                "{} amplitudes need {} durations, got {}",
                amplitudes.len(),
                amplitudes.len() - 1,
                durations.len()
            )));
        }
        let segments = amplitudes[1..]
            .iter()
            .zip(durations)
            .enumerate()
            .map(|(i, (&amplitude, &duration))| EnvelopeSegment {
                amplitude,
                duration,
                curve: if curves.is_empty() {
                    EnvelopeCurve::Shape(EnvelopeShape::Linear)
                } else {
                    curves[i % curves.len()]
                },
            })
            .collect();
        Ok(Self {
            initial_amplitude: amplitudes[0],
            segments,
            release_node: None,
            loop_node: None,
            offset: 0.0,
        })
    }

    /// Creates an envelope from an initial amplitude and explicit segments.
    ///
    /// # Errors
    ///
    /// Returns [`SynthDefError::InvalidEnvelope`] when `segments` is empty.
    pub fn from_segments(initial_amplitude: f32, segments: Vec<EnvelopeSegment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(SynthDefError::InvalidEnvelope(
                "need at least one segment".to_string(),
            ));
        }
        Ok(Self {
            initial_amplitude,
            segments,
            release_node: None,
            loop_node: None,
            offset: 0.0,
        })
    }

    // --- Canned shapes ---

    /// Attack, decay, sustain, release. Sustains at node 2.
    #[allow(clippy::too_many_arguments)]
    pub fn adsr(
        attack_time: f32,
        decay_time: f32,
        sustain: f32,
        release_time: f32,
        peak: f32,
        curve: f32,
        bias: f32,
    ) -> Self {
        let amplitudes = [0.0, peak, peak * sustain, 0.0].map(|a| a + bias);
        Self::fixed(
            &amplitudes,
            &[attack_time, decay_time, release_time],
            &[EnvelopeCurve::Curvature(curve)],
        )
        .with_release_node(2)
    }

    /// Attack, sustain, release. Sustains at node 1.
    pub fn asr(attack_time: f32, sustain: f32, release_time: f32, curve: f32) -> Self {
        Self::fixed(
            &[0.0, sustain, 0.0],
            &[attack_time, release_time],
            &[EnvelopeCurve::Curvature(curve)],
        )
        .with_release_node(1)
    }

    /// Two-segment percussive envelope.
    pub fn percussive(attack_time: f32, release_time: f32, amplitude: f32, curve: f32) -> Self {
        Self::fixed(
            &[0.0, amplitude, 0.0],
            &[attack_time, release_time],
            &[EnvelopeCurve::Curvature(curve)],
        )
    }

    /// Trapezoid: attack, hold, release.
    pub fn linen(
        attack_time: f32,
        sustain_time: f32,
        release_time: f32,
        level: f32,
        curve: EnvelopeCurve,
    ) -> Self {
        Self::fixed(
            &[0.0, level, level, 0.0],
            &[attack_time, sustain_time, release_time],
            &[curve],
        )
    }

    /// Linear rise and fall over `duration`.
    pub fn triangle(duration: f32, amplitude: f32) -> Self {
        let half = duration / 2.0;
        Self::fixed(&[0.0, amplitude, 0.0], &[half, half], &[])
    }

    // Canned shapes always have consistent lengths.
    fn fixed(amplitudes: &[f32], durations: &[f32], curves: &[EnvelopeCurve]) -> Self {
        let segments = amplitudes[1..]
            .iter()
            .zip(durations)
            .enumerate()
            .map(|(i, (&amplitude, &duration))| EnvelopeSegment {
                amplitude,
                duration,
                curve: curves
                    .get(i % curves.len().max(1))
                    .copied()
                    .unwrap_or(EnvelopeCurve::Shape(EnvelopeShape::Linear)),
            })
            .collect();
        Self {
            initial_amplitude: amplitudes[0],
            segments,
            release_node: None,
            loop_node: None,
            offset: 0.0,
        }
    }

    // --- Builders ---

    /// Sets the node the envelope holds at while the gate is open.
    pub fn with_release_node(mut self, node: u32) -> Self {
        self.release_node = Some(node);
        self
    }

    /// Sets the node the envelope loops back to.
    pub fn with_loop_node(mut self, node: u32) -> Self {
        self.loop_node = Some(node);
        self
    }

    /// Sets the offset used by the interpolated layout.
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    // --- Accessors ---

    /// Initial amplitude.
    pub fn initial_amplitude(&self) -> f32 {
        self.initial_amplitude
    }

    /// Segments in order.
    pub fn segments(&self) -> &[EnvelopeSegment] {
        &self.segments
    }

    /// All amplitudes including the initial one.
    pub fn amplitudes(&self) -> Vec<f32> {
        std::iter::once(self.initial_amplitude)
            .chain(self.segments.iter().map(|s| s.amplitude))
            .collect()
    }

    /// Segment durations.
    pub fn durations(&self) -> Vec<f32> {
        self.segments.iter().map(|s| s.duration).collect()
    }

    /// Total duration.
    pub fn duration(&self) -> f32 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// Release node, if any.
    pub fn release_node(&self) -> Option<u32> {
        self.release_node
    }

    /// Loop node, if any.
    pub fn loop_node(&self) -> Option<u32> {
        self.loop_node
    }

    // --- Serialization ---

    /// Flat `EnvGen` layout:
    /// `[initial, count, release|-99, loop|-99, (amplitude, duration, shape, curve)*]`.
    pub fn serialize(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(4 + self.segments.len() * 4);
        out.push(self.initial_amplitude);
        out.push(self.segments.len() as f32);
        out.push(self.release_node.map_or(NO_NODE, |n| n as f32));
        out.push(self.loop_node.map_or(NO_NODE, |n| n as f32));
        for segment in &self.segments {
            let (shape, curve) = segment.curve.encode();
            out.extend([segment.amplitude, segment.duration, shape, curve]);
        }
        out
    }

    /// Flat `IEnvGen` layout:
    /// `[offset, initial, count, total duration, (duration, shape, curve, amplitude)*]`.
    pub fn serialize_interpolated(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(4 + self.segments.len() * 4);
        out.extend([
            self.offset,
            self.initial_amplitude,
            self.segments.len() as f32,
            self.duration(),
        ]);
        for segment in &self.segments {
            let (shape, curve) = segment.curve.encode();
            out.extend([segment.duration, shape, curve, segment.amplitude]);
        }
        out
    }
}

impl Default for Envelope {
    /// `[0, 1, 0]` over two linear unit segments.
    fn default() -> Self {
        Self::fixed(&[0.0, 1.0, 0.0], &[1.0, 1.0], &[])
    }
}

impl From<&Envelope> for Signal {
    fn from(envelope: &Envelope) -> Self {
        Signal::from(envelope.serialize())
    }
}

impl From<Envelope> for Signal {
    fn from(envelope: Envelope) -> Self {
        Signal::from(&envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_envelope() {
        assert_eq!(
            Envelope::default().serialize(),
            vec![0.0, 2.0, -99.0, -99.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0]
        );
    }

    #[test]
    fn percussive_uses_custom_curve() {
        assert_eq!(
            Envelope::percussive(0.01, 1.0, 1.0, -4.0).serialize(),
            vec![0.0, 2.0, -99.0, -99.0, 1.0, 0.01, 5.0, -4.0, 0.0, 1.0, 5.0, -4.0]
        );
    }

    #[test]
    fn triangle_splits_duration() {
        assert_eq!(
            Envelope::triangle(1.0, 1.0).serialize(),
            vec![0.0, 2.0, -99.0, -99.0, 1.0, 0.5, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0]
        );
    }

    #[test]
    fn adsr_sets_release_node() {
        let env = Envelope::adsr(0.01, 0.3, 0.5, 1.0, 1.0, -4.0, 0.0);
        let data = env.serialize();
        assert_eq!(&data[..4], &[0.0, 3.0, 2.0, -99.0]);
        assert_eq!(env.amplitudes(), vec![0.0, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn curves_cycle() {
        let env = Envelope::new(
            &[0.0, 1.0, 0.5, 0.0],
            &[1.0, 1.0, 1.0],
            &[EnvelopeShape::Sine.into(), EnvelopeCurve::Curvature(2.0)],
        )
        .unwrap();
        let curves: Vec<_> = env.segments().iter().map(|s| s.curve).collect();
        assert_eq!(curves[0], curves[2]);
        assert_eq!(curves[1], EnvelopeCurve::Curvature(2.0));
    }

    #[test]
    fn interpolated_layout() {
        let env = Envelope::triangle(2.0, 1.0).with_offset(0.5);
        assert_eq!(
            env.serialize_interpolated(),
            vec![0.5, 0.0, 2.0, 2.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0]
        );
    }

    #[test]
    fn inconsistent_lengths_are_rejected() {
        assert!(Envelope::new(&[0.0], &[], &[]).is_err());
        assert!(Envelope::new(&[0.0, 1.0, 0.0], &[1.0], &[]).is_err());
        assert!(Envelope::from_segments(0.0, Vec::new()).is_err());
    }
}
