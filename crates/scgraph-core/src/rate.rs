//! Calculation rates, parameter rates and the small enumerations carried
//! through UGen inputs (done actions, envelope shapes).

use std::fmt;

/// The rate at which a UGen computes its outputs.
///
/// Ordering follows promotion: `Scalar < Control < Audio < Demand`. The rate
/// of an expression is the maximum of its operands, so demand rate absorbs
/// everything else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CalculationRate {
    /// Computed once at synth initialization (`ir`).
    #[default]
    Scalar = 0,
    /// Computed once per control block (`kr`).
    Control = 1,
    /// Computed once per sample (`ar`).
    Audio = 2,
    /// Computed when pulled by a demand UGen (`dr`).
    Demand = 3,
}

impl CalculationRate {
    /// All rates in wire order.
    pub const ALL: [CalculationRate; 4] = [
        CalculationRate::Scalar,
        CalculationRate::Control,
        CalculationRate::Audio,
        CalculationRate::Demand,
    ];

    /// Wire index of this rate.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a rate by wire index.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Short method token used in dumps (`ir`, `kr`, `ar`, `dr`).
    pub fn token(self) -> &'static str {
        match self {
            CalculationRate::Scalar => "ir",
            CalculationRate::Control => "kr",
            CalculationRate::Audio => "ar",
            CalculationRate::Demand => "dr",
        }
    }

    /// Promotes a sequence of rates to their maximum. An empty sequence is scalar.
    pub fn promote(rates: impl IntoIterator<Item = CalculationRate>) -> Self {
        rates.into_iter().max().unwrap_or_default()
    }
}

impl fmt::Display for CalculationRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The rate class of a SynthDef parameter.
///
/// Parameters are grouped into one control UGen per rate. Groups are emitted
/// in declaration order: scalar, trigger, audio, control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterRate {
    /// Initialization-time parameter, emitted by `Control.ir`.
    Scalar = 0,
    /// Trigger parameter, emitted by `TrigControl.kr`.
    Trigger = 1,
    /// Audio-rate parameter, emitted by `AudioControl.ar`.
    Audio = 2,
    /// Control-rate parameter, emitted by `Control.kr` or `LagControl.kr`.
    #[default]
    Control = 3,
}

impl ParameterRate {
    /// All parameter rates in emission order.
    pub const ALL: [ParameterRate; 4] = [
        ParameterRate::Scalar,
        ParameterRate::Trigger,
        ParameterRate::Audio,
        ParameterRate::Control,
    ];

    /// The calculation rate of the outputs carrying this parameter.
    pub fn calculation_rate(self) -> CalculationRate {
        match self {
            ParameterRate::Scalar => CalculationRate::Scalar,
            ParameterRate::Trigger | ParameterRate::Control => CalculationRate::Control,
            ParameterRate::Audio => CalculationRate::Audio,
        }
    }
}

/// What the server does with a synth once a done-flag UGen finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum DoneAction {
    Nothing = 0,
    PauseSynth = 1,
    FreeSynth = 2,
    FreeSynthAndPrecedingNode = 3,
    FreeSynthAndFollowingNode = 4,
    FreeSynthAndFreeAllInPrecedingGroup = 5,
    FreeSynthAndFreeAllInFollowingGroup = 6,
    FreeSynthAndAllPrecedingNodesInGroup = 7,
    FreeSynthAndAllFollowingNodesInGroup = 8,
    FreeSynthAndPausePrecedingNode = 9,
    FreeSynthAndPauseFollowingNode = 10,
    FreeSynthAndDeepFreePrecedingNode = 11,
    FreeSynthAndDeepFreeFollowingNode = 12,
    FreeSynthAndAllSiblingNodes = 13,
    FreeSynthAndEnclosingGroup = 14,
}

impl DoneAction {
    /// The value fed to a `done_action` input.
    pub fn value(self) -> f32 {
        self as u8 as f32
    }
}

impl From<DoneAction> for f32 {
    fn from(action: DoneAction) -> Self {
        action.value()
    }
}

/// Named segment shapes for [`Envelope`](crate::Envelope) curves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum EnvelopeShape {
    Step = 0,
    Linear = 1,
    Exponential = 2,
    Sine = 3,
    Welch = 4,
    Custom = 5,
    Squared = 6,
    Cubed = 7,
    Hold = 8,
}

impl EnvelopeShape {
    /// Numeric shape id used in serialized envelopes.
    pub fn id(self) -> f32 {
        self as u8 as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_promotion_takes_maximum() {
        assert_eq!(
            CalculationRate::promote([CalculationRate::Scalar, CalculationRate::Audio]),
            CalculationRate::Audio
        );
        assert_eq!(
            CalculationRate::promote([CalculationRate::Demand, CalculationRate::Audio]),
            CalculationRate::Demand
        );
        assert_eq!(CalculationRate::promote([]), CalculationRate::Scalar);
    }

    #[test]
    fn rate_index_roundtrip() {
        for rate in CalculationRate::ALL {
            assert_eq!(CalculationRate::from_index(rate.index()), Some(rate));
        }
        assert_eq!(CalculationRate::from_index(4), None);
    }

    #[test]
    fn rate_tokens() {
        assert_eq!(CalculationRate::Scalar.to_string(), "ir");
        assert_eq!(CalculationRate::Control.to_string(), "kr");
        assert_eq!(CalculationRate::Audio.to_string(), "ar");
        assert_eq!(CalculationRate::Demand.to_string(), "dr");
    }

    #[test]
    fn trigger_parameters_run_at_control_rate() {
        assert_eq!(
            ParameterRate::Trigger.calculation_rate(),
            CalculationRate::Control
        );
        assert_eq!(ParameterRate::Audio.calculation_rate(), CalculationRate::Audio);
    }

    #[test]
    fn parameter_rate_groups_are_ordered() {
        let mut rates = vec![
            ParameterRate::Control,
            ParameterRate::Scalar,
            ParameterRate::Audio,
            ParameterRate::Trigger,
        ];
        rates.sort();
        assert_eq!(rates, ParameterRate::ALL.to_vec());
    }

    #[test]
    fn done_action_values() {
        assert_eq!(DoneAction::FreeSynth.value(), 2.0);
        assert_eq!(f32::from(DoneAction::FreeSynthAndEnclosingGroup), 14.0);
    }
}
