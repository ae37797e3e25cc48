//! SynthDef parameters.

use crate::rate::ParameterRate;

/// A named, externally settable SynthDef input.
///
/// A parameter with several values is one logical parameter occupying that
/// many consecutive control slots. Names are unique within a SynthDef.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Default value per channel; never empty.
    pub value: Vec<f32>,
    /// Rate group the parameter belongs to.
    pub rate: ParameterRate,
    /// Optional lag time; any lagged control-rate parameter turns its group
    /// into a `LagControl`.
    pub lag: Option<f32>,
}

impl Parameter {
    /// Creates a single-channel control-rate parameter.
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self::vector(name, vec![value])
    }

    /// Creates a multi-channel control-rate parameter.
    pub fn vector(name: impl Into<String>, value: impl Into<Vec<f32>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            rate: ParameterRate::Control,
            lag: None,
        }
    }

    /// Sets the rate group.
    pub fn with_rate(mut self, rate: ParameterRate) -> Self {
        self.rate = rate;
        self
    }

    /// Sets the lag time.
    pub fn with_lag(mut self, lag: f32) -> Self {
        self.lag = Some(lag);
        self
    }

    /// Number of control slots this parameter occupies.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// True when the parameter has no values. Such parameters are rejected
    /// by the builder.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Lag actually applied to each slot.
    pub(crate) fn lag_or_zero(&self) -> f32 {
        self.lag.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_control_rate() {
        let p = Parameter::new("freq", 440.0);
        assert_eq!(p.rate, ParameterRate::Control);
        assert_eq!(p.len(), 1);
        assert!(p.lag.is_none());
    }

    #[test]
    fn vector_parameter_spans_slots() {
        let p = Parameter::vector("freqs", [300.0, 400.0])
            .with_rate(ParameterRate::Audio)
            .with_lag(0.5);
        assert_eq!(p.len(), 2);
        assert_eq!(p.rate, ParameterRate::Audio);
        assert_eq!(p.lag_or_zero(), 0.5);
    }
}
