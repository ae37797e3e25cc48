//! Operator UGens with construction-time simplification.
//!
//! Every constructor here first tries to avoid allocating a node: constant
//! operands fold, and algebraic identities (`x * 1`, `x + 0`, ...) return
//! an existing signal. Only what survives becomes a `BinaryOpUGen`,
//! `UnaryOpUGen`, `MulAdd`, `Sum3` or `Sum4`.
//!
//! Vector operands expand element-wise, cycling the shorter side.

use crate::builder::SynthDefBuilder;
use crate::builtins::{BINARY_OP_UGEN, MUL_ADD, SUM3, SUM4, UNARY_OP_UGEN};
use crate::error::{Result, SynthDefError};
use crate::operator::{BinaryOperator, UnaryOperator};
use crate::rate::CalculationRate;
use crate::signal::Signal;

/// Applies `f` element-wise when any operand is a vector.
///
/// Returns `Ok(None)` when every operand is a scalar.
fn expand_operands(
    ugen: &str,
    operands: &[&Signal],
    mut f: impl FnMut(&[Signal]) -> Result<Signal>,
) -> Result<Option<Signal>> {
    let mut width = 0;
    for operand in operands {
        if let Signal::Vector(items) = operand {
            if items.is_empty() {
                return Err(SynthDefError::empty_input(ugen, "operand"));
            }
            width = width.max(items.len());
        }
    }
    if width == 0 {
        return Ok(None);
    }
    let mut results = Vec::with_capacity(width);
    for i in 0..width {
        let channel: Vec<Signal> = operands.iter().map(|op| op.channel(i)).collect();
        results.push(f(&channel)?);
    }
    Ok(Some(Signal::Vector(results)))
}

impl SynthDefBuilder {
    // --- Binary and unary operators ---

    /// Applies a binary operator.
    ///
    /// # Errors
    ///
    /// Returns [`SynthDefError::EmptyInput`] for an empty vector operand and
    /// registration errors for foreign operands.
    pub fn binary_op(
        &self,
        operator: BinaryOperator,
        left: impl Into<Signal>,
        right: impl Into<Signal>,
    ) -> Result<Signal> {
        let (left, right) = (left.into(), right.into());
        if let Some(expanded) = expand_operands("BinaryOpUGen", &[&left, &right], |ops| {
            self.binary_op(operator, ops[0].clone(), ops[1].clone())
        })? {
            return Ok(expanded);
        }

        if let (Some(a), Some(b)) = (left.as_constant(), right.as_constant())
            && let Some(folded) = operator.fold(f64::from(a), f64::from(b))
        {
            return Ok(Signal::Constant(folded as f32));
        }

        match operator {
            BinaryOperator::Multiplication => {
                if left.is_constant(0.0) || right.is_constant(0.0) {
                    return Ok(Signal::Constant(0.0));
                }
                if left.is_constant(1.0) {
                    return Ok(right);
                }
                if left.is_constant(-1.0) {
                    return self.neg(right);
                }
                if right.is_constant(1.0) {
                    return Ok(left);
                }
                if right.is_constant(-1.0) {
                    return self.neg(left);
                }
            }
            BinaryOperator::Addition => {
                if left.is_constant(0.0) {
                    return Ok(right);
                }
                if right.is_constant(0.0) {
                    return Ok(left);
                }
            }
            BinaryOperator::Subtraction => {
                if left.is_constant(0.0) {
                    return self.neg(right);
                }
                if right.is_constant(0.0) {
                    return Ok(left);
                }
            }
            BinaryOperator::FloatDivision => {
                if right.is_constant(1.0) {
                    return Ok(left);
                }
                if right.is_constant(-1.0) {
                    return self.neg(left);
                }
            }
            _ => {}
        }

        let rate = left.rate().max(right.rate());
        BINARY_OP_UGEN
            .at(rate)
            .arg("left", left)
            .arg("right", right)
            .special_index(operator.index())
            .add_to(self)
    }

    /// Applies a unary operator.
    ///
    /// # Errors
    ///
    /// Same as [`binary_op`](Self::binary_op).
    pub fn unary_op(&self, operator: UnaryOperator, source: impl Into<Signal>) -> Result<Signal> {
        let source = source.into();
        if let Some(expanded) = expand_operands("UnaryOpUGen", &[&source], |ops| {
            self.unary_op(operator, ops[0].clone())
        })? {
            return Ok(expanded);
        }
        if let Some(value) = source.as_constant()
            && let Some(folded) = operator.fold(f64::from(value))
        {
            return Ok(Signal::Constant(folded as f32));
        }
        UNARY_OP_UGEN
            .at(source.rate())
            .arg("source", source)
            .special_index(operator.index())
            .add_to(self)
    }

    /// `left + right`.
    ///
    /// # Errors
    ///
    /// Same as [`binary_op`](Self::binary_op).
    pub fn add(&self, left: impl Into<Signal>, right: impl Into<Signal>) -> Result<Signal> {
        self.binary_op(BinaryOperator::Addition, left, right)
    }

    /// `left - right`.
    ///
    /// # Errors
    ///
    /// Same as [`binary_op`](Self::binary_op).
    pub fn sub(&self, left: impl Into<Signal>, right: impl Into<Signal>) -> Result<Signal> {
        self.binary_op(BinaryOperator::Subtraction, left, right)
    }

    /// `left * right`.
    ///
    /// # Errors
    ///
    /// Same as [`binary_op`](Self::binary_op).
    pub fn mul(&self, left: impl Into<Signal>, right: impl Into<Signal>) -> Result<Signal> {
        self.binary_op(BinaryOperator::Multiplication, left, right)
    }

    /// `left / right`.
    ///
    /// # Errors
    ///
    /// Same as [`binary_op`](Self::binary_op).
    pub fn div(&self, left: impl Into<Signal>, right: impl Into<Signal>) -> Result<Signal> {
        self.binary_op(BinaryOperator::FloatDivision, left, right)
    }

    /// `-source`.
    ///
    /// # Errors
    ///
    /// Same as [`binary_op`](Self::binary_op).
    pub fn neg(&self, source: impl Into<Signal>) -> Result<Signal> {
        self.unary_op(UnaryOperator::Negative, source)
    }

    // --- MulAdd ---

    /// `source * multiplier + addend`, fused into a `MulAdd` when the rates
    /// allow it.
    ///
    /// # Errors
    ///
    /// Same as [`binary_op`](Self::binary_op).
    pub fn mul_add(
        &self,
        source: impl Into<Signal>,
        multiplier: impl Into<Signal>,
        addend: impl Into<Signal>,
    ) -> Result<Signal> {
        let (source, multiplier, addend) = (source.into(), multiplier.into(), addend.into());
        if let Some(expanded) = expand_operands("MulAdd", &[&source, &multiplier, &addend], |ops| {
            self.mul_add(ops[0].clone(), ops[1].clone(), ops[2].clone())
        })? {
            return Ok(expanded);
        }

        if multiplier.is_constant(0.0) {
            return Ok(addend);
        }
        let minus = multiplier.is_constant(-1.0);
        let no_multiplier = multiplier.is_constant(1.0);
        let no_addend = addend.is_constant(0.0);
        if no_multiplier && no_addend {
            return Ok(source);
        }
        if minus && no_addend {
            return self.neg(source);
        }
        if no_addend {
            return self.mul(source, multiplier);
        }
        if minus {
            return self.sub(addend, source);
        }
        if no_multiplier {
            return self.add(source, addend);
        }

        let (source, multiplier) = if mul_add_valid(&source, &multiplier, &addend) {
            (source, multiplier)
        } else if mul_add_valid(&multiplier, &source, &addend) {
            (multiplier, source)
        } else {
            let product = self.mul(source, multiplier)?;
            return self.add(product, addend);
        };
        let rate = CalculationRate::promote([source.rate(), multiplier.rate(), addend.rate()]);
        MUL_ADD
            .at(rate)
            .arg("source", source)
            .arg("multiplier", multiplier)
            .arg("addend", addend)
            .add_to(self)
    }

    // --- Summing ---

    /// Three-input sum; a zero operand degrades to a binary addition.
    ///
    /// # Errors
    ///
    /// Same as [`binary_op`](Self::binary_op).
    pub fn sum3(
        &self,
        a: impl Into<Signal>,
        b: impl Into<Signal>,
        c: impl Into<Signal>,
    ) -> Result<Signal> {
        let (a, b, c) = (a.into(), b.into(), c.into());
        if let Some(expanded) = expand_operands("Sum3", &[&a, &b, &c], |ops| {
            self.sum3(ops[0].clone(), ops[1].clone(), ops[2].clone())
        })? {
            return Ok(expanded);
        }
        if c.is_constant(0.0) {
            return self.add(a, b);
        }
        if b.is_constant(0.0) {
            return self.add(a, c);
        }
        if a.is_constant(0.0) {
            return self.add(b, c);
        }
        let inputs = by_rate_descending(vec![a, b, c]);
        let rate = inputs[0].rate();
        let mut call = SUM3.at(rate);
        for (name, input) in ["input_one", "input_two", "input_three"].into_iter().zip(inputs) {
            call = call.arg(name, input);
        }
        call.add_to(self)
    }

    /// Four-input sum; a zero operand degrades to [`sum3`](Self::sum3).
    ///
    /// # Errors
    ///
    /// Same as [`binary_op`](Self::binary_op).
    pub fn sum4(
        &self,
        a: impl Into<Signal>,
        b: impl Into<Signal>,
        c: impl Into<Signal>,
        d: impl Into<Signal>,
    ) -> Result<Signal> {
        let (a, b, c, d) = (a.into(), b.into(), c.into(), d.into());
        if let Some(expanded) = expand_operands("Sum4", &[&a, &b, &c, &d], |ops| {
            self.sum4(ops[0].clone(), ops[1].clone(), ops[2].clone(), ops[3].clone())
        })? {
            return Ok(expanded);
        }
        if a.is_constant(0.0) {
            return self.sum3(b, c, d);
        }
        if b.is_constant(0.0) {
            return self.sum3(a, c, d);
        }
        if c.is_constant(0.0) {
            return self.sum3(a, b, d);
        }
        if d.is_constant(0.0) {
            return self.sum3(a, b, c);
        }
        let inputs = by_rate_descending(vec![a, b, c, d]);
        let rate = inputs[0].rate();
        let mut call = SUM4.at(rate);
        for (name, input) in ["input_one", "input_two", "input_three", "input_four"]
            .into_iter()
            .zip(inputs)
        {
            call = call.arg(name, input);
        }
        call.add_to(self)
    }

    /// Mixes every channel of `sources` down to one signal.
    ///
    /// Channels are summed in groups of four (`Sum4`, `Sum3`, a binary
    /// addition, or passthrough) until one signal remains.
    ///
    /// # Errors
    ///
    /// Returns [`SynthDefError::EmptyInput`] for an empty source list.
    pub fn mix(&self, sources: impl Into<Signal>) -> Result<Signal> {
        let mut sources = sources.into().flatten();
        if sources.is_empty() {
            return Err(SynthDefError::empty_input("Mix", "sources"));
        }
        loop {
            let mut summed = Vec::with_capacity(sources.len().div_ceil(4));
            for part in sources.chunks(4) {
                summed.push(match part.len() {
                    4 => self.sum4(&part[0], &part[1], &part[2], &part[3])?,
                    3 => self.sum3(&part[0], &part[1], &part[2])?,
                    2 => self.add(&part[0], &part[1])?,
                    _ => part[0].clone(),
                });
            }
            if summed.len() == 1 {
                return Ok(summed.remove(0));
            }
            sources = summed;
        }
    }

    /// Mixes `sources` down to `channel_count` channels.
    ///
    /// Sources are split into consecutive groups of `channel_count` and
    /// each output channel mixes the matching column of every group.
    ///
    /// # Errors
    ///
    /// Returns [`SynthDefError::EmptyInput`] for no sources or a zero
    /// channel count.
    pub fn mix_multichannel(
        &self,
        sources: impl Into<Signal>,
        channel_count: usize,
    ) -> Result<Signal> {
        let sources = sources.into().flatten();
        if sources.is_empty() || channel_count == 0 {
            return Err(SynthDefError::empty_input("Mix", "sources"));
        }
        let parts: Vec<&[Signal]> = sources.chunks(channel_count).collect();
        let columns = parts.iter().map(|part| part.len()).min().unwrap_or(0);
        let mut mixes = Vec::with_capacity(columns);
        for column in 0..columns {
            let signals: Vec<Signal> = parts.iter().map(|part| part[column].clone()).collect();
            mixes.push(self.mix(signals)?);
        }
        Ok(Signal::Vector(mixes))
    }
}

fn mul_add_valid(source: &Signal, multiplier: &Signal, addend: &Signal) -> bool {
    match source.rate() {
        CalculationRate::Audio => true,
        CalculationRate::Control => {
            multiplier.rate() <= CalculationRate::Control
                && addend.rate() <= CalculationRate::Control
        }
        _ => false,
    }
}

fn by_rate_descending(mut inputs: Vec<Signal>) -> Vec<Signal> {
    inputs.sort_by_key(|input| std::cmp::Reverse(input.rate()));
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::UGenFlags;
    use crate::spec::{InputSpec, OutputSpec, UGenCategory, UGenSpec};

    static OSC: UGenSpec = UGenSpec {
        name: "TestOsc",
        description: "test",
        category: UGenCategory::Oscillator,
        inputs: &[InputSpec::new("frequency", 440.0)],
        rates: &[CalculationRate::Audio, CalculationRate::Control],
        outputs: OutputSpec::Fixed(1),
        flags: UGenFlags::NONE.pure(),
    };

    fn osc(builder: &SynthDefBuilder) -> Signal {
        OSC.ar().add_to(builder).unwrap()
    }

    #[test]
    fn multiplication_identities() {
        let b = SynthDefBuilder::new();
        let x = osc(&b);
        assert_eq!(b.mul(x.clone(), 0.0).unwrap(), Signal::Constant(0.0));
        assert_eq!(b.mul(0.0, x.clone()).unwrap(), Signal::Constant(0.0));
        assert_eq!(b.mul(x.clone(), 1.0).unwrap(), x);
        assert_eq!(b.mul(1.0, x.clone()).unwrap(), x);
        assert_eq!(b.len(), 1, "identities must not allocate nodes");
    }

    #[test]
    fn multiply_by_minus_one_negates() {
        let b = SynthDefBuilder::new();
        let x = osc(&b);
        let negated = b.mul(x, -1.0).unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(negated.as_output().unwrap().ugen().index(), 1);
        let dump = b.build(None, false).unwrap().to_string();
        assert!(dump.contains("UnaryOpUGen(NEGATIVE).ar"), "{dump}");
    }

    #[test]
    fn addition_and_subtraction_identities() {
        let b = SynthDefBuilder::new();
        let x = osc(&b);
        assert_eq!(b.add(x.clone(), 0.0).unwrap(), x);
        assert_eq!(b.add(0.0, x.clone()).unwrap(), x);
        assert_eq!(b.sub(x.clone(), 0.0).unwrap(), x);
        assert_eq!(b.div(x.clone(), 1.0).unwrap(), x);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn constants_fold() {
        let b = SynthDefBuilder::new();
        assert_eq!(b.add(2.0, 3.0).unwrap(), Signal::Constant(5.0));
        assert_eq!(b.neg(2.0).unwrap(), Signal::Constant(-2.0));
        assert!(b.is_empty());
    }

    #[test]
    fn binary_rate_is_maximum() {
        let b = SynthDefBuilder::new();
        let audio = osc(&b);
        let control = OSC.kr().add_to(&b).unwrap();
        let product = b.mul(audio, control).unwrap();
        assert_eq!(product.rate(), CalculationRate::Audio);
    }

    #[test]
    fn vector_operands_expand() {
        let b = SynthDefBuilder::new();
        let x = osc(&b);
        let product = b.mul(x, [2.0, 3.0, 4.0]).unwrap();
        assert_eq!(product.channel_count(), 3);
        assert_eq!(b.len(), 4);
    }

    #[test]
    fn mul_add_rules() {
        let b = SynthDefBuilder::new();
        let x = osc(&b);
        assert_eq!(b.mul_add(x.clone(), 0.0, 0.5).unwrap(), Signal::Constant(0.5));
        assert_eq!(b.mul_add(x.clone(), 1.0, 0.0).unwrap(), x);
        assert_eq!(b.len(), 1);
        let fused = b.mul_add(x, 2.0, 0.5).unwrap();
        assert_eq!(fused.rate(), CalculationRate::Audio);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn mul_add_with_scalar_source_falls_back() {
        let b = SynthDefBuilder::new();
        let audio = osc(&b);
        let control = OSC.kr().add_to(&b).unwrap();
        // Control source with an audio multiplier swaps operands.
        b.mul_add(control, audio, 0.5).unwrap();
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn sum3_degrades_on_zero() {
        let b = SynthDefBuilder::new();
        let x = osc(&b);
        let y = osc(&b);
        let sum = b.sum3(x, y, 0.0).unwrap();
        assert!(sum.as_output().is_some());
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn mix_groups_by_four() {
        let b = SynthDefBuilder::new();
        let sources: Vec<Signal> = (0..5).map(|_| osc(&b)).collect();
        let mixed = b.mix(sources).unwrap();
        assert!(mixed.as_output().is_some());
        // Sum4 of the first four plus an addition with the fifth.
        assert_eq!(b.len(), 7);
    }

    #[test]
    fn mix_multichannel_zips_columns() {
        let b = SynthDefBuilder::new();
        let sources: Vec<Signal> = (0..4).map(|_| osc(&b)).collect();
        let mixed = b.mix_multichannel(sources, 2).unwrap();
        assert_eq!(mixed.channel_count(), 2);
    }

    #[test]
    fn empty_mix_is_an_error() {
        let b = SynthDefBuilder::new();
        assert!(b.mix(Vec::<f32>::new()).is_err());
    }
}
