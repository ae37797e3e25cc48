//! Unary and binary operator tables for `UnaryOpUGen` and `BinaryOpUGen`.
//!
//! The operator's numeric id is the UGen's special index on the wire; the
//! upper-case name is what the dump format prints in parentheses after the
//! class name, e.g. `BinaryOpUGen(MULTIPLICATION).ar`.

macro_rules! operator_table {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident = $index:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        $vis enum $name {
            $($variant = $index,)+
        }

        impl $name {
            /// Every operator, ordered by special index.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Special index written for this operator.
            #[inline]
            pub fn index(self) -> u16 {
                self as u16
            }

            /// Looks up an operator by special index.
            pub fn from_index(index: u16) -> Option<Self> {
                match index {
                    $($index => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Upper-case name used by the text dump.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }
    };
}

operator_table! {
    /// Binary operators understood by `BinaryOpUGen`.
    pub enum BinaryOperator {
        Addition = 0 => "ADDITION",
        Subtraction = 1 => "SUBTRACTION",
        Multiplication = 2 => "MULTIPLICATION",
        IntegerDivision = 3 => "INTEGER_DIVISION",
        FloatDivision = 4 => "FLOAT_DIVISION",
        Modulo = 5 => "MODULO",
        Equal = 6 => "EQUAL",
        NotEqual = 7 => "NOT_EQUAL",
        LessThan = 8 => "LESS_THAN",
        GreaterThan = 9 => "GREATER_THAN",
        LessThanOrEqual = 10 => "LESS_THAN_OR_EQUAL",
        GreaterThanOrEqual = 11 => "GREATER_THAN_OR_EQUAL",
        Minimum = 12 => "MINIMUM",
        Maximum = 13 => "MAXIMUM",
        BitwiseAnd = 14 => "BITWISE_AND",
        BitwiseOr = 15 => "BITWISE_OR",
        BitwiseXor = 16 => "BITWISE_XOR",
        LeastCommonMultiple = 17 => "LEAST_COMMON_MULTIPLE",
        GreatestCommonDivisor = 18 => "GREATEST_COMMON_DIVISOR",
        Round = 19 => "ROUND",
        RoundUp = 20 => "ROUND_UP",
        Truncation = 21 => "TRUNCATION",
        Atan2 = 22 => "ATAN2",
        Hypot = 23 => "HYPOT",
        Hypotx = 24 => "HYPOTX",
        Power = 25 => "POWER",
        ShiftLeft = 26 => "SHIFT_LEFT",
        ShiftRight = 27 => "SHIFT_RIGHT",
        UnsignedShift = 28 => "UNSIGNED_SHIFT",
        Fill = 29 => "FILL",
        Ring1 = 30 => "RING1",
        Ring2 = 31 => "RING2",
        Ring3 = 32 => "RING3",
        Ring4 = 33 => "RING4",
        DifferenceOfSquares = 34 => "DIFFERENCE_OF_SQUARES",
        SumOfSquares = 35 => "SUM_OF_SQUARES",
        SquareOfSum = 36 => "SQUARE_OF_SUM",
        SquareOfDifference = 37 => "SQUARE_OF_DIFFERENCE",
        AbsoluteDifference = 38 => "ABSOLUTE_DIFFERENCE",
        Threshold = 39 => "THRESHOLD",
        Amclip = 40 => "AMCLIP",
        ScaleNeg = 41 => "SCALE_NEG",
        Clip2 = 42 => "CLIP2",
        Excess = 43 => "EXCESS",
        Fold2 = 44 => "FOLD2",
        Wrap2 = 45 => "WRAP2",
        FirstArg = 46 => "FIRST_ARG",
        RandRange = 47 => "RANDRANGE",
        ExpRandRange = 48 => "EXPRANDRANGE",
    }
}

operator_table! {
    /// Unary operators understood by `UnaryOpUGen`.
    pub enum UnaryOperator {
        Negative = 0 => "NEGATIVE",
        Not = 1 => "NOT",
        IsNil = 2 => "IS_NIL",
        NotNil = 3 => "NOT_NIL",
        BitNot = 4 => "BIT_NOT",
        AbsoluteValue = 5 => "ABSOLUTE_VALUE",
        AsFloat = 6 => "AS_FLOAT",
        AsInt = 7 => "AS_INT",
        Ceiling = 8 => "CEILING",
        Floor = 9 => "FLOOR",
        FractionalPart = 10 => "FRACTIONAL_PART",
        Sign = 11 => "SIGN",
        Squared = 12 => "SQUARED",
        Cubed = 13 => "CUBED",
        SquareRoot = 14 => "SQUARE_ROOT",
        Exponential = 15 => "EXPONENTIAL",
        Reciprocal = 16 => "RECIPROCAL",
        MidiToHz = 17 => "MIDI_TO_HZ",
        HzToMidi = 18 => "HZ_TO_MIDI",
        SemitonesToRatio = 19 => "SEMITONES_TO_RATIO",
        RatioToSemitones = 20 => "RATIO_TO_SEMITONES",
        DbToAmplitude = 21 => "DB_TO_AMPLITUDE",
        AmplitudeToDb = 22 => "AMPLITUDE_TO_DB",
        OctaveToHz = 23 => "OCTAVE_TO_HZ",
        HzToOctave = 24 => "HZ_TO_OCTAVE",
        Log = 25 => "LOG",
        Log2 = 26 => "LOG2",
        Log10 = 27 => "LOG10",
        Sin = 28 => "SIN",
        Cos = 29 => "COS",
        Tan = 30 => "TAN",
        Arcsin = 31 => "ARCSIN",
        Arccos = 32 => "ARCCOS",
        Arctan = 33 => "ARCTAN",
        Sinh = 34 => "SINH",
        Cosh = 35 => "COSH",
        Tanh = 36 => "TANH",
        Rand = 37 => "RAND",
        Rand2 = 38 => "RAND2",
        LinRand = 39 => "LINRAND",
        BilinRand = 40 => "BILINRAND",
        Sum3Rand = 41 => "SUM3RAND",
        Distort = 42 => "DISTORT",
        Softclip = 43 => "SOFTCLIP",
        Coin = 44 => "COIN",
        DigitValue = 45 => "DIGIT_VALUE",
        Silence = 46 => "SILENCE",
        Thru = 47 => "THRU",
        RectangleWindow = 48 => "RECTANGLE_WINDOW",
        HanningWindow = 49 => "HANNING_WINDOW",
        WelchWindow = 50 => "WELCH_WINDOW",
        TriangleWindow = 51 => "TRIANGLE_WINDOW",
        Ramp = 52 => "RAMP",
        SCurve = 53 => "S_CURVE",
    }
}

fn flag(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

impl BinaryOperator {
    /// Evaluates the operator on two constants.
    ///
    /// Returns `None` for operators without a deterministic float meaning
    /// (random ranges, integer-only ops) or when the result would be undefined.
    pub fn fold(self, a: f64, b: f64) -> Option<f64> {
        let value = match self {
            BinaryOperator::Addition => a + b,
            BinaryOperator::Subtraction => a - b,
            BinaryOperator::Multiplication => a * b,
            BinaryOperator::FloatDivision if b != 0.0 => a / b,
            BinaryOperator::Modulo if b != 0.0 => a - b * (a / b).floor(),
            BinaryOperator::Equal => flag(a == b),
            BinaryOperator::NotEqual => flag(a != b),
            BinaryOperator::LessThan => flag(a < b),
            BinaryOperator::GreaterThan => flag(a > b),
            BinaryOperator::LessThanOrEqual => flag(a <= b),
            BinaryOperator::GreaterThanOrEqual => flag(a >= b),
            BinaryOperator::Minimum => a.min(b),
            BinaryOperator::Maximum => a.max(b),
            BinaryOperator::Atan2 => a.atan2(b),
            BinaryOperator::Hypot => a.hypot(b),
            BinaryOperator::Power => a.powf(b),
            BinaryOperator::DifferenceOfSquares => a * a - b * b,
            BinaryOperator::SumOfSquares => a * a + b * b,
            BinaryOperator::SquareOfSum => (a + b) * (a + b),
            BinaryOperator::SquareOfDifference => (a - b) * (a - b),
            BinaryOperator::AbsoluteDifference => (a - b).abs(),
            BinaryOperator::FirstArg => a,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl UnaryOperator {
    /// Evaluates the operator on a constant, see [`BinaryOperator::fold`].
    pub fn fold(self, a: f64) -> Option<f64> {
        let value = match self {
            UnaryOperator::Negative => -a,
            UnaryOperator::AbsoluteValue => a.abs(),
            UnaryOperator::Ceiling => a.ceil(),
            UnaryOperator::Floor => a.floor(),
            UnaryOperator::FractionalPart => a - a.floor(),
            UnaryOperator::Sign => {
                if a > 0.0 {
                    1.0
                } else if a < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            UnaryOperator::Squared => a * a,
            UnaryOperator::Cubed => a * a * a,
            UnaryOperator::SquareRoot if a >= 0.0 => a.sqrt(),
            UnaryOperator::Exponential => a.exp(),
            UnaryOperator::Reciprocal if a != 0.0 => 1.0 / a,
            UnaryOperator::MidiToHz => 440.0 * ((a - 69.0) / 12.0).exp2(),
            UnaryOperator::HzToMidi if a > 0.0 => 12.0 * (a / 440.0).log2() + 69.0,
            UnaryOperator::SemitonesToRatio => (a / 12.0).exp2(),
            UnaryOperator::RatioToSemitones if a > 0.0 => 12.0 * a.log2(),
            UnaryOperator::DbToAmplitude => 10f64.powf(a / 20.0),
            UnaryOperator::AmplitudeToDb if a > 0.0 => 20.0 * a.log10(),
            UnaryOperator::OctaveToHz => 440.0 * (a - 4.75).exp2(),
            UnaryOperator::HzToOctave if a > 0.0 => (a / 440.0).log2() + 4.75,
            UnaryOperator::Log if a > 0.0 => a.ln(),
            UnaryOperator::Log2 if a > 0.0 => a.log2(),
            UnaryOperator::Log10 if a > 0.0 => a.log10(),
            UnaryOperator::Sin => a.sin(),
            UnaryOperator::Cos => a.cos(),
            UnaryOperator::Tan => a.tan(),
            UnaryOperator::Arcsin if a.abs() <= 1.0 => a.asin(),
            UnaryOperator::Arccos if a.abs() <= 1.0 => a.acos(),
            UnaryOperator::Arctan => a.atan(),
            UnaryOperator::Sinh => a.sinh(),
            UnaryOperator::Cosh => a.cosh(),
            UnaryOperator::Tanh => a.tanh(),
            UnaryOperator::Thru => a,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}
