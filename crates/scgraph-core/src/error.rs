//! Error types for graph construction, compilation and the binary codec.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, compiling, encoding or decoding SynthDefs.
///
/// Every fallible operation is synchronous and all-or-nothing: a builder is
/// never left with a half-registered UGen, and a failed decode yields no
/// partial [`SynthDef`](crate::SynthDef).
#[derive(Debug, Error)]
pub enum SynthDefError {
    /// A sequence-valued argument was empty during multichannel expansion
    #[error("empty input '{input}' for {ugen}")]
    EmptyInput {
        /// Class name of the UGen being constructed.
        ugen: String,
        /// Name of the argument that held the empty sequence.
        input: String,
    },

    /// A UGen was requested at a rate it does not support, or an input
    /// arrived at an incompatible rate
    #[error("rate mismatch for {ugen}: {detail}")]
    RateMismatch {
        /// Class name of the offending UGen.
        ugen: String,
        /// What was expected and what was found.
        detail: String,
    },

    /// A parameter name was registered twice with conflicting definitions
    #[error("duplicate parameter '{name}' with a conflicting definition")]
    DuplicateParameter {
        /// The parameter name.
        name: String,
    },

    /// The graph contains a cycle that is not broken by a feedback reader
    #[error("cyclic graph through: {}", .nodes.join(", "))]
    CyclicGraph {
        /// Class names of the UGens left unsorted.
        nodes: Vec<String>,
    },

    /// The binary input is not a valid SynthDef file
    #[error("malformed SynthDef data at byte {offset}: {message}")]
    MalformedBinary {
        /// Byte offset at which decoding failed.
        offset: u64,
        /// What was wrong with the data.
        message: String,
    },

    /// An implicit UGen constructor ran with no builder on the scope stack
    #[error("no active SynthDef builder on this thread")]
    NoActiveBuilder,

    /// An output proxy from one builder was used inside another
    #[error("input to {ugen} comes from a different builder")]
    ForeignNode {
        /// Class name of the UGen receiving the foreign input.
        ugen: String,
    },

    /// A required constructor argument was not supplied
    #[error("missing required input '{input}' for {ugen}")]
    MissingInput {
        /// Class name of the UGen being constructed.
        ugen: String,
        /// Name of the missing argument.
        input: String,
    },

    /// A constructor argument does not name any input of the UGen
    #[error("unknown input '{input}' for {ugen}")]
    UnknownInput {
        /// Class name of the UGen being constructed.
        ugen: String,
        /// Name of the unrecognized argument.
        input: String,
    },

    /// An argument value could not be used for its input slot
    #[error("invalid input '{input}' for {ugen}: {reason}")]
    InvalidInput {
        /// Class name of the UGen being constructed.
        ugen: String,
        /// Name of the argument.
        input: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An envelope was constructed from inconsistent segment data
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// A name does not fit in a length-prefixed string
    #[error("name '{name}' is {len} bytes long, at most 255 are allowed")]
    NameTooLong {
        /// The name that was too long.
        name: String,
        /// Its length in bytes.
        len: usize,
    },

    /// A SynthDef name cannot be used as a file name
    #[error("SynthDef name '{name}' is not a valid file name")]
    InvalidFileName {
        /// The rejected name.
        name: String,
    },

    /// A build was requested on a builder holding no UGens or parameters
    #[error("SynthDef graph is empty")]
    EmptyGraph,

    /// Failed to write encoded bytes
    #[error("failed to encode SynthDef: {0}")]
    Encode(#[from] std::io::Error),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SynthDefError>;

impl SynthDefError {
    /// Create a malformed binary error at the given offset.
    pub fn malformed(offset: u64, message: impl Into<String>) -> Self {
        SynthDefError::MalformedBinary {
            offset,
            message: message.into(),
        }
    }

    /// Create a rate mismatch error.
    pub fn rate_mismatch(ugen: impl Into<String>, detail: impl Into<String>) -> Self {
        SynthDefError::RateMismatch {
            ugen: ugen.into(),
            detail: detail.into(),
        }
    }

    /// Create an empty input error.
    pub fn empty_input(ugen: impl Into<String>, input: impl Into<String>) -> Self {
        SynthDefError::EmptyInput {
            ugen: ugen.into(),
            input: input.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(
        ugen: impl Into<String>,
        input: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SynthDefError::InvalidInput {
            ugen: ugen.into(),
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SynthDefError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SynthDefError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SynthDefError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
