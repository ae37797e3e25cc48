//! Multichannel expansion.
//!
//! A constructor call whose arguments contain sequences becomes several
//! parallel calls. The width is the longest expanding sequence; shorter
//! sequences cycle. Expansion recurses until every expanding argument is a
//! scalar. Unexpanded (variadic) arguments pass through as flat lists and
//! only expand when they contain nested sequences.
//!
//! The engine only rearranges [`Signal`]s. It never allocates graph nodes.

use crate::error::{Result, SynthDefError};
use crate::signal::Signal;

/// One named argument of a constructor call.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpansionArg<'a> {
    /// Argument name, used for error reporting.
    pub name: &'a str,
    /// Argument value.
    pub value: Signal,
    /// Whether the argument is variadic.
    pub unexpanded: bool,
}

impl<'a> ExpansionArg<'a> {
    /// An ordinary expanding argument.
    pub fn new(name: &'a str, value: impl Into<Signal>) -> Self {
        Self {
            name,
            value: value.into(),
            unexpanded: false,
        }
    }

    /// A variadic argument.
    pub fn unexpanded(name: &'a str, value: impl Into<Signal>) -> Self {
        Self {
            name,
            value: value.into(),
            unexpanded: true,
        }
    }
}

fn has_nested(items: &[Signal]) -> bool {
    items.iter().any(|item| matches!(item, Signal::Vector(_)))
}

/// Expands `args` into one value list per parallel call, each aligned with
/// `args`.
///
/// # Errors
///
/// Returns [`SynthDefError::EmptyInput`] when any sequence, at any depth,
/// is empty.
pub fn expand(ugen: &str, args: &[ExpansionArg<'_>]) -> Result<Vec<Vec<Signal>>> {
    let mut out = Vec::new();
    let values = args.iter().map(|arg| arg.value.clone()).collect();
    expand_into(ugen, args, values, &mut out)?;
    Ok(out)
}

fn expand_into(
    ugen: &str,
    args: &[ExpansionArg<'_>],
    values: Vec<Signal>,
    out: &mut Vec<Vec<Signal>>,
) -> Result<()> {
    let mut size = 0;
    for (value, arg) in values.iter().zip(args) {
        if let Signal::Vector(items) = value {
            if items.is_empty() {
                return Err(SynthDefError::empty_input(ugen, arg.name));
            }
            if arg.unexpanded && !has_nested(items) {
                continue;
            }
            size = size.max(items.len());
        }
    }

    if size == 0 {
        out.push(values);
        return Ok(());
    }

    for i in 0..size {
        let next = values
            .iter()
            .zip(args)
            .map(|(value, arg)| match value {
                Signal::Vector(items) if !arg.unexpanded || has_nested(items) => {
                    items[i % items.len()].clone()
                }
                other => other.clone(),
            })
            .collect();
        expand_into(ugen, args, next, out)?;
    }
    Ok(())
}
