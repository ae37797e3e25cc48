//! `SCgf` version 2 binary codec.
//!
//! # Format
//!
//! ```text
//! "SCgf" | u32 version = 2 | u16 synthdef count
//! per synthdef:
//!   pstring name
//!   u32 constant count, f32 constants
//!   u32 parameter value count, f32 values
//!   u32 parameter name count, (pstring name, u32 starting slot)*
//!   u32 ugen count, per ugen:
//!     pstring class | u8 rate | u32 inputs | u32 outputs | u16 special index
//!     inputs: [0xFFFFFFFF, constant index] or [ugen ordinal, output index]
//!     u8 rate per output
//!   u16 variant count = 0
//! ```
//!
//! All numbers are big-endian. A pstring is a `u8` length followed by that
//! many bytes.

use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use sha2::{Digest, Sha256};

use crate::builtins::BuiltinCatalog;
use crate::error::{Result, SynthDefError};
use crate::node::{Input, InputKey, NodeRef, NodeRole, UGenFlags, UGenId, UGenNode};
use crate::parameter::Parameter;
use crate::rate::{CalculationRate, ParameterRate};
use crate::spec::{UGenCatalog, UGenSpec};
use crate::synthdef::SynthDef;

const MAGIC: &[u8; 4] = b"SCgf";
const VERSION: u32 = 2;
const CONSTANT_INPUT: u32 = 0xFFFF_FFFF;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encodes SynthDefs into one `SCgf` file.
///
/// With `use_anonymous_names` every definition is written under its
/// anonymous name; otherwise under its effective name.
pub fn encode_synthdefs(synthdefs: &[SynthDef], use_anonymous_names: bool) -> Result<Vec<u8>> {
    let count = u16::try_from(synthdefs.len())
        .map_err(|_| SynthDefError::malformed(0, "more than 65535 SynthDefs in one file"))?;

    let mut buf = Vec::new();
    buf.write_all(MAGIC)?;
    buf.write_u32::<BigEndian>(VERSION)?;
    buf.write_u16::<BigEndian>(count)?;
    for synthdef in synthdefs {
        let body = encode_body(synthdef)?;
        let name = match synthdef.name() {
            Some(name) if !use_anonymous_names => name.to_string(),
            _ => hash_body(&body),
        };
        write_pstring(&mut buf, &name)?;
        buf.write_all(&body)?;
    }
    tracing::debug!(
        "synthdef_encode: {} bytes, {} synthdefs",
        buf.len(),
        synthdefs.len()
    );
    Ok(buf)
}

/// Content hash of a SynthDef's encoded body.
pub(crate) fn anonymous_name(synthdef: &SynthDef) -> String {
    // The builder rejects parameter names over 255 bytes, the only input
    // that fails to encode.
    encode_body(synthdef)
        .map(|body| hash_body(&body))
        .unwrap_or_default()
}

fn hash_body(body: &[u8]) -> String {
    let digest = Sha256::digest(body);
    digest[..16].iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Everything after the name.
fn encode_body(synthdef: &SynthDef) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    buf.write_u32::<BigEndian>(synthdef.constants().len() as u32)?;
    for &constant in synthdef.constants() {
        buf.write_f32::<BigEndian>(constant)?;
    }

    buf.write_u32::<BigEndian>(synthdef.parameter_slot_count() as u32)?;
    for (parameter, _) in synthdef.parameters() {
        for &value in &parameter.value {
            buf.write_f32::<BigEndian>(value)?;
        }
    }

    buf.write_u32::<BigEndian>(synthdef.parameters().len() as u32)?;
    for (name, _, index) in synthdef.indexed_parameters() {
        write_pstring(&mut buf, name)?;
        buf.write_u32::<BigEndian>(index)?;
    }

    buf.write_u32::<BigEndian>(synthdef.ugens().len() as u32)?;
    for ugen in synthdef.ugens() {
        encode_ugen(&mut buf, synthdef, ugen)?;
    }

    buf.write_u16::<BigEndian>(0)?;
    Ok(buf)
}

fn encode_ugen(buf: &mut Vec<u8>, synthdef: &SynthDef, ugen: &UGenNode) -> Result<()> {
    write_pstring(buf, ugen.class_name())?;
    buf.write_u8(ugen.rate().index())?;
    buf.write_u32::<BigEndian>(ugen.inputs().len() as u32)?;
    buf.write_u32::<BigEndian>(ugen.output_count())?;
    buf.write_u16::<BigEndian>(ugen.special_index())?;

    for input in ugen.inputs() {
        match *input {
            Input::Constant(value) => {
                let index = synthdef.constant_index(value).ok_or_else(|| {
                    SynthDefError::invalid_input(
                        ugen.class_name(),
                        "constant",
                        format!("{value} missing from the constant table"),
                    )
                })?;
                buf.write_u32::<BigEndian>(CONSTANT_INPUT)?;
                buf.write_u32::<BigEndian>(index as u32)?;
            }
            Input::Node(source) => {
                buf.write_u32::<BigEndian>(source.ugen.index())?;
                buf.write_u32::<BigEndian>(source.output)?;
            }
        }
    }

    for _ in 0..ugen.output_count() {
        buf.write_u8(ugen.rate().index())?;
    }
    Ok(())
}

fn write_pstring(buf: &mut Vec<u8>, text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    let len = u8::try_from(bytes.len()).map_err(|_| SynthDefError::NameTooLong {
        name: text.to_string(),
        len: bytes.len(),
    })?;
    buf.write_u8(len)?;
    buf.write_all(bytes)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Bounds-checked big-endian reader reporting failures with their offset.
struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    fn offset(&self) -> u64 {
        self.cursor.position()
    }

    fn remaining(&self) -> u64 {
        (self.cursor.get_ref().len() as u64).saturating_sub(self.offset())
    }

    fn error(&self, message: impl Into<String>) -> SynthDefError {
        SynthDefError::malformed(self.offset(), message)
    }

    fn truncated(&self, what: &str) -> SynthDefError {
        self.error(format!("unexpected end of data reading {what}"))
    }

    fn u8(&mut self, what: &str) -> Result<u8> {
        self.cursor.read_u8().map_err(|_| self.truncated(what))
    }

    fn u16(&mut self, what: &str) -> Result<u16> {
        self.cursor
            .read_u16::<BigEndian>()
            .map_err(|_| self.truncated(what))
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        self.cursor
            .read_u32::<BigEndian>()
            .map_err(|_| self.truncated(what))
    }

    fn f32(&mut self, what: &str) -> Result<f32> {
        self.cursor
            .read_f32::<BigEndian>()
            .map_err(|_| self.truncated(what))
    }

    fn pstring(&mut self, what: &str) -> Result<String> {
        let len = self.u8(what)?;
        let mut bytes = vec![0; usize::from(len)];
        self.cursor
            .read_exact(&mut bytes)
            .map_err(|_| self.truncated(what))?;
        String::from_utf8(bytes).map_err(|_| self.error(format!("{what} is not valid UTF-8")))
    }

    /// Reads a count and checks that `count * min_size` bytes remain.
    fn count(&mut self, what: &str, min_size: u64) -> Result<usize> {
        let count = self.u32(what)?;
        if u64::from(count) * min_size > self.remaining() {
            return Err(self.error(format!("{what} {count} exceeds the remaining data")));
        }
        Ok(count as usize)
    }
}

/// Decodes every SynthDef in an `SCgf` file.
///
/// `catalog` supplies input names and flags; the built-in descriptors are
/// always consulted after it. Decoding is all-or-nothing.
pub fn decode_synthdefs(bytes: &[u8], catalog: &dyn UGenCatalog) -> Result<Vec<SynthDef>> {
    let mut reader = Reader::new(bytes);

    let mut magic = [0u8; 4];
    reader
        .cursor
        .read_exact(&mut magic)
        .map_err(|_| reader.truncated("file header"))?;
    if &magic != MAGIC {
        return Err(SynthDefError::malformed(0, "missing SCgf header"));
    }
    let version = reader.u32("version")?;
    if version != VERSION {
        return Err(SynthDefError::malformed(
            4,
            format!("unsupported version {version}, expected {VERSION}"),
        ));
    }
    let count = reader.u16("synthdef count")?;

    let mut synthdefs = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        synthdefs.push(decode_one_body(&mut reader, catalog)?);
    }
    if reader.remaining() > 0 {
        return Err(reader.error(format!("{} trailing bytes", reader.remaining())));
    }
    tracing::debug!(
        "synthdef_decode: {} synthdefs from {} bytes",
        synthdefs.len(),
        bytes.len()
    );
    Ok(synthdefs)
}

/// Decodes a file holding exactly one SynthDef.
pub fn decode_synthdef(bytes: &[u8], catalog: &dyn UGenCatalog) -> Result<SynthDef> {
    let mut synthdefs = decode_synthdefs(bytes, catalog)?;
    if synthdefs.len() != 1 {
        return Err(SynthDefError::malformed(
            6,
            format!("expected one SynthDef, found {}", synthdefs.len()),
        ));
    }
    synthdefs
        .pop()
        .ok_or_else(|| SynthDefError::malformed(6, "expected one SynthDef"))
}

fn decode_one_body(reader: &mut Reader<'_>, catalog: &dyn UGenCatalog) -> Result<SynthDef> {
    let name = reader.pstring("synthdef name")?;

    let constant_count = reader.count("constant count", 4)?;
    let mut constants = Vec::with_capacity(constant_count);
    for _ in 0..constant_count {
        constants.push(reader.f32("constant")?);
    }

    let value_count = reader.count("parameter value count", 4)?;
    let mut values = Vec::with_capacity(value_count);
    for _ in 0..value_count {
        values.push(reader.f32("parameter value")?);
    }

    let name_count = reader.count("parameter name count", 5)?;
    let mut names: Vec<(String, u32)> = Vec::with_capacity(name_count);
    for _ in 0..name_count {
        let parameter = reader.pstring("parameter name")?;
        let index = reader.u32("parameter index")?;
        if index as usize >= value_count {
            return Err(reader.error(format!(
                "parameter '{parameter}' starts at slot {index} of {value_count}"
            )));
        }
        names.push((parameter, index));
    }

    let ugen_count = reader.count("ugen count", 12)?;
    let mut ugens = Vec::with_capacity(ugen_count);
    for _ in 0..ugen_count {
        ugens.push(decode_ugen(reader, catalog, &constants, ugen_count)?);
    }

    let variants = reader.u16("variant count")?;
    if variants != 0 {
        return Err(reader.error(format!("{variants} variants are not supported")));
    }

    for (ordinal, ugen) in ugens.iter().enumerate() {
        for source in ugen.inputs().iter().filter_map(Input::node) {
            let outputs = ugens[source.ugen.slot()].output_count();
            if source.output >= outputs {
                return Err(SynthDefError::malformed(
                    reader.offset(),
                    format!(
                        "ugen {ordinal} reads output {} of ugen {} which has {outputs}",
                        source.output,
                        source.ugen.index()
                    ),
                ));
            }
        }
    }

    let parameters = attach_parameters(&mut ugens, &names, &values);
    let name_order = names
        .iter()
        .filter_map(|(_, index)| parameters.iter().position(|(_, start)| start == index))
        .collect();
    let synthdef = SynthDef::from_parts(Some(name), ugens, constants, parameters)
        .with_name_order(name_order);
    if synthdef.name() == Some(synthdef.anonymous_name().as_str()) {
        return Ok(synthdef.with_name(None));
    }
    Ok(synthdef)
}

fn decode_ugen(
    reader: &mut Reader<'_>,
    catalog: &dyn UGenCatalog,
    constants: &[f32],
    ugen_count: usize,
) -> Result<UGenNode> {
    let class_name = reader.pstring("ugen class")?;
    let rate_index = reader.u8("ugen rate")?;
    let rate = CalculationRate::from_index(rate_index)
        .ok_or_else(|| reader.error(format!("invalid rate {rate_index} for {class_name}")))?;
    let input_count = reader.count("input count", 8)?;
    let output_count = reader.u32("output count")?;
    let special_index = reader.u16("special index")?;

    let mut inputs = Vec::with_capacity(input_count);
    for _ in 0..input_count {
        let source = reader.u32("input")?;
        let index = reader.u32("input index")?;
        if source == CONSTANT_INPUT {
            let value = constants.get(index as usize).copied().ok_or_else(|| {
                reader.error(format!("constant index {index} out of range for {class_name}"))
            })?;
            inputs.push(Input::Constant(value));
        } else {
            if source as usize >= ugen_count {
                return Err(reader.error(format!(
                    "{class_name} references ugen {source} of {ugen_count}"
                )));
            }
            inputs.push(Input::Node(NodeRef {
                ugen: UGenId(source),
                output: index,
            }));
        }
    }
    if u64::from(output_count) > reader.remaining() {
        return Err(reader.error(format!("{class_name} output rates exceed the data")));
    }
    for _ in 0..output_count {
        reader.u8("output rate")?;
    }

    let spec = catalog
        .lookup(&class_name)
        .or_else(|| BuiltinCatalog.lookup(&class_name));
    let keys = input_keys(spec, input_count);
    let flags = spec.map_or(UGenFlags::NONE, |spec| spec.flags);

    let mut node = UGenNode::new(class_name, rate, flags)
        .with_special_index(special_index)
        .with_outputs(output_count);
    node.inputs = inputs;
    node.input_keys = keys;
    Ok(node)
}

/// Input names for a decoded UGen.
///
/// A variadic input takes every slot beyond the fixed ones. Slots beyond
/// what the descriptor declares get no name.
fn input_keys(spec: Option<&UGenSpec>, count: usize) -> Vec<InputKey> {
    let Some(spec) = spec else {
        return (0..count)
            .map(|i| InputKey::named(format!("input_{i}")))
            .collect();
    };
    let variadic = count.saturating_sub(spec.inputs.len().saturating_sub(1));
    let mut keys = Vec::with_capacity(count);
    for input in spec.inputs {
        if input.unexpanded {
            keys.extend((0..variadic).map(|i| InputKey::element(input.name, i)));
        } else {
            keys.push(InputKey::named(input.name));
        }
    }
    keys.truncate(count);
    keys
}

/// Rebuilds parameters from the value and name tables and hands each one
/// to the control covering its slot.
fn attach_parameters(
    ugens: &mut [UGenNode],
    names: &[(String, u32)],
    values: &[f32],
) -> Vec<(Parameter, u32)> {
    let mut sorted: Vec<&(String, u32)> = names.iter().collect();
    sorted.sort_by_key(|(_, index)| *index);

    let mut parameters = Vec::with_capacity(sorted.len());
    for (i, (name, index)) in sorted.iter().enumerate() {
        let start = *index as usize;
        let end = sorted
            .get(i + 1)
            .map_or(values.len(), |(_, next)| *next as usize);
        let mut parameter = Parameter::vector(name.clone(), values[start..end.max(start)].to_vec());

        if let Some(control) = ugens
            .iter()
            .find(|ugen| ugen.is_control() && covers(ugen, *index))
        {
            parameter.rate = parameter_rate(control);
            if control.class_name() == "LagControl" {
                let slot = (*index - u32::from(control.special_index())) as usize;
                if let Some(lag) = control.inputs().get(slot).and_then(Input::constant)
                    && lag != 0.0
                {
                    parameter.lag = Some(lag);
                }
            }
        }
        parameters.push((parameter, *index));
    }

    for ugen in ugens.iter_mut().filter(|ugen| ugen.is_control()) {
        let owned = parameters
            .iter()
            .filter(|(_, index)| covers(ugen, *index))
            .map(|(parameter, _)| parameter.clone())
            .collect();
        ugen.role = NodeRole::Control(owned);
    }
    parameters
}

fn covers(control: &UGenNode, index: u32) -> bool {
    let start = u32::from(control.special_index());
    index >= start && index < start + control.output_count()
}

fn parameter_rate(control: &UGenNode) -> ParameterRate {
    if control.class_name() == "TrigControl" {
        return ParameterRate::Trigger;
    }
    match control.rate() {
        CalculationRate::Scalar => ParameterRate::Scalar,
        CalculationRate::Audio => ParameterRate::Audio,
        _ => ParameterRate::Control,
    }
}
