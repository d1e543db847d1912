//! Source-literal rendering for constant values and annotation element values.

use std::fmt::Write as _;

use crate::annotation::{Annotation, ConstValue, ElementValue};
use crate::descriptor::{parse_field_descriptor, parse_return_descriptor, FieldType, ReturnType};
use crate::error::{Error, Result};
use crate::names::is_java_identifier;
use crate::type_text::{binary_to_source_name, is_printable_type_name};

/// Renders a `ConstantValue` attribute payload as an initializer for a field with the given
/// descriptor. `boolean` and `char` constants are stored as pool integers.
pub fn render_field_constant(value: &ConstValue, descriptor: &str) -> String {
    match (value, descriptor) {
        (ConstValue::Int(v), "Z") => render_const(&ConstValue::Boolean(*v != 0)),
        (ConstValue::Int(v), "C") => render_const(&ConstValue::Char(*v as u16)),
        _ => render_const(value),
    }
}

pub fn render_const(value: &ConstValue) -> String {
    match value {
        ConstValue::Byte(v) => v.to_string(),
        ConstValue::Short(v) => v.to_string(),
        ConstValue::Int(v) => v.to_string(),
        ConstValue::Long(v) => format!("{v}L"),
        ConstValue::Float(v) => render_float(*v),
        ConstValue::Double(v) => render_double(*v),
        ConstValue::Boolean(v) => v.to_string(),
        ConstValue::Char(v) => render_char(*v),
        ConstValue::String(v) => quote_string(v),
    }
}

fn render_double(v: f64) -> String {
    if v.is_nan() {
        "0.0 / 0.0".to_string()
    } else if v == f64::INFINITY {
        "1.0 / 0.0".to_string()
    } else if v == f64::NEG_INFINITY {
        "-1.0 / 0.0".to_string()
    } else {
        // `Debug` always keeps a `.` or an exponent, so the text stays a double literal.
        format!("{v:?}")
    }
}

fn render_float(v: f32) -> String {
    if v.is_nan() {
        "0.0f / 0.0f".to_string()
    } else if v == f32::INFINITY {
        "1.0f / 0.0f".to_string()
    } else if v == f32::NEG_INFINITY {
        "-1.0f / 0.0f".to_string()
    } else {
        format!("{v:?}f")
    }
}

fn render_char(unit: u16) -> String {
    let mut out = String::from("'");
    match unit {
        0x27 => out.push_str("\\'"),
        _ => push_escaped_unit(&mut out, unit, false),
    }
    out.push('\'');
    out
}

pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        let mut units = [0u16; 2];
        for unit in ch.encode_utf16(&mut units) {
            push_escaped_unit(&mut out, *unit, true);
        }
    }
    out.push('"');
    out
}

fn push_escaped_unit(out: &mut String, unit: u16, in_string: bool) {
    match unit {
        0x08 => out.push_str("\\b"),
        0x09 => out.push_str("\\t"),
        0x0A => out.push_str("\\n"),
        0x0C => out.push_str("\\f"),
        0x0D => out.push_str("\\r"),
        0x22 if in_string => out.push_str("\\\""),
        0x5C => out.push_str("\\\\"),
        0x20..=0x7E => out.push(char::from(unit as u8)),
        _ => match char::from_u32(u32::from(unit)) {
            Some(ch) if !ch.is_control() && !(0xD800..=0xDFFF).contains(&unit) && unit < 0xFFFE => {
                out.push(ch)
            }
            _ => {
                let _ = write!(out, "\\u{unit:04x}");
            }
        },
    }
}

/// `@a.B` or `@a.B(value = "x", n = 3)`.
pub fn render_annotation(annotation: &Annotation) -> Result<String> {
    let name = annotation_type_name(annotation)?;
    if annotation.elements.is_empty() {
        return Ok(format!("@{name}"));
    }
    let mut out = format!("@{name}(");
    for (idx, (element, value)) in annotation.elements.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        if !is_java_identifier(element) {
            return Err(Error::UnprintableName(element.clone()));
        }
        out.push_str(element);
        out.push_str(" = ");
        out.push_str(&render_element_value(value)?);
    }
    out.push(')');
    Ok(out)
}

/// Qualified source name of the annotation's type.
pub fn annotation_type_name(annotation: &Annotation) -> Result<String> {
    let internal = annotation
        .type_internal_name()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::InvalidDescriptor(annotation.type_descriptor.clone()))?;
    if !is_printable_type_name(internal) {
        return Err(Error::UnprintableName(internal.to_string()));
    }
    Ok(binary_to_source_name(internal))
}

pub fn render_element_value(value: &ElementValue) -> Result<String> {
    Ok(match value {
        ElementValue::Const(c) => render_const(c),
        ElementValue::Enum {
            type_descriptor,
            const_name,
        } => match parse_field_descriptor(type_descriptor)? {
            FieldType::Object(internal)
                if is_printable_type_name(&internal) && is_java_identifier(const_name) =>
            {
                format!("{}.{}", binary_to_source_name(&internal), const_name)
            }
            FieldType::Object(_) => {
                return Err(Error::UnprintableName(format!("{type_descriptor}.{const_name}")))
            }
            _ => return Err(Error::InvalidDescriptor(type_descriptor.clone())),
        },
        ElementValue::Class(desc) => {
            let ty = parse_return_descriptor(desc)?;
            if matches!(&ty, ReturnType::Type(field) if !field.is_printable()) {
                return Err(Error::UnprintableName(desc.clone()));
            }
            format!("{}.class", ty.java_text())
        }
        ElementValue::Annotation(nested) => render_annotation(nested)?,
        ElementValue::Array(values) => {
            let items = values
                .iter()
                .map(render_element_value)
                .collect::<Result<Vec<_>>>()?;
            format!("{{{}}}", items.join(", "))
        }
    })
}
