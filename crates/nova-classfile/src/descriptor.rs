//! Erased field and method descriptors (JVMS 4.3).

use crate::error::{Error, Result};
use crate::type_text::{binary_to_source_name, is_printable_type_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Base(BaseType),
    /// Internal name, e.g. `java/util/Map$Entry`.
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// Source-style rendering: `java.util.Map.Entry[]`.
    pub fn java_text(&self) -> String {
        match self {
            FieldType::Base(base) => base.keyword().to_string(),
            FieldType::Object(internal) => binary_to_source_name(internal),
            FieldType::Array(component) => format!("{}[]", component.java_text()),
        }
    }

    /// Whether every class name in the type can be written in Java source.
    pub fn is_printable(&self) -> bool {
        match self {
            FieldType::Base(_) => true,
            FieldType::Object(internal) => is_printable_type_name(internal),
            FieldType::Array(component) => component.is_printable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

impl ReturnType {
    pub fn java_text(&self) -> String {
        match self {
            ReturnType::Void => "void".to_string(),
            ReturnType::Type(ty) => ty.java_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

impl MethodDescriptor {
    pub fn is_printable(&self) -> bool {
        let returns = match &self.return_type {
            ReturnType::Void => true,
            ReturnType::Type(ty) => ty.is_printable(),
        };
        returns && self.params.iter().all(FieldType::is_printable)
    }
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let mut pos = 0;
    let ty = field_type_at(desc, &mut pos)?;
    if pos != desc.len() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let invalid = || Error::InvalidDescriptor(desc.to_string());
    if !desc.starts_with('(') {
        return Err(invalid());
    }

    let mut pos = 1;
    let mut params = Vec::new();
    loop {
        match desc.as_bytes().get(pos) {
            None => return Err(invalid()),
            Some(b')') => {
                pos += 1;
                break;
            }
            Some(_) => params.push(field_type_at(desc, &mut pos)?),
        }
    }

    let return_type = if desc.as_bytes().get(pos) == Some(&b'V') {
        pos += 1;
        ReturnType::Void
    } else {
        ReturnType::Type(field_type_at(desc, &mut pos)?)
    };

    if pos != desc.len() {
        return Err(invalid());
    }

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

/// Parses a `ReturnType`-shaped descriptor such as the payload of a `c` annotation element.
pub fn parse_return_descriptor(desc: &str) -> Result<ReturnType> {
    if desc == "V" {
        return Ok(ReturnType::Void);
    }
    parse_field_descriptor(desc).map(ReturnType::Type)
}

fn field_type_at(desc: &str, pos: &mut usize) -> Result<FieldType> {
    let invalid = || Error::InvalidDescriptor(desc.to_string());
    let mut dims = 0usize;
    while desc.as_bytes().get(*pos) == Some(&b'[') {
        dims += 1;
        *pos += 1;
    }
    // JVMS 4.3.2 caps arrays at 255 dimensions.
    if dims > 255 {
        return Err(invalid());
    }

    let code = *desc.as_bytes().get(*pos).ok_or_else(invalid)?;
    let mut ty = if let Some(base) = BaseType::from_code(code) {
        *pos += 1;
        FieldType::Base(base)
    } else if code == b'L' {
        let rest = &desc[*pos + 1..];
        let end = rest.find(';').ok_or_else(invalid)?;
        let name = &rest[..end];
        if name.is_empty() {
            return Err(invalid());
        }
        *pos += end + 2;
        FieldType::Object(name.to_string())
    } else {
        return Err(invalid());
    };

    for _ in 0..dims {
        ty = FieldType::Array(Box::new(ty));
    }
    Ok(ty)
}
