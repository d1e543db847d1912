use crate::constant_pool::{ConstantPool, CpInfo};
use crate::error::{Error, Result};
use crate::reader::Reader;

/// A decoded `annotation` structure (JVMS 4.7.16).
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub type_descriptor: String,
    pub elements: Vec<(String, ElementValue)>,
}

impl Annotation {
    pub(crate) fn parse(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<Self> {
        let type_descriptor = cp.get_utf8(reader.read_u2()?)?.to_string();

        let num_pairs = reader.read_u2()? as usize;
        let mut elements = Vec::with_capacity(num_pairs);
        for _ in 0..num_pairs {
            let name = cp.get_utf8(reader.read_u2()?)?.to_string();
            let value = ElementValue::parse(reader, cp)?;
            elements.push((name, value));
        }

        Ok(Self {
            type_descriptor,
            elements,
        })
    }

    /// Internal name of the annotation type (`java/lang/Deprecated`), if the descriptor is an
    /// object type.
    pub fn type_internal_name(&self) -> Option<&str> {
        self.type_descriptor
            .strip_prefix('L')
            .and_then(|rest| rest.strip_suffix(';'))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Const(ConstValue),
    Enum {
        type_descriptor: String,
        const_name: String,
    },
    /// A class literal; the payload is a return descriptor (`V`, `I`, `Ljava/lang/String;`).
    Class(String),
    Annotation(Box<Annotation>),
    Array(Vec<ElementValue>),
}

impl ElementValue {
    pub(crate) fn parse(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<Self> {
        let tag = reader.read_u1()? as char;
        match tag {
            'B' | 'C' | 'I' | 'S' | 'Z' => {
                let idx = reader.read_u2()?;
                let value = match cp.get(idx)? {
                    CpInfo::Integer(v) => *v,
                    other => return Err(mismatch(idx, "Integer", other)),
                };
                let cv = match tag {
                    'B' => ConstValue::Byte(value as i8),
                    'C' => ConstValue::Char(value as u16),
                    'I' => ConstValue::Int(value),
                    'S' => ConstValue::Short(value as i16),
                    _ => ConstValue::Boolean(value != 0),
                };
                Ok(ElementValue::Const(cv))
            }
            'D' => {
                let idx = reader.read_u2()?;
                match cp.get(idx)? {
                    CpInfo::Double(v) => Ok(ElementValue::Const(ConstValue::Double(*v))),
                    other => Err(mismatch(idx, "Double", other)),
                }
            }
            'F' => {
                let idx = reader.read_u2()?;
                match cp.get(idx)? {
                    CpInfo::Float(v) => Ok(ElementValue::Const(ConstValue::Float(*v))),
                    other => Err(mismatch(idx, "Float", other)),
                }
            }
            'J' => {
                let idx = reader.read_u2()?;
                match cp.get(idx)? {
                    CpInfo::Long(v) => Ok(ElementValue::Const(ConstValue::Long(*v))),
                    other => Err(mismatch(idx, "Long", other)),
                }
            }
            's' => {
                let idx = reader.read_u2()?;
                Ok(ElementValue::Const(ConstValue::String(
                    cp.get_string_constant(idx)?,
                )))
            }
            'e' => {
                let type_name_index = reader.read_u2()?;
                let const_name_index = reader.read_u2()?;
                Ok(ElementValue::Enum {
                    type_descriptor: cp.get_utf8(type_name_index)?.to_string(),
                    const_name: cp.get_utf8(const_name_index)?.to_string(),
                })
            }
            'c' => Ok(ElementValue::Class(
                cp.get_utf8(reader.read_u2()?)?.to_string(),
            )),
            '@' => Ok(ElementValue::Annotation(Box::new(Annotation::parse(
                reader, cp,
            )?))),
            '[' => {
                let num_values = reader.read_u2()? as usize;
                let mut values = Vec::with_capacity(num_values);
                for _ in 0..num_values {
                    values.push(ElementValue::parse(reader, cp)?);
                }
                Ok(ElementValue::Array(values))
            }
            other => Err(Error::UnsupportedElementValue(other)),
        }
    }
}

/// Constant values, shared by annotation elements and `ConstantValue` attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Byte(i8),
    /// A UTF-16 code unit; lone surrogates are legal here.
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
}

fn mismatch(index: u16, expected: &'static str, found: &CpInfo) -> Error {
    Error::ConstantPoolTypeMismatch {
        index,
        expected,
        found: found.kind(),
    }
}

/// The annotations of one table, in order, up to the first one using an element tag this
/// decoder does not know. Element values carry no length, so nothing after that tag can be
/// located.
#[derive(Debug)]
pub(crate) struct AnnotationTable<T> {
    pub entries: Vec<T>,
    pub unsupported: Option<char>,
}

pub(crate) fn parse_annotations(
    sub: &mut Reader<'_>,
    cp: &ConstantPool,
) -> Result<AnnotationTable<Annotation>> {
    let num = sub.read_u2()? as usize;
    let mut table = AnnotationTable {
        entries: Vec::with_capacity(num),
        unsupported: None,
    };
    for _ in 0..num {
        match Annotation::parse(sub, cp) {
            Ok(ann) => table.entries.push(ann),
            Err(Error::UnsupportedElementValue(tag)) => {
                table.unsupported = Some(tag);
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(table)
}

pub(crate) fn parse_parameter_annotations(
    sub: &mut Reader<'_>,
    cp: &ConstantPool,
) -> Result<AnnotationTable<Vec<Annotation>>> {
    let num_parameters = sub.read_u1()? as usize;
    let mut table = AnnotationTable {
        entries: Vec::with_capacity(num_parameters),
        unsupported: None,
    };
    for _ in 0..num_parameters {
        let param = parse_annotations(sub, cp)?;
        table.entries.push(param.entries);
        if param.unsupported.is_some() {
            table.unsupported = param.unsupported;
            break;
        }
    }
    // Unreadable parameters still take their slot so later ones line up with the descriptor.
    table.entries.resize_with(num_parameters, Vec::new);
    Ok(table)
}
