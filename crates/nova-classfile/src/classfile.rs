use crate::annotation::{
    parse_annotations, parse_parameter_annotations, Annotation, AnnotationTable, ElementValue,
};
use crate::annotation::ConstValue;
use crate::constant_pool::{ConstantPool, CpInfo};
use crate::error::{Error, Result};
use crate::reader::Reader;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SYNCHRONIZED: u16 = 0x0020;
pub const ACC_VOLATILE: u16 = 0x0040;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_TRANSIENT: u16 = 0x0080;
pub const ACC_VARARGS: u16 = 0x0080;
pub const ACC_NATIVE: u16 = 0x0100;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_STRICT: u16 = 0x0800;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;

/// The parts of a classfile the stub builder consumes. Method bodies are never decoded.
#[derive(Debug, Clone)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: u16,
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<ClassMember>,
    pub methods: Vec<ClassMember>,
    pub signature: Option<String>,
    pub deprecated: bool,
    pub synthetic: bool,
    pub annotations: Vec<Annotation>,
    pub inner_classes: Vec<InnerClassInfo>,
}

#[derive(Debug, Clone)]
pub struct ClassMember {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub deprecated: bool,
    pub synthetic: bool,
    /// Visible annotations first, then invisible ones.
    pub annotations: Vec<Annotation>,
    /// Methods only: per-parameter annotations, merged across visibility.
    pub parameter_annotations: Vec<Vec<Annotation>>,
    /// Methods only: the `Exceptions` attribute, as internal names.
    pub exceptions: Vec<String>,
    /// Methods only: the `AnnotationDefault` attribute.
    pub annotation_default: Option<ElementValue>,
    /// Methods only: `MethodParameters` entries (name, access flags).
    pub parameters: Vec<(Option<String>, u16)>,
    /// Fields only: the `ConstantValue` attribute.
    pub constant_value: Option<ConstValue>,
}

impl ClassMember {
    pub fn is_synthetic(&self) -> bool {
        self.synthetic || self.access_flags & ACC_SYNTHETIC != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClassInfo {
    pub inner_class: String,
    pub outer_class: Option<String>,
    pub inner_name: Option<String>,
    pub access_flags: u16,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let magic = reader.read_u4()?;
        if magic != 0xCAFEBABE {
            return Err(Error::InvalidMagic(magic));
        }

        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let cp = ConstantPool::parse(&mut reader)?;

        let access_flags = reader.read_u2()?;
        let this_class = cp.get_class_name(reader.read_u2()?)?;
        let super_class_idx = reader.read_u2()?;
        let super_class = if super_class_idx == 0 {
            None
        } else {
            Some(cp.get_class_name(super_class_idx)?)
        };

        let interfaces_count = reader.read_u2()? as usize;
        let mut interfaces = Vec::with_capacity(interfaces_count);
        for _ in 0..interfaces_count {
            interfaces.push(cp.get_class_name(reader.read_u2()?)?);
        }

        let fields_count = reader.read_u2()? as usize;
        let mut fields = Vec::with_capacity(fields_count);
        for _ in 0..fields_count {
            fields.push(parse_member(&mut reader, &cp, AttributeTarget::Field)?);
        }

        let methods_count = reader.read_u2()? as usize;
        let mut methods = Vec::with_capacity(methods_count);
        for _ in 0..methods_count {
            methods.push(parse_member(&mut reader, &cp, AttributeTarget::Method)?);
        }

        let class_attrs = parse_attributes(&mut reader, &cp, AttributeTarget::Class)?;

        reader.ensure_empty()?;

        Ok(Self {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            signature: class_attrs.signature,
            deprecated: class_attrs.deprecated,
            synthetic: class_attrs.synthetic,
            annotations: class_attrs.annotations,
            inner_classes: class_attrs.inner_classes,
        })
    }

    /// The `InnerClasses` entry describing this class itself, present when this file is a
    /// nested class.
    pub fn own_inner_class_entry(&self) -> Option<&InnerClassInfo> {
        self.inner_classes
            .iter()
            .find(|info| info.inner_class == self.this_class)
    }
}

fn parse_member(
    reader: &mut Reader<'_>,
    cp: &ConstantPool,
    target: AttributeTarget,
) -> Result<ClassMember> {
    let access_flags = reader.read_u2()?;
    let name = cp.get_utf8(reader.read_u2()?)?.to_string();
    let descriptor = cp.get_utf8(reader.read_u2()?)?.to_string();

    let attrs = parse_attributes(reader, cp, target)?;
    Ok(ClassMember {
        access_flags,
        name,
        descriptor,
        signature: attrs.signature,
        deprecated: attrs.deprecated,
        synthetic: attrs.synthetic,
        annotations: attrs.annotations,
        parameter_annotations: attrs.parameter_annotations,
        exceptions: attrs.exceptions,
        annotation_default: attrs.annotation_default,
        parameters: attrs.parameters,
        constant_value: attrs.constant_value,
    })
}

#[derive(Default)]
struct ParsedAttributes {
    signature: Option<String>,
    deprecated: bool,
    synthetic: bool,
    annotations: Vec<Annotation>,
    invisible_annotations: Vec<Annotation>,
    parameter_annotations: Vec<Vec<Annotation>>,
    exceptions: Vec<String>,
    annotation_default: Option<ElementValue>,
    parameters: Vec<(Option<String>, u16)>,
    constant_value: Option<ConstValue>,
    inner_classes: Vec<InnerClassInfo>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum AttributeTarget {
    Class,
    Field,
    Method,
}

fn parse_attributes(
    reader: &mut Reader<'_>,
    cp: &ConstantPool,
    target: AttributeTarget,
) -> Result<ParsedAttributes> {
    let attributes_count = reader.read_u2()? as usize;
    let mut parsed = ParsedAttributes::default();
    for _ in 0..attributes_count {
        let name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        let info = reader.read_bytes(length)?;
        let name = cp.get_utf8(name_index)?;

        let mut sub = Reader::new(info);
        match name {
            "Signature" => {
                parsed.signature = Some(cp.get_utf8(sub.read_u2()?)?.to_string());
                sub.ensure_empty()?;
            }
            "Deprecated" => parsed.deprecated = true,
            "Synthetic" => parsed.synthetic = true,
            "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                let anns = annotation_table(name, parse_annotations(&mut sub, cp)?, &sub)?;
                if name == "RuntimeVisibleAnnotations" {
                    parsed.annotations.extend(anns);
                } else {
                    parsed.invisible_annotations.extend(anns);
                }
            }
            "RuntimeVisibleParameterAnnotations" | "RuntimeInvisibleParameterAnnotations"
                if target == AttributeTarget::Method =>
            {
                let params =
                    annotation_table(name, parse_parameter_annotations(&mut sub, cp)?, &sub)?;
                merge_parameter_annotations(&mut parsed.parameter_annotations, params);
            }
            "AnnotationDefault" if target == AttributeTarget::Method => {
                let Some(value) = annotation_attribute(name, ElementValue::parse(&mut sub, cp))?
                else {
                    continue;
                };
                sub.ensure_empty()?;
                parsed.annotation_default = Some(value);
            }
            "Exceptions" if target == AttributeTarget::Method => {
                let num = sub.read_u2()? as usize;
                for _ in 0..num {
                    parsed.exceptions.push(cp.get_class_name(sub.read_u2()?)?);
                }
                sub.ensure_empty()?;
            }
            "MethodParameters" if target == AttributeTarget::Method => {
                let num = sub.read_u1()? as usize;
                for _ in 0..num {
                    let name_index = sub.read_u2()?;
                    let flags = sub.read_u2()?;
                    let name = if name_index == 0 {
                        None
                    } else {
                        Some(cp.get_utf8(name_index)?.to_string())
                    };
                    parsed.parameters.push((name, flags));
                }
                sub.ensure_empty()?;
            }
            "ConstantValue" if target == AttributeTarget::Field => {
                let idx = sub.read_u2()?;
                let value = match cp.get(idx)? {
                    CpInfo::Integer(v) => ConstValue::Int(*v),
                    CpInfo::Long(v) => ConstValue::Long(*v),
                    CpInfo::Float(v) => ConstValue::Float(*v),
                    CpInfo::Double(v) => ConstValue::Double(*v),
                    CpInfo::String { .. } => ConstValue::String(cp.get_string_constant(idx)?),
                    _ => return Err(Error::MalformedAttribute("ConstantValue")),
                };
                parsed.constant_value = Some(value);
                sub.ensure_empty()?;
            }
            "InnerClasses" if target == AttributeTarget::Class => {
                let num = sub.read_u2()? as usize;
                let mut inners = Vec::with_capacity(num);
                for _ in 0..num {
                    let inner_class_info_index = sub.read_u2()?;
                    let outer_class_info_index = sub.read_u2()?;
                    let inner_name_index = sub.read_u2()?;
                    let inner_access_flags = sub.read_u2()?;

                    let inner_class = cp.get_class_name(inner_class_info_index)?;
                    let outer_class = if outer_class_info_index == 0 {
                        None
                    } else {
                        Some(cp.get_class_name(outer_class_info_index)?)
                    };
                    let inner_name = if inner_name_index == 0 {
                        None
                    } else {
                        Some(cp.get_utf8(inner_name_index)?.to_string())
                    };

                    inners.push(InnerClassInfo {
                        inner_class,
                        outer_class,
                        inner_name,
                        access_flags: inner_access_flags,
                    });
                }
                parsed.inner_classes.extend(inners);
                sub.ensure_empty()?;
            }
            _ => {
                // Unknown attribute: intentionally skipped.
            }
        }
    }

    let invisible = std::mem::take(&mut parsed.invisible_annotations);
    parsed.annotations.extend(invisible);
    Ok(parsed)
}

/// Keeps the annotations decoded before an unknown element tag. Only a fully decoded table
/// must consume its whole attribute.
fn annotation_table<T>(
    attribute: &str,
    table: AnnotationTable<T>,
    sub: &Reader<'_>,
) -> Result<Vec<T>> {
    match table.unsupported {
        None => sub.ensure_empty()?,
        Some(tag) => {
            tracing::error!(
                target: "nova.classfile",
                attribute,
                tag = %tag,
                kept = table.entries.len(),
                "unsupported annotation element value; dropping the rest of the attribute"
            );
        }
    }
    Ok(table.entries)
}

/// An annotation default with an element tag this decoder does not know is dropped; the rest
/// of the classfile stays usable.
fn annotation_attribute<T>(attribute: &str, parsed: Result<T>) -> Result<Option<T>> {
    match parsed {
        Ok(value) => Ok(Some(value)),
        Err(Error::UnsupportedElementValue(tag)) => {
            tracing::error!(
                target: "nova.classfile",
                attribute,
                tag = %tag,
                "unsupported annotation element value; dropping attribute"
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn merge_parameter_annotations(into: &mut Vec<Vec<Annotation>>, params: Vec<Vec<Annotation>>) {
    if into.len() < params.len() {
        into.resize_with(params.len(), Vec::new);
    }
    for (slot, anns) in into.iter_mut().zip(params) {
        slot.extend(anns);
    }
}
