//! Class-file decoding for Nova's decompiled views.
//!
//! [`StubBuilder`] turns the bytes of one class file into a [`StubTree`]: the declaration
//! skeleton (classes, fields, methods, parameters, type parameters, annotations) with all types
//! pre-rendered as source text.

#![forbid(unsafe_code)]

mod annotation;
mod builder;
mod cancel;
mod classfile;
mod constant_pool;
mod descriptor;
mod error;
mod flags;
mod literal;
mod names;
mod reader;
mod signature;
mod stub;
mod type_text;

pub use crate::annotation::{Annotation, ConstValue, ElementValue};
pub use crate::builder::{
    BuilderOptions, DirectoryResolver, MapResolver, NoSiblings, SiblingResolver, StubBuilder,
};
pub use crate::cancel::CancellationToken;
pub use crate::classfile::{ClassFile, ClassMember, InnerClassInfo};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{BuildError, Error, Result, SignatureError};
pub use crate::flags::{Modifiers, KEYWORD_ORDER};
pub use crate::literal::{quote_string, render_annotation, render_const, render_element_value};
pub use crate::names::{is_java_identifier, is_keyword};
pub use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    ClassTypeSignature, FieldTypeSignature, MethodSignature, SimpleClassTypeSignature,
    TypeArgument, TypeParameter, TypeSignature,
};
pub use crate::stub::{
    ClassData, ClassKind, FieldData, MethodData, ParameterData, ReferenceRole, StubData, StubId,
    StubKind, StubNode, StubPath, StubTree,
};
pub use crate::type_text::binary_to_source_name;
