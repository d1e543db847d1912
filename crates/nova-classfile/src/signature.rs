//! Recursive-descent parser for JVMS 4.7.9.1 generic signatures.
//!
//! Parsing is all-or-nothing: any malformed or trailing input yields a [`SignatureError`] and
//! the caller is expected to fall back to the erased descriptor. Names the grammar allows but
//! Java source cannot spell (`a-b`, `Outer$1`) are rejected the same way.

use crate::descriptor::BaseType;
use crate::error::SignatureError;
use crate::names::is_java_identifier;
use crate::type_text::{binary_to_source_name, collapse_separators, is_printable_type_name};

/// Arbitrary nesting cap so adversarial signatures cannot exhaust the stack.
const MAX_NESTING: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_params: Vec<TypeParameter>,
    pub super_class: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_params: Vec<TypeParameter>,
    pub params: Vec<TypeSignature>,
    /// `None` for `void`.
    pub return_type: Option<TypeSignature>,
    pub throws: Vec<FieldTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub class_bound: Option<FieldTypeSignature>,
    pub interface_bounds: Vec<FieldTypeSignature>,
}

impl TypeParameter {
    /// Rendered bounds with the implicit `java.lang.Object` bound dropped.
    pub fn bound_texts(&self) -> Vec<String> {
        self.class_bound
            .iter()
            .filter(|bound| !bound.is_plain_object())
            .chain(self.interface_bounds.iter())
            .map(FieldTypeSignature::java_text)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Base(BaseType),
    Field(FieldTypeSignature),
}

impl TypeSignature {
    pub fn java_text(&self) -> String {
        match self {
            TypeSignature::Base(base) => base.keyword().to_string(),
            TypeSignature::Field(field) => field.java_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTypeSignature {
    Class(ClassTypeSignature),
    TypeVariable(String),
    Array(Box<TypeSignature>),
}

impl FieldTypeSignature {
    pub fn java_text(&self) -> String {
        match self {
            FieldTypeSignature::Class(class) => class.java_text(),
            FieldTypeSignature::TypeVariable(name) => name.clone(),
            FieldTypeSignature::Array(component) => format!("{}[]", component.java_text()),
        }
    }

    fn is_plain_object(&self) -> bool {
        matches!(self, FieldTypeSignature::Class(class)
            if class.segments.len() == 1
                && class.segments[0].args.is_empty()
                && class.internal_name() == "java/lang/Object")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    /// Internal package prefix without the trailing `/` (`java/util`), empty for the default
    /// package.
    pub package: String,
    /// Outermost first: `Outer<T>.Inner<U>` has two segments.
    pub segments: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    /// Internal name of the outermost segment (`java/util/Map`).
    pub fn internal_name(&self) -> String {
        let first = self.segments.first().map(|s| s.name.as_str()).unwrap_or("");
        if self.package.is_empty() {
            first.to_string()
        } else {
            format!("{}/{}", self.package, first)
        }
    }

    pub fn java_text(&self) -> String {
        let mut out = String::new();
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx == 0 {
                out.push_str(&binary_to_source_name(&self.internal_name()));
            } else {
                out.push('.');
                out.push_str(&collapse_separators(&segment.name));
            }
            if !segment.args.is_empty() {
                out.push('<');
                let args: Vec<String> = segment.args.iter().map(TypeArgument::java_text).collect();
                out.push_str(&args.join(", "));
                out.push('>');
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleClassTypeSignature {
    pub name: String,
    pub args: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// `*`
    Any,
    /// `+T`
    Extends(FieldTypeSignature),
    /// `-T`
    Super(FieldTypeSignature),
    Exact(FieldTypeSignature),
}

impl TypeArgument {
    pub fn java_text(&self) -> String {
        match self {
            TypeArgument::Any => "?".to_string(),
            TypeArgument::Extends(bound) => format!("? extends {}", bound.java_text()),
            TypeArgument::Super(bound) => format!("? super {}", bound.java_text()),
            TypeArgument::Exact(ty) => ty.java_text(),
        }
    }
}

pub fn parse_class_signature(sig: &str) -> Result<ClassSignature, SignatureError> {
    let mut cursor = SignatureCursor::new(sig);
    let type_params = cursor.type_parameters_opt()?;
    let super_class = cursor.class_type_signature()?;
    let mut interfaces = Vec::new();
    while !cursor.at_end() {
        interfaces.push(cursor.class_type_signature()?);
    }
    Ok(ClassSignature {
        type_params,
        super_class,
        interfaces,
    })
}

pub fn parse_method_signature(sig: &str) -> Result<MethodSignature, SignatureError> {
    let mut cursor = SignatureCursor::new(sig);
    let type_params = cursor.type_parameters_opt()?;
    cursor.expect(b'(')?;
    let mut params = Vec::new();
    while cursor.peek() != Some(b')') {
        if cursor.at_end() {
            return Err(cursor.error("unterminated parameter list"));
        }
        params.push(cursor.type_signature()?);
    }
    cursor.expect(b')')?;

    let return_type = if cursor.peek() == Some(b'V') {
        cursor.bump();
        None
    } else {
        Some(cursor.type_signature()?)
    };

    let mut throws = Vec::new();
    while cursor.peek() == Some(b'^') {
        cursor.bump();
        match cursor.peek() {
            Some(b'T') => throws.push(cursor.type_variable()?),
            Some(b'L') => throws.push(FieldTypeSignature::Class(cursor.class_type_signature()?)),
            _ => return Err(cursor.error("expected class type or type variable after '^'")),
        }
    }
    cursor.finish()?;

    Ok(MethodSignature {
        type_params,
        params,
        return_type,
        throws,
    })
}

pub fn parse_field_signature(sig: &str) -> Result<FieldTypeSignature, SignatureError> {
    let mut cursor = SignatureCursor::new(sig);
    let ty = cursor.field_type_signature()?;
    cursor.finish()?;
    Ok(ty)
}

/// Mutable scan position over one signature string.
struct SignatureCursor<'a> {
    sig: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> SignatureCursor<'a> {
    fn new(sig: &'a str) -> Self {
        Self {
            sig,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.sig.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.sig.len()
    }

    fn error(&self, reason: &'static str) -> SignatureError {
        SignatureError {
            signature: self.sig.to_string(),
            offset: self.pos,
            reason,
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), SignatureError> {
        if self.peek() != Some(byte) {
            return Err(self.error(match byte {
                b'(' => "expected '('",
                b')' => "expected ')'",
                b':' => "expected ':'",
                b';' => "expected ';'",
                b'>' => "expected '>'",
                _ => "unexpected character",
            }));
        }
        self.bump();
        Ok(())
    }

    fn finish(&self) -> Result<(), SignatureError> {
        if !self.at_end() {
            return Err(self.error("trailing characters"));
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), SignatureError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error("nesting too deep"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// JVMS identifiers: anything except `. ; [ / < > :`. Only ASCII bytes are delimiters, so
    /// byte scanning never splits a multi-byte character.
    fn identifier(&mut self) -> Result<&'a str, SignatureError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b'.' | b';' | b'[' | b'/' | b'<' | b'>' | b':') {
                break;
            }
            self.bump();
        }
        if self.pos == start {
            return Err(self.error("expected identifier"));
        }
        Ok(&self.sig[start..self.pos])
    }

    /// A type parameter or type variable name.
    fn variable_name(&mut self) -> Result<String, SignatureError> {
        let start = self.pos;
        let name = self.identifier()?;
        if !is_java_identifier(name) {
            self.pos = start;
            return Err(self.error("type variable name is not a Java identifier"));
        }
        Ok(name.to_string())
    }

    fn type_parameters_opt(&mut self) -> Result<Vec<TypeParameter>, SignatureError> {
        if self.peek() != Some(b'<') {
            return Ok(Vec::new());
        }
        self.bump();
        let mut params = Vec::new();
        while self.peek() != Some(b'>') {
            if self.at_end() {
                return Err(self.error("unterminated type parameter list"));
            }
            params.push(self.type_parameter()?);
        }
        self.bump();
        if params.is_empty() {
            return Err(self.error("empty type parameter list"));
        }
        Ok(params)
    }

    fn type_parameter(&mut self) -> Result<TypeParameter, SignatureError> {
        let name = self.variable_name()?;
        self.expect(b':')?;
        let class_bound = match self.peek() {
            Some(b'L' | b'T' | b'[') => Some(self.field_type_signature()?),
            _ => None,
        };
        let mut interface_bounds = Vec::new();
        while self.peek() == Some(b':') {
            self.bump();
            interface_bounds.push(self.field_type_signature()?);
        }
        Ok(TypeParameter {
            name,
            class_bound,
            interface_bounds,
        })
    }

    fn type_signature(&mut self) -> Result<TypeSignature, SignatureError> {
        if let Some(base) = self.peek().and_then(BaseType::from_code) {
            self.bump();
            return Ok(TypeSignature::Base(base));
        }
        Ok(TypeSignature::Field(self.field_type_signature()?))
    }

    fn field_type_signature(&mut self) -> Result<FieldTypeSignature, SignatureError> {
        match self.peek() {
            Some(b'L') => Ok(FieldTypeSignature::Class(self.class_type_signature()?)),
            Some(b'T') => self.type_variable(),
            Some(b'[') => {
                self.bump();
                self.enter()?;
                let component = self.type_signature()?;
                self.leave();
                Ok(FieldTypeSignature::Array(Box::new(component)))
            }
            None => Err(self.error("unexpected end of signature")),
            Some(_) => Err(self.error("expected reference type")),
        }
    }

    fn type_variable(&mut self) -> Result<FieldTypeSignature, SignatureError> {
        self.expect(b'T').map_err(|_| self.error("expected type variable"))?;
        let name = self.variable_name()?;
        self.expect(b';')?;
        Ok(FieldTypeSignature::TypeVariable(name))
    }

    fn class_type_signature(&mut self) -> Result<ClassTypeSignature, SignatureError> {
        if self.peek() != Some(b'L') {
            return Err(self.error("expected class type"));
        }
        self.bump();
        self.enter()?;

        let start = self.pos;
        let mut path = vec![self.identifier()?];
        while self.peek() == Some(b'/') {
            self.bump();
            path.push(self.identifier()?);
        }
        if !is_printable_type_name(&path.join("/")) {
            self.pos = start;
            return Err(self.error("class name is not a Java name"));
        }
        let first = path.pop().unwrap_or_default();
        let package = path.join("/");

        let mut segments = vec![SimpleClassTypeSignature {
            name: first.to_string(),
            args: self.type_arguments_opt()?,
        }];
        while self.peek() == Some(b'.') {
            self.bump();
            let start = self.pos;
            let name = self.identifier()?.to_string();
            if !collapse_separators(&name).split('.').all(is_java_identifier) {
                self.pos = start;
                return Err(self.error("inner class name is not a Java identifier"));
            }
            let args = self.type_arguments_opt()?;
            segments.push(SimpleClassTypeSignature { name, args });
        }
        self.expect(b';')?;
        self.leave();

        Ok(ClassTypeSignature { package, segments })
    }

    fn type_arguments_opt(&mut self) -> Result<Vec<TypeArgument>, SignatureError> {
        if self.peek() != Some(b'<') {
            return Ok(Vec::new());
        }
        self.bump();
        let mut args = Vec::new();
        while self.peek() != Some(b'>') {
            let arg = match self.peek() {
                None => return Err(self.error("unterminated type argument list")),
                Some(b'*') => {
                    self.bump();
                    TypeArgument::Any
                }
                Some(b'+') => {
                    self.bump();
                    TypeArgument::Extends(self.field_type_signature()?)
                }
                Some(b'-') => {
                    self.bump();
                    TypeArgument::Super(self.field_type_signature()?)
                }
                Some(_) => TypeArgument::Exact(self.field_type_signature()?),
            };
            args.push(arg);
        }
        self.bump();
        if args.is_empty() {
            return Err(self.error("empty type argument list"));
        }
        Ok(args)
    }
}
