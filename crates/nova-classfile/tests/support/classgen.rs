//! Assembles class files for tests without needing a Java toolchain.

#![allow(dead_code)]

use std::collections::HashMap;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_VOLATILE: u16 = 0x0040;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_TRANSIENT: u16 = 0x0080;
pub const ACC_VARARGS: u16 = 0x0080;
pub const ACC_NATIVE: u16 = 0x0100;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;
pub const ACC_MANDATED: u16 = 0x8000;

#[derive(Default)]
struct Pool {
    entries: Vec<u8>,
    count: u16,
    index: HashMap<Vec<u8>, u16>,
}

impl Pool {
    fn add(&mut self, entry: Vec<u8>, wide: bool) -> u16 {
        if let Some(idx) = self.index.get(&entry) {
            return *idx;
        }
        let idx = self.count + 1;
        self.count += if wide { 2 } else { 1 };
        self.entries.extend_from_slice(&entry);
        self.index.insert(entry, idx);
        idx
    }

    fn utf8(&mut self, s: &str) -> u16 {
        let bytes = modified_utf8(s);
        let mut entry = vec![1];
        entry.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        entry.extend_from_slice(&bytes);
        self.add(entry, false)
    }

    fn class(&mut self, internal: &str) -> u16 {
        let name = self.utf8(internal);
        let mut entry = vec![7];
        entry.extend_from_slice(&name.to_be_bytes());
        self.add(entry, false)
    }

    fn string(&mut self, s: &str) -> u16 {
        let utf8 = self.utf8(s);
        let mut entry = vec![8];
        entry.extend_from_slice(&utf8.to_be_bytes());
        self.add(entry, false)
    }

    fn integer(&mut self, v: i32) -> u16 {
        let mut entry = vec![3];
        entry.extend_from_slice(&v.to_be_bytes());
        self.add(entry, false)
    }

    fn float(&mut self, v: f32) -> u16 {
        let mut entry = vec![4];
        entry.extend_from_slice(&v.to_bits().to_be_bytes());
        self.add(entry, false)
    }

    fn long(&mut self, v: i64) -> u16 {
        let mut entry = vec![5];
        entry.extend_from_slice(&v.to_be_bytes());
        self.add(entry, true)
    }

    fn double(&mut self, v: f64) -> u16 {
        let mut entry = vec![6];
        entry.extend_from_slice(&v.to_bits().to_be_bytes());
        self.add(entry, true)
    }
}

fn modified_utf8(s: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

#[derive(Clone, Debug)]
pub enum Const {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
}

#[derive(Clone, Debug)]
pub enum Value {
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Str(String),
    Enum(String, String),
    Class(String),
    Nested(Ann),
    Array(Vec<Value>),
    /// An element tag the decoder does not know, followed by a `u2` payload.
    UnknownTag(u8),
}

#[derive(Clone, Debug)]
pub struct Ann {
    pub descriptor: String,
    pub elements: Vec<(String, Value)>,
}

impl Ann {
    pub fn new(descriptor: &str) -> Self {
        Self {
            descriptor: descriptor.to_string(),
            elements: Vec::new(),
        }
    }

    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.elements.push((name.to_string(), value));
        self
    }
}

#[derive(Clone, Debug)]
enum Attr {
    Signature(String),
    Deprecated,
    Synthetic,
    Exceptions(Vec<String>),
    ConstantValue(Const),
    Annotations { visible: bool, anns: Vec<Ann> },
    ParameterAnnotations { visible: bool, params: Vec<Vec<Ann>> },
    AnnotationDefault(Value),
    MethodParameters(Vec<(Option<String>, u16)>),
    InnerClasses(Vec<InnerEntry>),
    Raw { name: String, bytes: Vec<u8> },
}

#[derive(Clone, Debug)]
struct InnerEntry {
    inner: String,
    outer: Option<String>,
    name: Option<String>,
    flags: u16,
}

#[derive(Clone, Debug)]
pub struct Member {
    flags: u16,
    name: String,
    descriptor: String,
    attrs: Vec<Attr>,
}

impl Member {
    pub fn new(flags: u16, name: &str, descriptor: &str) -> Self {
        Self {
            flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            attrs: Vec::new(),
        }
    }

    pub fn signature(mut self, sig: &str) -> Self {
        self.attrs.push(Attr::Signature(sig.to_string()));
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.attrs.push(Attr::Deprecated);
        self
    }

    pub fn synthetic_attribute(mut self) -> Self {
        self.attrs.push(Attr::Synthetic);
        self
    }

    pub fn exceptions(mut self, names: &[&str]) -> Self {
        self.attrs
            .push(Attr::Exceptions(names.iter().map(|s| s.to_string()).collect()));
        self
    }

    pub fn constant(mut self, value: Const) -> Self {
        self.attrs.push(Attr::ConstantValue(value));
        self
    }

    pub fn annotation(mut self, ann: Ann) -> Self {
        self.attrs.push(Attr::Annotations {
            visible: true,
            anns: vec![ann],
        });
        self
    }

    pub fn invisible_annotation(mut self, ann: Ann) -> Self {
        self.attrs.push(Attr::Annotations {
            visible: false,
            anns: vec![ann],
        });
        self
    }

    /// Several annotations sharing one `RuntimeVisibleAnnotations` attribute.
    pub fn annotation_table(mut self, anns: Vec<Ann>) -> Self {
        self.attrs.push(Attr::Annotations { visible: true, anns });
        self
    }

    pub fn parameter_annotations(mut self, params: Vec<Vec<Ann>>) -> Self {
        self.attrs.push(Attr::ParameterAnnotations {
            visible: true,
            params,
        });
        self
    }

    pub fn annotation_default(mut self, value: Value) -> Self {
        self.attrs.push(Attr::AnnotationDefault(value));
        self
    }

    pub fn parameters(mut self, params: &[(Option<&str>, u16)]) -> Self {
        self.attrs.push(Attr::MethodParameters(
            params
                .iter()
                .map(|(name, flags)| (name.map(str::to_string), *flags))
                .collect(),
        ));
        self
    }

    pub fn raw_attribute(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.attrs.push(Attr::Raw {
            name: name.to_string(),
            bytes,
        });
        self
    }
}

#[derive(Clone, Debug)]
pub struct ClassGen {
    flags: u16,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<Member>,
    methods: Vec<Member>,
    attrs: Vec<Attr>,
    inner: Vec<InnerEntry>,
}

impl ClassGen {
    pub fn new(this_class: &str) -> Self {
        Self {
            flags: ACC_PUBLIC | ACC_SUPER,
            this_class: this_class.to_string(),
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attrs: Vec::new(),
            inner: Vec::new(),
        }
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn extends(mut self, super_class: &str) -> Self {
        self.super_class = Some(super_class.to_string());
        self
    }

    pub fn implements(mut self, iface: &str) -> Self {
        self.interfaces.push(iface.to_string());
        self
    }

    pub fn field(mut self, field: Member) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: Member) -> Self {
        self.methods.push(method);
        self
    }

    pub fn signature(mut self, sig: &str) -> Self {
        self.attrs.push(Attr::Signature(sig.to_string()));
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.attrs.push(Attr::Deprecated);
        self
    }

    pub fn annotation(mut self, ann: Ann) -> Self {
        self.attrs.push(Attr::Annotations {
            visible: true,
            anns: vec![ann],
        });
        self
    }

    /// Adds an `InnerClasses` entry.
    pub fn inner_class(
        mut self,
        inner: &str,
        outer: Option<&str>,
        name: Option<&str>,
        flags: u16,
    ) -> Self {
        self.inner.push(InnerEntry {
            inner: inner.to_string(),
            outer: outer.map(str::to_string),
            name: name.map(str::to_string),
            flags,
        });
        self
    }

    pub fn raw_attribute(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.attrs.push(Attr::Raw {
            name: name.to_string(),
            bytes,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = Pool::default();
        let mut body = Vec::new();

        put_u2(&mut body, self.flags);
        put_u2(&mut body, pool.class(&self.this_class));
        put_u2(
            &mut body,
            self.super_class.as_deref().map_or(0, |s| pool.class(s)),
        );
        put_u2(&mut body, self.interfaces.len() as u16);
        for iface in &self.interfaces {
            put_u2(&mut body, pool.class(iface));
        }

        for members in [&self.fields, &self.methods] {
            put_u2(&mut body, members.len() as u16);
            for member in members {
                put_u2(&mut body, member.flags);
                put_u2(&mut body, pool.utf8(&member.name));
                put_u2(&mut body, pool.utf8(&member.descriptor));
                write_attrs(&mut body, &mut pool, &member.attrs);
            }
        }

        let mut attrs = self.attrs.clone();
        if !self.inner.is_empty() {
            attrs.push(Attr::InnerClasses(self.inner.clone()));
        }
        write_attrs(&mut body, &mut pool, &attrs);

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
        put_u2(&mut out, 0);
        put_u2(&mut out, 52);
        put_u2(&mut out, pool.count + 1);
        out.extend_from_slice(&pool.entries);
        out.extend_from_slice(&body);
        out
    }
}

fn put_u2(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn write_attrs(out: &mut Vec<u8>, pool: &mut Pool, attrs: &[Attr]) {
    put_u2(out, attrs.len() as u16);
    for attr in attrs {
        let (name, payload) = encode_attr(pool, attr);
        put_u2(out, pool.utf8(&name));
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(&payload);
    }
}

fn encode_attr(pool: &mut Pool, attr: &Attr) -> (String, Vec<u8>) {
    let mut p = Vec::new();
    let name = match attr {
        Attr::Signature(sig) => {
            put_u2(&mut p, pool.utf8(sig));
            "Signature"
        }
        Attr::Deprecated => "Deprecated",
        Attr::Synthetic => "Synthetic",
        Attr::Exceptions(names) => {
            put_u2(&mut p, names.len() as u16);
            for name in names {
                put_u2(&mut p, pool.class(name));
            }
            "Exceptions"
        }
        Attr::ConstantValue(value) => {
            let idx = match value {
                Const::Int(v) => pool.integer(*v),
                Const::Long(v) => pool.long(*v),
                Const::Float(v) => pool.float(*v),
                Const::Double(v) => pool.double(*v),
                Const::Str(v) => pool.string(v),
            };
            put_u2(&mut p, idx);
            "ConstantValue"
        }
        Attr::Annotations { visible, anns } => {
            put_u2(&mut p, anns.len() as u16);
            for ann in anns {
                encode_ann(&mut p, pool, ann);
            }
            if *visible {
                "RuntimeVisibleAnnotations"
            } else {
                "RuntimeInvisibleAnnotations"
            }
        }
        Attr::ParameterAnnotations { visible, params } => {
            p.push(params.len() as u8);
            for anns in params {
                put_u2(&mut p, anns.len() as u16);
                for ann in anns {
                    encode_ann(&mut p, pool, ann);
                }
            }
            if *visible {
                "RuntimeVisibleParameterAnnotations"
            } else {
                "RuntimeInvisibleParameterAnnotations"
            }
        }
        Attr::AnnotationDefault(value) => {
            encode_value(&mut p, pool, value);
            "AnnotationDefault"
        }
        Attr::MethodParameters(params) => {
            p.push(params.len() as u8);
            for (name, flags) in params {
                put_u2(&mut p, name.as_deref().map_or(0, |n| pool.utf8(n)));
                put_u2(&mut p, *flags);
            }
            "MethodParameters"
        }
        Attr::InnerClasses(entries) => {
            put_u2(&mut p, entries.len() as u16);
            for entry in entries {
                put_u2(&mut p, pool.class(&entry.inner));
                put_u2(&mut p, entry.outer.as_deref().map_or(0, |o| pool.class(o)));
                put_u2(&mut p, entry.name.as_deref().map_or(0, |n| pool.utf8(n)));
                put_u2(&mut p, entry.flags);
            }
            "InnerClasses"
        }
        Attr::Raw { name, bytes } => return (name.clone(), bytes.clone()),
    };
    (name.to_string(), p)
}

fn encode_ann(out: &mut Vec<u8>, pool: &mut Pool, ann: &Ann) {
    put_u2(out, pool.utf8(&ann.descriptor));
    put_u2(out, ann.elements.len() as u16);
    for (name, value) in &ann.elements {
        put_u2(out, pool.utf8(name));
        encode_value(out, pool, value);
    }
}

fn encode_value(out: &mut Vec<u8>, pool: &mut Pool, value: &Value) {
    match value {
        Value::Byte(v) => {
            out.push(b'B');
            put_u2(out, pool.integer(i32::from(*v)));
        }
        Value::Char(v) => {
            out.push(b'C');
            put_u2(out, pool.integer(i32::from(*v)));
        }
        Value::Short(v) => {
            out.push(b'S');
            put_u2(out, pool.integer(i32::from(*v)));
        }
        Value::Int(v) => {
            out.push(b'I');
            put_u2(out, pool.integer(*v));
        }
        Value::Bool(v) => {
            out.push(b'Z');
            put_u2(out, pool.integer(i32::from(*v)));
        }
        Value::Long(v) => {
            out.push(b'J');
            put_u2(out, pool.long(*v));
        }
        Value::Float(v) => {
            out.push(b'F');
            put_u2(out, pool.float(*v));
        }
        Value::Double(v) => {
            out.push(b'D');
            put_u2(out, pool.double(*v));
        }
        Value::Str(v) => {
            out.push(b's');
            put_u2(out, pool.utf8(v));
        }
        Value::Enum(desc, name) => {
            out.push(b'e');
            put_u2(out, pool.utf8(desc));
            put_u2(out, pool.utf8(name));
        }
        Value::Class(desc) => {
            out.push(b'c');
            put_u2(out, pool.utf8(desc));
        }
        Value::Nested(ann) => {
            out.push(b'@');
            encode_ann(out, pool, ann);
        }
        Value::Array(values) => {
            out.push(b'[');
            put_u2(out, values.len() as u16);
            for value in values {
                encode_value(out, pool, value);
            }
        }
        Value::UnknownTag(tag) => {
            out.push(*tag);
            put_u2(out, 0);
        }
    }
}

/// `class Point implements Comparable<Point> { private final int x; public int getX() }`.
pub fn point_class() -> Vec<u8> {
    ClassGen::new("a/b/Point")
        .implements("java/lang/Comparable")
        .signature("Ljava/lang/Object;Ljava/lang/Comparable<La/b/Point;>;")
        .field(Member::new(ACC_PRIVATE | ACC_FINAL, "x", "I"))
        .method(Member::new(ACC_PUBLIC, "getX", "()I"))
        .build()
}
