//! Decodes class-file bytes into a [`StubTree`].
//!
//! Method bodies are never looked at. Nested classes are decoded from their own sibling class
//! files, located through a [`SiblingResolver`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::annotation::Annotation;
use crate::cancel::CancellationToken;
use crate::classfile::{
    ClassFile, ClassMember, InnerClassInfo, ACC_BRIDGE, ACC_ENUM, ACC_FINAL, ACC_STATIC,
    ACC_SYNTHETIC, ACC_VARARGS,
};
use crate::descriptor::{parse_field_descriptor, parse_method_descriptor, FieldType};
use crate::error::BuildError;
use crate::flags::Modifiers;
use crate::literal::{annotation_type_name, render_annotation, render_element_value, render_field_constant};
use crate::names::is_java_identifier;
use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassTypeSignature,
    FieldTypeSignature, MethodSignature, TypeParameter, TypeSignature,
};
use crate::stub::{
    ClassData, ClassKind, FieldData, MethodData, ParameterData, ReferenceRole, StubData, StubId,
    StubTree,
};
use crate::type_text::{
    binary_to_source_name, is_printable_package, is_printable_type_name, package_of, short_name,
    to_vararg,
};

const ACC_MANDATED: u16 = 0x8000;
const DEPRECATED_ANNOTATION: &str = "java/lang/Deprecated";

/// Supplies the bytes of class files next to the one being decoded.
pub trait SiblingResolver: Send + Sync {
    /// `file_name` is a bare file name such as `Outer$Inner.class`.
    fn read_sibling(&self, file_name: &str) -> Option<Vec<u8>>;
}

/// Resolves siblings from one directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    dir: PathBuf,
}

impl DirectoryResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolver for the directory containing `class_file`.
    pub fn for_file(class_file: &Path) -> Self {
        Self::new(class_file.parent().unwrap_or_else(|| Path::new(".")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SiblingResolver for DirectoryResolver {
    fn read_sibling(&self, file_name: &str) -> Option<Vec<u8>> {
        if file_name.contains(['/', '\\']) {
            return None;
        }
        let path = self.dir.join(file_name);
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(
                        target: "nova.classfile",
                        path = %path.display(),
                        error = %err,
                        "failed to read sibling class file"
                    );
                }
                None
            }
        }
    }
}

/// In-memory siblings keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    files: HashMap<String, Vec<u8>>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        self.files.insert(file_name.into(), bytes);
        self
    }
}

impl FromIterator<(String, Vec<u8>)> for MapResolver {
    fn from_iter<I: IntoIterator<Item = (String, Vec<u8>)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl SiblingResolver for MapResolver {
    fn read_sibling(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files.get(file_name).cloned()
    }
}

/// A resolver that never finds anything; nested classes are omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSiblings;

impl SiblingResolver for NoSiblings {
    fn read_sibling(&self, _file_name: &str) -> Option<Vec<u8>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Nested classes deeper than this are omitted.
    pub max_inner_depth: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self { max_inner_depth: 16 }
    }
}

pub struct StubBuilder<'a> {
    resolver: &'a dyn SiblingResolver,
    options: BuilderOptions,
    cancel: Option<&'a CancellationToken>,
}

/// What the enclosing declaration contributes to decoding one class.
struct ClassHeader {
    raw_flags: u16,
    short_name: String,
    qualified_name: String,
    /// Internal name of the enclosing class for non-static inner classes.
    outer_instance: Option<String>,
}

/// Per-class facts members need.
struct ClassContext<'c> {
    this_class: &'c str,
    short_name: &'c str,
    kind: ClassKind,
    outer_instance: Option<&'c str>,
}

/// Method shape after choosing between the generic signature and the descriptor.
struct MethodShape {
    type_params: Vec<TypeParameter>,
    params: Vec<String>,
    return_type: String,
    throws: Vec<String>,
    /// Leading descriptor parameters that have no source counterpart.
    hidden_params: usize,
}

impl<'a> StubBuilder<'a> {
    pub fn new(resolver: &'a dyn SiblingResolver) -> Self {
        Self {
            resolver,
            options: BuilderOptions::default(),
            cancel: None,
        }
    }

    pub fn with_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Decodes `bytes`, failing on the first class-format problem.
    pub fn build(&self, file_name: &str, bytes: &[u8]) -> Result<StubTree, BuildError> {
        if is_placeholder_file(file_name) {
            return Ok(StubTree::placeholder());
        }
        CancellationToken::check(self.cancel)?;

        let class = ClassFile::parse(bytes)?;
        if is_placeholder_file(short_name(&class.this_class.replace('/', "."))) {
            return Ok(StubTree::placeholder());
        }

        let own = class.own_inner_class_entry();
        let qualified_name = binary_to_source_name(&class.this_class);
        let short = own
            .and_then(|entry| entry.inner_name.clone())
            .unwrap_or_else(|| short_name(&qualified_name).to_string());
        if !is_java_identifier(&short) || !is_printable_package(&package_of(&class.this_class)) {
            return Err(BuildError::InvalidClassName(class.this_class.clone()));
        }

        let header = ClassHeader {
            raw_flags: own.map_or(class.access_flags, |entry| entry.access_flags),
            short_name: short,
            qualified_name,
            outer_instance: own.and_then(outer_instance_of),
        };

        let mut tree = StubTree::placeholder();
        self.build_class(&mut tree, None, &class, header, 0)?;
        Ok(tree)
    }

    /// Like [`StubBuilder::build`], but undecodable input yields the placeholder tree.
    /// Only cancellation is reported as an error.
    pub fn build_or_placeholder(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<StubTree, BuildError> {
        match self.build(file_name, bytes) {
            Err(BuildError::Cancelled) => Err(BuildError::Cancelled),
            Err(err) => {
                tracing::warn!(
                    target: "nova.classfile",
                    file = file_name,
                    error = %err,
                    "failed to decode class file; using placeholder stub"
                );
                Ok(StubTree::placeholder())
            }
            ok => ok,
        }
    }

    fn build_class(
        &self,
        tree: &mut StubTree,
        parent: Option<StubId>,
        class: &ClassFile,
        header: ClassHeader,
        depth: usize,
    ) -> Result<StubId, BuildError> {
        CancellationToken::check(self.cancel)?;

        let modifiers = Modifiers::from_class_flags(header.raw_flags);
        let kind = ClassKind::from_modifiers(modifiers);
        let id = tree.push(
            parent,
            StubData::Class(ClassData {
                short_name: header.short_name.clone(),
                qualified_name: header.qualified_name.clone(),
                package: package_of(&class.this_class),
                modifiers,
                deprecated: class.deprecated || has_deprecated_annotation(&class.annotations),
                kind,
            }),
        );
        push_modifier_list(tree, id, modifiers, &class.annotations);

        let signature = class.signature.as_deref().and_then(|sig| {
            parse_class_signature(sig)
                .map_err(|err| {
                    tracing::debug!(
                        target: "nova.classfile",
                        class = %class.this_class,
                        error = %err,
                        "malformed class signature; using raw supertypes"
                    );
                })
                .ok()
        });

        let (super_type, interfaces) = match &signature {
            Some(sig) => (
                Some(class_type_entry(&sig.super_class)),
                sig.interfaces.iter().map(class_type_entry).collect(),
            ),
            None => (
                class
                    .super_class
                    .as_deref()
                    .filter(|name| printable_supertype(class, name))
                    .map(|name| (name.to_string(), binary_to_source_name(name))),
                class
                    .interfaces
                    .iter()
                    .filter(|name| printable_supertype(class, name))
                    .map(|name| (name.clone(), binary_to_source_name(name)))
                    .collect::<Vec<_>>(),
            ),
        };
        let (extends, implements) = split_supertypes(kind, super_type, interfaces);

        push_type_parameters(
            tree,
            id,
            signature.as_ref().map_or(&[][..], |sig| &sig.type_params[..]),
        );
        push_reference_list(tree, id, ReferenceRole::Extends, extends);
        push_reference_list(tree, id, ReferenceRole::Implements, implements);

        let ctx = ClassContext {
            this_class: &class.this_class,
            short_name: &header.short_name,
            kind,
            outer_instance: header.outer_instance.as_deref(),
        };

        let (constants, others): (Vec<&ClassMember>, Vec<&ClassMember>) = class
            .fields
            .iter()
            .partition(|field| kind == ClassKind::Enum && field.access_flags & ACC_ENUM != 0);
        for field in constants.into_iter().chain(others) {
            self.build_field(tree, id, field, &ctx)?;
        }

        for method in &class.methods {
            self.build_method(tree, id, method, &ctx)?;
        }

        for entry in &class.inner_classes {
            if entry.outer_class.as_deref() == Some(class.this_class.as_str()) {
                self.build_inner(tree, id, entry, &header.qualified_name, depth + 1)?;
            }
        }

        Ok(id)
    }

    fn build_inner(
        &self,
        tree: &mut StubTree,
        parent: StubId,
        entry: &InnerClassInfo,
        outer_qualified: &str,
        depth: usize,
    ) -> Result<(), BuildError> {
        let Some(name) = entry.inner_name.as_deref() else {
            return Ok(());
        };
        if entry.access_flags & ACC_SYNTHETIC != 0 || !is_java_identifier(name) {
            tracing::debug!(target: "nova.classfile", inner = %entry.inner_class, "omitting inner class");
            return Ok(());
        }
        if depth > self.options.max_inner_depth {
            tracing::debug!(
                target: "nova.classfile",
                inner = %entry.inner_class,
                depth,
                "inner class nesting too deep; omitting"
            );
            return Ok(());
        }

        let tail = entry
            .inner_class
            .rsplit('/')
            .next()
            .unwrap_or(&entry.inner_class);
        let file_name = format!("{tail}.class");
        let Some(bytes) = self.resolver.read_sibling(&file_name) else {
            tracing::debug!(target: "nova.classfile", file = %file_name, "inner class file not found");
            return Ok(());
        };

        let inner = match ClassFile::parse(&bytes) {
            Ok(inner) if inner.this_class == entry.inner_class => inner,
            Ok(inner) => {
                tracing::debug!(
                    target: "nova.classfile",
                    file = %file_name,
                    expected = %entry.inner_class,
                    found = %inner.this_class,
                    "inner class file declares a different class"
                );
                return Ok(());
            }
            Err(err) => {
                tracing::debug!(
                    target: "nova.classfile",
                    file = %file_name,
                    error = %err,
                    "failed to decode inner class file"
                );
                return Ok(());
            }
        };

        let header = ClassHeader {
            raw_flags: entry.access_flags,
            short_name: name.to_string(),
            qualified_name: format!("{outer_qualified}.{name}"),
            outer_instance: outer_instance_of(entry),
        };
        self.build_class(tree, Some(parent), &inner, header, depth)?;
        Ok(())
    }

    fn build_field(
        &self,
        tree: &mut StubTree,
        parent: StubId,
        field: &ClassMember,
        ctx: &ClassContext<'_>,
    ) -> Result<(), BuildError> {
        CancellationToken::check(self.cancel)?;
        if field.is_synthetic() || !is_java_identifier(&field.name) {
            tracing::debug!(target: "nova.classfile", field = %field.name, "omitting field");
            return Ok(());
        }

        let erased = parse_field_descriptor(&field.descriptor)?;
        if !erased.is_printable() {
            tracing::debug!(
                target: "nova.classfile",
                field = %field.name,
                descriptor = %field.descriptor,
                "field type has no source spelling; omitting field"
            );
            return Ok(());
        }
        let type_text = match field.signature.as_deref().map(parse_field_signature) {
            Some(Ok(sig)) => sig.java_text(),
            Some(Err(err)) => {
                log_signature_fallback(ctx, &field.name, &err);
                erased.java_text()
            }
            None => erased.java_text(),
        };

        let modifiers = Modifiers::from_field_flags(field.access_flags);
        let id = tree.push(
            Some(parent),
            StubData::Field(FieldData {
                name: field.name.clone(),
                modifiers,
                type_text,
                initializer: field
                    .constant_value
                    .as_ref()
                    .map(|value| render_field_constant(value, &field.descriptor)),
                deprecated: field.deprecated || has_deprecated_annotation(&field.annotations),
                enum_constant: ctx.kind == ClassKind::Enum && field.access_flags & ACC_ENUM != 0,
            }),
        );
        push_modifier_list(tree, id, modifiers, &field.annotations);
        Ok(())
    }

    fn build_method(
        &self,
        tree: &mut StubTree,
        parent: StubId,
        method: &ClassMember,
        ctx: &ClassContext<'_>,
    ) -> Result<(), BuildError> {
        CancellationToken::check(self.cancel)?;
        if let Some(reason) = omitted_method(method, ctx) {
            tracing::debug!(target: "nova.classfile", method = %method.name, reason, "omitting method");
            return Ok(());
        }

        let constructor = method.name == "<init>";
        let descriptor = parse_method_descriptor(&method.descriptor)?;
        if !descriptor.is_printable() {
            tracing::debug!(
                target: "nova.classfile",
                method = %method.name,
                descriptor = %method.descriptor,
                "method type has no source spelling; omitting method"
            );
            return Ok(());
        }
        let exceptions: Vec<String> = method
            .exceptions
            .iter()
            .filter(|name| is_printable_type_name(name))
            .cloned()
            .collect();
        let signature = method.signature.as_deref().and_then(|sig| {
            parse_method_signature(sig)
                .map_err(|err| log_signature_fallback(ctx, &method.name, &err))
                .ok()
        });
        let mut shape = match signature {
            Some(sig) => MethodShape::from_signature(sig, &exceptions),
            None => MethodShape::from_descriptor(
                &descriptor.params,
                descriptor.return_type.java_text(),
                &exceptions,
                constructor,
                ctx,
            ),
        };

        let varargs = method.access_flags & ACC_VARARGS != 0;
        if varargs {
            if let Some(last) = shape.params.last_mut() {
                *last = to_vararg(last);
            }
        }

        let mut modifiers = Modifiers::from_method_flags(method.access_flags);
        if ctx.kind.is_interface_like()
            && !constructor
            && !modifiers.intersects(Modifiers::ABSTRACT | Modifiers::STATIC | Modifiers::PRIVATE)
        {
            modifiers |= Modifiers::DEFAULT;
        }

        let annotation_default = method.annotation_default.as_ref().and_then(|value| {
            render_element_value(value)
                .map_err(|err| {
                    tracing::error!(
                        target: "nova.classfile",
                        method = %method.name,
                        error = %err,
                        "unsupported annotation default shape"
                    );
                })
                .ok()
        });

        let id = tree.push(
            Some(parent),
            StubData::Method(MethodData {
                name: if constructor {
                    ctx.short_name.to_string()
                } else {
                    method.name.clone()
                },
                modifiers,
                return_type: (!constructor).then(|| shape.return_type.clone()),
                constructor,
                varargs,
                deprecated: method.deprecated || has_deprecated_annotation(&method.annotations),
                annotation_default,
            }),
        );
        push_modifier_list(tree, id, modifiers, &method.annotations);
        push_type_parameters(tree, id, &shape.type_params);

        let names = parameter_names(method, shape.params.len(), shape.hidden_params);
        let param_annotations = parameter_annotations(method, shape.params.len());
        for (idx, type_text) in shape.params.drain(..).enumerate() {
            let (name, final_param) = names[idx].clone();
            let param = tree.push(
                Some(id),
                StubData::Parameter(ParameterData { name, type_text }),
            );
            let param_mods = if final_param {
                Modifiers::FINAL
            } else {
                Modifiers::empty()
            };
            push_modifier_list(tree, param, param_mods, param_annotations[idx]);
        }

        push_reference_list(tree, id, ReferenceRole::Throws, shape.throws);
        Ok(())
    }
}

impl MethodShape {
    fn from_signature(sig: MethodSignature, exceptions: &[String]) -> Self {
        let mut throws: Vec<String> = sig.throws.iter().map(FieldTypeSignature::java_text).collect();
        // Some compilers write a `Signature` whose throws clause misses entries present in
        // `Exceptions`.
        if throws.len() < exceptions.len() {
            throws = exceptions.iter().map(|name| binary_to_source_name(name)).collect();
        }
        Self {
            params: sig.params.iter().map(TypeSignature::java_text).collect(),
            return_type: sig
                .return_type
                .as_ref()
                .map_or_else(|| "void".to_string(), TypeSignature::java_text),
            type_params: sig.type_params,
            throws,
            hidden_params: 0,
        }
    }

    fn from_descriptor(
        params: &[FieldType],
        return_type: String,
        exceptions: &[String],
        constructor: bool,
        ctx: &ClassContext<'_>,
    ) -> Self {
        let hidden_params = if constructor {
            hidden_constructor_params(params, ctx)
        } else {
            0
        };
        Self {
            type_params: Vec::new(),
            params: params[hidden_params..]
                .iter()
                .map(FieldType::java_text)
                .collect(),
            return_type,
            throws: exceptions.iter().map(|name| binary_to_source_name(name)).collect(),
            hidden_params,
        }
    }
}

/// Leading parameters javac adds to constructors: `(String name, int ordinal)` for enums and
/// the enclosing instance for inner classes.
fn hidden_constructor_params(params: &[FieldType], ctx: &ClassContext<'_>) -> usize {
    if ctx.kind == ClassKind::Enum {
        let string = FieldType::Object("java/lang/String".to_string());
        if params.len() >= 2
            && params[0] == string
            && params[1] == FieldType::Base(crate::descriptor::BaseType::Int)
        {
            return 2;
        }
        return 0;
    }
    match (ctx.outer_instance, params.first()) {
        (Some(outer), Some(FieldType::Object(first))) if first == outer => 1,
        _ => 0,
    }
}

fn omitted_method(method: &ClassMember, ctx: &ClassContext<'_>) -> Option<&'static str> {
    if method.is_synthetic() {
        return Some("synthetic");
    }
    if method.access_flags & ACC_BRIDGE != 0 {
        return Some("bridge");
    }
    if method.name == "<clinit>" {
        return Some("class initializer");
    }
    if ctx.kind == ClassKind::Enum && method.access_flags & ACC_STATIC != 0 {
        let values = format!("()[L{};", ctx.this_class);
        let value_of = format!("(Ljava/lang/String;)L{};", ctx.this_class);
        if (method.name == "values" && method.descriptor == values)
            || (method.name == "valueOf" && method.descriptor == value_of)
        {
            return Some("enum helper");
        }
    }
    if method.name != "<init>" && !is_java_identifier(&method.name) {
        return Some("invalid name");
    }
    None
}

/// `(name, final)` per source parameter. `MethodParameters` wins when it lines up with the
/// source parameters and every name is usable; otherwise names are `arg0`, `arg1`, ...
fn parameter_names(method: &ClassMember, count: usize, hidden: usize) -> Vec<(String, bool)> {
    let fallback = || -> Vec<(String, bool)> {
        (0..count).map(|i| (format!("arg{i}"), false)).collect()
    };
    if method.parameters.is_empty() {
        return fallback();
    }

    let entries: Vec<&(Option<String>, u16)> = if method.parameters.len() == count {
        method.parameters.iter().collect()
    } else if method.parameters.len() == count + hidden {
        method.parameters[hidden..].iter().collect()
    } else {
        let explicit: Vec<_> = method
            .parameters
            .iter()
            .filter(|(_, flags)| flags & (ACC_SYNTHETIC | ACC_MANDATED) == 0)
            .collect();
        if explicit.len() != count {
            return fallback();
        }
        explicit
    };

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(count);
    for (name, flags) in entries {
        match name {
            Some(name) if is_java_identifier(name) && seen.insert(name.as_str()) => {
                out.push((name.clone(), flags & ACC_FINAL != 0));
            }
            _ => return fallback(),
        }
    }
    out
}

/// Per-parameter annotations. Compilers sometimes count hidden constructor parameters here, so
/// a longer table is aligned to its tail.
fn parameter_annotations(method: &ClassMember, count: usize) -> Vec<&[Annotation]> {
    let table = &method.parameter_annotations;
    let offset = table.len().saturating_sub(count);
    (0..count)
        .map(|i| table.get(offset + i).map_or(&[][..], |anns| &anns[..]))
        .collect()
}

fn outer_instance_of(entry: &InnerClassInfo) -> Option<String> {
    let kind = ClassKind::from_modifiers(Modifiers::from_class_flags(entry.access_flags));
    if entry.access_flags & ACC_STATIC != 0 || kind != ClassKind::Class {
        return None;
    }
    entry.outer_class.clone()
}

fn printable_supertype(class: &ClassFile, name: &str) -> bool {
    let printable = is_printable_type_name(name);
    if !printable {
        tracing::debug!(
            target: "nova.classfile",
            class = %class.this_class,
            supertype = name,
            "supertype has no source spelling; omitting it"
        );
    }
    printable
}

fn class_type_entry(sig: &ClassTypeSignature) -> (String, String) {
    (sig.internal_name(), sig.java_text())
}

/// Splits `(internal, text)` supertypes into rendered `extends`/`implements` lists.
fn split_supertypes(
    kind: ClassKind,
    super_type: Option<(String, String)>,
    interfaces: Vec<(String, String)>,
) -> (Vec<String>, Vec<String>) {
    let texts = |list: Vec<(String, String)>| -> Vec<String> {
        list.into_iter().map(|(_, text)| text).collect()
    };
    match kind {
        ClassKind::Class => (
            super_type
                .filter(|(internal, _)| internal != "java/lang/Object")
                .map(|(_, text)| text)
                .into_iter()
                .collect(),
            texts(interfaces),
        ),
        ClassKind::Enum => (Vec::new(), texts(interfaces)),
        ClassKind::Interface => (texts(interfaces), Vec::new()),
        ClassKind::Annotation => (
            interfaces
                .into_iter()
                .filter(|(internal, _)| internal != "java/lang/annotation/Annotation")
                .map(|(_, text)| text)
                .collect(),
            Vec::new(),
        ),
    }
}

fn push_modifier_list(
    tree: &mut StubTree,
    owner: StubId,
    modifiers: Modifiers,
    annotations: &[Annotation],
) {
    let list = tree.push(Some(owner), StubData::ModifierList { modifiers });
    for annotation in annotations {
        match render_annotation(annotation).and_then(|text| {
            annotation_type_name(annotation).map(|qualified_name| (text, qualified_name))
        }) {
            Ok((text, qualified_name)) => {
                tree.push(Some(list), StubData::Annotation { text, qualified_name });
            }
            Err(err) => {
                tracing::error!(
                    target: "nova.classfile",
                    annotation = %annotation.type_descriptor,
                    error = %err,
                    "unsupported annotation shape; omitting annotation"
                );
            }
        }
    }
}

fn push_type_parameters(tree: &mut StubTree, owner: StubId, params: &[TypeParameter]) {
    let list = tree.push(Some(owner), StubData::TypeParameterList);
    for param in params {
        let id = tree.push(
            Some(list),
            StubData::TypeParameter {
                name: param.name.clone(),
            },
        );
        push_reference_list(tree, id, ReferenceRole::Bounds, param.bound_texts());
    }
}

fn push_reference_list(tree: &mut StubTree, owner: StubId, role: ReferenceRole, types: Vec<String>) {
    tree.push(Some(owner), StubData::ReferenceList { role, types });
}

fn has_deprecated_annotation(annotations: &[Annotation]) -> bool {
    annotations
        .iter()
        .any(|ann| ann.type_internal_name() == Some(DEPRECATED_ANNOTATION))
}

fn is_placeholder_file(file_name: &str) -> bool {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);
    let stem = base.strip_suffix(".class").unwrap_or(base);
    matches!(stem, "module-info" | "package-info")
}

fn log_signature_fallback(ctx: &ClassContext<'_>, member: &str, err: &crate::error::SignatureError) {
    tracing::debug!(
        target: "nova.classfile",
        class = %ctx.this_class,
        member,
        error = %err,
        "malformed member signature; using descriptor"
    );
}
