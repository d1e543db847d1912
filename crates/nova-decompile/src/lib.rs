//! Read-only source views of compiled class files.
//!
//! A [`CompiledFile`] decodes its bytes into a stub tree (see [`nova_classfile`]), and on the
//! first text query renders that tree as Java-like mirror text, parses the text back and binds
//! every stub node to its place in it. Queries then map between elements and text ranges in both
//! directions. Method bodies are never decompiled; they render as a placeholder block.

#![forbid(unsafe_code)]

mod binding;
mod config;
mod element;
mod error;
mod file;
mod line_index;
mod mirror;
mod mirror_text;
mod registry;
mod sync;

pub use crate::binding::Bindings;
pub use crate::config::{DecompileConfig, MAX_INDENT_WIDTH};
pub use crate::element::CompiledElement;
pub use crate::error::{ConfigError, DecompileError, MirrorParseError, Result};
pub use crate::file::{CompiledFile, FileState, ReferenceHit};
pub use crate::line_index::{LineCol, LineIndex};
pub use crate::mirror::{JavaMirrorParser, MirrorId, MirrorNode, MirrorParser, MirrorTree};
pub use crate::mirror_text::{
    modifier_keywords, printed_class_modifiers, printed_field_modifiers, printed_method_modifiers,
    synthesize,
};
pub use crate::registry::{Claim, Decompiler, DecompilerRegistry};

pub use nova_classfile::{StubKind, StubPath};
pub use text_size::{TextRange, TextSize};
