//! Source-level modifier sets, normalized from raw JVM access flags.

use bitflags::bitflags;

use crate::classfile::{
    ACC_ABSTRACT, ACC_ANNOTATION, ACC_ENUM, ACC_FINAL, ACC_INTERFACE, ACC_NATIVE, ACC_PRIVATE,
    ACC_PROTECTED, ACC_PUBLIC, ACC_STATIC, ACC_STRICT, ACC_SYNCHRONIZED, ACC_TRANSIENT,
    ACC_VOLATILE,
};

bitflags! {
    /// Declaration modifiers plus the class-kind markers a mirror needs to pick a keyword.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const ABSTRACT = 1 << 3;
        const DEFAULT = 1 << 4;
        const STATIC = 1 << 5;
        const FINAL = 1 << 6;
        const TRANSIENT = 1 << 7;
        const VOLATILE = 1 << 8;
        const SYNCHRONIZED = 1 << 9;
        const NATIVE = 1 << 10;
        const STRICTFP = 1 << 11;
        const INTERFACE = 1 << 12;
        const ENUM = 1 << 13;
        const ANNOTATION = 1 << 14;
    }
}

/// Keyword order used when printing declarations.
pub const KEYWORD_ORDER: [(Modifiers, &str); 12] = [
    (Modifiers::PUBLIC, "public"),
    (Modifiers::PROTECTED, "protected"),
    (Modifiers::PRIVATE, "private"),
    (Modifiers::ABSTRACT, "abstract"),
    (Modifiers::DEFAULT, "default"),
    (Modifiers::STATIC, "static"),
    (Modifiers::FINAL, "final"),
    (Modifiers::TRANSIENT, "transient"),
    (Modifiers::VOLATILE, "volatile"),
    (Modifiers::SYNCHRONIZED, "synchronized"),
    (Modifiers::NATIVE, "native"),
    (Modifiers::STRICTFP, "strictfp"),
];

const COMMON: [(u16, Modifiers); 5] = [
    (ACC_PUBLIC, Modifiers::PUBLIC),
    (ACC_PRIVATE, Modifiers::PRIVATE),
    (ACC_PROTECTED, Modifiers::PROTECTED),
    (ACC_STATIC, Modifiers::STATIC),
    (ACC_FINAL, Modifiers::FINAL),
];

impl Modifiers {
    /// Class flags from either the class header or an `InnerClasses` entry.
    pub fn from_class_flags(raw: u16) -> Self {
        let mut mods = map_bits(raw, &COMMON);
        mods |= map_bits(
            raw,
            &[
                (ACC_ABSTRACT, Modifiers::ABSTRACT),
                (ACC_INTERFACE, Modifiers::INTERFACE),
                (ACC_ENUM, Modifiers::ENUM),
                (ACC_ANNOTATION, Modifiers::ANNOTATION),
            ],
        );
        if mods.contains(Modifiers::ANNOTATION) {
            mods |= Modifiers::INTERFACE;
        }
        mods
    }

    /// `0x0040`/`0x0080` mean volatile/transient on fields.
    pub fn from_field_flags(raw: u16) -> Self {
        map_bits(raw, &COMMON)
            | map_bits(
                raw,
                &[
                    (ACC_VOLATILE, Modifiers::VOLATILE),
                    (ACC_TRANSIENT, Modifiers::TRANSIENT),
                ],
            )
    }

    /// `0x0040`/`0x0080` mean bridge/varargs on methods and never become modifiers.
    pub fn from_method_flags(raw: u16) -> Self {
        map_bits(raw, &COMMON)
            | map_bits(
                raw,
                &[
                    (ACC_SYNCHRONIZED, Modifiers::SYNCHRONIZED),
                    (ACC_NATIVE, Modifiers::NATIVE),
                    (ACC_ABSTRACT, Modifiers::ABSTRACT),
                    (ACC_STRICT, Modifiers::STRICTFP),
                ],
            )
    }

    pub fn is_interface(self) -> bool {
        self.contains(Modifiers::INTERFACE)
    }

    pub fn is_annotation(self) -> bool {
        self.contains(Modifiers::ANNOTATION)
    }

    pub fn is_enum(self) -> bool {
        self.contains(Modifiers::ENUM)
    }

    /// The modifiers that print as keywords, without the class-kind markers.
    pub fn keywords(self) -> Self {
        self - (Modifiers::INTERFACE | Modifiers::ENUM | Modifiers::ANNOTATION)
    }
}

fn map_bits(raw: u16, table: &[(u16, Modifiers)]) -> Modifiers {
    table
        .iter()
        .filter(|(bit, _)| raw & bit != 0)
        .fold(Modifiers::empty(), |acc, (_, m)| acc | *m)
}
