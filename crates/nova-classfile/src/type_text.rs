//! Canonical type text: the source-style strings stored in stubs and printed into mirrors.

use crate::names::is_java_identifier;

/// Converts an internal name (`java/util/Map$Entry`) to source form (`java.util.Map.Entry`).
///
/// Package separators always become `.`. Inside the simple-name part a `$` becomes `.` only
/// when it sits between two non-`$` characters; leading, trailing and doubled `$` are kept
/// verbatim (`$Proxy`, `Foo$`, `a$$b`).
pub fn binary_to_source_name(internal: &str) -> String {
    let (package, simple) = match internal.rfind('/') {
        Some(idx) => (&internal[..idx], &internal[idx + 1..]),
        None => ("", internal),
    };

    let mut out = String::with_capacity(internal.len());
    if !package.is_empty() {
        out.push_str(&package.replace('/', "."));
        out.push('.');
    }
    out.push_str(&collapse_separators(simple));
    out
}

/// Applies the `$` → `.` rule to a simple (package-less) binary name.
pub fn collapse_separators(simple: &str) -> String {
    let chars: Vec<char> = simple.chars().collect();
    let mut out = String::with_capacity(simple.len());
    for (i, &c) in chars.iter().enumerate() {
        let flanked = c == '$'
            && i > 0
            && i + 1 < chars.len()
            && chars[i - 1] != '$'
            && chars[i + 1] != '$';
        out.push(if flanked { '.' } else { c });
    }
    out
}

/// Whether the source form of `internal` is a dotted chain of Java identifiers.
pub fn is_printable_type_name(internal: &str) -> bool {
    binary_to_source_name(internal)
        .split('.')
        .all(is_java_identifier)
}

/// Whether a package in source form (`a.b`, or empty) can follow `package`.
pub fn is_printable_package(package: &str) -> bool {
    package.is_empty() || package.split('.').all(is_java_identifier)
}

/// Last segment of a source name: `a.b.Outer.Inner` → `Inner`.
pub fn short_name(source_name: &str) -> &str {
    match source_name.rfind('.') {
        Some(idx) => &source_name[idx + 1..],
        None => source_name,
    }
}

/// Package of an internal name, in source form; empty for the default package.
pub fn package_of(internal: &str) -> String {
    match internal.rfind('/') {
        Some(idx) => internal[..idx].replace('/', "."),
        None => String::new(),
    }
}

/// Renders the last array dimension of `type_text` as a vararg ellipsis.
pub fn to_vararg(type_text: &str) -> String {
    match type_text.strip_suffix("[]") {
        Some(component) => format!("{component}..."),
        None => type_text.to_string(),
    }
}
