use nova_classfile::BuilderOptions;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest accepted `indent_width`.
pub const MAX_INDENT_WIDTH: usize = 16;

/// Options for building stubs and rendering mirror text.
///
/// Usually loaded from the `[decompile]` table of a Nova config file; every field is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecompileConfig {
    /// Spaces per nesting level in mirror text.
    #[serde(default = "DecompileConfig::default_indent_width")]
    pub indent_width: usize,

    /// Text standing in for every method body that has one.
    ///
    /// Must be a single brace-delimited block so the mirror still parses.
    #[serde(default = "DecompileConfig::default_body_placeholder")]
    pub body_placeholder: String,

    /// The deepest chain of inner classes followed through sibling class files.
    #[serde(default = "DecompileConfig::default_max_inner_depth")]
    pub max_inner_depth: usize,

    /// Emit `/** @deprecated */` ahead of deprecated declarations.
    #[serde(default = "DecompileConfig::default_deprecation_comments")]
    pub deprecation_comments: bool,
}

impl Default for DecompileConfig {
    fn default() -> Self {
        Self {
            indent_width: Self::default_indent_width(),
            body_placeholder: Self::default_body_placeholder(),
            max_inner_depth: Self::default_max_inner_depth(),
            deprecation_comments: Self::default_deprecation_comments(),
        }
    }
}

impl DecompileConfig {
    fn default_indent_width() -> usize {
        4
    }

    fn default_body_placeholder() -> String {
        "{ /* compiled code */ }".to_string()
    }

    fn default_max_inner_depth() -> usize {
        BuilderOptions::default().max_inner_depth
    }

    fn default_deprecation_comments() -> bool {
        true
    }

    /// Parse and validate a TOML document holding the decompiler options at its top level.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_width == 0 || self.indent_width > MAX_INDENT_WIDTH {
            return Err(ConfigError::Invalid {
                field: "indent_width",
                message: format!("expected 1..={MAX_INDENT_WIDTH}, got {}", self.indent_width),
            });
        }
        if !is_single_block(&self.body_placeholder) {
            return Err(ConfigError::Invalid {
                field: "body_placeholder",
                message: format!("{:?} is not a single `{{ ... }}` block", self.body_placeholder),
            });
        }
        if self.max_inner_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "max_inner_depth",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn builder_options(&self) -> BuilderOptions {
        BuilderOptions {
            max_inner_depth: self.max_inner_depth,
        }
    }

    pub(crate) fn indent(&self, depth: usize) -> String {
        " ".repeat(self.indent_width * depth)
    }
}

/// `{`, then anything without braces, newlines, or an unterminated comment, then `}`.
fn is_single_block(text: &str) -> bool {
    let Some(inner) = text
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return false;
    };
    if inner.contains(['{', '}', '\n', '\r', '"', '\'']) || inner.contains("//") {
        return false;
    }
    let mut rest = inner;
    while let Some(start) = rest.find("/*") {
        let Some(end) = rest[start + 2..].find("*/") else {
            return false;
        };
        rest = &rest[start + 2 + end + 2..];
    }
    !rest.contains("*/")
}
