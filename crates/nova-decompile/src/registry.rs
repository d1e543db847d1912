use std::fmt;
use std::sync::{Arc, RwLock};

use crate::sync::{read, write};

/// An external decompiler that can take over files before the built-in engine sees them.
pub trait Decompiler: Send + Sync {
    fn name(&self) -> &str;

    /// Cheap check run on every file; `decompile` is only called when this returns `true`.
    fn accepts(&self, file_name: &str, bytes: &[u8]) -> bool;

    /// `None` hands the file back to the built-in engine.
    fn decompile(&self, file_name: &str, bytes: &[u8]) -> Option<String>;
}

/// Text produced by an external [`Decompiler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub decompiler: String,
    pub text: String,
}

/// Ordered set of external decompilers; earlier registrations win.
#[derive(Default)]
pub struct DecompilerRegistry {
    decompilers: RwLock<Vec<Arc<dyn Decompiler>>>,
}

impl fmt::Debug for DecompilerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decompilers = read(&self.decompilers);
        f.debug_list()
            .entries(decompilers.iter().map(|decompiler| decompiler.name()))
            .finish()
    }
}

impl DecompilerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, decompiler: Arc<dyn Decompiler>) {
        tracing::debug!(
            target: "nova.decompile",
            decompiler = decompiler.name(),
            "registered external decompiler"
        );
        write(&self.decompilers).push(decompiler);
    }

    pub fn len(&self) -> usize {
        read(&self.decompilers).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.decompilers).is_empty()
    }

    /// Offers the file to each decompiler in registration order.
    pub fn claim(&self, file_name: &str, bytes: &[u8]) -> Option<Claim> {
        let decompilers: Vec<Arc<dyn Decompiler>> = read(&self.decompilers).clone();
        for decompiler in decompilers {
            if !decompiler.accepts(file_name, bytes) {
                continue;
            }
            match decompiler.decompile(file_name, bytes) {
                Some(text) => {
                    tracing::debug!(
                        target: "nova.decompile",
                        decompiler = decompiler.name(),
                        file = file_name,
                        "file claimed by external decompiler"
                    );
                    return Some(Claim {
                        decompiler: decompiler.name().to_string(),
                        text,
                    });
                }
                None => {
                    tracing::debug!(
                        target: "nova.decompile",
                        decompiler = decompiler.name(),
                        file = file_name,
                        "external decompiler declined an accepted file"
                    );
                }
            }
        }
        None
    }
}
