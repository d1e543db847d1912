//! Per-file cache and the query surface over it.
//!
//! A [`CompiledFile`] keeps one [`FileCache`] per content version. The stub tree is built the
//! first time anything needs structure; mirror text is synthesized, parsed and bound the first
//! time anything needs text or ranges. Replacing the content swaps the whole cache, so stub,
//! mirror and bindings are always discarded together.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use nova_classfile::{
    BuildError, CancellationToken, DirectoryResolver, NoSiblings, ReferenceRole, SiblingResolver,
    StubBuilder, StubData, StubKind, StubPath, StubTree,
};
use text_size::{TextRange, TextSize};

use crate::binding::Bindings;
use crate::config::DecompileConfig;
use crate::element::CompiledElement;
use crate::error::{DecompileError, Result};
use crate::line_index::{LineCol, LineIndex};
use crate::mirror::{JavaMirrorParser, MirrorNode, MirrorParser, MirrorTree};
use crate::mirror_text::synthesize;
use crate::registry::DecompilerRegistry;
use crate::sync::{lock, read, write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileState {
    /// No mirror for the current content.
    Unbound,
    Synthesizing,
    Bound,
    /// Bound, with some subtrees left unbound after a shape mismatch.
    Degraded,
}

impl FileState {
    fn to_u8(self) -> u8 {
        match self {
            FileState::Unbound => 0,
            FileState::Synthesizing => 1,
            FileState::Bound => 2,
            FileState::Degraded => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => FileState::Synthesizing,
            2 => FileState::Bound,
            3 => FileState::Degraded,
            _ => FileState::Unbound,
        }
    }
}

/// A referenced type under a caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceHit {
    /// The reference list holding the type.
    pub path: StubPath,
    pub role: ReferenceRole,
    pub index: usize,
    pub type_text: String,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
enum Content {
    Stub(Arc<StubTree>),
    External { decompiler: String, text: Arc<str> },
}

#[derive(Debug)]
struct Mirror {
    text: Arc<str>,
    tree: MirrorTree,
    bindings: Bindings,
    lines: LineIndex,
}

impl Mirror {
    fn node(&self, path: &StubPath) -> Option<&MirrorNode> {
        let id = self.bindings.mirror_of(path)?;
        Some(self.tree.get(id))
    }

    fn slice(&self, range: TextRange) -> Option<&str> {
        self.text
            .get(usize::from(range.start())..usize::from(range.end()))
    }
}

struct FileCache {
    version: u64,
    bytes: Arc<[u8]>,
    content: OnceLock<Content>,
    mirror: RwLock<Option<Arc<Mirror>>>,
    pipeline: Mutex<()>,
    state: AtomicU8,
}

impl FileCache {
    fn new(version: u64, bytes: Arc<[u8]>) -> Self {
        Self {
            version,
            bytes,
            content: OnceLock::new(),
            mirror: RwLock::new(None),
            pipeline: Mutex::new(()),
            state: AtomicU8::new(FileState::Unbound.to_u8()),
        }
    }

    fn state(&self) -> FileState {
        FileState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: FileState) {
        self.state.store(state.to_u8(), Ordering::Release);
    }
}

/// One compiled class file and everything derived from it.
///
/// Safe to share between threads; all queries take `&self`.
pub struct CompiledFile {
    file_name: String,
    config: DecompileConfig,
    resolver: Arc<dyn SiblingResolver>,
    parser: Arc<dyn MirrorParser>,
    registry: Option<Arc<DecompilerRegistry>>,
    cache: RwLock<Arc<FileCache>>,
}

impl fmt::Debug for CompiledFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.snapshot();
        f.debug_struct("CompiledFile")
            .field("file_name", &self.file_name)
            .field("version", &cache.version)
            .field("state", &cache.state())
            .finish_non_exhaustive()
    }
}

impl CompiledFile {
    /// A file with no sibling lookup, the tree-sitter mirror parser and default options.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            config: DecompileConfig::default(),
            resolver: Arc::new(NoSiblings),
            parser: Arc::new(JavaMirrorParser),
            registry: None,
            cache: RwLock::new(Arc::new(FileCache::new(0, bytes.into()))),
        }
    }

    /// Reads `path`, resolving inner classes from the same directory.
    pub fn open(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, bytes).with_resolver(Arc::new(DirectoryResolver::for_file(path))))
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn SiblingResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn MirrorParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Fails with [`DecompileError::Config`] when `config` does not validate.
    pub fn with_config(mut self, config: DecompileConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_registry(mut self, registry: Arc<DecompilerRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn config(&self) -> &DecompileConfig {
        &self.config
    }

    /// Bumped by every [`CompiledFile::set_content`].
    pub fn version(&self) -> u64 {
        self.snapshot().version
    }

    pub fn state(&self) -> FileState {
        self.snapshot().state()
    }

    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.snapshot().bytes)
    }

    /// Replaces the class-file bytes, discarding the stub, mirror and bindings.
    pub fn set_content(&self, bytes: impl Into<Arc<[u8]>>) {
        let mut cache = write(&self.cache);
        let version = cache.version + 1;
        *cache = Arc::new(FileCache::new(version, bytes.into()));
        tracing::debug!(
            target: "nova.decompile",
            file = %self.file_name,
            version,
            "content replaced; cached stub and mirror dropped"
        );
    }

    /// Drops the mirror of the current content and keeps its stub; the mirror is rebuilt on the
    /// next text query.
    pub fn release_mirror(&self) {
        let cache = self.snapshot();
        let _pipeline = lock(&cache.pipeline);
        if write(&cache.mirror).take().is_some() {
            cache.set_state(FileState::Unbound);
            tracing::debug!(
                target: "nova.decompile",
                file = %self.file_name,
                version = cache.version,
                "mirror released"
            );
        }
    }

    pub fn stub(&self) -> Arc<StubTree> {
        let cache = self.snapshot();
        stub_of(&self.content_or_placeholder(&cache))
    }

    /// Like [`CompiledFile::stub`], but a build racing `token` may stop early.
    ///
    /// Nothing is cached when the build is cancelled.
    pub fn stub_cancellable(&self, token: &CancellationToken) -> Result<Arc<StubTree>> {
        let cache = self.snapshot();
        Ok(stub_of(&self.content(&cache, Some(token))?))
    }

    /// The external decompiler serving this file, if one claimed it.
    pub fn claimed_by(&self) -> Option<String> {
        let cache = self.snapshot();
        match self.content_or_placeholder(&cache) {
            Content::External { decompiler, .. } => Some(decompiler),
            Content::Stub(_) => None,
        }
    }

    pub fn root(&self) -> Option<CompiledElement<'_>> {
        let cache = self.snapshot();
        let stub = stub_of(&self.content_or_placeholder(&cache));
        let root = stub.root()?;
        Some(CompiledElement::new(self, cache.version, stub, root))
    }

    pub fn element(&self, path: &StubPath) -> Result<CompiledElement<'_>> {
        let cache = self.snapshot();
        let stub = stub_of(&self.content_or_placeholder(&cache));
        let id = stub
            .resolve(path)
            .ok_or_else(|| DecompileError::UnknownElement { path: path.clone() })?;
        Ok(CompiledElement::new(self, cache.version, stub, id))
    }

    /// The full mirror text; empty for undecodable input.
    pub fn text(&self) -> Arc<str> {
        let cache = self.snapshot();
        Arc::clone(&self.mirror(&cache).text)
    }

    pub fn text_range(&self, path: &StubPath) -> Option<TextRange> {
        self.text_range_at(None, path)
    }

    pub fn name_range(&self, path: &StubPath) -> Option<TextRange> {
        self.name_range_at(None, path)
    }

    /// Where to put the caret when navigating to `path`: its name, else its start.
    pub fn navigation_range(&self, path: &StubPath) -> Option<TextRange> {
        self.navigation_range_at(None, path)
    }

    pub fn element_text(&self, path: &StubPath) -> Option<String> {
        self.element_text_at(None, path)
    }

    /// The innermost element under `offset`; `None` inside bodies and initializers.
    pub fn element_at(&self, offset: TextSize) -> Option<CompiledElement<'_>> {
        self.element_covering(TextRange::empty(offset))
    }

    pub fn element_covering(&self, range: TextRange) -> Option<CompiledElement<'_>> {
        let cache = self.snapshot();
        let mirror = self.mirror(&cache);
        let path = mirror.bindings.owner_of(&mirror.tree, range)?;
        let stub = stub_of(&self.content_or_placeholder(&cache));
        let id = stub.resolve(&path)?;
        Some(CompiledElement::new(self, cache.version, stub, id))
    }

    pub fn reference_at(&self, offset: TextSize) -> Option<ReferenceHit> {
        let cache = self.snapshot();
        let mirror = self.mirror(&cache);
        let path = mirror
            .bindings
            .owner_of(&mirror.tree, TextRange::empty(offset))?;
        let node = mirror.node(&path)?;
        if node.kind() != StubKind::ReferenceList {
            return None;
        }
        let index = node
            .reference_ranges()
            .iter()
            .position(|range| range.contains(offset))?;
        let stub = stub_of(&self.content_or_placeholder(&cache));
        let StubData::ReferenceList { role, types } = stub.data(stub.resolve(&path)?) else {
            return None;
        };
        Some(ReferenceHit {
            index,
            role: *role,
            type_text: types.get(index)?.clone(),
            range: node.reference_ranges()[index],
            path,
        })
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let cache = self.snapshot();
        self.mirror(&cache).lines.line_col(offset)
    }

    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let cache = self.snapshot();
        self.mirror(&cache).lines.offset(line_col)
    }

    /// Paths whose subtrees could not be bound to the mirror.
    pub fn degraded_paths(&self) -> Vec<StubPath> {
        let cache = self.snapshot();
        self.mirror(&cache).bindings.degraded().to_vec()
    }

    pub(crate) fn text_range_at(&self, version: Option<u64>, path: &StubPath) -> Option<TextRange> {
        self.query(version, |mirror| mirror.node(path).map(MirrorNode::range))
    }

    pub(crate) fn name_range_at(&self, version: Option<u64>, path: &StubPath) -> Option<TextRange> {
        self.query(version, |mirror| mirror.node(path)?.name_range())
    }

    pub(crate) fn navigation_range_at(
        &self,
        version: Option<u64>,
        path: &StubPath,
    ) -> Option<TextRange> {
        self.query(version, |mirror| {
            let node = mirror.node(path)?;
            Some(
                node.name_range()
                    .unwrap_or_else(|| TextRange::empty(node.range().start())),
            )
        })
    }

    pub(crate) fn element_text_at(&self, version: Option<u64>, path: &StubPath) -> Option<String> {
        self.query(version, |mirror| {
            let range = mirror.node(path)?.range();
            mirror.slice(range).map(str::to_string)
        })
    }

    fn snapshot(&self) -> Arc<FileCache> {
        Arc::clone(&read(&self.cache))
    }

    /// Runs `f` against the current mirror, unless `version` names older content.
    fn query<R>(&self, version: Option<u64>, f: impl FnOnce(&Mirror) -> Option<R>) -> Option<R> {
        let cache = self.snapshot();
        if version.is_some_and(|version| version != cache.version) {
            return None;
        }
        f(&self.mirror(&cache))
    }

    fn content(&self, cache: &FileCache, cancel: Option<&CancellationToken>) -> Result<Content> {
        if let Some(content) = cache.content.get() {
            return Ok(content.clone());
        }
        let built = self.build_content(cache, cancel)?;
        // A concurrent build may have landed first; its result wins and ours is dropped.
        let _ = cache.content.set(built.clone());
        Ok(cache.content.get().cloned().unwrap_or(built))
    }

    fn content_or_placeholder(&self, cache: &FileCache) -> Content {
        self.content(cache, None)
            .unwrap_or_else(|_| Content::Stub(Arc::new(StubTree::placeholder())))
    }

    fn build_content(&self, cache: &FileCache, cancel: Option<&CancellationToken>) -> Result<Content> {
        if let Some(registry) = &self.registry {
            if let Some(claim) = registry.claim(&self.file_name, &cache.bytes) {
                return Ok(Content::External {
                    decompiler: claim.decompiler,
                    text: claim.text.into(),
                });
            }
        }

        let mut builder = StubBuilder::new(self.resolver.as_ref())
            .with_options(self.config.builder_options());
        if let Some(token) = cancel {
            builder = builder.with_cancellation(token);
        }
        match builder.build_or_placeholder(&self.file_name, &cache.bytes) {
            Ok(tree) => {
                tracing::debug!(
                    target: "nova.decompile",
                    file = %self.file_name,
                    version = cache.version,
                    nodes = tree.len(),
                    "stub built"
                );
                Ok(Content::Stub(Arc::new(tree)))
            }
            Err(BuildError::Cancelled) => Err(DecompileError::Cancelled),
            Err(err) => {
                tracing::warn!(
                    target: "nova.decompile",
                    file = %self.file_name,
                    error = %err,
                    "stub build failed; serving an empty file"
                );
                Ok(Content::Stub(Arc::new(StubTree::placeholder())))
            }
        }
    }

    fn mirror(&self, cache: &FileCache) -> Arc<Mirror> {
        if let Some(mirror) = read(&cache.mirror).as_ref() {
            return Arc::clone(mirror);
        }
        let _pipeline = lock(&cache.pipeline);
        if let Some(mirror) = read(&cache.mirror).as_ref() {
            return Arc::clone(mirror);
        }

        cache.set_state(FileState::Synthesizing);
        let content = self.content_or_placeholder(cache);
        let mirror = Arc::new(self.run_pipeline(&content));
        let state = if mirror.bindings.is_degraded() {
            FileState::Degraded
        } else {
            FileState::Bound
        };
        *write(&cache.mirror) = Some(Arc::clone(&mirror));
        cache.set_state(state);
        tracing::debug!(
            target: "nova.decompile",
            file = %self.file_name,
            version = cache.version,
            text_len = mirror.text.len(),
            bound = mirror.bindings.len(),
            state = ?state,
            "mirror ready"
        );
        mirror
    }

    fn run_pipeline(&self, content: &Content) -> Mirror {
        let (stub, text) = match content {
            Content::External { text, .. } => {
                return Mirror {
                    lines: LineIndex::new(text),
                    text: Arc::clone(text),
                    tree: MirrorTree::new(),
                    bindings: Bindings::default(),
                };
            }
            Content::Stub(stub) => (stub, synthesize(stub, &self.config)),
        };
        let tree = match self.parser.parse(&text) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::error!(
                    target: "nova.decompile",
                    file = %self.file_name,
                    error = %err,
                    "mirror text failed to parse; ranges unavailable"
                );
                MirrorTree::new()
            }
        };
        let bindings = Bindings::bind(stub, &tree);
        Mirror {
            lines: LineIndex::new(&text),
            text: text.into(),
            tree,
            bindings,
        }
    }
}

fn stub_of(content: &Content) -> Arc<StubTree> {
    match content {
        Content::Stub(stub) => Arc::clone(stub),
        Content::External { .. } => Arc::new(StubTree::placeholder()),
    }
}
