//! Positional correspondence between a stub tree and its parsed mirror.

use std::collections::HashMap;

use nova_classfile::{StubId, StubPath, StubTree};
use text_size::TextRange;

use crate::mirror::{MirrorId, MirrorTree};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    to_mirror: HashMap<StubPath, MirrorId>,
    to_stub: HashMap<MirrorId, StubPath>,
    degraded: Vec<StubPath>,
}

impl Bindings {
    /// Pairs the children of each bound composite node by position.
    ///
    /// When a pair disagrees on child count or kinds the pair stays bound but none of its
    /// descendants are; its path is recorded in [`Bindings::degraded`].
    pub fn bind(stub: &StubTree, mirror: &MirrorTree) -> Self {
        let mut bindings = Self::default();
        let (stub_root, mirror_root) = match (stub.root(), mirror.root()) {
            (None, None) => return bindings,
            (Some(stub_root), Some(mirror_root))
                if stub.get(stub_root).kind() == mirror.get(mirror_root).kind() =>
            {
                (stub_root, mirror_root)
            }
            (stub_root, mirror_root) => {
                tracing::error!(
                    target: "nova.decompile",
                    stub_root = ?stub_root.map(|id| stub.get(id).kind()),
                    mirror_root = ?mirror_root.map(|id| mirror.get(id).kind()),
                    "mirror root does not correspond to the stub root"
                );
                bindings.degraded.push(StubPath::root());
                return bindings;
            }
        };

        bindings.insert(StubPath::root(), mirror_root);
        let mut stack: Vec<(StubId, MirrorId, StubPath)> =
            vec![(stub_root, mirror_root, StubPath::root())];
        while let Some((stub_id, mirror_id, path)) = stack.pop() {
            if !stub.get(stub_id).kind().is_composite() {
                continue;
            }
            let stub_children = stub.children(stub_id);
            let mirror_children = mirror.children(mirror_id);
            if stub_children.len() != mirror_children.len() {
                tracing::error!(
                    target: "nova.decompile",
                    path = %path,
                    kind = ?stub.get(stub_id).kind(),
                    stub_children = stub_children.len(),
                    mirror_children = mirror_children.len(),
                    "mirror child count differs from stub; leaving subtree unbound"
                );
                bindings.degraded.push(path);
                continue;
            }
            let mismatch = stub_children
                .iter()
                .zip(mirror_children)
                .position(|(s, m)| stub.get(*s).kind() != mirror.get(*m).kind());
            if let Some(index) = mismatch {
                tracing::error!(
                    target: "nova.decompile",
                    path = %path,
                    index,
                    stub_kind = ?stub.get(stub_children[index]).kind(),
                    mirror_kind = ?mirror.get(mirror_children[index]).kind(),
                    "mirror child kind differs from stub; leaving subtree unbound"
                );
                bindings.degraded.push(path);
                continue;
            }
            for (index, (s, m)) in stub_children.iter().zip(mirror_children).enumerate() {
                let child_path = path.child(index);
                bindings.insert(child_path.clone(), *m);
                stack.push((*s, *m, child_path));
            }
        }
        bindings.degraded.sort();
        bindings
    }

    fn insert(&mut self, path: StubPath, id: MirrorId) {
        self.to_stub.insert(id, path.clone());
        self.to_mirror.insert(path, id);
    }

    pub fn mirror_of(&self, path: &StubPath) -> Option<MirrorId> {
        self.to_mirror.get(path).copied()
    }

    pub fn stub_of(&self, id: MirrorId) -> Option<&StubPath> {
        self.to_stub.get(&id)
    }

    pub fn len(&self) -> usize {
        self.to_mirror.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_mirror.is_empty()
    }

    /// Paths whose subtrees could not be bound, in path order.
    pub fn degraded(&self) -> &[StubPath] {
        &self.degraded
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    /// The deepest bound element whose text covers `target`.
    ///
    /// An empty `target` is a caret offset and matches half-open ranges. Returns `None` outside
    /// the root and inside elided text such as method bodies and initializers.
    pub fn owner_of(&self, mirror: &MirrorTree, target: TextRange) -> Option<StubPath> {
        let mut current = mirror.root()?;
        if !covers(mirror.get(current).range(), target) {
            return None;
        }
        loop {
            let node = mirror.get(current);
            if node.elided().iter().any(|range| covers(*range, target)) {
                return None;
            }
            let next = node.children().iter().copied().find(|child| {
                let range = mirror.get(*child).range();
                !range.is_empty() && self.to_stub.contains_key(child) && covers(range, target)
            });
            match next {
                Some(child) => current = child,
                None => return self.stub_of(current).cloned(),
            }
        }
    }
}

fn covers(range: TextRange, target: TextRange) -> bool {
    if target.is_empty() {
        range.contains(target.start())
    } else {
        range.contains_range(target)
    }
}
