use std::sync::Arc;

use nova_decompile::{FileState, StubPath};
use pretty_assertions::assert_eq;

use crate::classgen::{self, ClassGen, Member, ACC_PUBLIC};
use crate::point;

#[test]
fn state_moves_from_unbound_to_bound() {
    let file = point();
    assert_eq!(file.state(), FileState::Unbound);
    assert_eq!(file.version(), 0);
    let _ = file.text_range(&StubPath::root());
    assert_eq!(file.state(), FileState::Bound);
}

#[test]
fn replacing_content_discards_stub_and_mirror() {
    let file = point();
    let old_text = file.text();
    let old_stub = file.stub();
    let old_root = file.root().unwrap();
    assert!(old_root.text_range().is_some());

    let renamed = ClassGen::new("a/b/Line")
        .method(Member::new(ACC_PUBLIC, "length", "()D"))
        .build();
    file.set_content(renamed);

    assert_eq!(file.version(), 1);
    assert_eq!(file.state(), FileState::Unbound);
    assert!(!Arc::ptr_eq(&old_stub, &file.stub()));

    let new_text = file.text();
    assert_ne!(new_text, old_text);
    assert!(new_text.contains("public class Line {"));
    assert!(new_text.contains("public double length()"));

    // Elements from the old content keep their structure but lose their text.
    assert_eq!(old_root.name(), Some("Point"));
    assert_eq!(old_root.text_range(), None);
    assert_eq!(old_root.text(), None);
    assert_eq!(file.root().unwrap().name(), Some("Line"));
}

#[test]
fn released_mirror_is_rebuilt_from_the_kept_stub() {
    let file = point();
    let text = file.text();
    let stub = file.stub();

    file.release_mirror();
    assert_eq!(file.state(), FileState::Unbound);
    assert_eq!(file.version(), 0);
    assert!(Arc::ptr_eq(&stub, &file.stub()));

    let rebuilt = file.text();
    assert!(!Arc::ptr_eq(&text, &rebuilt));
    assert_eq!(text, rebuilt);
    assert_eq!(file.state(), FileState::Bound);
}

#[test]
fn restoring_original_bytes_restores_original_text() {
    let file = point();
    let original = file.text();
    file.set_content(b"garbage".to_vec());
    assert_eq!(&*file.text(), "");
    file.set_content(classgen::point_class());
    assert_eq!(file.version(), 2);
    assert_eq!(file.text(), original);
}
