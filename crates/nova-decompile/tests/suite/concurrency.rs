use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use nova_decompile::{
    CompiledFile, FileState, JavaMirrorParser, MirrorParseError, MirrorParser, MirrorTree,
};
use pretty_assertions::assert_eq;

use crate::classgen;

#[derive(Default)]
struct CountingParser {
    calls: AtomicUsize,
}

impl MirrorParser for CountingParser {
    fn parse(&self, text: &str) -> Result<MirrorTree, MirrorParseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        JavaMirrorParser.parse(text)
    }
}

#[test]
fn concurrent_first_queries_install_one_mirror() {
    let parser = Arc::new(CountingParser::default());
    let file = CompiledFile::new("Point.class", classgen::point_class()).with_parser(parser.clone());
    let barrier = Barrier::new(8);

    let texts: Vec<Arc<str>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    file.text()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(parser.calls.load(Ordering::SeqCst), 1);
    for text in &texts {
        assert!(Arc::ptr_eq(text, &texts[0]));
    }
    assert_eq!(file.state(), FileState::Bound);
}

#[test]
fn concurrent_stub_builds_agree() {
    let file = CompiledFile::new("Point.class", classgen::point_class());
    let stubs: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| file.stub())).collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });
    for stub in &stubs {
        assert_eq!(**stub, *stubs[0]);
    }
    // Whichever build landed first is the one every later query sees.
    let cached = file.stub();
    assert!(stubs.iter().any(|stub| Arc::ptr_eq(stub, &cached)));
    assert!(Arc::ptr_eq(&cached, &file.stub()));
}

#[test]
fn structural_queries_do_not_build_the_mirror() {
    let parser = Arc::new(CountingParser::default());
    let file = CompiledFile::new("Point.class", classgen::point_class()).with_parser(parser.clone());
    let root = file.root().unwrap();
    assert_eq!(root.fields().len(), 1);
    assert_eq!(parser.calls.load(Ordering::SeqCst), 0);
    assert_eq!(file.state(), FileState::Unbound);
}

#[test]
fn releases_racing_queries_never_strand_a_mirror_unbound() {
    let parser = Arc::new(CountingParser::default());
    let file = CompiledFile::new("Point.class", classgen::point_class()).with_parser(parser.clone());
    let expected = file.text();
    let barrier = Barrier::new(2);

    std::thread::scope(|scope| {
        scope.spawn(|| {
            barrier.wait();
            for _ in 0..50 {
                file.release_mirror();
            }
        });
        scope.spawn(|| {
            barrier.wait();
            for _ in 0..50 {
                assert_eq!(file.text(), expected);
            }
        });
    });

    assert_ne!(file.state(), FileState::Synthesizing);
    assert_eq!(file.text(), expected);
    assert_eq!(file.state(), FileState::Bound);
    assert!(parser.calls.load(Ordering::SeqCst) >= 1);
}
