//! Model-checked interleavings of the small racy cores.
//!
//! Run with:
//!
//! ```text
//! RUSTFLAGS="--cfg loom" cargo test --test loom --release
//! ```
//!
//! Each scenario keeps the operation count tiny; loom explores every
//! reachable interleaving of the atomic operations inside, which is where
//! the interesting CAS contention, retry, and repair orderings live.

#![cfg(loom)]

use std::sync::Arc;

use loom::thread;

use stamped_list::{Link, Linked, List};

struct TestNode {
    value: usize,
    link: Link<TestNode>,
}

unsafe impl Linked for TestNode {
    fn link(&self) -> &Link<TestNode> {
        &self.link
    }
}

fn node(value: usize) -> Arc<TestNode> {
    Arc::new(TestNode {
        value,
        link: Link::new(),
    })
}

/// Quiescent check: forward chain and backward chain agree, anchors agree,
/// and the members are exactly `expected` (by value, in order).
fn assert_members(list: &List<TestNode>, expected: &[usize]) {
    let forward: Vec<&TestNode> = list.iter().collect();
    let values: Vec<usize> = forward.iter().map(|n| n.value).collect();
    assert_eq!(values, expected);

    match forward.first() {
        Some(first) => {
            assert!(std::ptr::eq(list.front().unwrap(), *first));
            assert!(std::ptr::eq(list.back().unwrap(), *forward.last().unwrap()));
            for pair in forward.windows(2) {
                assert!(pair[0].link().next().points_to(pair[1]));
                assert!(pair[1].link().prev().points_to(pair[0]));
            }
            assert!(forward.last().unwrap().link().next().is_null());
        }
        None => {
            assert!(list.is_empty());
            assert!(list.back().is_none());
        }
    }
}

#[test]
fn racing_push_fronts() {
    loom::model(|| {
        let list = Arc::new(List::new());
        let a = node(1);
        let b = node(2);

        let t = {
            let list = Arc::clone(&list);
            let a = Arc::clone(&a);
            thread::spawn(move || list.push_front(&a))
        };
        list.push_front(&b);
        t.join().unwrap();

        let values: Vec<usize> = list.iter().map(|n| n.value).collect();
        assert_eq!(values.len(), 2);
        assert!(values == [1, 2] || values == [2, 1]);
        if values == [1, 2] {
            assert_members(&list, &[1, 2]);
        } else {
            assert_members(&list, &[2, 1]);
        }
    });
}

#[test]
fn racing_push_front_and_push_back() {
    loom::model(|| {
        let list = Arc::new(List::new());
        let a = node(1);
        let b = node(2);

        let t = {
            let list = Arc::clone(&list);
            let a = Arc::clone(&a);
            thread::spawn(move || list.push_back(&a))
        };
        list.push_front(&b);
        t.join().unwrap();

        // Whichever way the empty-list race resolved, 2 entered at the
        // front and 1 at the back.
        assert_members(&list, &[2, 1]);
    });
}

#[test]
fn push_front_vs_remove_of_old_head() {
    let mut builder = loom::model::Builder::new();
    builder.preemption_bound = Some(3);
    builder.check(|| {
        let list = Arc::new(List::new());
        let a = node(1);
        let b = node(2);
        list.push_front(&a);

        let t = {
            let list = Arc::clone(&list);
            let b = Arc::clone(&b);
            thread::spawn(move || list.push_front(&b))
        };
        list.remove(&a);
        t.join().unwrap();

        assert_members(&list, &[2]);
    });
}

#[test]
fn racing_removals_unlink_once() {
    let mut builder = loom::model::Builder::new();
    builder.preemption_bound = Some(3);
    builder.check(|| {
        let list = Arc::new(List::new());
        let a = node(1);
        let b = node(2);
        list.push_back(&a);
        list.push_back(&b);

        let t = {
            let list = Arc::clone(&list);
            let a = Arc::clone(&a);
            thread::spawn(move || list.remove(&a))
        };
        list.remove(&a);
        t.join().unwrap();

        assert_members(&list, &[2]);
    });
}

#[test]
fn insert_after_vs_remove_of_anchor() {
    let mut builder = loom::model::Builder::new();
    builder.preemption_bound = Some(3);
    builder.check(|| {
        let list = Arc::new(List::new());
        let a = node(1);
        let b = node(2);
        list.push_back(&a);

        let t = {
            let list = Arc::clone(&list);
            let a = Arc::clone(&a);
            let b = Arc::clone(&b);
            thread::spawn(move || list.insert_after(&a, &b))
        };
        list.remove(&a);
        let accepted = t.join().unwrap();

        // Either the insertion was refused, or it happened before the
        // anchor left and the new node survives it.
        if accepted {
            assert_members(&list, &[2]);
        } else {
            assert_members(&list, &[]);
        }
    });
}

#[test]
fn remove_middle_vs_remove_tail() {
    let mut builder = loom::model::Builder::new();
    builder.preemption_bound = Some(2);
    builder.check(|| {
        let list = Arc::new(List::new());
        let a = node(1);
        let b = node(2);
        let c = node(3);
        list.push_back(&a);
        list.push_back(&b);
        list.push_back(&c);

        let t = {
            let list = Arc::clone(&list);
            let b = Arc::clone(&b);
            thread::spawn(move || list.remove(&b))
        };
        list.remove(&c);
        t.join().unwrap();

        assert_members(&list, &[1]);
    });
}
