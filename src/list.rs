//! The lock-free doubly-linked list protocol.
//!
//! A [`List`] is two stamped anchors, `head` and `tail`. The structure
//! between them lives inside the nodes themselves: every member embeds a
//! [`Link`] and the list only ever touches those cells with single-word
//! atomic operations. There is no lock anywhere; a mutator that loses a
//! compare-and-set re-reads the neighborhood and tries again, and every
//! failed attempt implies some other thread's attempt succeeded.
//!
//! A logical operation is several CAS steps. The states in between are
//! visible to concurrent readers, so the protocol is arranged to keep every
//! intermediate state recoverable:
//!
//! - insertion publishes a fully initialized node with one forward CAS and
//!   repairs the backward link afterwards;
//! - removal first marks the victim's `next` (the point at which the node
//!   is logically gone), then splices the forward chain, then repairs the
//!   backward chain;
//! - anchors left stale by a racing removal are repaired by whichever
//!   operation observes them.
//!
//! Repairs never clobber newer information: a removal's repairs only
//! rewrite cells still referencing the removed node, and an insertion keeps
//! claiming its successor's backward link only while it remains the live
//! predecessor. Because racing repairs of one cell can land in either
//! order, every repairing operation finishes by chasing the cell off dead
//! nodes, so quiescent states always leave backward links and the tail
//! anchor on live nodes.

use core::fmt;
use core::marker::PhantomData;
use core::ptr;
use core::ptr::NonNull;

use crate::cursor::{Cursor, Iter};
use crate::link::{link_of, Link, Linked, Valued};
use crate::primitive::sync::atomic::Ordering::{Acquire, Relaxed, Release};
use crate::stamped::{AtomicStamped, Stamped};

/// A lock-free doubly-linked list of caller-owned nodes.
///
/// The list is intrusive: it stores no payloads and allocates nothing.
/// Members are any type implementing [`Linked`], and the caller keeps their
/// storage alive for as long as any thread might still reach them (see the
/// [`Linked`] safety contract). Dropping the list unlinks nothing.
///
/// All operations take `&self` and may be called from any number of threads
/// at once, except [`clear`], which requires external quiescence.
///
/// # Examples
///
/// ```
/// use stamped_list::{Link, Linked, List};
///
/// struct Ticket {
///     serial: u64,
///     link: Link<Ticket>,
/// }
///
/// unsafe impl Linked for Ticket {
///     fn link(&self) -> &Link<Ticket> {
///         &self.link
///     }
/// }
///
/// let list = List::new();
/// let a = Ticket { serial: 1, link: Link::new() };
/// let b = Ticket { serial: 2, link: Link::new() };
///
/// list.push_back(&a);
/// list.push_back(&b);
/// assert_eq!(list.iter().map(|t| t.serial).collect::<Vec<_>>(), [1, 2]);
///
/// list.remove(&a);
/// assert_eq!(list.front().map(|t| t.serial), Some(2));
/// ```
///
/// [`clear`]: List::clear
pub struct List<T: Linked> {
    head: AtomicStamped<T>,
    tail: AtomicStamped<T>,
    _marker: PhantomData<*const T>,
}

unsafe impl<T: Linked + Send + Sync> Send for List<T> {}
unsafe impl<T: Linked + Send + Sync> Sync for List<T> {}

impl<T: Linked> List<T> {
    /// Returns an empty list. Both anchors hold the null reference.
    #[cfg(not(loom))]
    pub const fn new() -> Self {
        List {
            head: AtomicStamped::null(),
            tail: AtomicStamped::null(),
            _marker: PhantomData,
        }
    }

    /// Returns an empty list. Both anchors hold the null reference.
    #[cfg(loom)]
    pub fn new() -> Self {
        List {
            head: AtomicStamped::null(),
            tail: AtomicStamped::null(),
            _marker: PhantomData,
        }
    }

    /// Returns `true` if no node is reachable from `head`.
    pub fn is_empty(&self) -> bool {
        self.head.load(Acquire).is_null()
    }

    /// Borrows the first node, if any.
    pub fn front(&self) -> Option<&T> {
        unsafe { self.head.load(Acquire).as_ref() }
    }

    /// Borrows the last node, if any.
    pub fn back(&self) -> Option<&T> {
        unsafe { self.tail.load(Acquire).as_ref() }
    }

    pub(crate) fn load_head(&self) -> Stamped<T> {
        self.head.load(Acquire)
    }

    pub(crate) fn load_tail(&self) -> Stamped<T> {
        self.tail.load(Acquire)
    }

    /// Inserts `node` at the front of the list.
    ///
    /// `node` must not currently be a member of any list.
    pub fn push_front(&self, node: &T) {
        let raw = node as *const T;
        let link = node.link();
        link.reset();

        loop {
            let old_head = self.head.load(Acquire);
            // The node is not reachable yet, so a plain store suffices and
            // the stamp restarts at 0.
            link.next
                .store(unsafe { Stamped::from_raw(old_head.as_raw(), 0) }, Relaxed);

            match self
                .head
                .compare_and_set_weak(old_head, old_head.step_to(raw), Release)
            {
                Ok(()) => {
                    match old_head.ptr() {
                        Some(h) => self.claim_prev(h, raw, link),
                        None => self.claim_tail(raw, link),
                    }
                    return;
                }
                Err(_) => continue,
            }
        }
    }

    /// Inserts `node` at the back of the list.
    ///
    /// `node` must not currently be a member of any list.
    pub fn push_back(&self, node: &T) {
        let raw = node as *const T;
        let link = node.link();
        link.reset();

        loop {
            let old_tail = self.tail.load(Acquire);
            let t = match old_tail.ptr() {
                Some(t) => t,
                None => {
                    // Empty, as far as the tail can tell. Become the head,
                    // then publish the tail.
                    let old_head = self.head.load(Acquire);
                    if !old_head.is_null() {
                        // A racing insertion owns the tail publication.
                        continue;
                    }
                    link.reset();
                    match self
                        .head
                        .compare_and_set_weak(old_head, old_head.step_to(raw), Release)
                    {
                        Ok(()) => {
                            self.claim_tail(raw, link);
                            return;
                        }
                        Err(_) => continue,
                    }
                }
            };

            let tlink = unsafe { link_of(t) };
            let succ = tlink.next.load(Acquire);
            if succ.is_marked() {
                // The observed tail has been unlinked but its removal has
                // not repaired the anchor yet. Take the repair over.
                self.chase_tail();
                continue;
            }
            if !succ.is_null() {
                // Stale tail. Help it forward, then retry.
                let _ = self
                    .tail
                    .compare_and_set(old_tail, old_tail.step_to(succ.as_raw()), Release);
                continue;
            }

            link.prev
                .store(unsafe { Stamped::from_raw(old_tail.as_raw(), 0) }, Relaxed);
            link.next.store(Stamped::null(), Relaxed);

            match tlink
                .next
                .compare_and_set(succ, succ.step_to(raw), Release)
            {
                Ok(()) => {
                    self.claim_tail(raw, link);
                    return;
                }
                Err(_) => continue,
            }
        }
    }

    /// Inserts `node` immediately after `anchor`.
    ///
    /// Returns `false`, leaving the list unchanged, if `anchor` is not (or
    /// is no longer) a member: an unlinked anchor is recognized by the
    /// deletion mark on its forward link, checked both before and by the
    /// publishing CAS. `node` must not currently be a member of any list.
    pub fn insert_after(&self, anchor: &T, node: &T) -> bool {
        let araw = anchor as *const T;
        let raw = node as *const T;
        let alink = anchor.link();
        let link = node.link();

        loop {
            let succ = alink.next.load(Acquire);
            if succ.is_marked() {
                return false;
            }
            link.prev
                .store(unsafe { Stamped::from_raw(araw, 0) }, Relaxed);
            link.next
                .store(unsafe { Stamped::from_raw(succ.as_raw(), 0) }, Relaxed);

            match alink
                .next
                .compare_and_set(succ, succ.step_to(raw), Release)
            {
                Ok(()) => {
                    match succ.ptr() {
                        Some(s) => self.claim_prev(s, raw, link),
                        None => self.claim_tail(raw, link),
                    }
                    return true;
                }
                Err(_) => continue,
            }
        }
    }

    /// Unlinks `node` from the list.
    ///
    /// Safe to call on a node believed to be a member; a node that was
    /// already removed (and not reinserted) is recognized and left alone, so
    /// racing removals of the same node unlink it exactly once.
    ///
    /// Calling this on a node that was never inserted, or was discarded by
    /// [`clear`], is a caller error. The live list is never corrupted by
    /// such a call: it either splices only the detached chain the node
    /// still sits on and returns, or, when the node's stale links claim a
    /// head position the head anchor no longer confirms, loops without
    /// returning.
    ///
    /// The node's own link fields keep their final values; reinsertion
    /// reinitializes them.
    ///
    /// [`clear`]: List::clear
    pub fn remove(&self, node: &T) {
        self.remove_inner(node);
    }

    /// Removes nodes from the front until the list is observed empty.
    ///
    /// Unlike [`clear`] this uses the ordinary removal protocol one node at
    /// a time, so it may run while other threads mutate the list. Returns
    /// the number of nodes unlinked by this call; a node whose removal was
    /// won by a racing thread is not counted.
    ///
    /// [`clear`]: List::clear
    pub fn drain(&self) -> usize {
        let mut unlinked = 0;
        while let Some(node) = self.front() {
            if self.remove_inner(node) {
                unlinked += 1;
            }
        }
        unlinked
    }

    /// Empties the list without unlinking anything.
    ///
    /// Both anchors are set to null; node storage is untouched and the
    /// nodes' link fields are left stale. Discarded nodes must be
    /// reinitialized by reinsertion before any further list operation names
    /// them; in particular, [`remove`] on a discarded node is a caller
    /// error.
    ///
    /// This operation is quiescent-only: the caller must ensure no other
    /// thread is operating on the list while it runs. For a concurrent
    /// alternative see [`drain`].
    ///
    /// [`remove`]: List::remove
    /// [`drain`]: List::drain
    pub fn clear(&self) {
        let h = self.head.load(Acquire);
        self.head.store(h.step_to(ptr::null()), Release);
        let t = self.tail.load(Acquire);
        self.tail.store(t.step_to(ptr::null()), Release);
    }

    /// Returns the first node satisfying `pred`, searching from the front.
    ///
    /// A candidate is returned only after its neighborhood validates: its
    /// successor (or the tail anchor) must point back at it and its
    /// predecessor (or the head anchor) must point forward at it. A
    /// candidate that fails validation was caught mid-update, and the
    /// search restarts from the head. Under continuous churn at the
    /// matching position the search is lock-free but not wait-free.
    pub fn find_if<F>(&self, pred: F) -> Option<&T>
    where
        F: Fn(&T) -> bool,
    {
        'restart: loop {
            let mut cur = self.head.load(Acquire).ptr();
            while let Some(c) = cur {
                let clink = unsafe { link_of(c) };
                let next = clink.next.load(Acquire);
                if next.is_marked() {
                    // Logically deleted; step over it without testing.
                    cur = next.ptr();
                    continue;
                }
                let payload = unsafe { &*c.as_ptr() };
                if pred(payload) {
                    if self.validate(c) {
                        return Some(payload);
                    }
                    continue 'restart;
                }
                cur = next.ptr();
            }
            return None;
        }
    }

    /// Returns the first node whose [`value`] equals `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stamped_list::{Link, Linked, List, Valued};
    ///
    /// struct Ticket {
    ///     serial: u64,
    ///     link: Link<Ticket>,
    /// }
    ///
    /// unsafe impl Linked for Ticket {
    ///     fn link(&self) -> &Link<Ticket> {
    ///         &self.link
    ///     }
    /// }
    ///
    /// impl Valued for Ticket {
    ///     type Value = u64;
    ///
    ///     fn value(&self) -> &u64 {
    ///         &self.serial
    ///     }
    /// }
    ///
    /// let list = List::new();
    /// let a = Ticket { serial: 17, link: Link::new() };
    /// list.push_front(&a);
    ///
    /// assert_eq!(list.find_by_value(&17).map(|t| t.serial), Some(17));
    /// assert!(list.find_by_value(&18).is_none());
    /// # list.remove(&a);
    /// ```
    ///
    /// [`value`]: Valued::value
    pub fn find_by_value(&self, value: &T::Value) -> Option<&T>
    where
        T: Valued,
    {
        self.find_if(|node| node.value() == value)
    }

    /// Returns a cursor positioned at the first node.
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor::front(self)
    }

    /// Returns a cursor positioned one past the last node.
    ///
    /// Retreating this cursor lands on the last node.
    pub fn cursor_back(&self) -> Cursor<'_, T> {
        Cursor::back(self)
    }

    /// Returns a forward iterator over the members.
    ///
    /// The iterator tolerates concurrent mutation: it terminates for any
    /// finite list, never follows a dangling reference, and may skip nodes
    /// inserted behind its position during the traversal.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Checks that `c`'s neighbors agree it is a member.
    fn validate(&self, c: NonNull<T>) -> bool {
        let clink = unsafe { link_of(c) };
        let next = clink.next.load(Acquire);
        if next.is_marked() {
            return false;
        }
        match next.ptr() {
            Some(s) => {
                if !unsafe { link_of(s) }.prev.load(Acquire).points_to(c.as_ptr()) {
                    return false;
                }
            }
            None => {
                if !self.tail.load(Acquire).points_to(c.as_ptr()) {
                    return false;
                }
            }
        }
        let prev = clink.prev.load(Acquire);
        match prev.ptr() {
            Some(p) => unsafe { link_of(p) }.next.load(Acquire).points_to(c.as_ptr()),
            None => self.head.load(Acquire).points_to(c.as_ptr()),
        }
    }

    /// The marking half of removal. Returns `true` if this call set the
    /// mark and therefore performed the unlink.
    fn remove_inner(&self, node: &T) -> bool {
        let raw = node as *const T;
        let link = node.link();

        // Phase 1: claim the node by marking its forward link. The marking
        // CAS is the point at which the node is logically removed; the
        // winner owns the physical unlink and losers return.
        let mut succ;
        loop {
            succ = link.next.load(Acquire);
            if succ.is_marked() {
                return false;
            }
            match link.next.compare_and_set_weak(succ, succ.deleted(), Release) {
                Ok(()) => break,
                Err(_) => continue,
            }
        }

        // The forward link is now frozen: insertion and removal only ever
        // CAS an unmarked word, so `succ` is the node's final successor.

        // Phase 2: splice the node out of the forward chain.
        let prev = loop {
            let p = link.prev.load(Acquire);
            match p.ptr() {
                Some(pp) => {
                    let plink = unsafe { link_of(pp) };
                    let expected = plink.next.load(Acquire);
                    if !expected.points_to(raw) {
                        // Stale prev: a racing insertion placed a new
                        // predecessor and has not repaired our prev yet.
                        // Its repair is on the way; re-read.
                        continue;
                    }
                    if expected.is_marked() {
                        // The predecessor is being removed itself. Its
                        // remover splices it out and repairs our prev to
                        // whatever precedes it; re-read.
                        continue;
                    }
                    if plink
                        .next
                        .compare_and_set(expected, expected.step_to(succ.as_raw()), Release)
                        .is_ok()
                    {
                        break p;
                    }
                }
                None => {
                    let h = self.head.load(Acquire);
                    if h.points_to(raw)
                        && self
                            .head
                            .compare_and_set(h, h.step_to(succ.as_raw()), Release)
                            .is_ok()
                    {
                        break p;
                    }
                    // Either the head CAS lost a race or prev is null while
                    // the node is not the head, meaning the insertion that
                    // published it has not repaired prev yet. Re-read.
                }
            }
        };

        // Phase 3: repair the backward chain. The swing only rewrites a
        // link still referencing the removed node; the chase afterwards
        // covers repairs by racing removals that landed in the wrong order
        // and left the link resting on a dead node.
        match succ.ptr() {
            Some(s) => {
                unsafe { link_of(s) }.prev.swing(raw, prev.as_raw(), Release);
                self.chase_prev(s);
            }
            None => {
                self.tail.swing(raw, prev.as_raw(), Release);
                self.chase_tail();
            }
        }
        true
    }

    /// Steps `s`'s backward link off removed nodes.
    ///
    /// Repairs of one cell by racing removals carry from-guards derived
    /// from different moments, so the one holding the live value can lose
    /// to one holding a dead value. Every repairing operation therefore
    /// finishes by chasing: while the cell references a marked node, step
    /// it to that node's own predecessor. Dead nodes only ever reference
    /// older predecessors, so the chase terminates, and it never touches a
    /// cell already resting on a live node.
    fn chase_prev(&self, s: NonNull<T>) {
        let slink = unsafe { link_of(s) };
        loop {
            let cur = slink.prev.load(Acquire);
            let q = match cur.ptr() {
                Some(q) => q,
                None => return,
            };
            let qlink = unsafe { link_of(q) };
            if !qlink.next.load(Acquire).is_marked() {
                return;
            }
            let better = qlink.prev.load(Acquire);
            let _ = slink
                .prev
                .compare_and_set(cur, cur.step_to(better.as_raw()), Release);
        }
    }

    /// Steps the tail anchor off removed nodes, like [`chase_prev`] for the
    /// anchor cell.
    ///
    /// [`chase_prev`]: List::chase_prev
    fn chase_tail(&self) {
        loop {
            let cur = self.tail.load(Acquire);
            let q = match cur.ptr() {
                Some(q) => q,
                None => return,
            };
            let qlink = unsafe { link_of(q) };
            if !qlink.next.load(Acquire).is_marked() {
                return;
            }
            let better = qlink.prev.load(Acquire);
            let _ = self
                .tail
                .compare_and_set(cur, cur.step_to(better.as_raw()), Release);
        }
    }

    /// Establishes the freshly inserted node at `raw` as the value of its
    /// successor's backward link.
    ///
    /// A guarded swing is not enough here: a removal racing in the same
    /// neighborhood repairs the same cell, and the two repairs can land in
    /// either order. Instead the inserter keeps claiming the cell for as
    /// long as its claim is true, that is, while the node's forward link
    /// still names `succ` and is unmarked. The final true predecessor's
    /// claim cannot be invalidated, so the cell converges on it. If the
    /// node is removed mid-claim, the claim stops and the removal's own
    /// repair of the cell is forwarded on its behalf.
    fn claim_prev(&self, succ: NonNull<T>, raw: *const T, link: &Link<T>) {
        let slink = unsafe { link_of(succ) };
        loop {
            let forward = link.next.load(Acquire);
            let owns = !forward.is_marked() && forward.points_to(succ.as_ptr());
            let cur = slink.prev.load(Acquire);
            if cur.points_to(raw) {
                if !owns {
                    // The node died (or was re-linked) after installing
                    // itself; hand the cell to the node's own predecessor.
                    let p = link.prev.load(Acquire);
                    slink.prev.swing(raw, p.as_raw(), Release);
                    self.chase_prev(succ);
                }
                return;
            }
            if !owns {
                return;
            }
            let _ = slink.prev.compare_and_set(cur, cur.step_to(raw), Release);
        }
    }

    /// Establishes the freshly inserted last node at `raw` as the tail.
    ///
    /// Same shape as [`claim_prev`], for the anchor cell: the inserter
    /// keeps claiming the anchor while its node remains the live last node
    /// (forward link null and unmarked). A stale anchor value, whether the
    /// null of an empty list, a node removed by a racing removal, or the
    /// displaced anchor this node was appended after, is stepped directly
    /// to `raw`. If the node is removed mid-claim, the removal's own
    /// anchor repair is forwarded on its behalf.
    ///
    /// [`claim_prev`]: List::claim_prev
    fn claim_tail(&self, raw: *const T, link: &Link<T>) {
        loop {
            let forward = link.next.load(Acquire);
            let owns = !forward.is_marked() && forward.is_null();
            let cur = self.tail.load(Acquire);
            if cur.points_to(raw) {
                if !owns {
                    let p = link.prev.load(Acquire);
                    self.tail.swing(raw, p.as_raw(), Release);
                    self.chase_tail();
                }
                return;
            }
            if !owns {
                return;
            }
            let _ = self.tail.compare_and_set(cur, cur.step_to(raw), Release);
        }
    }
}

impl<T: Linked> Default for List<T> {
    fn default() -> Self {
        List::new()
    }
}

impl<T: Linked> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

impl<'a, T: Linked> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    struct TestNode {
        value: i32,
        link: Link<TestNode>,
    }

    unsafe impl Linked for TestNode {
        fn link(&self) -> &Link<TestNode> {
            &self.link
        }
    }

    impl Valued for TestNode {
        type Value = i32;

        fn value(&self) -> &i32 {
            &self.value
        }
    }

    fn node(value: i32) -> TestNode {
        TestNode {
            value,
            link: Link::new(),
        }
    }

    fn values(list: &List<TestNode>) -> Vec<i32> {
        list.iter().map(|n| n.value).collect()
    }

    fn assert_chains_agree(list: &List<TestNode>) {
        // Forward sweep from head, checking each adjacent pair both ways.
        let mut forward = Vec::new();
        let mut cur = list.load_head().ptr();
        while let Some(c) = cur {
            forward.push(c.as_ptr() as *const TestNode);
            let next = unsafe { link_of(c) }.next.load(Acquire);
            if let Some(s) = next.ptr() {
                assert!(
                    unsafe { link_of(s) }.prev.load(Acquire).points_to(c.as_ptr()),
                    "successor does not point back"
                );
            } else {
                assert!(list.load_tail().points_to(c.as_ptr()), "tail does not agree");
            }
            cur = next.ptr();
        }

        let mut backward = Vec::new();
        let mut cur = list.load_tail().ptr();
        while let Some(c) = cur {
            backward.push(c.as_ptr() as *const TestNode);
            cur = unsafe { link_of(c) }.prev.load(Acquire).ptr();
        }
        backward.reverse();
        assert_eq!(forward, backward, "forward and backward chains differ");
    }

    #[test]
    fn empty_list() {
        let list = List::<TestNode>::new();
        assert!(list.is_empty());
        assert!(list.front().is_none());
        assert!(list.back().is_none());
        assert_eq!(values(&list), Vec::<i32>::new());
    }

    #[test]
    fn push_front_orders_lifo() {
        let list = List::new();
        let a = node(1);
        let b = node(2);
        let c = node(3);
        list.push_front(&a);
        list.push_front(&b);
        list.push_front(&c);

        assert_eq!(values(&list), [3, 2, 1]);
        assert_eq!(list.front().map(|n| n.value), Some(3));
        assert_eq!(list.back().map(|n| n.value), Some(1));
        assert!(c.link.prev.load(Acquire).is_null());
        assert!(a.link.next.load(Acquire).is_null());
        assert_chains_agree(&list);
    }

    #[test]
    fn push_back_orders_fifo() {
        let list = List::new();
        let nodes: Vec<_> = (1..=5).map(node).collect();
        for n in &nodes {
            list.push_back(n);
        }
        assert_eq!(values(&list), [1, 2, 3, 4, 5]);
        assert_chains_agree(&list);
    }

    #[test]
    fn remove_middle() {
        let list = List::new();
        let n1 = node(1);
        let n2 = node(2);
        let n3 = node(3);
        list.push_back(&n1);
        list.push_back(&n2);
        list.push_back(&n3);

        list.remove(&n2);

        assert_eq!(values(&list), [1, 3]);
        assert!(n1.link.next.load(Acquire).points_to(&n3));
        assert!(n3.link.prev.load(Acquire).points_to(&n1));
        assert!(list.load_head().points_to(&n1));
        assert!(list.load_tail().points_to(&n3));
        assert_chains_agree(&list);
    }

    #[test]
    fn remove_front_and_back() {
        let list = List::new();
        let n1 = node(1);
        let n2 = node(2);
        let n3 = node(3);
        list.push_back(&n1);
        list.push_back(&n2);
        list.push_back(&n3);

        list.remove(&n1);
        assert_eq!(values(&list), [2, 3]);
        assert_chains_agree(&list);

        list.remove(&n3);
        assert_eq!(values(&list), [2]);
        assert!(list.load_head().points_to(&n2));
        assert!(list.load_tail().points_to(&n2));
        assert_chains_agree(&list);
    }

    #[test]
    fn remove_sole_element_empties() {
        let list = List::new();
        let only = node(7);
        list.push_front(&only);
        list.remove(&only);

        assert!(list.is_empty());
        assert!(list.load_head().is_null());
        assert!(list.load_tail().is_null());
    }

    #[test]
    fn remove_twice_is_harmless() {
        let list = List::new();
        let a = node(1);
        let b = node(2);
        list.push_back(&a);
        list.push_back(&b);

        list.remove(&a);
        list.remove(&a);

        assert_eq!(values(&list), [2]);
        assert_chains_agree(&list);
    }

    #[test]
    fn reinsert_after_remove() {
        let list = List::new();
        let a = node(1);
        let b = node(2);
        list.push_back(&a);
        list.push_back(&b);
        list.remove(&a);
        list.push_back(&a);

        assert_eq!(values(&list), [2, 1]);
        assert_chains_agree(&list);
    }

    #[test]
    fn insert_after_middle() {
        let list = List::new();
        let n1 = node(1);
        let n2 = node(2);
        let n3 = node(3);
        list.push_back(&n1);
        list.push_back(&n3);

        assert!(list.insert_after(&n1, &n2));
        assert_eq!(values(&list), [1, 2, 3]);
        assert_chains_agree(&list);
    }

    #[test]
    fn insert_after_tail_promotes_tail() {
        let list = List::new();
        let n1 = node(1);
        let n2 = node(2);
        let n3 = node(3);
        list.push_back(&n1);
        list.push_back(&n2);

        assert!(list.insert_after(&n2, &n3));
        assert_eq!(values(&list), [1, 2, 3]);
        assert!(list.load_tail().points_to(&n3));
        assert_chains_agree(&list);
    }

    #[test]
    fn insert_after_unlinked_anchor_refuses() {
        let list = List::new();
        let n1 = node(1);
        let n2 = node(2);
        let n3 = node(3);
        let n4 = node(4);
        list.push_back(&n1);
        list.push_back(&n2);
        list.push_back(&n3);

        list.remove(&n2);
        assert!(!list.insert_after(&n2, &n4));
        assert_eq!(values(&list), [1, 3]);
        assert_chains_agree(&list);
    }

    #[test]
    fn insert_into_empty_from_every_entry_point() {
        let front = node(1);
        let back = node(2);

        let list = List::new();
        list.push_front(&front);
        assert_eq!(values(&list), [1]);
        assert!(list.load_head().points_to(&front));
        assert!(list.load_tail().points_to(&front));
        list.remove(&front);

        list.push_back(&back);
        assert_eq!(values(&list), [2]);
        assert!(list.load_head().points_to(&back));
        assert!(list.load_tail().points_to(&back));
        list.remove(&back);

        // insert_after needs a member anchor, so an empty list can only
        // refuse it.
        assert!(!list.insert_after(&front, &back));
        assert!(list.is_empty());
    }

    #[test]
    fn find_if_and_find_by_value() {
        let list = List::new();
        let nodes: Vec<_> = (1..=4).map(node).collect();
        for n in &nodes {
            list.push_back(n);
        }

        assert_eq!(list.find_if(|n| n.value % 2 == 0).map(|n| n.value), Some(2));
        assert_eq!(list.find_by_value(&3).map(|n| n.value), Some(3));
        assert!(list.find_by_value(&9).is_none());

        list.remove(&nodes[1]);
        assert!(list.find_by_value(&2).is_none());
    }

    #[test]
    fn drain_unlinks_everything() {
        let list = List::new();
        let nodes: Vec<_> = (1..=8).map(node).collect();
        for n in &nodes {
            list.push_back(n);
        }

        assert_eq!(list.drain(), 8);
        assert!(list.is_empty());
        assert!(list.load_tail().is_null());
        assert_eq!(list.drain(), 0);
    }

    #[test]
    fn clear_discards_members() {
        let list = List::new();
        let a = node(1);
        let b = node(2);
        list.push_back(&a);
        list.push_back(&b);

        list.clear();
        assert!(list.is_empty());
        assert!(list.load_tail().is_null());

        // Discarded nodes reinitialize on reinsertion.
        list.push_front(&a);
        assert_eq!(values(&list), [1]);
        assert_chains_agree(&list);
    }
}
