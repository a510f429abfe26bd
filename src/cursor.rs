//! Traversal: the bidirectional cursor and the forward iterator.
//!
//! A cursor is two plain fields, the current node and the *anchor*, the
//! node the cursor arrived from. Membership of the current node is read off
//! the deletion mark on its forward link; an unlinked node keeps that link
//! frozen at the successor it had when it died, so a cursor standing on a
//! corpse recovers by following the frozen chain forward to the first node
//! still alive. The anchor is the mirror breadcrumb for moving backward:
//! retreating returns to it while it lives, and recovers along its
//! backward chain when it does not.
//!
//! A traversal under concurrent mutation is single-pass-coherent: it
//! terminates for any finite list and never follows a dangling reference,
//! but repeating it may observe a different set of nodes, and nodes
//! inserted behind a recovery point are skipped. Position recovery steps
//! strictly forward (or strictly backward), so it cannot loop.

use core::fmt;
use core::ptr;
use core::ptr::NonNull;

use crate::link::{link_of, Linked};
use crate::list::List;
use crate::primitive::sync::atomic::Ordering::Acquire;

/// A bidirectional cursor over a [`List`].
///
/// Obtained from [`List::cursor_front`] (positioned at the first node) or
/// [`List::cursor_back`] (positioned one past the last node, the end
/// sentinel). [`get`] borrows the current node's payload; [`advance`] and
/// [`retreat`] move the position, recovering when the neighborhood was
/// mutated underneath them.
///
/// Two cursors compare equal when they reference the same node, regardless
/// of the direction they arrived from. On an empty list the front and end
/// positions coincide.
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
/// list.push_back(&a);
/// list.push_back(&b);
///
/// let mut cursor = list.cursor_front();
/// assert_eq!(cursor.get().map(|t| t.serial), Some(1));
/// cursor.advance();
/// assert_eq!(cursor.get().map(|t| t.serial), Some(2));
/// cursor.advance();
/// assert!(cursor.get().is_none());
/// assert_eq!(cursor, list.cursor_back());
/// # list.drain();
/// ```
///
/// [`get`]: Cursor::get
/// [`advance`]: Cursor::advance
/// [`retreat`]: Cursor::retreat
pub struct Cursor<'a, T: Linked> {
    list: &'a List<T>,
    current: Option<NonNull<T>>,
    anchor: Option<NonNull<T>>,
}

impl<'a, T: Linked> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: Linked> Copy for Cursor<'a, T> {}

impl<'a, T: Linked> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<'a, T: Linked> Eq for Cursor<'a, T> {}

impl<'a, T: Linked> Cursor<'a, T> {
    pub(crate) fn front(list: &'a List<T>) -> Self {
        Cursor {
            list,
            current: list.load_head().ptr(),
            anchor: None,
        }
    }

    pub(crate) fn back(list: &'a List<T>) -> Self {
        Cursor {
            list,
            current: None,
            anchor: list.load_tail().ptr(),
        }
    }

    fn anchor_raw(&self) -> *const T {
        self.anchor.map_or(ptr::null(), |a| a.as_ptr() as *const T)
    }

    fn current_raw(&self) -> *const T {
        self.current.map_or(ptr::null(), |c| c.as_ptr() as *const T)
    }

    /// Borrows the payload of the current node, or `None` at the end
    /// sentinel (and at the front of an empty list).
    ///
    /// The borrow is handed out for the cursor's lifetime; it stays valid
    /// for as long as the caller upholds the [`Linked`] storage contract,
    /// whether or not the node remains a member.
    pub fn get(&self) -> Option<&'a T> {
        self.current.map(|c| unsafe { &*c.as_ptr() })
    }

    /// Borrows the payload of the current node.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not positioned on a node. That is an API
    /// misuse, not a data-dependent condition: concurrent mutation never
    /// turns a node position into the end sentinel on its own.
    pub fn payload(&self) -> &'a T {
        match self.get() {
            Some(payload) => payload,
            None => panic!("dereferenced a cursor that is not positioned on a node"),
        }
    }

    /// Moves the cursor to the next node.
    ///
    /// While the current node remains a member (its forward link carries no
    /// deletion mark) the move is one load, whatever happened around it. If
    /// the node was unlinked in the meantime, the cursor resumes at the
    /// first live node on the dead node's remembered forward chain, or
    /// becomes the end sentinel if that chain runs out. Nodes inserted
    /// between the old position and the resume point during the race may be
    /// skipped.
    ///
    /// # Panics
    ///
    /// Panics when called on the end sentinel.
    pub fn advance(&mut self) {
        let c = match self.current {
            Some(c) => c,
            None => panic!("advanced a cursor past the end of the list"),
        };
        let clink = unsafe { link_of(c) };
        let next = clink.next.load(Acquire);

        if !next.is_marked() {
            self.anchor = Some(c);
            self.current = next.ptr();
            return;
        }

        // The current node was unlinked. Its forward link is frozen at the
        // successor it had when it died, and that chain either rejoins the
        // live list or runs out at null; resume at the first live node.
        let mut cur = next.ptr();
        while let Some(x) = cur {
            let xnext = unsafe { link_of(x) }.next.load(Acquire);
            if !xnext.is_marked() {
                self.current = Some(x);
                return;
            }
            cur = xnext.ptr();
        }
        *self = Self::back(self.list);
    }

    /// Moves the cursor to the previous node.
    ///
    /// Mirror of [`advance`]: the anchor, the node the cursor arrived over,
    /// becomes the new position while it is still a member; a dead anchor
    /// is recovered by walking its remembered backward chain to the first
    /// live node. Walking off the front leaves the cursor at the front
    /// position.
    ///
    /// # Panics
    ///
    /// Panics when called at the front of the list (a cursor with no
    /// anchor).
    ///
    /// [`advance`]: Cursor::advance
    pub fn retreat(&mut self) {
        let a = match self.anchor {
            Some(a) => a,
            None => panic!("retreated a cursor past the front of the list"),
        };
        let alink = unsafe { link_of(a) };

        if !alink.next.load(Acquire).is_marked() {
            self.current = Some(a);
            self.anchor = alink.prev.load(Acquire).ptr();
            return;
        }

        // The anchor was unlinked; search its backward chain for the first
        // node still in the list.
        let mut cur = alink.prev.load(Acquire).ptr();
        while let Some(x) = cur {
            let xlink = unsafe { link_of(x) };
            if !xlink.next.load(Acquire).is_marked() {
                self.current = Some(x);
                self.anchor = xlink.prev.load(Acquire).ptr();
                return;
            }
            cur = xlink.prev.load(Acquire).ptr();
        }
        *self = Self::front(self.list);
    }
}

impl<'a, T: Linked> fmt::Debug for Cursor<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("current", &self.current_raw())
            .field("anchor", &self.anchor_raw())
            .finish()
    }
}

/// A forward iterator over the members of a [`List`].
///
/// Yields payload borrows from the front to the back. Built on [`Cursor`],
/// so it inherits the recovery behavior and the single-pass-coherence
/// contract: the traversal terminates and stays on valid nodes under
/// concurrent mutation, but is not a snapshot.
pub struct Iter<'a, T: Linked> {
    cursor: Cursor<'a, T>,
}

impl<'a, T: Linked> Iter<'a, T> {
    pub(crate) fn new(list: &'a List<T>) -> Self {
        Iter {
            cursor: Cursor::front(list),
        }
    }
}

impl<'a, T: Linked> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let payload = self.cursor.get()?;
        self.cursor.advance();
        Some(payload)
    }
}
