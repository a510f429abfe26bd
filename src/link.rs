//! The intrusive link cell and the traits payload types implement.

use core::ptr::NonNull;

use crate::primitive::sync::atomic::Ordering::{Acquire, Relaxed};
use crate::stamped::{AtomicStamped, Stamped};

/// The pair of stamped links every list member embeds.
///
/// A `Link` by itself does nothing; it is storage the list threads its
/// structure through. Payload types embed one as a field and hand it out
/// through [`Linked::link`].
///
/// While a node is not in any list its link holds whatever the last
/// membership left behind; the fields are reinitialized when the node is
/// inserted again.
pub struct Link<T> {
    pub(crate) next: AtomicStamped<T>,
    pub(crate) prev: AtomicStamped<T>,
}

impl<T> Link<T> {
    /// Returns an unlinked cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use stamped_list::{Link, Linked};
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
    /// let t = Ticket { serial: 1, link: Link::new() };
    /// # let _ = t.serial;
    /// ```
    #[cfg(not(loom))]
    pub const fn new() -> Self {
        Link {
            next: AtomicStamped::null(),
            prev: AtomicStamped::null(),
        }
    }

    /// Returns an unlinked cell.
    #[cfg(loom)]
    pub fn new() -> Self {
        Link {
            next: AtomicStamped::null(),
            prev: AtomicStamped::null(),
        }
    }

    /// Loads a snapshot of the forward link.
    ///
    /// A set deletion mark on the snapshot means the node has been unlinked
    /// (and not reinserted since).
    pub fn next(&self) -> Stamped<T> {
        self.next.load(Acquire)
    }

    /// Loads a snapshot of the backward link.
    pub fn prev(&self) -> Stamped<T> {
        self.prev.load(Acquire)
    }

    /// Resets both fields before the node is published.
    ///
    /// Relaxed is enough: the node is not reachable yet, and the insertion
    /// CAS that publishes it is a release.
    pub(crate) fn reset(&self) {
        self.next.store(Stamped::null(), Relaxed);
        self.prev.store(Stamped::null(), Relaxed);
    }
}

impl<T> Default for Link<T> {
    fn default() -> Self {
        Link::new()
    }
}

/// Types that can be members of a [`List`].
///
/// # Safety
///
/// Implementing this trait is a promise about node lifetime that the list
/// cannot check:
///
/// - A node passed to any list operation must stay allocated, and must not
///   move, from the moment it is inserted until no thread can still reach
///   it. "Reach" includes holding a reference obtained from a search or an
///   iterator, not just membership in the list.
/// - [`link`] must return the same cell for the whole life of the node, and
///   that cell must not be shared with another node.
/// - A node must not be inserted into a second list, or inserted twice,
///   while it is still a member of one.
///
/// The list never frees, drops, or otherwise touches node storage; the
/// implementor owns reclamation entirely. Violating the contract leaves
/// dangling pointers inside the list, which nothing detects.
///
/// [`List`]: crate::List
/// [`link`]: Linked::link
pub unsafe trait Linked {
    /// Borrows the link cell embedded in this node.
    fn link(&self) -> &Link<Self>
    where
        Self: Sized;
}

/// Borrows the link cell of the node behind `node`, with the lifetime the
/// caller asks for.
///
/// # Safety
///
/// `node` must point to a live node, and the returned borrow must not
/// outlive its storage. Inside the crate both follow from the [`Linked`]
/// contract: list operations only hand this function pointers that some
/// link or anchor currently (or recently) carried.
pub(crate) unsafe fn link_of<'a, T: Linked>(node: NonNull<T>) -> &'a Link<T> {
    (*node.as_ptr()).link()
}

/// Payload types that expose a comparable attribute for value search.
///
/// Implementing this enables [`List::find_by_value`].
///
/// # Examples
///
/// ```
/// use stamped_list::{Link, Linked, Valued};
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
/// ```
///
/// [`List::find_by_value`]: crate::List::find_by_value
pub trait Valued {
    /// The comparable attribute.
    type Value: PartialEq;

    /// Borrows the attribute.
    fn value(&self) -> &Self::Value;
}
