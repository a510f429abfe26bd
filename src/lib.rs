//! A lock-free doubly-linked list with stamped, intrusive links.
//!
//! The list never blocks: any number of threads may insert at either end,
//! insert after a node, remove a node, search, and traverse concurrently.
//! Every edge of the structure is a single 64-bit word combining a node
//! address, a 16-bit version stamp that defeats the ABA hazard on
//! compare-and-set, and a deletion mark. See [`Stamped`] for the word
//! layout and [`List`] for the operation contracts.
//!
//! The list is intrusive and does not manage memory. Payload types embed a
//! [`Link`] and implement [`Linked`], which is where the lifetime contract
//! lives: node storage is the caller's, and must outlive every reference
//! the list or its iterators might still hold. There is no built-in
//! reclamation; pair the list with epoch-based reclamation, hazard
//! pointers, or arena lifetime management as the deployment requires.
//!
//! # Examples
//!
//! ```
//! use stamped_list::{Link, Linked, List};
//!
//! struct Job {
//!     id: u32,
//!     link: Link<Job>,
//! }
//!
//! unsafe impl Linked for Job {
//!     fn link(&self) -> &Link<Job> {
//!         &self.link
//!     }
//! }
//!
//! let jobs: Vec<_> = (0..4).map(|id| Job { id, link: Link::new() }).collect();
//! let queue = List::new();
//!
//! for job in &jobs {
//!     queue.push_back(job);
//! }
//!
//! queue.remove(&jobs[2]);
//! let ids: Vec<_> = queue.iter().map(|j| j.id).collect();
//! assert_eq!(ids, [0, 1, 3]);
//! ```

mod cursor;
mod link;
mod list;
mod primitive;
mod stamped;

pub use cursor::{Cursor, Iter};
pub use link::{Link, Linked, Valued};
pub use list::List;
pub use stamped::{AtomicStamped, Stamped};
