//! Atomic primitives, swappable for [`loom`] mock atomics.
//!
//! Everything in the crate goes through this module instead of naming
//! `core::sync::atomic` directly, so building the test suite with
//! `RUSTFLAGS="--cfg loom"` puts the whole list under the loom model checker
//! without any other source change.
//!
//! [`loom`]: https://docs.rs/loom

#[cfg(loom)]
pub(crate) mod sync {
    pub(crate) mod atomic {
        pub(crate) use loom::sync::atomic::{AtomicU64, Ordering};
    }
}

#[cfg(not(loom))]
pub(crate) mod sync {
    pub(crate) mod atomic {
        pub(crate) use core::sync::atomic::{AtomicU64, Ordering};
    }
}
