//! Identities of observed containers and instance identity of elements.
//!
//! # Key Types
//! - [`ContainerId`] - Process-unique identity of a decorated container or one of its views
//! - [`SameInstance`] - Reference identity between two elements, used by `set` notifications

use std::{
    fmt,
    num::NonZeroU64,
    rc::Rc,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a decorated container or view.
///
/// Events use it for both their `observed` container and, when raised through a view, the
/// originating `view`. Identities are never reused within a process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(NonZeroU64);

impl ContainerId {
    /// Allocates a fresh identity.
    #[must_use]
    pub fn next() -> Self {
        let raw = NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed);
        // The counter starts at 1 and would need 2^64 allocations to wrap.
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    /// The raw numeric value of this identity.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerId({})", self.0)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference identity between two elements.
///
/// `set` notifications report `modified` by comparing the replaced element with its replacement
/// by *instance*, never by `PartialEq`, so user-defined equality is never invoked from inside
/// a notification. Owned values moved into a container can never alias the value they
/// replace, which is what the provided default expresses. Shared handles override it with a
/// pointer comparison.
///
/// Element types that are plain values only need an empty impl:
///
/// ```rust
/// use modscope::SameInstance;
///
/// struct Point(i32, i32);
/// impl SameInstance for Point {}
///
/// assert!(!Point(1, 2).same_instance(&Point(1, 2)));
/// ```
pub trait SameInstance {
    /// Whether `self` and `other` are the same instance.
    fn same_instance(&self, _other: &Self) -> bool {
        false
    }
}

impl<T: ?Sized> SameInstance for Rc<T> {
    fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> SameInstance for Arc<T> {
    fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> SameInstance for &T {
    fn same_instance(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}

macro_rules! distinct_instances {
    ($($ty:ty),* $(,)?) => {
        $(impl SameInstance for $ty {})*
    };
}

distinct_instances!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
);

impl<T> SameInstance for Box<T> {}
impl<T> SameInstance for Vec<T> {}
