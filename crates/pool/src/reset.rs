//! The "return to empty" capability

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::hash::BuildHasher;

/// Types that can be returned to an empty state for reuse.
///
/// The pool never calls this on its own: objects come back from
/// [`ObjectPool::get`](crate::ObjectPool::get) exactly as the previous
/// borrower left them. Callers who need a clean object call `reset`
/// themselves, or return objects through
/// [`ObjectPool::put_reset`](crate::ObjectPool::put_reset).
///
/// # Example
/// ```
/// use tollkit_pool::Reset;
///
/// #[derive(Default)]
/// struct Request {
///     path: String,
///     headers: Vec<(String, String)>,
/// }
///
/// impl Reset for Request {
///     fn reset(&mut self) {
///         self.path.clear();
///         self.headers.clear();
///     }
/// }
/// ```
pub trait Reset {
    /// Clear any state that must not leak to the next borrower
    fn reset(&mut self);
}

impl Reset for String {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<T> Reset for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<T> Reset for VecDeque<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<K, V, S: BuildHasher> Reset for HashMap<K, V, S> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<T, S: BuildHasher> Reset for HashSet<T, S> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<K, V> Reset for BTreeMap<K, V> {
    fn reset(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containers_keep_capacity() {
        let mut buf = String::with_capacity(64);
        buf.push_str("stale");
        buf.reset();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 64);

        let mut items = vec![1, 2, 3];
        items.reset();
        assert!(items.is_empty());

        let mut map: HashMap<&str, u32> = HashMap::from([("a", 1)]);
        map.reset();
        assert!(map.is_empty());
    }
}
