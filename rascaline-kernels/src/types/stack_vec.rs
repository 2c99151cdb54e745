/// Types that can be used as the backing store for a `StackVec`
pub trait Array: Default {
    /// The type of the array's elements.
    type Item;
    /// Returns the number of items the array can hold.
    fn capacity() -> usize;
    /// Get the full array as a slice
    fn as_slice(&self) -> &[Self::Item];
    /// Get the full array as a mutable slice
    fn as_mut_slice(&mut self) -> &mut [Self::Item];
}

impl<T, const N: usize> Array for [T; N] where [T; N]: Default {
    type Item = T;
    fn capacity() -> usize { N }
    fn as_slice(&self) -> &[T] { self }
    fn as_mut_slice(&mut self) -> &mut [T] { self }
}

/// A stack-allocated vector with fixed capacity. If more elements than the
/// initial capacity are needed, this will panic.
///
/// All the elements of the backing array are initialized with `Default`, and
/// only the first `len` are visible through `Deref`. This is used to return
/// a small, bounded number of items without going through the heap.
pub struct StackVec<A: Array> {
    /// The current number of elements stored in the array
    len: usize,
    /// The array used for storage
    data: A
}

impl<A: Array> StackVec<A> {
    /// Create a new empty `StackVec`. The capacity is controlled by the type
    /// parameter `A`
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            len: 0,
            data: Default::default(),
        }
    }

    /// Add an element to this `StackVec`
    ///
    /// # Panics
    ///
    /// If the backing array is already full
    pub fn push(&mut self, value: A::Item) {
        if self.len == A::capacity() {
            panic!("StackVec is full, use a larger array as storage")
        }

        self.data.as_mut_slice()[self.len] = value;
        self.len += 1;
    }

    /// Get the maximal number of elements this `StackVec` can hold
    pub fn capacity(&self) -> usize {
        A::capacity()
    }
}

impl<A: Array> std::ops::Deref for StackVec<A> {
    type Target = [A::Item];

    fn deref(&self) -> &Self::Target {
        &self.data.as_slice()[..self.len]
    }
}

impl<A: Array> std::ops::DerefMut for StackVec<A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data.as_mut_slice()[..self.len]
    }
}

impl<A: Array> Clone for StackVec<A> where A: Clone {
    fn clone(&self) -> Self {
        StackVec {
            len: self.len,
            data: self.data.clone(),
        }
    }
}

impl<A: Array> std::fmt::Debug for StackVec<A> where A::Item: std::fmt::Debug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<A: Array> PartialEq for StackVec<A> where A::Item: PartialEq {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<A: Array> FromIterator<A::Item> for StackVec<A> {
    fn from_iter<I: IntoIterator<Item = A::Item>>(iter: I) -> Self {
        let mut vec = StackVec::new();
        for value in iter {
            vec.push(value);
        }
        return vec;
    }
}

impl<'a, A: Array> IntoIterator for &'a StackVec<A> {
    type Item = &'a A::Item;
    type IntoIter = std::slice::Iter<'a, A::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
