// Licensed under the Apache-2.0 license

use core::ops::Deref;

/// A pointer to a statically allocated, memory-mapped register block.
#[derive(Debug)]
pub struct StaticRef<T> {
    ptr: *const T,
}

impl<T> StaticRef<T> {
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned and point at a `T` that stays valid
    /// for the rest of the program.
    pub const unsafe fn new(ptr: *const T) -> StaticRef<T> {
        StaticRef { ptr }
    }

    pub const fn as_ptr(&self) -> *const T {
        self.ptr
    }
}

impl<T> Clone for StaticRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StaticRef<T> {}

impl<T> Deref for StaticRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: guaranteed by the contract of `StaticRef::new`.
        unsafe { &*self.ptr }
    }
}
