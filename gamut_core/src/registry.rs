// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sharded registries keyed by the wrapped API's opaque handles.
//!
//! The registry mirrors the owning objects' lifetimes: a record is
//! inserted exactly once when the object is created and removed exactly
//! once when it is destroyed. `get` outside that window returns `None`,
//! which callers treat as "not a managed object". Shards keep operations
//! on unrelated handles from contending with each other; present calls on
//! one swapchain never serialize behind creation of another.

use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Opaque handle with a raw integer identity, used as a registry key.
pub trait RawHandle: Copy + Eq + Hash {
    /// The raw handle value as supplied by the wrapped API.
    fn raw(self) -> u64;
}

macro_rules! handle_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub u64);

        impl RawHandle for $name {
            fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:#x})"), self.0)
            }
        }
    };
}

handle_type! {
    /// Opaque instance handle of the wrapped API.
    InstanceHandle
}
handle_type! {
    /// Opaque presentation-surface handle of the wrapped API.
    SurfaceHandle
}
handle_type! {
    /// Opaque swapchain handle of the wrapped API.
    SwapchainHandle
}

const SHARD_COUNT: usize = 16;

/// Thread-safe handle-to-record map with per-shard locking.
pub struct HandleRegistry<H, T> {
    shards: Box<[RwLock<HashMap<u64, Arc<T>>>]>,
    _handles: PhantomData<fn(H)>,
}

impl<H: RawHandle, T> HandleRegistry<H, T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let shards = (0..SHARD_COUNT)
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self {
            shards,
            _handles: PhantomData,
        }
    }

    fn shard(&self, handle: H) -> &RwLock<HashMap<u64, Arc<T>>> {
        // Handles are often pointers with aligned low bits; mix before
        // taking the shard index.
        let mixed = handle.raw().wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let index = (mixed >> 60) as usize % self.shards.len();
        &self.shards[index]
    }

    /// Inserts the record for a freshly created handle.
    ///
    /// Returns `false` (leaving the existing record untouched) if the
    /// handle is already registered, which indicates a create-before-
    /// destroy violation by the caller.
    pub fn insert(&self, handle: H, record: T) -> bool {
        let mut shard = self.shard(handle).write();
        if shard.contains_key(&handle.raw()) {
            return false;
        }
        shard.insert(handle.raw(), Arc::new(record));
        true
    }

    /// Looks up the record for `handle`, if it is currently registered.
    #[must_use]
    pub fn get(&self, handle: H) -> Option<Arc<T>> {
        self.shard(handle).read().get(&handle.raw()).cloned()
    }

    /// Removes and returns the record for `handle`, if registered.
    pub fn remove(&self, handle: H) -> Option<Arc<T>> {
        self.shard(handle).write().remove(&handle.raw())
    }

    /// Number of currently registered handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    /// Returns `true` when no handles are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.read().is_empty())
    }
}

impl<H: RawHandle, T> Default for HandleRegistry<H, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, T> fmt::Debug for HandleRegistry<H, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleRegistry")
            .field("shards", &self.shards.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{HandleRegistry, SurfaceHandle, SwapchainHandle};
    use std::sync::Arc;

    #[test]
    fn get_between_insert_and_remove_returns_the_same_record() {
        let registry: HandleRegistry<SurfaceHandle, String> = HandleRegistry::new();
        let handle = SurfaceHandle(0x7000_1230);

        assert!(registry.get(handle).is_none(), "get before create is empty");
        assert!(registry.insert(handle, "record".into()));

        let first = registry.get(handle).expect("registered");
        let second = registry.get(handle).expect("registered");
        assert!(
            Arc::ptr_eq(&first, &second),
            "lookups between create and remove see one identity"
        );

        let removed = registry.remove(handle).expect("still registered");
        assert!(Arc::ptr_eq(&first, &removed), "remove returns the record");
        assert!(registry.get(handle).is_none(), "get after remove is empty");
    }

    #[test]
    fn duplicate_insert_is_rejected_and_keeps_the_original() {
        let registry: HandleRegistry<SwapchainHandle, u32> = HandleRegistry::new();
        let handle = SwapchainHandle(42);

        assert!(registry.insert(handle, 1));
        assert!(!registry.insert(handle, 2), "second create must fail");
        assert_eq!(*registry.get(handle).expect("registered"), 1);
    }

    #[test]
    fn handles_are_independent_slots() {
        let registry: HandleRegistry<SwapchainHandle, u32> = HandleRegistry::new();
        for raw in 0..64_u64 {
            assert!(registry.insert(SwapchainHandle(raw * 16), u32::try_from(raw).unwrap()));
        }
        assert_eq!(registry.len(), 64);

        registry.remove(SwapchainHandle(0));
        assert!(registry.get(SwapchainHandle(16)).is_some());
        assert_eq!(registry.len(), 63);
    }

    #[test]
    fn concurrent_gets_do_not_race_removal_of_other_handles() {
        let registry: Arc<HandleRegistry<SwapchainHandle, u64>> =
            Arc::new(HandleRegistry::new());
        for raw in 0..32 {
            registry.insert(SwapchainHandle(raw), raw);
        }

        let reader = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    if let Some(value) = registry.get(SwapchainHandle(7)) {
                        assert_eq!(*value, 7, "record content is stable");
                    }
                }
            })
        };
        for raw in (8..32).rev() {
            registry.remove(SwapchainHandle(raw));
        }
        reader.join().expect("reader thread");

        assert!(registry.get(SwapchainHandle(7)).is_some());
    }
}
