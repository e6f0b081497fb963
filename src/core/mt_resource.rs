use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// A thread-safe, reference-counted value with read-write locking.
///
/// `MtResource` wraps an `Arc<RwLock<T>>`. Cloning the handle shares the value;
/// the value lives as long as at least one handle does.
///
/// Lock poisoning is deliberately ignored: a component that panicked mid-write
/// leaves its data as it was, and the rest of the simulation keeps reading it.
///
/// # Examples
/// ```
/// use voxel_sim::core::MtResource;
///
/// let position = MtResource::new([0.0f32; 3]);
/// let shared = position.clone();
/// shared.get_mut()[1] = 4.0;
/// assert_eq!(position.get()[1], 4.0);
/// assert!(position.ptr_eq(&shared));
/// ```
#[derive(Debug, Default)]
pub struct MtResource<T> {
    pub resource: Arc<RwLock<T>>,
}

impl<T> MtResource<T> {
    /// Creates a new handle owning `resource`.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read guard. Concurrent readers don't block each other.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns an exclusive write guard.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a non-owning handle to the same value.
    pub fn downgrade(&self) -> MtWeak<T> {
        MtWeak {
            resource: Arc::downgrade(&self.resource),
        }
    }

    /// Whether both handles point at the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

/// A non-owning reference to an [`MtResource`].
///
/// Used wherever the data model calls for a weak link: a Transform's parent and
/// the World's chunk loader. Upgrading fails once every owning handle is gone.
#[derive(Debug)]
pub struct MtWeak<T> {
    resource: Weak<RwLock<T>>,
}

impl<T> MtWeak<T> {
    /// Returns an owning handle if the value is still alive.
    pub fn upgrade(&self) -> Option<MtResource<T>> {
        self.resource
            .upgrade()
            .map(|resource| MtResource { resource })
    }

    /// Whether this weak handle refers to the value owned by `strong`.
    pub fn points_to(&self, strong: &MtResource<T>) -> bool {
        std::ptr::eq(self.resource.as_ptr(), Arc::as_ptr(&strong.resource))
    }
}

impl<T> Clone for MtWeak<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_the_value() {
        let counter = MtResource::new(0);
        let clone = counter.clone();

        let handle = thread::spawn(move || {
            *clone.get_mut() += 1;
        });
        handle.join().unwrap();

        assert_eq!(*counter.get(), 1);
    }

    #[test]
    fn weak_handle_does_not_keep_value_alive() {
        let strong = MtResource::new(String::from("loader"));
        let weak = strong.downgrade();
        assert!(weak.points_to(&strong));
        assert_eq!(weak.upgrade().unwrap().get().as_str(), "loader");

        drop(strong);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn poisoned_lock_is_still_readable() {
        let value = MtResource::new(5);
        let clone = value.clone();
        let _ = thread::spawn(move || {
            let _guard = clone.get_mut();
            panic!("component panicked while holding the lock");
        })
        .join();

        assert_eq!(*value.get(), 5);
        *value.get_mut() = 6;
        assert_eq!(*value.get(), 6);
    }
}
