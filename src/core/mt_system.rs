use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe cell around a boxed, possibly unsized value.
///
/// `MtSystem` is how type-erased values (`dyn Component`) are stored and shared.
/// It uses an `Arc<RwLock<Box<T>>>` internally, so a clone of the handle can be
/// held by a snapshot while the owning map changes underneath it.
///
/// # Examples
/// ```rust
/// use std::fmt::Debug;
/// use voxel_sim::core::MtSystem;
///
/// let cell: MtSystem<dyn Debug + Send + Sync> = MtSystem::new(Box::new(42u32));
/// assert_eq!(format!("{:?}", cell.get()), "42");
/// ```
pub struct MtSystem<T: ?Sized> {
    pub system: Arc<RwLock<Box<T>>>,
}

impl<T: ?Sized> MtSystem<T> {
    /// Creates a new cell containing the given boxed value.
    pub fn new(system: Box<T>) -> Self {
        Self {
            system: Arc::new(RwLock::new(system)),
        }
    }

    /// Returns a read guard over the boxed value.
    pub fn get(&self) -> RwLockReadGuard<'_, Box<T>> {
        self.system.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns an exclusive write guard over the boxed value.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, Box<T>> {
        self.system.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: ?Sized> Clone for MtSystem<T> {
    fn clone(&self) -> Self {
        Self {
            system: self.system.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> String;
    }

    struct Fixed(&'static str);

    impl Named for Fixed {
        fn name(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn stores_unsized_values() {
        let cell: MtSystem<dyn Named> = MtSystem::new(Box::new(Fixed("box")));
        assert_eq!(cell.get().name(), "box");

        *cell.get_mut() = Box::new(Fixed("mesh"));
        assert_eq!(cell.clone().get().name(), "mesh");
    }
}
