//! Shim inventory

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{shims::ShimSize, units::Inches};

new_key_type! {
    /// Key identifying one physical shim in the pool.
    pub struct ShimKey;
}

/// Inventory errors
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A shim key did not resolve to a pooled shim.
    #[error("Shim {0:?} not found in the inventory")]
    ShimNotFound(ShimKey),
}

/// Where a pooled shim came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShimOrigin {
    /// Loose stock on the shelf.
    Spare,

    /// Currently fitted to the valve at this measurement index; it comes
    /// off during the job and re-enters the pool.
    Fitted {
        /// Index into the engine's measurement list.
        valve: usize,
    },
}

/// One physical shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shim {
    size: ShimSize,
    origin: ShimOrigin,
}

impl Shim {
    /// Returns the shim's size grade.
    #[must_use]
    pub const fn size(&self) -> ShimSize {
        self.size
    }

    /// Returns where the shim came from.
    #[must_use]
    pub const fn origin(&self) -> ShimOrigin {
        self.origin
    }
}

/// The pool of individually tracked physical shims.
///
/// Every shim is usable at most once per fit plan; two shims of the same
/// grade are distinct physical parts. The pool keeps a thickness-ordered
/// index so tolerance-window queries return shims thinnest-first.
#[derive(Debug, Default)]
pub struct Inventory {
    shims: SlotMap<ShimKey, Shim>,
    ordered: Vec<ShimKey>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a spare shim to the pool.
    pub fn add_spare(&mut self, size: ShimSize) -> ShimKey {
        self.add(Shim {
            size,
            origin: ShimOrigin::Spare,
        })
    }

    /// Adds a currently fitted shim to the pool, recording which valve it
    /// comes off.
    pub fn add_fitted(&mut self, size: ShimSize, valve: usize) -> ShimKey {
        self.add(Shim {
            size,
            origin: ShimOrigin::Fitted { valve },
        })
    }

    fn add(&mut self, shim: Shim) -> ShimKey {
        let size = shim.size;
        let key = self.shims.insert(shim);

        // Insert after any equal sizes so pool order is stable.
        let at = self.ordered.partition_point(|&existing| {
            self.shims
                .get(existing)
                .is_some_and(|other| other.size <= size)
        });

        self.ordered.insert(at, key);

        key
    }

    /// Looks up a shim by key.
    ///
    /// # Errors
    ///
    /// Returns an [`InventoryError::ShimNotFound`] if the key is not in the pool.
    pub fn shim(&self, key: ShimKey) -> Result<&Shim, InventoryError> {
        self.shims.get(key).ok_or(InventoryError::ShimNotFound(key))
    }

    /// Returns the keys of every shim whose thickness lies inside the
    /// closed window `[min, max]`, thinnest first.
    pub fn in_window(&self, min: Inches, max: Inches) -> SmallVec<[ShimKey; 10]> {
        self.ordered
            .iter()
            .filter_map(|&key| {
                self.shims
                    .get(key)
                    .map(|shim| (key, shim.size.thickness()))
            })
            .skip_while(|&(_, thickness)| thickness < min)
            .take_while(|&(_, thickness)| thickness <= max)
            .map(|(key, _)| key)
            .collect()
    }

    /// Iterates over every pooled shim in thickness order.
    pub fn iter(&self) -> impl Iterator<Item = (ShimKey, &Shim)> {
        self.ordered
            .iter()
            .filter_map(|&key| self.shims.get(key).map(|shim| (key, shim)))
    }

    /// Returns the number of pooled shims.
    pub fn len(&self) -> usize {
        self.shims.len()
    }

    /// Returns `true` if the pool holds no shims.
    pub fn is_empty(&self) -> bool {
        self.shims.is_empty()
    }
}
