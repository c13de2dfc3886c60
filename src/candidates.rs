//! Candidate construction
//!
//! Turns the measured engine, the shim pool and the size catalog into the
//! per-valve candidate lists the solvers consume, and keeps the tables
//! needed to map an opaque solution back onto real shims.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    engine::Engine,
    inventory::{Inventory, InventoryError, ShimKey},
    shims::{RoundMode, ShimCatalog, ShimSize},
    solvers::{Candidate, CandidateList, ItemId, Weight},
};

/// Weight of the buy-new fallback appended to every candidate list. Every
/// in-stock candidate must weigh strictly less, so a purchase is only ever
/// chosen when no stock fits.
pub const PURCHASE_WEIGHT: Weight = 1000;

/// Candidate construction errors
#[derive(Debug, Error)]
pub enum CandidateError {
    /// The size catalog holds no sizes, so no purchase can be named.
    #[error("The size catalog is empty")]
    EmptyCatalog,

    /// A deviation could not be expressed in tenth-mils.
    #[error("Valve {valve} produced a deviation outside the representable range")]
    DeviationNotRepresentable {
        /// Index of the valve in measurement order.
        valve: usize,
    },

    /// An in-stock shim weighed in at or above the purchase fallback.
    #[error("Valve {valve} has an in-stock candidate weighing {weight}, at or above the purchase fallback")]
    WeightExceedsFallback {
        /// Index of the valve in measurement order.
        valve: usize,

        /// The offending weight, in tenth-mils of deviation.
        weight: Weight,
    },

    /// Wrapper for inventory errors.
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Candidate lists for every valve of an engine, one position per valve in
/// measurement order, plus the lookup tables for interpreting a solution.
#[derive(Debug)]
pub struct CandidateSet {
    positions: Vec<CandidateList>,
    items: Vec<ShimKey>,
    nominals: Vec<ShimSize>,
}

impl CandidateSet {
    /// Builds the candidate lists for `engine` against `inventory`.
    ///
    /// For each valve the re-shimming window is every thickness that puts
    /// the resulting lash inside the valve's spec. In-stock shims in the
    /// window become candidates weighted by their deviation from the
    /// target lash, quantized to tenth-mils; the purchase fallback at
    /// [`PURCHASE_WEIGHT`] closes every list. Lists come out sorted
    /// ascending with ties kept in thickness order.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError::EmptyCatalog`] when no purchasable sizes
    /// exist, [`CandidateError::WeightExceedsFallback`] when a stock shim
    /// would weigh as much as the fallback, and
    /// [`CandidateError::DeviationNotRepresentable`] when a deviation
    /// cannot be quantized.
    pub fn build(
        engine: &Engine,
        inventory: &Inventory,
        catalog: &ShimCatalog,
    ) -> Result<Self, CandidateError> {
        let mut positions = Vec::with_capacity(engine.len());
        let mut nominals = Vec::with_capacity(engine.len());
        let mut items = Vec::new();
        let mut ids: FxHashMap<ShimKey, ItemId> = FxHashMap::default();

        for (valve, measurement) in engine.valves().iter().enumerate() {
            let spec = engine.spec(measurement.kind());
            let gap = measurement.gap();

            // The thickness that would land the lash dead on target,
            // snapped to the catalog. Recorded even when stock covers the
            // valve, so a purchase can always be named.
            let nominal = catalog
                .nearest(gap - spec.target(), RoundMode::Nearest)
                .ok_or(CandidateError::EmptyCatalog)?;

            nominals.push(nominal);

            let mut list = CandidateList::new();

            for key in inventory.in_window(gap - spec.max(), gap - spec.min()) {
                let shim = inventory.shim(key)?;
                let deviation = (gap - shim.size().thickness() - spec.target()).abs();

                let weight = deviation
                    .to_tenth_mils()
                    .and_then(|tenths| Weight::try_from(tenths).ok())
                    .ok_or(CandidateError::DeviationNotRepresentable { valve })?;

                if weight >= PURCHASE_WEIGHT {
                    return Err(CandidateError::WeightExceedsFallback { valve, weight });
                }

                let id = *ids.entry(key).or_insert_with(|| {
                    let id = ItemId::new(items.len());
                    items.push(key);
                    id
                });

                list.push(Candidate::item(id, weight));
            }

            // Stable, so equal weights stay in thickness order.
            list.sort_by_key(Candidate::weight);
            list.push(Candidate::purchase(PURCHASE_WEIGHT));

            positions.push(list);
        }

        Ok(Self {
            positions,
            items,
            nominals,
        })
    }

    /// The candidate lists, one per valve in measurement order.
    #[must_use]
    pub fn positions(&self) -> &[CandidateList] {
        &self.positions
    }

    /// The catalog size a purchase at `position` should be, if the
    /// position exists.
    #[must_use]
    pub fn nominal(&self, position: usize) -> Option<ShimSize> {
        self.nominals.get(position).copied()
    }

    /// The inventory shim behind a solver item id, if the id is known.
    #[must_use]
    pub fn shim(&self, id: ItemId) -> Option<ShimKey> {
        self.items.get(id.index()).copied()
    }
}
