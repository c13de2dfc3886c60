//! Shims

use std::fmt;

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::units::Inches;

/// A shim thickness grade.
///
/// The id is the thickness above the 3 mm base of the bucket, in thousandths
/// of a millimetre: grade `382` is a 3.382 mm shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShimSize(u16);

impl ShimSize {
    /// Creates a size from its grade id.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the grade id.
    #[must_use]
    pub const fn id(self) -> u16 {
        self.0
    }

    /// Returns the physical thickness in inches.
    ///
    /// `(3 mm + id µm) / 25.4`, carried out in decimal space.
    #[must_use]
    pub fn thickness(self) -> Inches {
        let microns = Decimal::from(3_000_u32 + u32::from(self.0));

        Inches::new(microns / Decimal::from(25_400_u32))
    }
}

impl fmt::Display for ShimSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How to resolve a thickness that falls between two catalogued sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMode {
    /// Pick the nearer neighbour; ties go to the thicker size.
    Nearest,

    /// Pick the next size up.
    Up,

    /// Pick the next size down.
    Down,
}

/// The ordered set of purchasable shim sizes.
#[derive(Debug, Clone)]
pub struct ShimCatalog {
    sizes: Vec<ShimSize>,
}

impl ShimCatalog {
    /// Creates a catalog from grade ids. Duplicates are dropped and the
    /// sizes are kept in ascending order.
    pub fn new(ids: impl IntoIterator<Item = u16>) -> Self {
        let mut sizes: Vec<ShimSize> = ids.into_iter().map(ShimSize::new).collect();

        sizes.sort_unstable();
        sizes.dedup();

        Self { sizes }
    }

    /// Returns the catalogued sizes in ascending order.
    pub fn sizes(&self) -> &[ShimSize] {
        &self.sizes
    }

    /// Returns the number of catalogued sizes.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Returns `true` if the catalog holds no sizes.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Returns the catalogued size closest to the given thickness.
    ///
    /// Thicknesses beyond the catalogue's extremes clamp to the thinnest or
    /// thickest size regardless of mode. Returns `None` only for an empty
    /// catalog or a thickness too large to express as a grade id.
    pub fn nearest(&self, thickness: Inches, mode: RoundMode) -> Option<ShimSize> {
        let (&thinnest, &thickest) = self.sizes.first().zip(self.sizes.last())?;
        let ideal = ideal_id(thickness)?;

        if ideal >= i64::from(thickest.id()) {
            return Some(thickest);
        }

        if ideal <= i64::from(thinnest.id()) {
            return Some(thinnest);
        }

        // Strictly between the extremes, so the id fits in a u16 and both
        // neighbours exist.
        let ideal = u16::try_from(ideal).ok()?;
        let split = self.sizes.partition_point(|size| size.id() < ideal);

        if let Some(&exact) = self.sizes.get(split).filter(|size| size.id() == ideal) {
            return Some(exact);
        }

        let above = self.sizes.get(split).copied();
        let below = split.checked_sub(1).and_then(|i| self.sizes.get(i)).copied();

        match (mode, below, above) {
            (RoundMode::Up, _, Some(up)) => Some(up),
            (RoundMode::Down, Some(down), _) => Some(down),
            (RoundMode::Nearest, Some(down), Some(up)) => {
                if up.id() - ideal <= ideal - down.id() {
                    Some(up)
                } else {
                    Some(down)
                }
            }
            _ => None,
        }
    }
}

/// The exact grade id for a thickness, rounded half to even.
fn ideal_id(thickness: Inches) -> Option<i64> {
    let microns = thickness.as_decimal() * Decimal::from(25_400_u32) - Decimal::from(3_000_u32);

    microns.round().to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_catalog() -> ShimCatalog {
        ShimCatalog::new([262, 282, 302, 322, 342, 362, 382])
    }

    #[test]
    fn thickness_converts_grade_to_inches() {
        let size = ShimSize::new(382);

        // 3.382 mm / 25.4
        let expected = Decimal::from(3_382_u32) / Decimal::from(25_400_u32);

        assert_eq!(size.thickness().as_decimal(), expected);
    }

    #[test]
    fn catalog_sorts_and_dedups_sizes() {
        let catalog = ShimCatalog::new([342, 262, 342, 302]);

        let ids: Vec<u16> = catalog.sizes().iter().map(|size| size.id()).collect();

        assert_eq!(ids, vec![262, 302, 342]);
    }

    #[test]
    fn nearest_returns_exact_match() {
        let catalog = test_catalog();
        let target = ShimSize::new(322).thickness();

        let size = catalog.nearest(target, RoundMode::Nearest);

        assert_eq!(size, Some(ShimSize::new(322)));
    }

    #[test]
    fn nearest_picks_the_nearer_neighbour() {
        let catalog = test_catalog();

        // Grade 330 sits between 322 and 342, nearer to 322.
        let target = Inches::new(Decimal::from(3_330_u32) / Decimal::from(25_400_u32));

        assert_eq!(
            catalog.nearest(target, RoundMode::Nearest),
            Some(ShimSize::new(322))
        );
    }

    #[test]
    fn nearest_tie_goes_to_the_thicker_size() {
        let catalog = test_catalog();

        // Grade 332 is equidistant from 322 and 342.
        let target = Inches::new(Decimal::from(3_332_u32) / Decimal::from(25_400_u32));

        assert_eq!(
            catalog.nearest(target, RoundMode::Nearest),
            Some(ShimSize::new(342))
        );
    }

    #[test]
    fn nearest_clamps_to_the_catalog_extremes() {
        let catalog = test_catalog();

        let thin = ShimSize::new(100).thickness();
        let thick = ShimSize::new(700).thickness();

        assert_eq!(
            catalog.nearest(thin, RoundMode::Nearest),
            Some(ShimSize::new(262))
        );
        assert_eq!(
            catalog.nearest(thick, RoundMode::Up),
            Some(ShimSize::new(382))
        );
    }

    #[test]
    fn up_and_down_pick_the_requested_neighbour() {
        let catalog = test_catalog();

        // Grade 330, between 322 and 342.
        let target = Inches::new(Decimal::from(3_330_u32) / Decimal::from(25_400_u32));

        assert_eq!(
            catalog.nearest(target, RoundMode::Up),
            Some(ShimSize::new(342))
        );
        assert_eq!(
            catalog.nearest(target, RoundMode::Down),
            Some(ShimSize::new(322))
        );
    }

    #[test]
    fn empty_catalog_has_no_nearest_size() {
        let catalog = ShimCatalog::new([]);

        assert_eq!(
            catalog.nearest(Inches::ZERO, RoundMode::Nearest),
            None,
            "an empty catalog cannot offer a size"
        );
    }
}
