//! Hardcoded categorical defaults
//!
//! Used only when the trained encoder's vocabulary cannot be introspected.
//! Every value here must be one that occurred in the training data.

use crate::schema::FeatureSchema;

/// Known-good values for the car price model's categorical features
pub const CAR_PRICE_FALLBACKS: FallbackTable = FallbackTable::new(&[
    ("CarName", "toyota corolla"),
    ("fueltype", "gas"),
    ("aspiration", "std"),
    ("doornumber", "four"),
    ("carbody", "sedan"),
    ("drivewheel", "fwd"),
    ("enginelocation", "front"),
    ("enginetype", "ohc"),
    ("cylindernumber", "four"),
    ("fuelsystem", "mpfi"),
]);

/// Static categorical feature -> default value table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackTable {
    entries: &'static [(&'static str, &'static str)],
}

impl FallbackTable {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    pub fn get(&self, feature: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == feature)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that every entry names a categorical feature of `schema`, once
    pub fn validate(&self, schema: &FeatureSchema) -> Result<(), String> {
        for (i, (feature, _)) in self.entries.iter().enumerate() {
            if !schema.is_categorical(feature) {
                return Err(format!(
                    "Fallback for {feature:?} does not name a categorical feature"
                ));
            }
            if self.entries[..i].iter().any(|(seen, _)| seen == feature) {
                return Err(format!("Fallback for {feature:?} appears more than once"));
            }
        }
        Ok(())
    }
}

impl Default for FallbackTable {
    fn default() -> Self {
        CAR_PRICE_FALLBACKS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CAR_PRICE_SCHEMA;

    #[test]
    fn test_car_table_covers_every_categorical() {
        assert!(CAR_PRICE_FALLBACKS.validate(&CAR_PRICE_SCHEMA).is_ok());
        assert_eq!(CAR_PRICE_FALLBACKS.len(), CAR_PRICE_SCHEMA.categorical().len());
        for feature in CAR_PRICE_SCHEMA.categorical() {
            assert!(CAR_PRICE_FALLBACKS.get(feature).is_some(), "{feature}");
        }
        assert!(FallbackTable::empty().validate(&CAR_PRICE_SCHEMA).is_ok());
    }

    #[test]
    fn test_validate_rejects_numeric_and_duplicate_entries() {
        const NUMERIC: FallbackTable = FallbackTable::new(&[("enginesize", "130")]);
        assert!(NUMERIC.validate(&CAR_PRICE_SCHEMA).unwrap_err().contains("enginesize"));

        const DUP: FallbackTable =
            FallbackTable::new(&[("fueltype", "gas"), ("fueltype", "diesel")]);
        assert!(DUP.validate(&CAR_PRICE_SCHEMA).unwrap_err().contains("more than once"));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(CAR_PRICE_FALLBACKS.get("fueltype"), Some("gas"));
        assert_eq!(CAR_PRICE_FALLBACKS.get("CarName"), Some("toyota corolla"));
        assert_eq!(CAR_PRICE_FALLBACKS.get("enginesize"), None);
    }
}
