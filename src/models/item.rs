use serde::{Deserialize, Serialize};

/// One normalized catalog row, before defaults are applied.
///
/// `None` fields were missing in the source table and take the catalog
/// defaults: 500 mL bottles, priority 1.0 (no penalty), 10 bottles in stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,

    /// Bottle volume in mL.
    pub bottle_volume: Option<f64>,

    /// Priority level in (0, 1]; formulas only, 1.0 means no discount.
    pub priority: Option<f64>,

    /// Number of bottles available.
    pub bottle_cap: Option<u32>,

    /// Nutrient content per 100 mL, in the catalog's nutrient order.
    pub nutrients: Vec<f64>,
}

impl ItemRecord {
    /// A record with only a name and nutrient vector; everything else defaulted.
    pub fn new(name: impl Into<String>, nutrients: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            bottle_volume: None,
            priority: None,
            bottle_cap: None,
            nutrients,
        }
    }

    pub fn with_bottle(mut self, volume: f64) -> Self {
        self.bottle_volume = Some(volume);
        self
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_cap(mut self, cap: u32) -> Self {
        self.bottle_cap = Some(cap);
        self
    }
}
