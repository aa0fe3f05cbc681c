use serde::Serialize;

/// Usage of one formula or solution in a solved blend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemUsage {
    pub name: String,

    /// Volume drawn, in mL.
    pub volume: f64,

    /// Bottles opened to provide that volume.
    pub bottles: u32,

    /// Volume of one bottle, in mL.
    pub bottle_volume: f64,
}

/// The outcome of one solve, handed to the presentation layer.
///
/// `formulas` and `solutions` list only items with non-zero usage, in catalog
/// order. The usage counts are the lengths of these sequences, not readbacks
/// of the solver's binary variables.
#[derive(Debug, Clone, Serialize)]
pub struct BlendResult {
    /// Worst weighted relative deviation across the active targets.
    pub deviation: f64,

    /// Total wasted formula volume in mL (opened but not drawn).
    pub waste: f64,

    /// Volume-weighted penalty for using lower-priority formulas.
    pub priority_penalty: f64,

    pub formulas: Vec<ItemUsage>,
    pub solutions: Vec<ItemUsage>,

    /// Achieved nutrient amounts, in catalog nutrient order.
    pub nutrients: Vec<f64>,

    /// Total mix volume in mL.
    pub total_volume: f64,
}

impl BlendResult {
    pub fn formulas_used(&self) -> usize {
        self.formulas.len()
    }

    pub fn solutions_used(&self) -> usize {
        self.solutions.len()
    }
}
