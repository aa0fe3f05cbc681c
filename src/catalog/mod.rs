mod loader;

use std::path::Path;

use crate::error::{BlendError, Result};
use crate::models::ItemRecord;

/// Default bottle volume in mL for items without one.
pub const DEFAULT_BOTTLE_VOLUME: f64 = 500.0;

/// Default number of bottles available per item.
pub const DEFAULT_BOTTLE_CAP: u32 = 10;

/// Default formula priority (1.0 = no penalty).
pub const DEFAULT_PRIORITY: f64 = 1.0;

/// Immutable snapshot of the formula and solution tables, normalized into the
/// parameter arrays the optimizer consumes.
///
/// Items are stored formulas-first, then solutions, each category in source
/// order. Nutrient values are amounts per 100 mL. A snapshot never changes
/// after load; reloading means building a fresh `Catalog`.
#[derive(Debug, Clone)]
pub struct Catalog {
    formula_names: Vec<String>,
    solution_names: Vec<String>,
    nutrient_names: Vec<String>,
    /// Bottle volumes in mL, combined formula-then-solution order.
    bottle_volumes: Vec<f64>,
    /// Priorities in (0, 1], formulas only.
    priorities: Vec<f64>,
    /// Available bottles per item, combined order.
    bottle_caps: Vec<u32>,
    /// Nutrient content per 100 mL, rows in combined order.
    composition: Vec<Vec<f64>>,
}

impl Catalog {
    /// Load the two CSV tables and normalize them into a snapshot.
    ///
    /// Both tables must resolve to the same nutrient columns; a mismatch is a
    /// fatal catalog inconsistency, not a per-request failure.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(formulas: P, solutions: Q) -> Result<Self> {
        let formulas = loader::read_table(formulas.as_ref(), loader::TableKind::Formulas)?;
        let solutions = loader::read_table(solutions.as_ref(), loader::TableKind::Solutions)?;

        if formulas.nutrient_keys != solutions.nutrient_keys {
            return Err(BlendError::CatalogMismatch {
                formulas: formulas.nutrient_keys.len(),
                solutions: solutions.nutrient_keys.len(),
            });
        }

        Self::from_records(formulas.records, solutions.records, formulas.nutrient_names)
    }

    /// Build a snapshot from already-parsed records, applying defaults and
    /// checking the load-time invariants.
    pub fn from_records(
        formulas: Vec<ItemRecord>,
        solutions: Vec<ItemRecord>,
        nutrient_names: Vec<String>,
    ) -> Result<Self> {
        let n_formulas = formulas.len();
        let mut catalog = Self {
            formula_names: Vec::with_capacity(n_formulas),
            solution_names: Vec::with_capacity(solutions.len()),
            nutrient_names,
            bottle_volumes: Vec::new(),
            priorities: Vec::with_capacity(n_formulas),
            bottle_caps: Vec::new(),
            composition: Vec::new(),
        };

        for record in &formulas {
            catalog.push_item(record)?;
            let priority = record.priority.unwrap_or(DEFAULT_PRIORITY);
            if priority <= 0.0 || priority > 1.0 {
                return Err(BlendError::InvalidCatalog(format!(
                    "priority {} of formula '{}' is outside (0, 1]",
                    priority, record.name
                )));
            }
            catalog.priorities.push(priority);
            catalog.formula_names.push(record.name.clone());
        }
        for record in &solutions {
            catalog.push_item(record)?;
            catalog.solution_names.push(record.name.clone());
        }

        check_unique(&catalog.formula_names, "formula")?;
        check_unique(&catalog.solution_names, "solution")?;

        Ok(catalog)
    }

    fn push_item(&mut self, record: &ItemRecord) -> Result<()> {
        let volume = record.bottle_volume.unwrap_or(DEFAULT_BOTTLE_VOLUME);
        if volume <= 0.0 {
            return Err(BlendError::InvalidCatalog(format!(
                "bottle volume {} of '{}' is not positive",
                volume, record.name
            )));
        }
        if record.nutrients.len() != self.nutrient_names.len() {
            return Err(BlendError::InvalidCatalog(format!(
                "'{}' has {} nutrient values, expected {}",
                record.name,
                record.nutrients.len(),
                self.nutrient_names.len()
            )));
        }
        self.bottle_volumes.push(volume);
        self.bottle_caps
            .push(record.bottle_cap.unwrap_or(DEFAULT_BOTTLE_CAP));
        self.composition.push(record.nutrients.clone());
        Ok(())
    }

    pub fn n_formulas(&self) -> usize {
        self.formula_names.len()
    }

    pub fn n_solutions(&self) -> usize {
        self.solution_names.len()
    }

    pub fn n_items(&self) -> usize {
        self.formula_names.len() + self.solution_names.len()
    }

    pub fn nutrient_count(&self) -> usize {
        self.nutrient_names.len()
    }

    pub fn nutrient_names(&self) -> &[String] {
        &self.nutrient_names
    }

    /// True if the combined index addresses a formula rather than a solution.
    pub fn is_formula(&self, index: usize) -> bool {
        index < self.formula_names.len()
    }

    /// Item name at a combined index.
    pub fn item_name(&self, index: usize) -> &str {
        if self.is_formula(index) {
            &self.formula_names[index]
        } else {
            &self.solution_names[index - self.formula_names.len()]
        }
    }

    pub fn bottle_volumes(&self) -> &[f64] {
        &self.bottle_volumes
    }

    pub fn bottle_caps(&self) -> &[u32] {
        &self.bottle_caps
    }

    /// Formula priorities; indexed by formula position, not combined index.
    pub fn priorities(&self) -> &[f64] {
        &self.priorities
    }

    /// Nutrient content per 100 mL of the item at a combined index.
    pub fn composition(&self, index: usize) -> &[f64] {
        &self.composition[index]
    }
}

fn check_unique(names: &[String], category: &str) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name.to_lowercase()) {
            return Err(BlendError::InvalidCatalog(format!(
                "duplicate {} name '{}'",
                category, name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::from_records(
            vec![
                ItemRecord::new("Alpha", vec![100.0, 5.0])
                    .with_bottle(250.0)
                    .with_priority(0.8),
                ItemRecord::new("Beta", vec![50.0, 2.0]),
            ],
            vec![ItemRecord::new("Saline", vec![0.0, 0.0]).with_bottle(100.0)],
            vec!["Kcal".to_string(), "Protein".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let catalog = sample_catalog();
        assert_eq!(catalog.bottle_volumes(), &[250.0, DEFAULT_BOTTLE_VOLUME, 100.0]);
        assert_eq!(catalog.priorities(), &[0.8, DEFAULT_PRIORITY]);
        assert_eq!(
            catalog.bottle_caps(),
            &[DEFAULT_BOTTLE_CAP, DEFAULT_BOTTLE_CAP, DEFAULT_BOTTLE_CAP]
        );
    }

    #[test]
    fn test_combined_index_order() {
        let catalog = sample_catalog();
        assert_eq!(catalog.n_items(), 3);
        assert!(catalog.is_formula(0));
        assert!(catalog.is_formula(1));
        assert!(!catalog.is_formula(2));
        assert_eq!(catalog.item_name(0), "Alpha");
        assert_eq!(catalog.item_name(2), "Saline");
        assert_eq!(catalog.composition(2), &[0.0, 0.0]);
    }

    #[test]
    fn test_rejects_bad_priority() {
        let result = Catalog::from_records(
            vec![ItemRecord::new("Alpha", vec![5.0]).with_priority(1.5)],
            vec![],
            vec!["Protein".to_string()],
        );
        assert!(matches!(result, Err(BlendError::InvalidCatalog(_))));
    }

    #[test]
    fn test_rejects_bad_bottle_volume() {
        let result = Catalog::from_records(
            vec![ItemRecord::new("Alpha", vec![5.0]).with_bottle(0.0)],
            vec![],
            vec!["Protein".to_string()],
        );
        assert!(matches!(result, Err(BlendError::InvalidCatalog(_))));
    }

    #[test]
    fn test_rejects_row_width_mismatch() {
        let result = Catalog::from_records(
            vec![ItemRecord::new("Alpha", vec![5.0, 1.0])],
            vec![],
            vec!["Protein".to_string()],
        );
        assert!(matches!(result, Err(BlendError::InvalidCatalog(_))));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = Catalog::from_records(
            vec![
                ItemRecord::new("Alpha", vec![5.0]),
                ItemRecord::new("alpha", vec![2.0]),
            ],
            vec![],
            vec!["Protein".to_string()],
        );
        assert!(matches!(result, Err(BlendError::InvalidCatalog(_))));
    }
}
