use good_lp::Solution;

use crate::catalog::Catalog;
use crate::models::{BlendResult, ItemUsage};
use crate::optimizer::model::ModelVars;

/// Solved volumes below this are treated as zero usage.
const VOLUME_EPS: f64 = 1e-6;

/// Read the solved variables back into domain quantities.
///
/// Items with zero usage are omitted entirely; the two usage sequences keep
/// catalog order. Bottle counts come from the integer variables, rounded to
/// absorb solver noise.
pub(crate) fn extract_result(
    catalog: &Catalog,
    vars: &ModelVars,
    solution: &impl Solution,
) -> BlendResult {
    let mut formulas = Vec::new();
    let mut solutions = Vec::new();

    for i in 0..catalog.n_items() {
        let volume = solution.value(vars.volume[i]);
        if volume <= VOLUME_EPS {
            continue;
        }
        let usage = ItemUsage {
            name: catalog.item_name(i).to_string(),
            volume,
            bottles: solution.value(vars.bottles[i]).round() as u32,
            bottle_volume: catalog.bottle_volumes()[i],
        };
        if catalog.is_formula(i) {
            formulas.push(usage);
        } else {
            solutions.push(usage);
        }
    }

    let nutrients = vars
        .achieved
        .iter()
        .map(|&n| solution.value(n))
        .collect();

    BlendResult {
        deviation: solution.value(vars.deviation),
        waste: solution.value(vars.waste),
        priority_penalty: solution.value(vars.priority_penalty),
        formulas,
        solutions,
        nutrients,
        total_volume: solution.value(vars.total_volume),
    }
}
