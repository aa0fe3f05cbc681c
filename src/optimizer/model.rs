use good_lp::solvers::microlp::microlp;
use good_lp::{
    Constraint, Expression, ProblemVariables, ResolutionError, SolverModel, Variable, constraint,
    variable,
};

use crate::catalog::Catalog;
use crate::error::{BlendError, Result};
use crate::models::{BlendRequest, BlendResult};
use crate::optimizer::Limits;
use crate::optimizer::extract::extract_result;

/// Tolerance when comparing a target against its attainable upper bound.
const ATTAINABLE_EPS: f64 = 1e-6;

/// Decision variables of one assembled problem.
///
/// Per item (combined formula-then-solution index): drawn volume `x`,
/// binary usage flag `y`, integer opened-bottle count `f`. Per nutrient:
/// achieved amount `n`. Scalars: worst weighted deviation `delta`, formula
/// waste `s`, priority penalty `d`, total volume `V`.
pub(crate) struct ModelVars {
    pub(crate) volume: Vec<Variable>,
    pub(crate) used: Vec<Variable>,
    pub(crate) bottles: Vec<Variable>,
    pub(crate) achieved: Vec<Variable>,
    pub(crate) deviation: Variable,
    pub(crate) waste: Variable,
    pub(crate) priority_penalty: Variable,
    pub(crate) total_volume: Variable,
}

/// The blend optimization model: one catalog snapshot plus scalar limits,
/// solved repeatedly against per-request targets.
///
/// The mixed-integer program minimizes `delta`, the worst weighted relative
/// deviation across the active targets. Waste and priority penalty are capped,
/// not optimized; nutritional accuracy is the single true objective.
///
/// `solve` takes `&mut self`, so at most one solve can be in flight against a
/// model instance at a time; the target constraints of one request can never
/// interleave with another's. The catalog snapshot itself is immutable and can
/// be shared freely across sessions.
pub struct MixModel {
    catalog: Catalog,
    limits: Limits,
    /// Per-item minimum draw: `min(Vmin, bottle volume)`, combined order.
    min_draws: Vec<f64>,
}

impl MixModel {
    /// Build a model from an immutable catalog snapshot and validated limits.
    pub fn new(catalog: Catalog, limits: Limits) -> Result<Self> {
        limits.validate()?;
        let min_draws = catalog
            .bottle_volumes()
            .iter()
            .map(|&b| limits.min_draw.min(b))
            .collect();
        Ok(Self {
            catalog,
            limits,
            min_draws,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Bind the request's targets, run the solver to a terminal status and
    /// extract the blend. Blocks until the solver returns.
    ///
    /// The constraint set is reassembled from the precomputed parameters on
    /// every call, so rebinding is idempotent: solving the same request twice
    /// yields the same result.
    pub fn solve(&mut self, request: &BlendRequest) -> Result<BlendResult> {
        self.validate_request(request)?;
        self.check_attainable(request)?;

        let mut vars = ProblemVariables::new();
        let model_vars = self.add_variables(&mut vars);

        let mut problem = vars.minimise(model_vars.deviation).using(microlp);
        for c in self.structural_constraints(&model_vars) {
            problem = problem.with(c);
        }
        for c in deviation_constraints(&model_vars, request) {
            problem = problem.with(c);
        }

        match problem.solve() {
            Ok(solution) => Ok(extract_result(&self.catalog, &model_vars, &solution)),
            Err(ResolutionError::Infeasible) => Err(BlendError::Infeasible(
                "solver reported the model infeasible".to_string(),
            )),
            Err(ResolutionError::Unbounded) => Err(BlendError::Unbounded),
            Err(other) => Err(BlendError::Solver(other.to_string())),
        }
    }

    /// Caller-contract checks, performed before the model is touched.
    fn validate_request(&self, request: &BlendRequest) -> Result<()> {
        let expected = self.catalog.nutrient_count();
        for found in [request.targets.len(), request.weights.len()] {
            if found != expected {
                return Err(BlendError::VectorLength { expected, found });
            }
        }
        for &w in &request.weights {
            if !(0.0..=1.0).contains(&w) {
                return Err(BlendError::WeightOutOfRange(w));
            }
        }
        if request.is_degenerate() {
            return Err(BlendError::DegenerateRequest);
        }
        Ok(())
    }

    /// Reject targets no admissible blend can reach: a weighted target above
    /// the amount the best `Mmax` formulas plus best `Cmax` solutions can
    /// supply at full bottle capacity cannot be met under the count caps, so
    /// the request is infeasible rather than solved best-effort. Targets that
    /// are individually attainable but jointly in conflict still solve to a
    /// positive deviation.
    fn check_attainable(&self, request: &BlendRequest) -> Result<()> {
        for (k, target) in request.active_targets() {
            if request.weights[k] <= 0.0 {
                continue;
            }
            let bound = self.attainable_bound(k);
            if bound + ATTAINABLE_EPS < target {
                return Err(BlendError::Infeasible(format!(
                    "target {} for '{}' exceeds the attainable supply of {:.3}",
                    target,
                    self.catalog.nutrient_names()[k],
                    bound
                )));
            }
        }
        Ok(())
    }

    /// Upper bound on the achievable amount of one nutrient under the item
    /// count caps, ignoring the waste and penalty couplings.
    fn attainable_bound(&self, nutrient: usize) -> f64 {
        let volumes = self.catalog.bottle_volumes();
        let caps = self.catalog.bottle_caps();
        let contribution = |i: usize| {
            (self.catalog.composition(i)[nutrient] * 0.01 * volumes[i] * f64::from(caps[i]))
                .max(0.0)
        };

        let n_formulas = self.catalog.n_formulas();
        let formulas = (0..n_formulas).map(contribution);
        let solutions = (n_formulas..self.catalog.n_items()).map(contribution);

        top_sum(formulas, self.limits.max_formulas as usize)
            + top_sum(solutions, self.limits.max_solutions as usize)
    }

    fn add_variables(&self, vars: &mut ProblemVariables) -> ModelVars {
        let n_items = self.catalog.n_items();
        let caps = self.catalog.bottle_caps();

        ModelVars {
            volume: (0..n_items).map(|_| vars.add(variable().min(0.0))).collect(),
            used: (0..n_items).map(|_| vars.add(variable().binary())).collect(),
            bottles: (0..n_items)
                .map(|i| vars.add(variable().integer().min(0).max(f64::from(caps[i]))))
                .collect(),
            achieved: (0..self.catalog.nutrient_count())
                .map(|_| vars.add(variable().min(0.0)))
                .collect(),
            deviation: vars.add(variable().min(0.0)),
            waste: vars.add(variable().min(0.0)),
            priority_penalty: vars.add(variable().min(0.0)),
            total_volume: vars.add(variable().min(0.0)),
        }
    }

    /// Constraints that do not depend on the request.
    fn structural_constraints(&self, v: &ModelVars) -> Vec<Constraint> {
        let catalog = &self.catalog;
        let volumes = catalog.bottle_volumes();
        let caps = catalog.bottle_caps();
        let n_formulas = catalog.n_formulas();
        let mut constraints = Vec::new();

        for i in 0..catalog.n_items() {
            let (x, y, f) = (v.volume[i], v.used[i], v.bottles[i]);
            let b = volumes[i];

            // Bottle gating: no bottles unless used, at most the stock cap.
            constraints.push(constraint!(f >= y));
            constraints.push(constraint!(f <= y * f64::from(caps[i])));

            // Capacity: cannot draw more than the opened bottles hold.
            constraints.push(constraint!(x <= f * b));

            // Minimum draw: every opened bottle except the last is emptied,
            // and the last provides at least min(Vmin, b).
            constraints.push(constraint!(x - f * b >= self.min_draws[i] - b));
        }

        // Count caps on formulas and solutions.
        let mut formulas_used = Expression::from(0.0);
        for i in 0..n_formulas {
            formulas_used += v.used[i] * 1.0;
        }
        constraints.push(constraint!(
            formulas_used <= f64::from(self.limits.max_formulas)
        ));

        let mut solutions_used = Expression::from(0.0);
        for i in n_formulas..catalog.n_items() {
            solutions_used += v.used[i] * 1.0;
        }
        constraints.push(constraint!(
            solutions_used <= f64::from(self.limits.max_solutions)
        ));

        // Nutrient accounting; 0.01 converts per-100-mL content to per-mL.
        for j in 0..catalog.nutrient_count() {
            let mut amount = Expression::from(0.0);
            for i in 0..catalog.n_items() {
                amount += v.volume[i] * (catalog.composition(i)[j] * 0.01);
            }
            constraints.push(constraint!(amount == v.achieved[j]));
        }

        // Volume accounting.
        let mut total = Expression::from(0.0);
        for i in 0..catalog.n_items() {
            total += v.volume[i] * 1.0;
        }
        constraints.push(constraint!(total == v.total_volume));

        // Waste: formula overflow only; solutions do not count.
        let mut waste = Expression::from(0.0);
        for i in 0..n_formulas {
            waste += v.bottles[i] * volumes[i];
            waste += v.volume[i] * -1.0;
        }
        constraints.push(constraint!(waste == v.waste));
        constraints.push(constraint!(v.waste <= self.limits.max_waste));

        // Priority penalty: volume-weighted discount on low-priority formulas.
        let mut penalty = Expression::from(0.0);
        for i in 0..n_formulas {
            penalty += v.volume[i] * (1.0 - catalog.priorities()[i]);
        }
        constraints.push(constraint!(penalty == v.priority_penalty));
        constraints.push(constraint!(
            v.priority_penalty <= self.limits.max_priority_penalty
        ));

        constraints
    }
}

/// The per-request target binding: for every nutrient with a positive target
/// and weight, `delta` dominates the weighted relative deviation in both
/// directions, making it the maximum over all active targets.
fn deviation_constraints(v: &ModelVars, request: &BlendRequest) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    for (k, target) in request.active_targets() {
        let w = request.weights[k];
        if w <= 0.0 {
            continue;
        }
        let scale = w / target;
        let (delta, n) = (v.deviation, v.achieved[k]);
        constraints.push(constraint!(delta - n * scale >= -w));
        constraints.push(constraint!(delta + n * scale >= w));
    }
    constraints
}

/// Sum of the `count` largest values.
fn top_sum(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(|a, b| b.total_cmp(a));
    values.iter().take(count).sum()
}
