use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlendError {
    #[error("catalog inconsistency: formulas carry {formulas} nutrient columns, solutions carry {solutions}")]
    CatalogMismatch { formulas: usize, solutions: usize },

    #[error("missing required column '{column}' in {table} table")]
    MissingColumn { column: String, table: String },

    #[error("invalid catalog data: {0}")]
    InvalidCatalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid limit: {0}")]
    InvalidLimit(String),

    #[error("request vector has {found} entries, catalog has {expected} nutrients")]
    VectorLength { expected: usize, found: usize },

    #[error("importance weight {0} is outside [0, 1]")]
    WeightOutOfRange(f64),

    #[error("degenerate request: no target with a positive value and a positive weight")]
    DegenerateRequest,

    #[error("no feasible blend: {0}")]
    Infeasible(String),

    #[error("model is unbounded")]
    Unbounded,

    #[error("solver failure: {0}")]
    Solver(String),
}

pub type Result<T> = std::result::Result<T, BlendError>;
