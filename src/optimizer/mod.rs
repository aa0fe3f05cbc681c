mod extract;
mod limits;
mod model;

pub use limits::Limits;
pub use model::MixModel;
