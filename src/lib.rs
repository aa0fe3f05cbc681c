pub mod catalog;
pub mod error;
pub mod models;
pub mod optimizer;
pub mod requirements;

pub use catalog::Catalog;
pub use error::{BlendError, Result};
pub use models::{BlendRequest, BlendResult, ItemRecord, ItemUsage};
pub use optimizer::{Limits, MixModel};
