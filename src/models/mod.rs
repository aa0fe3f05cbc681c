pub mod item;
pub mod request;
pub mod result;

pub use item::ItemRecord;
pub use request::BlendRequest;
pub use result::{BlendResult, ItemUsage};
