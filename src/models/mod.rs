pub mod asset;
pub mod like_delta;
pub mod media_item;
pub mod media_store;
pub mod photographer;

pub use asset::*;
pub use like_delta::*;
pub use media_item::*;
pub use media_store::*;
pub use photographer::*;
