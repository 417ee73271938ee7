// Re-export all model types from submodules
mod common;
mod food_requests;
mod listings;
mod map;
mod notifications;
mod pickups;
mod requests;

pub use common::*;
pub use food_requests::*;
pub use listings::*;
pub use map::*;
pub use notifications::*;
pub use pickups::*;
pub use requests::*;
