pub mod growth;
pub mod selector;
pub mod sources;
pub mod types;

pub use growth::{estimate_growth, GrowthEstimate};
pub use selector::Selector;
pub use sources::{SocialSignalSource, VolumeSource};
pub use types::*;
