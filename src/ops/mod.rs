pub mod stats;
pub mod store;

pub use stats::Statistics;
pub use store::{SubscriptionId, TaskStore};
