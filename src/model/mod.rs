pub mod category;
pub mod config;
pub mod record;
pub mod task;

pub use category::*;
pub use config::*;
pub use record::*;
pub use task::*;
