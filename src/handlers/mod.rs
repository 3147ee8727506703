pub mod dashboard;
pub mod gas;
pub mod health;
pub mod history;
pub mod stats;

pub use dashboard::*;
pub use gas::*;
pub use health::*;
pub use history::*;
pub use stats::*;
