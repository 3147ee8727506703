pub mod chain;
pub mod decimal;
pub mod gas;
pub mod history;
pub mod response;

pub use chain::*;
pub use gas::*;
pub use history::*;
pub use response::*;
