pub mod represent;
pub mod resolve;
pub mod validate;

pub use represent::*;
pub use resolve::*;
pub use validate::*;
