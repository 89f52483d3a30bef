pub mod common;
pub mod operation;
pub mod process;

pub use common::*;
pub use operation::*;
pub use process::*;
