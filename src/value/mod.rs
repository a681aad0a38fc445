pub mod classify;
pub mod types;

pub use classify::*;
pub use types::*;
