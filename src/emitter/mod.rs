//! Token emitter: the linear token sequence a render produces, and the
//! deterministic pass that joins it into text.

pub mod stream;
pub mod token;

pub use stream::*;
pub use token::*;
