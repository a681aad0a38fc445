pub mod components;
pub mod renderer;
pub mod renders;
pub mod traits;
pub mod tracker;

pub use components::*;
pub use renderer::*;
pub use traits::*;
pub use tracker::*;
