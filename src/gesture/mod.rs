mod controls;
mod drag;
mod spring;

pub use controls::*;
pub use drag::*;
pub use spring::*;
