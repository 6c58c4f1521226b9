mod hash;
mod principal;

pub use hash::*;
pub use principal::*;
