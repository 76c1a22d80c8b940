mod advertisement;
mod reading;

pub use advertisement::*;
pub use reading::*;
