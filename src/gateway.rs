mod device;
mod host;
mod property;

pub use device::*;
pub use host::*;
pub use property::*;
