pub mod climate;
mod home;

pub use climate::*;
pub use home::*;
