pub mod sample;
pub mod user;

pub use sample::*;
pub use user::*;
