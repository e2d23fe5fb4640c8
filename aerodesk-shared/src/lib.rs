pub mod models;
pub mod pii;
pub mod schedule;

pub use models::*;
pub use pii::Masked;
