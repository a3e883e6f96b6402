//! Shared models

mod category;
pub mod records;
mod span;

pub use category::Category;
pub use records::{JudgmentRecord, TsvRecord, UseRecord};
pub use span::OffsetRange;
