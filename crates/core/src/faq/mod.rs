pub mod catalog;
pub mod category;

pub use catalog::{FaqCatalog, FaqEntry, KeywordRule};
pub use category::FaqCategory;
