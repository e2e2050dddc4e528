pub mod search;

pub use search::SearchModels;
