pub mod index;
pub mod summarize;
pub mod upload;
