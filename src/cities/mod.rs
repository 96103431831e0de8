pub mod directory;
pub mod error;
