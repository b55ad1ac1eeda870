//! Component discovery and content loading

pub mod loader;
pub mod scanner;

pub use loader::{ContentBudget, ContentLoader};
pub use scanner::{ComponentIter, ComponentScanner, ScanStats, DOCUMENTATION_FILE};
