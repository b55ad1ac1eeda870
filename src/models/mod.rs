pub mod category;
pub mod component;
pub mod plan;

pub use category::Category;
pub use component::{path_key, Component, ComponentContent};
pub use plan::{is_within, relocated_path, MoveOperation, MoveStatus, TableOfContents, TocEntry};
