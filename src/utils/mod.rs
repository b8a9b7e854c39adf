// Utilities

pub mod file;
pub mod slug;

pub use file::FileUtils;
pub use slug::slugify;
