mod json_file;
mod store;
mod auth;
mod tasks;
mod templates;

pub use json_file::JsonFile;
pub use store::Store;
pub use tasks::DUE_DATE_FORMAT;
pub use templates::{escape_html, Templates};
