pub mod category;
pub mod file_formats;
pub mod formula;
pub mod ingredient;
pub mod request;
