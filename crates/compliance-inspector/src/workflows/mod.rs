pub mod import;
pub mod inspection;
