pub mod entry;
pub mod help;
