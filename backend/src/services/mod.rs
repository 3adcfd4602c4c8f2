pub mod attachments;
pub mod data_sources;
pub mod mail;
pub mod merge;
pub mod templates;
