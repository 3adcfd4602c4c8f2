pub mod csv;
pub mod datasource;
pub mod merge;
pub mod options;
pub mod place_holder;
pub mod record;
pub mod template;
