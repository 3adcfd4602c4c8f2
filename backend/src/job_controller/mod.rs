pub mod state;
pub mod status;
