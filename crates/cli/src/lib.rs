pub mod args;
pub mod callback;
pub mod commands;
pub mod logging;
pub mod table;
