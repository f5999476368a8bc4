// UI Module
// Command-line stand-in for the input form and the result window

pub mod app;
pub mod cli;
pub mod input;
