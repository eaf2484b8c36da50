// Library surface for the binary, headless tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod bank;
pub mod config;
pub mod error;
pub mod generator;
pub mod hint;
pub mod history;
pub mod ordering;
pub mod question;
pub mod results;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod shuffle;
pub mod timer;
pub mod ui;
pub mod util;
