pub mod completions;
pub mod config;
pub mod durations;
pub mod history;
pub mod run;
pub mod timer;
