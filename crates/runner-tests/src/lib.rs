#![allow(dead_code)]

pub mod utils;


/// Project name used by every fixture; the compiled trees are scoped by it.
pub const PROJECT_NAME: &str = "acme_analytics";
