//! Utility modules shared by the compiler and generators.

pub mod minify;
