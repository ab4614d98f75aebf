//! Generated site files.

pub mod sitemap;
