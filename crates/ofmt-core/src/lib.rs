//! Core library for `ofmt`: an owned OpenAPI 3.x document model plus the two
//! document reductions the tool performs — stripping vendor extensions and
//! extracting a self-contained sub-document for a subset of paths.

pub mod config;
pub mod error;
pub mod parse;
pub mod transform;
