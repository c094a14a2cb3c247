//! Client components whose operations are instrumented at construction time.

pub mod files;

pub use files::*;
