// Core modules implementing loading, indexing, pagination, and error modeling.
pub mod cursor;
pub mod dataset;
pub mod error;
pub mod index;
pub mod page;
pub mod summary;
