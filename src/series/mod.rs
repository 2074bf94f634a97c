//! Series module - one-dimensional results aligned to a frame's row index

pub mod base;

pub use base::Series;
