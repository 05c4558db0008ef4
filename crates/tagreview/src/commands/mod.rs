//! Command implementations

pub mod review;
