//! Core types, pure functions and traits for the product catalog.
//!
//! Everything in this crate is free of I/O: concrete storage and cache
//! backends live in the `catalog` binary crate and implement the traits
//! defined here.

pub mod cache;
pub mod catalog;
pub mod storage;
