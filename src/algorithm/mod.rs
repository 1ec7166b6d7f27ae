//! Algorithms over animal collections

pub mod ownership;
