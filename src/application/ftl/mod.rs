//! Application - Basic FTL (component H)
//!
//! A minimal flash translation layer: it maps a logical block address
//! space onto the physical blocks that aren't bad, retrying and
//! torture-testing on failure. It deliberately does not do wear
//! leveling or garbage collection beyond that.

pub mod basic;

pub use basic::{BasicFtl, BasicFtlFlags};
