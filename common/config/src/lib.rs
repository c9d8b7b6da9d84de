// Licensed under the Apache-2.0 license

//! Memory maps and transport settings for the SE mailbox drivers.
//!
//! Everything here is a `const` so that a firmware image bakes its platform
//! layout in at build time.

#![no_std]

mod memory_map;
pub use memory_map::*;

pub mod platforms;
