// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for overlay drivers and tools.
//! Keeps host adapters free of storage concerns.

pub mod config;
mod memory;

pub use memory::InMemoryConfigStore;
