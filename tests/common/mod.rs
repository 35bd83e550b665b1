//! Shared test infrastructure for integration tests
//!
//! This module provides utilities for running tests against a real on-disk
//! store and a fake Discogs API:
//! - Fixtures: catalog entries and temporary stores
//! - Fakes: in-process fetchers and a call-counting store wrapper
//! - Server: a fake Discogs API on a random port

#![allow(dead_code)]

mod constants;
mod fakes;
mod fixtures;
mod server;

pub use constants::*;
pub use fakes::{CountingStore, FakeFetcher};
pub use fixtures::{entry, entry_with_artist, TestStore};
pub use server::FakeDiscogsServer;
