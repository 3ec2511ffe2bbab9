//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - The Yahoo Finance implementation
//!
//! Providers receive their ticker at construction time; nothing about the
//! security being queried lives in module-level state.

mod traits;

pub mod yahoo;

pub use traits::MarketDataProvider;
