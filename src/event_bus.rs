//! Event bus for view-model to front-end communication.
//!
//! Design principles:
//! - Broadcast channel (tokio) - all subscribers receive every event
//! - The front-end drains pending events once per input cycle
//! - Type-safe event enums
//!
//! This module provides shared utilities. Each panel defines its own
//! event types in its events.rs module.

/// Broadcast channel capacity.
/// Lagging receivers will skip old events (we only care about latest).
pub const CHANNEL_CAPACITY: usize = 64;
