//! # Arena Room Server Library
//!
//! Authoritative server core for a room-based multiplayer snake arena.
//! Each room owns the canonical world state, ingests asynchronous client
//! intents, advances a deterministic fixed-rate simulation, and re-validates
//! every client-claimed interaction against true positions before mutating
//! anything.
//!
//! ## Architecture
//!
//! ### Fixed-step simulation
//! The room consumes wall-clock time through an accumulator and advances in
//! constant 1/60 s steps, so simulation behavior is independent of the
//! driver cadence. Within a step, players are processed sequentially in
//! join order; that ordering is an observable property of the design, not
//! an accident — a kill resolved for an earlier player shadows the later
//! claims of its victim in the same step.
//!
//! ### Server authority
//! Clients only propose interactions. An eat or kill claim names the
//! entities involved; the server re-derives the verdict from its own
//! positions with a coarse axis-aligned proximity test and silently drops
//! anything that fails. Nothing a client sends mutates state directly.
//!
//! ### Shared-nothing rooms
//! One room is owned by one task; nothing is shared between rooms, so no
//! locking discipline is needed inside the simulation. The transport layer
//! talks to the room exclusively through join/leave/enqueue and tick.
//!
//! ## Module organization
//!
//! - [`chain`] — follow-the-leader body chain math
//! - [`queue`] — per-player bounded FIFO intent buffers
//! - [`spawner`] — periodic food spawning and death-remains conversion
//! - [`state`] — the replicated world tree
//! - [`room`] — the authoritative room simulation
//! - [`client_manager`] — connection roster and timeout sweeping
//! - [`network`] — UDP transport and the driving select loop
//!
//! ## Usage example
//!
//! ```rust,no_run
//! use server::network::Server;
//! use server::room::RoomConfig;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new(
//!         "127.0.0.1:8080",
//!         Duration::from_millis(16), // 60Hz driver
//!         10,
//!         RoomConfig::default(),
//!     )
//!     .await?;
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod chain;
pub mod client_manager;
pub mod network;
pub mod queue;
pub mod room;
pub mod spawner;
pub mod state;
