//! Bone Runner - an endless runner with a small meta-economy
//!
//! Core modules:
//! - `sim`: Per-frame simulation (physics, spawning, collisions, run lifecycle)
//! - `economy`: Currency, purchasable powers, exchange
//! - `persistence`: Key-value store port with parse-to-zero reads
//! - `platform`: Browser/native clock, storage and interval timers
//! - `game`: Frame driver facade the platform layer talks to
//! - `tuning`: Data-driven game balance

pub mod economy;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use economy::{ExchangeOutcome, PowerKind};
pub use game::{FrameView, Game, PrimaryOutcome};
pub use highscores::HighScores;
pub use persistence::{MemoryStore, Store};
pub use tuning::Tuning;
