//! Runtime Layer
//!
//! Binds a battle flow to real time and a command channel.
//! This layer is **non-deterministic** - all battle logic runs through `battle/`.

pub mod protocol;
pub mod driver;

pub use protocol::{PlayerCommand, ViewUpdate, BattleView};
pub use driver::{run_flow, DriverConfig};
