//! The coordinator's game layer: rooms, the per-hand state machine, the
//! unmask coordinator, and settlement.
//!
//! Each room is a single-logical-thread state machine driven by one event
//! channel; proof verification and timers re-enter through that channel, so
//! room state is only ever touched between events.

pub mod dealing;
pub mod events;
pub mod registry;
pub mod room;
pub mod settle;
pub mod unmask;


pub use dealing::{community_indices, hole_indices};
pub use events::{MessageSink, RoomEvent, VerifyJob};
pub use registry::{RoomHandle, RoomRegistry};
pub use room::{Room, RoomConfig};
pub use settle::{settle_fold_win, settle_showdown, Settlement};
pub use unmask::{UnmaskTarget, UnmaskTracker};

pub type PlayerId = uuid::Uuid;
pub type RoomId = uuid::Uuid;
