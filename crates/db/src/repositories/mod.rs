//! Repositories over [`Store`](crate::Store).
//!
//! Repositories hold no state. They validate input, call the store, and turn
//! "absent"/"already exists" answers into [`CoreError`](huecos_core::error::CoreError)s.

pub mod location_repo;
pub mod movement_recorder;
pub mod user_repo;

pub use location_repo::LocationRepo;
pub use movement_recorder::MovementRecorder;
pub use user_repo::UserRepo;
