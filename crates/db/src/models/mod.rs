pub mod location;
pub mod movement;
pub mod user;
