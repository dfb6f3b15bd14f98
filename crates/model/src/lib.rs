pub mod cell;
pub mod error;
pub mod events;
pub mod grid;
pub mod pos;
pub mod range;
pub mod verify;
