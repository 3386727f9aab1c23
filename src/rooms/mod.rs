pub mod registry;

pub use registry::RoomRegistry;
