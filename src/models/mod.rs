pub mod room;
pub mod user;

pub use room::{IndexQuery, LoginQuery, RedirectQuery, RoomPage};
pub use user::{IdTokenClaims, Identity};
