mod movie;
mod user;

pub use movie::{Movie, MovieUpdate, NewMovie};
pub use user::{NewUser, User};
