mod common;
mod movie;
mod rental;
mod user;

pub use self::{common::*, movie::*, rental::*, user::*};
