//! Concrete scenarios against the user/login endpoints

pub mod login;
pub mod users;
