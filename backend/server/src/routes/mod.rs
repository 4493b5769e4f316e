pub mod auth;
pub mod cakes;
pub mod health;
pub mod orders;
pub mod users;
