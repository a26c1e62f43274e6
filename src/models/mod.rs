pub mod audit;
pub mod game;
pub mod user;
