pub mod desk;
pub mod login;
pub mod quote;
pub mod setup;
pub mod ui;
