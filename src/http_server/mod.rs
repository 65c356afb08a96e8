pub mod app;
mod error;
mod flash;
mod forms;
mod pages;
mod routes;
pub mod state;
