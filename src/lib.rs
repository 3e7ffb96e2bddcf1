#[macro_use]
extern crate lazy_static;

pub mod error;
pub use error::Error;

pub mod app;

pub mod flash;

pub mod forms;

pub mod models;

pub mod views;

pub mod services;

pub mod db;
