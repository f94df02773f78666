// Library root: re-exports all modules so integration tests and the
// command-line front end can access the crate's public API.

pub mod bracket;
pub mod conference;
pub mod config;
pub mod db;
pub mod directory;
pub mod games;
pub mod repository;
pub mod series;
pub mod service;
