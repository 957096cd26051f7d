//! Anara Admin library.
//!
//! This crate provides the admin panel functionality as a library,
//! allowing it to be tested and reused (the CLI uses it to create admin
//! accounts).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
