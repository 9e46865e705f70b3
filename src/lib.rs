// src/lib.rs
pub mod config;
pub mod context;
pub mod domain;
pub mod money;
pub mod persistence;
pub mod service;
pub mod sweeper;
pub mod web;

pub use domain::*;
pub use money::*;
