//! Core runtime modules

pub mod config;
