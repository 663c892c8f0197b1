//! Core module: the exchange-plan builder and course-matching engine

pub mod catalog;
pub mod config;
pub mod engine;
pub mod export;
pub mod models;
pub mod persistence;
