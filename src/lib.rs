// src/lib.rs

//! Race results library: Grand Prix classification extraction from
//! Wikipedia race reports.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod services;
pub mod utils;
