//! Convert Everlance mileage exports into MileIQ import CSV.

pub mod converter;
pub mod error;
pub mod fmt;
pub mod logging;
pub mod models;
pub mod settings;
