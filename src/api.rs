//! Upstream API clients.

pub mod openweather;

pub use openweather::{GeoLocation, HttpUpstream, OpenWeather};
