pub mod convert;
pub mod languages;
