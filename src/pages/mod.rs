pub mod generator;
pub mod profile;
