pub mod demo;
pub mod lifetime;
