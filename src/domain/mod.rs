pub mod action;
pub mod models;
pub mod pattern;
