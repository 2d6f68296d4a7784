// src/core/mod.rs

pub mod catalog;
pub mod manager;
pub mod paths;
pub mod recommender;
pub mod requirements;
pub mod settings;
pub mod stamp;
pub mod tracker;
