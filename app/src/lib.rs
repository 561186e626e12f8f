// foodtruck/src/lib.rs

//! Food truck ordering service: menu and schedule queries, order submission
//! with saga-style compensation, card payments through Square, webhook-driven
//! catalog sync, customer reviews, a photo gallery, a blog and a small admin
//! surface.

pub mod config;
pub mod domain;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;
