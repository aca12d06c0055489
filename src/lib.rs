//! Registro de vehículos por VIN
//!
//! Servicio CRUD sobre una única tabla: validación y normalización de los
//! datos de entrada, persistencia en PostgreSQL (o en memoria) y API HTTP.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
