pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod extract;
pub mod models;
pub mod resumes;
pub mod routes;
pub mod state;
