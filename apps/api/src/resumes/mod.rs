pub mod crud;
pub mod handlers;
pub mod ownership;
pub mod sections;
pub mod service;
