//! Cadastro e busca de pontos de coleta de materiais recicláveis.

pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
