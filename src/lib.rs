/*
 * Responsibility
 * - crate の公開 module 一覧 (binary と integration test から使う)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod security;
pub mod services;
pub mod state;
