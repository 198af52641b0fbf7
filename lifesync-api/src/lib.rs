//! # LifeSync API Server Library
//!
//! HTTP layer for LifeSync: configuration, routing, authentication
//! middleware and error mapping. Persistence and auth primitives live in
//! `lifesync-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from the environment
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validated JSON body extractor
//! - `middleware`: Authentication and security headers
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
