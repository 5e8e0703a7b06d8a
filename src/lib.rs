//! Library exports for the tours application
//!
//! Tour and user document models with their validation rules and lifecycle
//! hooks, persisted in an embedded redb database and served over HTTP.

pub mod config;
pub mod database;
pub mod error;
pub mod handler;
pub mod model;
pub mod observer;
pub mod password;
pub mod query;
pub mod repository;
pub mod route;
pub mod slug;
pub mod stats;
pub mod validation;
