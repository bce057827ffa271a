//! Domain types, business rules and the storage contract for HBnB.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`repository::Repository`]; the API layer
//! drives the domain through a [`manager::RepositoryManager`].

pub mod entity;
pub mod error;
pub mod manager;
pub mod record;
pub mod registry;
pub mod repository;

pub mod amenity;
pub mod city;
pub mod country;
pub mod place;
pub mod review;
pub mod user;

pub use error::{Error, Result};
