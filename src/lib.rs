//! PayEase payroll and authentication engine.
//!
//! This crate provides the domain core of the PayEase HR system: payroll
//! validation, net salary calculation and payroll status lifecycle, account
//! authentication with lockout, and employee record management. Persistence
//! and password hashing sit behind traits so a host application can plug in
//! its own store; an in-memory store ships with the crate.

#![warn(missing_docs)]

pub mod auth;
pub mod calculation;
pub mod config;
pub mod employees;
pub mod error;
pub mod locks;
pub mod models;
pub mod payroll;
pub mod store;
