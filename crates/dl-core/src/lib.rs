//! # dl-core
//!
//! Core types, metric math, and error types for DataLink.
//!
//! This crate provides the foundational types shared across all DataLink crates:
//! - Entity structs for the business tables (customers, deals, inventory, etc.)
//! - Status and stage enums stored as their display labels
//! - Record code prefixes and formatting helpers
//! - KPI, growth-rate, trend, and pipeline computations (pure, no I/O)
//! - The category catalog and the per-session navigation context
//! - Result-set and report types returned by the store and rendered by the CLI
//! - Cross-cutting error types

pub mod codes;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod kpi;
pub mod navigation;
pub mod pipeline;
pub mod responses;
pub mod session;
