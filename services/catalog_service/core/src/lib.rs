//! Catalog Service Core
//!
//! Domain entities, DTOs, and repository/service trait definitions for the
//! catalog ingestion-and-analytics engine. Zero infrastructure
//! dependencies: every `sqlx` type appearing here is a caller-managed
//! `Transaction` handle passed through trait signatures, never a live
//! connection this crate owns.
//!
//! ## Architecture
//!
//! - `domains/`: the unit tree, its per-category aggregate, the
//!   hierarchy closure table, and append-only price history.
//! - `dto/`: request/response bodies for the HTTP edge.
//! - `repositories/`: the store-adapter contract (spec §2 component 1).
//! - `services/`: the planner, executor, and orchestration-surface
//!   trait definitions (spec §2 components 4-6).

pub mod domains;
pub mod dto;
pub mod repositories;
pub mod services;

pub use shared_error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
