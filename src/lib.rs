//! Startup Registry Harvester
//!
//! Sequential collection pipeline for a startup-registry directory: paginate
//! the search endpoint, fetch each startup's detail profile, extract its CIN
//! (corporate identification number), fetch the company-registry record for
//! that CIN, and persist the assembled document with idempotent upsert
//! semantics. One run summary is written per invocation.
//!
//! # Modules
//!
//! - `client`: HTTP client for the registry endpoints.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `errors`: Error handling types.
//! - `extract`: CIN extraction from schema-flexible profile documents.
//! - `models`: Core data models and run statistics.
//! - `pipeline`: Per-profile enrichment pipeline.
//! - `runner`: Page-range run controller.
//! - `storage`: Profile store trait and Postgres implementation.

pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod runner;
pub mod storage;
