//! # gate-supabase
//!
//! Supabase account backend for plus-gate: resolves access tokens to users and
//! reads the `plus` column of the profiles table. This crate never writes;
//! the flag is owned by Supabase.

pub mod backend;
pub mod config;

pub use backend::SupabaseBackend;
pub use config::{SupabaseConfig, DEFAULT_PROFILES_TABLE};
