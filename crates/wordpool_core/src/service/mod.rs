//! Use-case services.
//!
//! # Responsibility
//! - Compute and register reminders from the pool and the settings window.
//! - Orchestrate repository commands for the app screens.
//!
//! # Invariants
//! - The scheduler only reads repository state.
//! - Services never touch the key-value store directly.

pub mod reminder_scheduler;
pub mod word_service;
