//! Core relay logic for Malipo.
//!
//! This crate contains pure domain logic with ZERO web or database dependencies.
//! The transaction ledger, its state machine, and input validation rules live here.
//!
//! # Modules
//!
//! - `ledger` - Status reconciliation store for payment attempts
//! - `phone` - Subscriber phone number validation and normalization

pub mod ledger;
pub mod phone;
