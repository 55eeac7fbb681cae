//! Customs Duty and Import GST Calculation Engine
//!
//! This crate calculates the duty and GST payable on imported goods: general
//! and FTA preferential duty resolved through the tariff code hierarchy, TCO
//! exemptions, additive anti-dumping measures and GST on the duty-inclusive
//! value, with a step-by-step explanation of every calculation.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod repository;
