//! Realty AI - AI Capability Gateway for the Realty CRM
//!
//! This crate dispatches AI-backed capabilities (chat, property
//! recommendations, price prediction, market analysis, translation, image
//! analysis) to external providers and records an auditable trace of every
//! attempt, succeeding or not.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
