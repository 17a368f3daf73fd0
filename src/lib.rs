//! Lend Circle - Peer-to-Peer Item Lending Marketplace
//!
//! This crate implements the domain lifecycle engine for a lending
//! marketplace: item listings offered by sharers, reservation requests
//! filed by borrowers, and the capability, persistence and event
//! plumbing that ties them together.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
