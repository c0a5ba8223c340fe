//! Portfolio content tooling: portable-text rendering, CMS access, RSS and
//! static build orchestration.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
