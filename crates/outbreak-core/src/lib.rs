//! Outbreak Core Types and Definitions
//!
//! This crate provides the foundational types shared by the outbreak
//! transmission-network tooling. It includes:
//!
//! - **Identifiers**: Efficient string-interned case identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Network**: Case nodes, transmission links and networks ([`network`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod network;
