//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for photo storage and outbound report notifications.

pub mod notification;
pub mod storage;
