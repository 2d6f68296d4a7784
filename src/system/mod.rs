//! # System Interaction Layer
//!
//! This module is the boundary between the core application logic and the
//! operating system's process management.
//!
//! ## Modules
//!
//! - **`executor`**: Spawns external processes for the two collaborator
//!   boundaries of this tool: invoking the AI CLI (output captured) and
//!   registering remote integrations (output passed through).

pub mod executor;
