// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors.
//!
//! Interaction handling is infallible: absent references degrade to no-ops.
//! The only fallible surface is reading configuration from string
//! attributes.

use alloc::string::String;

/// Failure to interpret a configuration attribute.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A boolean attribute held something other than `true`, `false`, or nothing.
    #[error("attribute `{name}` expects a boolean, got `{value}`")]
    InvalidBool {
        /// Attribute name.
        name: String,
        /// Offending value.
        value: String,
    },
    /// Unrecognized direction keyword.
    #[error("unknown direction `{0}` (expected up, down, start, end, left or right)")]
    UnknownDirection(String),
    /// Unrecognized menu role keyword.
    #[error("unknown menu role `{0}` (expected menu or listbox)")]
    UnknownMenuRole(String),
}
