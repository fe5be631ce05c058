//! Core error types for gesturelaunch-core.
//!
//! This module defines the error hierarchy using thiserror. Most failures in
//! the gesture pipeline are recoverable: the caller logs them, keeps the
//! previous good state and retries on the next trigger.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for gesturelaunch-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persisted shortcut cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Shortcut scan errors
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Launch errors
    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),

    /// Overlay attachment errors
    #[error("Overlay error: {0}")]
    Overlay(#[from] OverlayError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Errors from the durable layer of the shortcut index.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to read/write shortcut cache: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse shortcut cache: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Cache store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while enumerating launch targets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The platform query service could not be reached at all.
    #[error("Shortcut service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A single entry could not be resolved.
    #[error("Failed to resolve entry '{entry}': {message}")]
    Entry { entry: String, message: String },

    /// The caller lacks permission to query this package.
    #[error("Permission denied for package {0}")]
    PermissionDenied(String),
}

/// Errors reported by the launch collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// The target package is no longer installed.
    #[error("Package not installed: {0}")]
    NotInstalled(String),

    /// The shortcut was removed or disabled by its publisher.
    #[error("Shortcut revoked: {0}")]
    ShortcutRevoked(String),

    /// The platform refused the launch.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Launch failed: {0}")]
    Other(String),
}

/// Overlay presentation errors. Attachment failure is fatal for a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    #[error("Failed to attach overlay: {0}")]
    AttachFailed(String),

    #[error("Overlay session already stopped")]
    Stopped,
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Sensitivity thresholds must be finite and strictly positive.
    #[error("Invalid sensitivity for axis {axis}: {value} (must be > 0)")]
    InvalidSensitivity { axis: char, value: f32 },

    /// Unknown gesture name
    #[error("Unknown gesture: {0}")]
    UnknownGesture(String),

    /// Malformed shortcut id
    #[error("Malformed shortcut id: {0}")]
    MalformedShortcutId(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
