//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the router.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Render target and not-found handling.
    pub render: RenderConfig,

    /// Where templates come from.
    pub views: ViewsConfig,

    /// Fragment conventions.
    pub navigation: NavigationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Render target configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Id of the element whose content is replaced.
    pub element_id: String,

    /// View rendered when nothing else can be.
    pub not_found_view: String,

    /// Literal written when the not-found view itself fails to load.
    pub fallback_text: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            element_id: "view".to_string(),
            not_found_view: "404".to_string(),
            fallback_text: "Page not found".to_string(),
        }
    }
}

/// Template location configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ViewsConfig {
    /// Base URL templates are resolved against (`http://`, `https://` or
    /// `file://`).
    pub base_url: String,

    /// Directory under the base holding the templates.
    pub templates_path: String,

    /// Template file extension, without the dot.
    pub extension: String,

    /// Load timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            templates_path: "views".to_string(),
            extension: "html".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Fragment conventions.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Fragment that simulates a form POST.
    pub post_marker: String,

    /// Path routed when the marker is active.
    pub post_path: String,

    /// Path used when the fragment is empty.
    pub default_path: String,

    /// Session storage key for stashed form data.
    pub stash_key: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            post_marker: "#post".to_string(),
            post_path: "post".to_string(),
            default_path: "/".to_string(),
            stash_key: "formData".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
