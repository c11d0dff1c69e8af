//! Client configuration model.
//!
//! Every field has a serde default so that a partial (or missing) `config.toml`
//! still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_CREATE_IMAGE_MAX_BYTES: u64 = 500 * 1024;
pub const DEFAULT_EDIT_IMAGE_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Root configuration for the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Refresh period of an open message thread.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default)]
    pub upload: UploadLimits,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        // A zero interval would spin the poll task.
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            upload: UploadLimits::default(),
        }
    }
}

/// Which flow an image is attached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPurpose {
    /// Publishing a new item.
    Create,
    /// Replacing the image of an existing item.
    Edit,
}

/// Size ceilings for item images, checked before anything is sent.
///
/// Publishing and editing historically used different ceilings (500 KiB and
/// 5 MiB). Both are kept as defaults and both are configurable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadLimits {
    #[serde(default = "default_create_max_bytes")]
    pub create_max_bytes: u64,
    #[serde(default = "default_edit_max_bytes")]
    pub edit_max_bytes: u64,
}

impl UploadLimits {
    pub fn max_bytes(&self, purpose: UploadPurpose) -> u64 {
        match purpose {
            UploadPurpose::Create => self.create_max_bytes,
            UploadPurpose::Edit => self.edit_max_bytes,
        }
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            create_max_bytes: default_create_max_bytes(),
            edit_max_bytes: default_edit_max_bytes(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_create_max_bytes() -> u64 {
    DEFAULT_CREATE_IMAGE_MAX_BYTES
}

fn default_edit_max_bytes() -> u64 {
    DEFAULT_EDIT_IMAGE_MAX_BYTES
}
