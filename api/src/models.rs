use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub directory: DirectoryHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DirectoryHealth {
    pub reachable: bool,
    pub applications: usize,
}
