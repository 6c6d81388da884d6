//! Label types for Prometheus metrics

use prometheus_client::encoding::EncodeLabelSet;

/// Per-endpoint labels, mirroring the `"METHOD PATH"` endpoint key
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct EndpointLabels {
    pub method: String,
    pub path: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct StatusLabels {
    pub status: String,
}

impl StatusLabels {
    pub fn new(status: u16) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}
