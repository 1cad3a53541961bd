use serde::Serialize;

/// Envelope used by the CRUD, search and summary endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }
}

impl ApiResponse<()> {
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Error,
}

/// Envelope kept by the analysis endpoint, which existing clients read as
/// `{status: "success" | "error", ...}`.
#[derive(Debug, Serialize)]
pub struct ReportResponse<T> {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
}

impl<T> ReportResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Success,
            data: Some(data),
            message: message.into(),
        }
    }
}

impl ReportResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Error,
            data: None,
            message: message.into(),
        }
    }
}
