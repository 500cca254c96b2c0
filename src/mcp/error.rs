//! Error types for tool dispatch

use thiserror::Error;

/// A tool call rejected before any work started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required argument '{0}'")]
    MissingArgument(String),

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },
}

impl ToolError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<ToolError> for rmcp::Error {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::UnknownTool(_) => rmcp::Error::invalid_request(err.to_string(), None),
            ToolError::MissingArgument(_) | ToolError::InvalidArgument { .. } => {
                rmcp::Error::invalid_params(err.to_string(), None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn test_messages() {
        assert_eq!(
            ToolError::UnknownTool("scrape".to_string()).to_string(),
            "Unknown tool: scrape"
        );
        assert_eq!(
            ToolError::MissingArgument("url".to_string()).to_string(),
            "Missing required argument 'url'"
        );
        assert_eq!(
            ToolError::invalid("max_depth", "expected a non-negative integer").to_string(),
            "Invalid argument 'max_depth': expected a non-negative integer"
        );
    }

    #[test]
    fn test_rmcp_error_codes() {
        let unknown: rmcp::Error = ToolError::UnknownTool("x".to_string()).into();
        assert_eq!(unknown.code, ErrorCode::INVALID_REQUEST);

        let missing: rmcp::Error = ToolError::MissingArgument("url".to_string()).into();
        assert_eq!(missing.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(missing.message, "Missing required argument 'url'");
    }
}
