//! Argument access and text rendering shared by the backend providers.

use crate::http::BackendError;
use courier_domain::tool::{entities::ToolCall, value_objects::ToolError};

/// Required string argument; absence is an invalid-argument error
pub(crate) fn arg<'a>(call: &'a ToolCall, name: &str) -> Result<&'a str, ToolError> {
    call.require_string(name).map_err(ToolError::invalid_argument)
}

/// Required integer argument (numeric strings accepted)
pub(crate) fn int_arg(call: &ToolCall, name: &str) -> Result<i64, ToolError> {
    call.require_i64(name).map_err(ToolError::invalid_argument)
}

/// One rendered line per item
pub(crate) fn lines<T>(items: &[T], render: impl Fn(&T) -> String) -> String {
    items.iter().map(render).collect::<Vec<_>>().join("\n")
}

/// Comma-separated list, or `None` when empty
pub(crate) fn comma_list(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

impl From<BackendError> for ToolError {
    fn from(e: BackendError) -> Self {
        e.into_tool_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_errors_are_invalid_argument() {
        let call = ToolCall::new("search_jira").with_arg("limit", "x");
        assert_eq!(arg(&call, "jql_query").unwrap_err().code, "INVALID_ARGUMENT");
        assert_eq!(int_arg(&call, "limit").unwrap_err().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_comma_list() {
        assert_eq!(comma_list(&[]), "None");
        assert_eq!(comma_list(&["a".to_string(), "b".to_string()]), "a, b");
    }

    #[test]
    fn test_backend_error_converts() {
        let err: ToolError = BackendError::NotFound("Page 9".to_string()).into();
        assert_eq!(err.code, "NOT_FOUND");
        assert_eq!(err.to_text(), "Error: Not found: Page 9");
    }
}
