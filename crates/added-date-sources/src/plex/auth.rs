use crate::error::SourceError;
use reqwest::{Response, StatusCode};

/// Map a non-success status to a `SourceError`, passing successful responses through
pub fn check_status(response: Response, context: &str) -> Result<Response, SourceError> {
    classify_status(response.status(), context)?;
    Ok(response)
}

pub fn classify_status(status: StatusCode, context: &str) -> Result<(), SourceError> {
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SourceError::Unauthorized {
            status: status.as_u16(),
        });
    }

    Err(SourceError::Status {
        context: context.to_string(),
        status: status.as_u16(),
    })
}

/// Connection refused and timeouts mean the server is unreachable;
/// anything else is a failed request
pub fn classify_transport_error(err: reqwest::Error, server_url: &str, context: &str) -> SourceError {
    if err.is_connect() || err.is_timeout() {
        SourceError::Unreachable {
            url: server_url.to_string(),
            reason: err.to_string(),
        }
    } else {
        SourceError::Request {
            context: context.to_string(),
            reason: err.to_string(),
        }
    }
}
