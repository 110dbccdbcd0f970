use reqwest::StatusCode;

/// Failures talking to the Wit.ai or BadgerChat services.
///
/// Every variant is recovered at the turn boundary; none of these abort the
/// session.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {service} failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("malformed response from {service}: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_the_service() {
        let err = ApiError::Status {
            service: "wit.ai",
            status: StatusCode::UNAUTHORIZED,
            body: "bad token".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "wit.ai returned status 401 Unauthorized: bad token"
        );
    }

    #[test]
    fn malformed_error_carries_the_reason() {
        let err = ApiError::Malformed {
            service: "badgerchat",
            reason: "expected array".to_string(),
        };
        assert!(err.to_string().contains("expected array"));
        assert!(err.to_string().contains("badgerchat"));
    }
}
