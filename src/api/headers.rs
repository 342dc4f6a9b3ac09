//! Alert headers attached to resource responses

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use crate::domain::DomainError;

/// Header carrying the reason a request was refused
pub const FAILURE_HEADER: &str = "Failure";

/// Builds the `X-{app}-alert` / `X-{app}-params` header pairs
#[derive(Debug, Clone)]
pub struct HeaderUtil {
    alert_header: HeaderName,
    params_header: HeaderName,
}

impl HeaderUtil {
    /// Create header builders for the given application name
    pub fn new(application_name: &str) -> Result<Self, DomainError> {
        let alert_header = header_name(&format!("X-{}-alert", application_name))?;
        let params_header = header_name(&format!("X-{}-params", application_name))?;

        Ok(Self {
            alert_header,
            params_header,
        })
    }

    pub fn alert_header(&self) -> &HeaderName {
        &self.alert_header
    }

    pub fn params_header(&self) -> &HeaderName {
        &self.params_header
    }

    /// Alert message plus its parameter
    pub fn alert(&self, message: &str, param: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        insert(&mut headers, self.alert_header.clone(), message);
        insert(&mut headers, self.params_header.clone(), param);
        headers
    }

    pub fn entity_creation_alert(&self, entity_name: &str, param: &str) -> HeaderMap {
        self.alert(
            &format!("A new {} is created with identifier {}", entity_name, param),
            param,
        )
    }

    pub fn entity_update_alert(&self, entity_name: &str, param: &str) -> HeaderMap {
        self.alert(
            &format!("A {} is updated with identifier {}", entity_name, param),
            param,
        )
    }

    pub fn entity_deletion_alert(&self, entity_name: &str, param: &str) -> HeaderMap {
        self.alert(
            &format!("A {} is deleted with identifier {}", entity_name, param),
            param,
        )
    }
}

/// `Failure: {message}` header for refused requests
pub fn failure_alert(message: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, HeaderName::from_static("failure"), message);
    headers
}

fn header_name(name: &str) -> Result<HeaderName, DomainError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        DomainError::configuration(format!("Invalid alert header name '{}': {}", name, e))
    })
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(e) => warn!(header = %name, error = %e, "Dropping header with invalid value"),
    }
}
