//! Operation domain entities

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Operation identifier, assigned by the repository on first save
///
/// Any `i64` is accepted so that ids arriving from clients reach the
/// resource unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(i64);

impl OperationId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for OperationId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<OperationId> for i64 {
    fn from(id: OperationId) -> Self {
        id.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A label attached to operations (many-to-many)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Label {
    #[serde(default)]
    pub id: Option<i64>,

    #[validate(length(min = 3))]
    pub label: String,
}

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// A bank account operation
///
/// `id` stays `None` until the repository persists the operation. Field
/// constraints are declared with `validator` and checked before a request
/// reaches the resource handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    id: Option<OperationId>,

    #[serde(default)]
    #[validate(required(message = "date is required"))]
    date: Option<DateTime<Utc>>,

    #[serde(default)]
    #[validate(length(max = 255))]
    description: Option<String>,

    #[serde(default)]
    #[validate(required(message = "amount is required"))]
    amount: Option<f64>,

    #[serde(default)]
    bank_account_id: Option<i64>,

    #[serde(default)]
    #[validate(nested)]
    labels: Vec<Label>,
}

impl Operation {
    /// Create a new, not yet persisted operation
    pub fn new(date: DateTime<Utc>, amount: f64) -> Self {
        Self {
            id: None,
            date: Some(date),
            description: None,
            amount: Some(amount),
            bank_account_id: None,
            labels: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: OperationId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_bank_account(mut self, bank_account_id: i64) -> Self {
        self.bank_account_id = Some(bank_account_id);
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    // Getters

    pub fn id(&self) -> Option<OperationId> {
        self.id
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn bank_account_id(&self) -> Option<i64> {
        self.bank_account_id
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Set the repository-assigned identifier
    pub fn assign_id(&mut self, id: OperationId) {
        self.id = Some(id);
    }
}
