use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Doctors,
    Patients,
    Appointments,
}

impl Collection {
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Doctors => "doctors",
            Collection::Patients => "patients",
            Collection::Appointments => "appointments",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl FilterOp {
    /// PostgREST operator keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Gte => ordering != Ordering::Less,
        }
    }
}

/// A value a filter condition can compare against. Only types with an
/// infallible JSON form convert into one.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterValue(Value);

impl From<Uuid> for FilterValue {
    fn from(id: Uuid) -> Self {
        FilterValue(Value::String(id.to_string()))
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(instant: DateTime<Utc>) -> Self {
        FilterValue(Value::String(instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue(Value::String(s.to_string()))
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue(Value::String(s))
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue(Value::from(n))
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue(Value::Bool(b))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Condition {
    pub fn matches(&self, record: &Value) -> bool {
        record
            .get(&self.field)
            .and_then(|actual| compare_values(actual, &self.value))
            .map(|ordering| self.op.accepts(ordering))
            .unwrap_or(false)
    }
}

/// A conjunction of field conditions with an optional ascending sort key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
    order_by: Option<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.with(field, FilterOp::Eq, value)
    }

    pub fn lt(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.with(field, FilterOp::Lt, value)
    }

    pub fn lte(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.with(field, FilterOp::Lte, value)
    }

    pub fn gt(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.with(field, FilterOp::Gt, value)
    }

    pub fn gte(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.with(field, FilterOp::Gte, value)
    }

    pub fn order_by(mut self, field: &str) -> Self {
        self.order_by = Some(field.to_string());
        self
    }

    fn with(mut self, field: &str, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        let FilterValue(value) = value.into();
        self.conditions.push(Condition {
            field: field.to_string(),
            op,
            value,
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.conditions.iter().all(|condition| condition.matches(record))
    }
}

/// Orders two stored values. RFC 3339 strings compare as instants so that
/// range filters on timestamps are offset-independent.
pub fn compare_values(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => {
            match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
                (Ok(a), Ok(b)) => Some(a.cmp(&b)),
                _ => Some(a.cmp(b)),
            }
        }
        _ => None,
    }
}

/// Document store collaborator. Records travel as JSON documents carrying an
/// `id` field; callers own (de)serialization into their typed models.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, collection: Collection, record: Value) -> StoreResult<Value>;

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Value>>;

    async fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Value>>;

    async fn update(&self, collection: Collection, id: Uuid, patch: Value) -> StoreResult<Option<Value>>;

    async fn delete(&self, collection: Collection, id: Uuid) -> StoreResult<bool>;
}
