//! Request and result types for user operations.

use crate::config::ResponseSchema;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Payload sent by `create_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: String,
    /// RFC 3339 UTC timestamp taken on the client when the payload is built.
    pub created_at: String,
}

impl NewUser {
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            role: role.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub(crate) fn to_json(&self) -> Value {
        json!({
            "email": self.email,
            "name": self.name,
            "role": self.role,
            "created_at": self.created_at,
        })
    }
}

/// Field name -> new value, sent as a PATCH body.
///
/// ```rust
/// use user_api_client::UserUpdate;
///
/// let update = UserUpdate::new().set("name", "Grace").set("active", false);
/// assert_eq!(update.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserUpdate {
    fields: Map<String, Value>,
}

impl UserUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Setting the same field twice keeps the last value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub(crate) fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for UserUpdate {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut update = Self::new();
        for (k, v) in iter {
            update.insert(k, v);
        }
        update
    }
}

/// Paging and filtering for `list_users`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUsersQuery {
    pub page: u32,
    pub per_page: u32,
    pub role: Option<String>,
}

impl Default for ListUsersQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            role: None,
        }
    }
}

impl ListUsersQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(ref role) = self.role {
            params.push(("role", role.clone()));
        }
        params
    }
}

/// One page of `list_users`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPage {
    pub items: Vec<Value>,
    /// Total reported by the server across all pages.
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    /// `ceil(total / per_page)`, independent of how many items this page holds.
    pub total_pages: u64,
}

impl UserPage {
    pub(crate) fn from_response(body: &Value, query: &ListUsersQuery, schema: &ResponseSchema) -> Self {
        let items = array_field(body, &schema.items_field);
        let total = body
            .get(&schema.total_field)
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
            .unwrap_or(0);
        let per_page = query.per_page.max(1);
        Self {
            items,
            total,
            page: query.page,
            per_page,
            total_pages: total.div_ceil(u64::from(per_page)),
        }
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }
}

/// Array under `field`, or empty when missing or not an array.
pub(crate) fn array_field(body: &Value, field: &str) -> Vec<Value> {
    body.get(field)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Loose truthiness used for server flags such as `deleted`.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
