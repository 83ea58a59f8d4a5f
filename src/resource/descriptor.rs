//! Resource Descriptor
//!
//! Static description of how to address and decode one listable resource
//! collection. Every binding in [`crate::services`] declares one of these as
//! a `const` and hands it to [`super::ResourceApi`].

use crate::error::{Error, Result};
use crate::openstack::client::Service;
use reqwest::Method;
use serde_json::{Map, Value};

/// Whether a JSON body is wrapped under a key or sent/returned as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{"floatingips": [...]}` / `{"floatingip": {...}}`
    Wrapped,
    /// `[...]` / `{...}`
    Bare,
}

/// How filters and projections are spelled on the query string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStyle {
    /// `name=value`, repeated `fields=` (Neutron, Nova, Heat, Murano)
    Flat,
    /// positional `q.field` / `q.op` / `q.value` (Ceilometer)
    Triplets,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub service: Service,
    /// Collection path relative to the service endpoint, e.g. `v2.0/floatingips`
    pub base_path: &'static str,
    /// Envelope key of list responses, e.g. `floatingips`
    pub collection_key: &'static str,
    /// Envelope key of single-item bodies, e.g. `floatingip`
    pub item_key: &'static str,
    /// Fields kept in lightweight reference listings
    pub reference_fields: &'static [&'static str],
    /// Field holding the identifier (`alarm_id` for Ceilometer)
    pub id_field: &'static str,
    /// Field holding the display name (`stack_name` for Heat)
    pub name_field: &'static str,
    pub list_envelope: Envelope,
    pub item_envelope: Envelope,
    pub request_envelope: Envelope,
    pub query_style: QueryStyle,
    pub update_method: UpdateMethod,
    /// Key of the pagination links when it is not `<collection>_links`
    pub links_override: Option<&'static str>,
}

/// HTTP verb used by `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    Put,
    Patch,
}

impl UpdateMethod {
    pub fn as_method(&self) -> Method {
        match self {
            UpdateMethod::Put => Method::PUT,
            UpdateMethod::Patch => Method::PATCH,
        }
    }
}

impl ResourceDescriptor {
    /// A descriptor with the common OpenStack shape: everything wrapped,
    /// flat query parameters, `PUT` updates.
    pub const fn new(
        service: Service,
        base_path: &'static str,
        collection_key: &'static str,
        item_key: &'static str,
        reference_fields: &'static [&'static str],
    ) -> Self {
        Self {
            service,
            base_path,
            collection_key,
            item_key,
            reference_fields,
            id_field: "id",
            name_field: "name",
            list_envelope: Envelope::Wrapped,
            item_envelope: Envelope::Wrapped,
            request_envelope: Envelope::Wrapped,
            query_style: QueryStyle::Flat,
            update_method: UpdateMethod::Put,
            links_override: None,
        }
    }

    pub const fn id_field(mut self, field: &'static str) -> Self {
        self.id_field = field;
        self
    }

    pub const fn name_field(mut self, field: &'static str) -> Self {
        self.name_field = field;
        self
    }

    pub const fn list_envelope(mut self, envelope: Envelope) -> Self {
        self.list_envelope = envelope;
        self
    }

    pub const fn item_envelope(mut self, envelope: Envelope) -> Self {
        self.item_envelope = envelope;
        self
    }

    pub const fn request_envelope(mut self, envelope: Envelope) -> Self {
        self.request_envelope = envelope;
        self
    }

    pub const fn query_style(mut self, style: QueryStyle) -> Self {
        self.query_style = style;
        self
    }

    pub const fn update_method(mut self, method: UpdateMethod) -> Self {
        self.update_method = method;
        self
    }

    /// Read pagination links from `key` instead of `<collection>_links`
    /// (Heat uses a top-level `links`)
    pub const fn links_under(mut self, key: &'static str) -> Self {
        self.links_override = Some(key);
        self
    }

    /// Reject descriptors that cannot address anything
    pub fn validate(&self) -> Result<()> {
        if self.base_path.trim_matches('/').is_empty() {
            return Err(Error::Validation("resource base path is empty".to_string()));
        }
        if self.collection_key.is_empty() {
            return Err(Error::Validation(format!(
                "resource at {} has no collection key",
                self.base_path
            )));
        }
        Ok(())
    }

    /// Path of the collection
    pub fn collection_path(&self) -> String {
        self.base_path.trim_matches('/').to_string()
    }

    /// Path of one item. Each `/`-separated segment of `id` is
    /// percent-encoded on its own, so composite identities such as Heat's
    /// `stack_name/stack_id` address nested paths.
    pub fn item_path(&self, id: &str) -> String {
        let encoded: Vec<_> = id.split('/').map(urlencoding::encode).collect();
        format!("{}/{}", self.collection_path(), encoded.join("/"))
    }

    /// Key of the pagination links array, e.g. `floatingips_links`
    pub fn links_key(&self) -> String {
        match self.links_override {
            Some(key) => key.to_string(),
            None => format!("{}_links", self.collection_key),
        }
    }

    /// Unwrap the item array from a list response body
    pub fn unwrap_list(&self, body: Value) -> Result<Vec<Value>> {
        let items = match self.list_envelope {
            Envelope::Bare => body,
            Envelope::Wrapped => match body {
                Value::Object(mut map) => map.remove(self.collection_key).unwrap_or(Value::Null),
                _ => Value::Null,
            },
        };

        match items {
            Value::Array(items) => Ok(items),
            // An absent collection key is an empty page
            Value::Null => Ok(Vec::new()),
            other => Err(Error::UnexpectedShape(format!(
                "expected an array under '{}', got {}",
                self.collection_key,
                type_name(&other)
            ))),
        }
    }

    /// Unwrap a single item from a get/create/update response body
    pub fn unwrap_item(&self, body: Value) -> Result<Value> {
        match self.item_envelope {
            Envelope::Bare => Ok(body),
            Envelope::Wrapped => match body {
                Value::Object(mut map) => map.remove(self.item_key).ok_or_else(|| {
                    Error::UnexpectedShape(format!("response carried no '{}' object", self.item_key))
                }),
                other => Err(Error::UnexpectedShape(format!(
                    "expected an object, got {}",
                    type_name(&other)
                ))),
            },
        }
    }

    /// Wrap a request payload for create/update
    pub fn wrap_request(&self, payload: Value) -> Value {
        match self.request_envelope {
            Envelope::Bare => payload,
            Envelope::Wrapped => {
                let mut map = Map::new();
                map.insert(self.item_key.to_string(), payload);
                Value::Object(map)
            }
        }
    }

    /// Keep only the reference fields of an item
    pub fn project_reference(&self, item: &Value) -> Map<String, Value> {
        self.reference_fields
            .iter()
            .filter_map(|field| item.get(*field).map(|v| (field.to_string(), v.clone())))
            .collect()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
