//! Typed Client Facade
//!
//! [`ResourceApi`] composes a [`ResourceDescriptor`], [`QueryOptions`],
//! pagination and the fallback rules into the canonical operations every
//! binding exposes: list, get, create, update and delete.

use super::descriptor::ResourceDescriptor;
use super::fallback::Operation;
use super::pagination::{paged, Page, PagedSequence};
use super::query::QueryOptions;
use crate::error::{Error, Result};
use crate::openstack::client::OpenStackClient;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// A request body for create or update.
///
/// Implementors serialize sparsely (unset fields are omitted, not nulled)
/// and check the fields the backend requires before anything is sent.
pub trait Payload: Serialize {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl Payload for Value {}

/// Fail with a validation error when a required field is unset or blank
pub fn require(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(Error::Validation(format!("{} is required", field))),
    }
}

/// Lightweight projection of a listed item onto its descriptor's reference fields
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    id_field: &'static str,
    name_field: &'static str,
    fields: Map<String, Value>,
}

impl Reference {
    pub fn new(descriptor: &ResourceDescriptor, item: &Value) -> Self {
        Self {
            id_field: descriptor.id_field,
            name_field: descriptor.name_field,
            fields: descriptor.project_reference(item),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.get_str(self.id_field)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str(self.name_field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_str())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

/// Operations on one resource collection, decoding items as `T`
pub struct ResourceApi<T> {
    client: OpenStackClient,
    descriptor: &'static ResourceDescriptor,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceApi<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            descriptor: self.descriptor,
            _item: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ResourceApi<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceApi")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl<T> ResourceApi<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub fn new(client: OpenStackClient, descriptor: &'static ResourceDescriptor) -> Self {
        Self {
            client,
            descriptor,
            _item: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    /// Fetch one raw page. No fallback is applied: a 404 is returned as an
    /// error so manual pagers can tell "absent" from "empty".
    pub async fn list_page_raw(&self, options: &QueryOptions) -> Result<Page<Value>> {
        self.descriptor.validate()?;
        let query = options.encode(self.descriptor.query_style);

        let response = self
            .client
            .request(
                Method::GET,
                self.descriptor.service,
                &self.descriptor.collection_path(),
                &query,
                None,
            )
            .await?;

        let page = Page::decode(self.descriptor, response.json()?)?;
        tracing::debug!(
            "{}: {} items, more={}",
            self.descriptor.collection_key,
            page.items.len(),
            !page.is_last()
        );
        Ok(page)
    }

    /// Fetch and decode one page
    pub async fn list_page(&self, options: &QueryOptions) -> Result<Page<T>> {
        self.list_page_raw(options).await?.into_typed()
    }

    /// Every item of the collection, fetched lazily page by page
    pub fn list(&self) -> PagedSequence<T> {
        self.list_with(QueryOptions::new())
    }

    /// Every item matching `options`, fetched lazily page by page
    pub fn list_with(&self, options: QueryOptions) -> PagedSequence<T> {
        let api = self.clone();
        paged(options, move |options| {
            let api = api.clone();
            async move { api.list_page(&options).await }
        })
    }

    /// Reference projections of every item matching `options`.
    ///
    /// Backends that support it are asked for the projection directly; the
    /// result is trimmed client-side either way.
    pub fn list_references(&self, options: QueryOptions) -> PagedSequence<Reference> {
        let options = self
            .descriptor
            .reference_fields
            .iter()
            .fold(options, |options, field| options.field(field));

        let api = self.clone();
        let descriptor = self.descriptor;
        paged(options, move |options| {
            let api = api.clone();
            async move { api.list_page_raw(&options).await }
        })
        .map_items(move |item| Reference::new(descriptor, &item))
    }

    /// One item by id; `None` when it does not exist
    pub async fn get(&self, id: &str) -> Result<Option<T>> {
        require("id", Some(id))?;
        Operation::Get.resolve(self.fetch_item(id).await)
    }

    async fn fetch_item(&self, id: &str) -> Result<T> {
        self.descriptor.validate()?;
        let response = self
            .client
            .request(
                Method::GET,
                self.descriptor.service,
                &self.descriptor.item_path(id),
                &[],
                None,
            )
            .await?;

        let body = response.json()?.ok_or_else(|| {
            Error::UnexpectedShape(format!("empty body for {} {}", self.descriptor.item_key, id))
        })?;
        Ok(serde_json::from_value(self.descriptor.unwrap_item(body)?)?)
    }

    /// Create an item; the returned value carries the server-assigned id
    pub async fn create<P: Payload>(&self, payload: &P) -> Result<T> {
        self.descriptor.validate()?;
        payload.validate()?;

        let body = self.descriptor.wrap_request(serde_json::to_value(payload)?);
        tracing::info!("Creating {} at {}", self.descriptor.item_key, self.descriptor.base_path);

        let response = self
            .client
            .request(
                Method::POST,
                self.descriptor.service,
                &self.descriptor.collection_path(),
                &[],
                Some(&body),
            )
            .await;

        let created = match Operation::Create.resolve(response)? {
            Some(response) => response.json()?,
            None => None,
        }
        .ok_or_else(|| {
            Error::UnexpectedShape(format!("create of {} returned no body", self.descriptor.item_key))
        })?;
        Ok(serde_json::from_value(self.descriptor.unwrap_item(created)?)?)
    }

    /// Partially update an item. Only fields set in `payload` are sent.
    ///
    /// Returns the updated item, or `None` when the backend acknowledges
    /// without a body (Heat answers `202 Accepted`).
    pub async fn update<P: Payload>(&self, id: &str, payload: &P) -> Result<Option<T>> {
        require("id", Some(id))?;
        self.descriptor.validate()?;
        payload.validate()?;

        let body = self.descriptor.wrap_request(serde_json::to_value(payload)?);
        tracing::info!("Updating {} {}", self.descriptor.item_key, id);

        let response = self
            .client
            .request(
                self.descriptor.update_method.as_method(),
                self.descriptor.service,
                &self.descriptor.item_path(id),
                &[],
                Some(&body),
            )
            .await;

        let body = match Operation::Update.resolve(response)? {
            Some(response) => response.json()?,
            None => None,
        };
        match body {
            Some(updated) => Ok(Some(serde_json::from_value(
                self.descriptor.unwrap_item(updated)?,
            )?)),
            None => Ok(None),
        }
    }

    /// Delete an item; `false` when it was already gone
    pub async fn delete(&self, id: &str) -> Result<bool> {
        require("id", Some(id))?;
        self.descriptor.validate()?;
        tracing::info!("Deleting {} {}", self.descriptor.item_key, id);

        let result = self
            .client
            .request(
                Method::DELETE,
                self.descriptor.service,
                &self.descriptor.item_path(id),
                &[],
                None,
            )
            .await;

        Ok(Operation::Delete.resolve(result)?.is_some())
    }
}
