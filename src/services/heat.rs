//! Heat (orchestration) bindings: stacks.
//!
//! Heat wraps responses under `stack`/`stacks` but takes create bodies
//! unwrapped. Updates use `PATCH` so unset fields keep their current value.
//! Mutations address a stack by its full identity `stack_name/stack_id`;
//! see [`Stack::identity`].

use crate::error::{Error, Result};
use crate::openstack::client::{OpenStackClient, Service};
use crate::resource::{
    require, Envelope, PagedSequence, Payload, QueryOptions, ResourceApi, ResourceDescriptor,
    UpdateMethod,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub static STACKS: ResourceDescriptor = ResourceDescriptor::new(
    Service::Orchestration,
    "stacks",
    "stacks",
    "stack",
    &["id", "stack_name", "stack_status"],
)
.name_field("stack_name")
.request_envelope(Envelope::Bare)
.update_method(UpdateMethod::Patch)
.links_under("links");

crate::wire_enum! {
    /// `<ACTION>_<STATE>` as reported in `stack_status`
    pub enum StackStatus {
        InitInProgress => "INIT_IN_PROGRESS",
        InitComplete => "INIT_COMPLETE",
        InitFailed => "INIT_FAILED",
        CreateInProgress => "CREATE_IN_PROGRESS",
        CreateComplete => "CREATE_COMPLETE",
        CreateFailed => "CREATE_FAILED",
        UpdateInProgress => "UPDATE_IN_PROGRESS",
        UpdateComplete => "UPDATE_COMPLETE",
        UpdateFailed => "UPDATE_FAILED",
        DeleteInProgress => "DELETE_IN_PROGRESS",
        DeleteComplete => "DELETE_COMPLETE",
        DeleteFailed => "DELETE_FAILED",
        RollbackInProgress => "ROLLBACK_IN_PROGRESS",
        RollbackComplete => "ROLLBACK_COMPLETE",
        RollbackFailed => "ROLLBACK_FAILED",
        SuspendInProgress => "SUSPEND_IN_PROGRESS",
        SuspendComplete => "SUSPEND_COMPLETE",
        SuspendFailed => "SUSPEND_FAILED",
        ResumeInProgress => "RESUME_IN_PROGRESS",
        ResumeComplete => "RESUME_COMPLETE",
        ResumeFailed => "RESUME_FAILED",
        AdoptInProgress => "ADOPT_IN_PROGRESS",
        AdoptComplete => "ADOPT_COMPLETE",
        AdoptFailed => "ADOPT_FAILED",
        SnapshotInProgress => "SNAPSHOT_IN_PROGRESS",
        SnapshotComplete => "SNAPSHOT_COMPLETE",
        SnapshotFailed => "SNAPSHOT_FAILED",
        CheckInProgress => "CHECK_IN_PROGRESS",
        CheckComplete => "CHECK_COMPLETE",
        CheckFailed => "CHECK_FAILED",
    }
}

impl StackStatus {
    pub fn is_in_progress(&self) -> bool {
        self.is_recognized() && self.as_str().ends_with("_IN_PROGRESS")
    }

    pub fn is_failed(&self) -> bool {
        self.is_recognized() && self.as_str().ends_with("_FAILED")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackOutput {
    pub output_key: String,
    #[serde(default)]
    pub output_value: Value,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    pub id: String,
    /// Absent from the create response, which only carries `id` and `links`
    #[serde(default)]
    pub stack_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stack_status: Option<StackStatus>,
    #[serde(default)]
    pub stack_status_reason: Option<String>,
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub updated_time: Option<String>,
    #[serde(default)]
    pub disable_rollback: Option<bool>,
    #[serde(default)]
    pub timeout_mins: Option<u32>,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
    #[serde(default)]
    pub outputs: Vec<StackOutput>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Stack {
    /// `stack_name/stack_id`, the path Heat expects for update and delete
    pub fn identity(&self) -> String {
        if self.stack_name.is_empty() {
            self.id.clone()
        } else {
            format!("{}/{}", self.stack_name, self.id)
        }
    }
}

/// Body of `POST /stacks`.
///
/// `files` is always sent, as `{}` when no file was attached; every other
/// optional field is omitted unless set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateStack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, String>>,
    pub files: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_rollback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_mins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl Payload for CreateStack {
    fn validate(&self) -> Result<()> {
        require("stack_name", self.stack_name.as_deref())?;
        if self.template.is_none() && self.template_url.is_none() {
            return Err(Error::Validation(
                "one of template or template_url is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Body of `PATCH /stacks/{name}/{id}`; only set fields change
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateStack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_rollback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_mins: Option<u32>,
}

impl Payload for UpdateStack {}

/// Heat client
#[derive(Clone)]
pub struct HeatApi {
    client: OpenStackClient,
}

impl HeatApi {
    pub fn new(client: OpenStackClient) -> Self {
        Self { client }
    }

    pub fn stacks(&self) -> ResourceApi<Stack> {
        ResourceApi::new(self.client.clone(), &STACKS)
    }

    pub fn list_stacks(&self, options: QueryOptions) -> PagedSequence<Stack> {
        self.stacks().list_with(options)
    }
}
