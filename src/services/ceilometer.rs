//! Ceilometer (telemetry) bindings: alarms and meters.
//!
//! Ceilometer v2 returns bare JSON arrays and objects and filters with
//! positional `q.field`/`q.op`/`q.value` triplets. It has no marker links,
//! so every listing is a single page bounded by `limit`.

use crate::error::{Error, Result};
use crate::openstack::client::{OpenStackClient, Service};
use crate::resource::{
    require, Envelope, PagedSequence, Payload, QueryOptions, QueryStyle, ResourceApi,
    ResourceDescriptor,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub static ALARMS: ResourceDescriptor = ResourceDescriptor::new(
    Service::Metering,
    "v2/alarms",
    "alarms",
    "alarm",
    &["alarm_id", "name", "state", "enabled"],
)
.id_field("alarm_id")
.list_envelope(Envelope::Bare)
.item_envelope(Envelope::Bare)
.request_envelope(Envelope::Bare)
.query_style(QueryStyle::Triplets);

pub static METERS: ResourceDescriptor = ResourceDescriptor::new(
    Service::Metering,
    "v2/meters",
    "meters",
    "meter",
    &["meter_id", "name", "resource_id"],
)
.id_field("meter_id")
.list_envelope(Envelope::Bare)
.item_envelope(Envelope::Bare)
.query_style(QueryStyle::Triplets);

crate::wire_enum! {
    pub enum AlarmState {
        Ok => "ok",
        Alarm => "alarm",
        InsufficientData => "insufficient data",
    }
}

crate::wire_enum! {
    pub enum AlarmType {
        Threshold => "threshold",
        Combination => "combination",
    }
}

crate::wire_enum! {
    pub enum ComparisonOperator {
        Lt => "lt",
        Le => "le",
        Eq => "eq",
        Ne => "ne",
        Ge => "ge",
        Gt => "gt",
    }
}

crate::wire_enum! {
    pub enum Statistic {
        Max => "max",
        Min => "min",
        Avg => "avg",
        Sum => "sum",
        Count => "count",
    }
}

crate::wire_enum! {
    pub enum MeterType {
        Gauge => "gauge",
        Delta => "delta",
        Cumulative => "cumulative",
    }
}

/// One clause of an alarm's query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmQuery {
    pub field: String,
    #[serde(default = "default_op")]
    pub op: ComparisonOperator,
    pub value: String,
}

fn default_op() -> ComparisonOperator {
    ComparisonOperator::Eq
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub meter_name: String,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_operator: Option<ComparisonOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistic: Option<Statistic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_periods: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<AlarmQuery>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub alarm_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub state: AlarmState,
    #[serde(rename = "type")]
    pub alarm_type: AlarmType,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub state_timestamp: String,
    #[serde(default)]
    pub repeat_actions: bool,
    #[serde(default)]
    pub alarm_actions: Vec<String>,
    #[serde(default)]
    pub ok_actions: Vec<String>,
    #[serde(default)]
    pub insufficient_data_actions: Vec<String>,
    #[serde(default)]
    pub threshold_rule: Option<ThresholdRule>,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meter {
    #[serde(default)]
    pub meter_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub meter_type: MeterType,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Body of `POST /v2/alarms`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateAlarm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub alarm_type: Option<AlarmType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<AlarmState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_actions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insufficient_data_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_rule: Option<ThresholdRule>,
}

impl Payload for CreateAlarm {
    fn validate(&self) -> Result<()> {
        require("name", self.name.as_deref())?;
        match &self.alarm_type {
            None => Err(Error::Validation("type is required".to_string())),
            Some(AlarmType::Threshold) if self.threshold_rule.is_none() => Err(Error::Validation(
                "threshold_rule is required for threshold alarms".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }
}

/// Body of `PUT /v2/alarms/{id}`; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateAlarm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<AlarmState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_actions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_rule: Option<ThresholdRule>,
}

impl Payload for UpdateAlarm {}

/// Ceilometer client
#[derive(Clone)]
pub struct CeilometerApi {
    client: OpenStackClient,
}

impl CeilometerApi {
    pub fn new(client: OpenStackClient) -> Self {
        Self { client }
    }

    pub fn alarms(&self) -> ResourceApi<Alarm> {
        ResourceApi::new(self.client.clone(), &ALARMS)
    }

    pub fn list_alarms(&self) -> PagedSequence<Alarm> {
        self.alarms().list()
    }

    /// Meters are list-only: `GET /v2/meters/{name}` returns samples, not a meter
    pub fn list_meters(&self, options: QueryOptions) -> PagedSequence<Meter> {
        ResourceApi::<Meter>::new(self.client.clone(), &METERS).list_with(options)
    }

    /// Current state of an alarm; `None` if the alarm does not exist
    pub async fn alarm_state(&self, alarm_id: &str) -> Result<Option<AlarmState>> {
        require("alarm_id", Some(alarm_id))?;
        let path = format!("{}/state", ALARMS.item_path(alarm_id));
        let response = self
            .client
            .request(Method::GET, Service::Metering, &path, &[], None)
            .await;

        let state = match response {
            Ok(response) => response.json()?,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(state.and_then(|v| v.as_str().map(AlarmState::from_wire)))
    }

    /// Force an alarm into `state`; returns the state the server recorded
    pub async fn set_alarm_state(&self, alarm_id: &str, state: &AlarmState) -> Result<AlarmState> {
        require("alarm_id", Some(alarm_id))?;
        let path = format!("{}/state", ALARMS.item_path(alarm_id));
        let body = Value::String(state.as_str().to_string());
        tracing::info!("Setting alarm {} state to {}", alarm_id, state);

        let response = self
            .client
            .request(Method::PUT, Service::Metering, &path, &[], Some(&body))
            .await?;

        Ok(response
            .json()?
            .and_then(|v| v.as_str().map(AlarmState::from_wire))
            .unwrap_or_else(|| state.clone()))
    }
}
