//! Integration tests for the OpenStack bindings using wiremock
//!
//! These tests drive the typed facade against mocked service endpoints,
//! covering pagination, query encoding, request bodies and the not-found
//! fallbacks.

use futures::TryStreamExt;
use osapi::resource::{QueryOptions, ResourceApi};
use osapi::services::ceilometer::{AlarmState, CeilometerApi};
use osapi::services::heat::{CreateStack, HeatApi};
use osapi::services::neutron::{CreateFloatingIp, NeutronApi, UpdateFloatingIp, FLOATING_IPS};
use osapi::{Error, OpenStackClient, Service};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MARKER: &str = "16dba3bc-f3fa-4775-afdc-237e12c72f6a";

fn client_for(server: &MockServer, service: Service) -> OpenStackClient {
    OpenStackClient::with_token("test-token", BTreeMap::new())
        .expect("client should build")
        .with_endpoint(service, &server.uri())
}

fn floating_ip(id: &str, address: &str) -> Value {
    json!({
        "id": id,
        "floating_ip_address": address,
        "floating_network_id": "376da547-b977-4cfe-9cba-275c80debf57",
        "status": "ACTIVE",
        "port_id": null
    })
}

/// Mount two pages of floating IPs; page one links to page two by marker
async fn mount_two_floating_ip_pages(server: &MockServer) {
    let next = format!("{}/v2.0/floatingips?limit=2&marker={}", server.uri(), MARKER);

    Mock::given(method("GET"))
        .and(path("/v2.0/floatingips"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "floatingips": [
                floating_ip("2f245a7b-796b-4f26-9cf9-9e82d248fda7", "172.24.4.228"),
                floating_ip(MARKER, "172.24.4.229")
            ],
            "floatingips_links": [{"href": next, "rel": "next"}]
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2.0/floatingips"))
        .and(query_param("marker", MARKER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "floatingips": [
                floating_ip("61cea855-49cb-4846-997d-801b70c71bdd", "172.24.4.230"),
                floating_ip("898b198e-49f7-47d6-a7e1-53f626a548e6", "172.24.4.231")
            ],
            "floatingips_links": [
                {"href": format!("{}/v2.0/floatingips?marker=x&page_reverse=True", server.uri()), "rel": "previous"}
            ]
        })))
        .expect(1)
        .mount(server)
        .await;
}

mod pagination_tests {
    use super::*;

    /// Two linked pages yield four items in order with exactly two requests
    #[tokio::test]
    async fn test_list_follows_next_link() {
        let server = MockServer::start().await;
        mount_two_floating_ip_pages(&server).await;

        let neutron = NeutronApi::new(client_for(&server, Service::Network));
        let ips = neutron
            .list_floating_ips(QueryOptions::new())
            .try_collect_all()
            .await
            .expect("listing should succeed");

        let addresses: Vec<_> = ips
            .iter()
            .filter_map(|ip| ip.floating_ip_address.as_deref())
            .collect();
        assert_eq!(
            addresses,
            ["172.24.4.228", "172.24.4.229", "172.24.4.230", "172.24.4.231"]
        );
    }

    /// The lazy listing equals manual page-by-page concatenation
    #[tokio::test]
    async fn test_lazy_listing_matches_manual_pages() {
        let server = MockServer::start().await;
        let next = format!("{}/v2.0/floatingips?marker={}", server.uri(), MARKER);

        Mock::given(method("GET"))
            .and(path("/v2.0/floatingips"))
            .and(query_param_is_missing("marker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "floatingips": [floating_ip(MARKER, "10.0.0.1")],
                "floatingips_links": [{"href": next, "rel": "next"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2.0/floatingips"))
            .and(query_param("marker", MARKER))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "floatingips": [floating_ip("b", "10.0.0.2")]
            })))
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();

        let mut manual = Vec::new();
        let mut options = QueryOptions::new();
        loop {
            let page = api.list_page(&options).await.expect("page should load");
            manual.extend(page.items);
            match page.next_marker {
                Some(marker) => options = options.with_marker(&marker),
                None => break,
            }
        }

        let lazy = api.list().try_collect_all().await.expect("listing should succeed");
        assert_eq!(lazy, manual);
        assert_eq!(lazy.len(), 2);
    }

    /// Stopping early does not request further pages
    #[tokio::test]
    async fn test_no_fetch_beyond_consumption() {
        let server = MockServer::start().await;
        let next = format!("{}/v2.0/floatingips?marker={}", server.uri(), MARKER);

        Mock::given(method("GET"))
            .and(path("/v2.0/floatingips"))
            .and(query_param_is_missing("marker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "floatingips": [floating_ip("a", "10.0.0.1")],
                "floatingips_links": [{"href": next, "rel": "next"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2.0/floatingips"))
            .and(query_param("marker", MARKER))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"floatingips": []})))
            .expect(0)
            .mount(&server)
            .await;

        let neutron = NeutronApi::new(client_for(&server, Service::Network));
        let mut ips = neutron.list_floating_ips(QueryOptions::new());
        let first = ips.try_next().await.expect("first page should load");
        assert_eq!(first.map(|ip| ip.id), Some("a".to_string()));
    }

    /// Heat carries its next link under a top-level `links` key
    #[tokio::test]
    async fn test_heat_list_follows_links() {
        let server = MockServer::start().await;
        let next = format!("{}/stacks?limit=1&marker=s1", server.uri());

        Mock::given(method("GET"))
            .and(path("/stacks"))
            .and(query_param("limit", "1"))
            .and(query_param_is_missing("marker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stacks": [{"id": "s1", "stack_name": "web", "stack_status": "CREATE_COMPLETE"}],
                "links": [{"href": next, "rel": "next"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/stacks"))
            .and(query_param("marker", "s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stacks": [{"id": "s2", "stack_name": "db", "stack_status": "UPDATE_IN_PROGRESS"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let heat = HeatApi::new(client_for(&server, Service::Orchestration));
        let stacks = heat
            .list_stacks(QueryOptions::new().limit(1))
            .try_collect_all()
            .await
            .unwrap();

        let ids: Vec<_> = stacks.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["s1", "s2"]);
        assert!(stacks[1].stack_status.as_ref().is_some_and(|s| s.is_in_progress()));
    }

    /// 404 on the first page is an empty listing
    #[tokio::test]
    async fn test_list_not_found_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/alarms"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let ceilometer = CeilometerApi::new(client_for(&server, Service::Metering));
        let alarms = ceilometer.list_alarms().try_collect_all().await.unwrap();
        assert!(alarms.is_empty());
    }

    /// 401 on a later page propagates instead of truncating the listing
    #[tokio::test]
    async fn test_unauthorized_mid_listing_propagates() {
        let server = MockServer::start().await;
        let next = format!("{}/v2.0/floatingips?marker={}", server.uri(), MARKER);

        Mock::given(method("GET"))
            .and(path("/v2.0/floatingips"))
            .and(query_param_is_missing("marker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "floatingips": [floating_ip("a", "10.0.0.1")],
                "floatingips_links": [{"href": next, "rel": "next"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2.0/floatingips"))
            .and(query_param("marker", MARKER))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": 401, "title": "Unauthorized", "message": "The request you have made requires authentication."}
            })))
            .mount(&server)
            .await;

        let neutron = NeutronApi::new(client_for(&server, Service::Network));
        let err = neutron
            .list_floating_ips(QueryOptions::new())
            .try_collect_all()
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    /// Filters, limit and marker reach Neutron as flat query parameters
    #[tokio::test]
    async fn test_flat_query_parameters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2.0/floatingips"))
            .and(query_param("status", "DOWN"))
            .and(query_param("limit", "0"))
            .and(query_param("fields", "id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"floatingips": []})))
            .expect(1)
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();
        let page = api
            .list_page_raw(&QueryOptions::new().filter("status", "DOWN").field("id").limit(0))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert!(page.is_last());
    }
}

mod ceilometer_tests {
    use super::*;

    /// Bare alarm arrays decode with every identifying field populated
    #[tokio::test]
    async fn test_list_alarms() {
        let server = MockServer::start().await;

        let alarms: Vec<Value> = (1..=3)
            .map(|n| {
                json!({
                    "alarm_id": format!("alarm-{n}"),
                    "name": format!("cpu_high_{n}"),
                    "type": "threshold",
                    "state": if n == 3 { "insufficient data" } else { "ok" },
                    "enabled": true,
                    "user_id": "c96c887c216949acbdfbd8b494863567",
                    "project_id": "c96c887c216949acbdfbd8b494863567",
                    "timestamp": "2015-11-10T10:22:08.345000",
                    "state_timestamp": "2015-11-10T10:22:08.345000",
                    "repeat_actions": false,
                    "alarm_actions": ["http://site:8000/alarm"],
                    "threshold_rule": {
                        "meter_name": "cpu_util",
                        "threshold": 300.0,
                        "comparison_operator": "gt",
                        "statistic": "avg",
                        "period": 60,
                        "evaluation_periods": 1,
                        "query": [{"field": "resource_id", "op": "eq", "value": "instance-1"}]
                    }
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/v2/alarms"))
            .and(header("X-Auth-Token", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&alarms))
            .expect(1)
            .mount(&server)
            .await;

        let ceilometer = CeilometerApi::new(client_for(&server, Service::Metering));
        let alarms = ceilometer.list_alarms().try_collect_all().await.unwrap();

        assert_eq!(alarms.len(), 3);
        for alarm in &alarms {
            assert!(!alarm.alarm_id.is_empty());
            assert!(!alarm.name.is_empty());
            assert!(!alarm.user_id.is_empty());
            assert!(!alarm.timestamp.is_empty());
            assert!(!alarm.state_timestamp.is_empty());
            assert!(alarm.state.is_recognized());
        }
        assert_eq!(alarms[2].state, AlarmState::InsufficientData);
    }

    /// Filters are sent as aligned q.field / q.op / q.value triplets
    #[tokio::test]
    async fn test_triplet_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/meters"))
            .and(query_param("q.field", "resource_id"))
            .and(query_param("q.op", "eq"))
            .and(query_param("q.value", "instance-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "meter_id": "bWV0ZXI=",
                "name": "cpu_util",
                "type": "gauge",
                "unit": "%",
                "resource_id": "instance-1"
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let ceilometer = CeilometerApi::new(client_for(&server, Service::Metering));
        let meters = ceilometer
            .list_meters(QueryOptions::new().filter("resource_id", "instance-1"))
            .try_collect_all()
            .await
            .unwrap();
        assert_eq!(meters.len(), 1);
        assert_eq!(meters[0].name, "cpu_util");
    }

    /// References project onto alarm_id and name
    #[tokio::test]
    async fn test_get_matches_reference_projection() {
        let server = MockServer::start().await;
        let alarm = json!({
            "alarm_id": "alarm-1",
            "name": "cpu_high",
            "type": "threshold",
            "state": "alarm",
            "user_id": "u",
            "project_id": "p",
            "timestamp": "2015-11-10T10:22:08.345000",
            "state_timestamp": "2015-11-10T10:22:08.345000"
        });

        Mock::given(method("GET"))
            .and(path("/v2/alarms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([alarm])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/alarms/alarm-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&alarm))
            .mount(&server)
            .await;

        let alarms = CeilometerApi::new(client_for(&server, Service::Metering)).alarms();
        let references = alarms
            .list_references(QueryOptions::new())
            .try_collect_all()
            .await
            .unwrap();
        assert_eq!(references.len(), 1);

        let full = alarms
            .get(references[0].id().unwrap())
            .await
            .unwrap()
            .expect("alarm should exist");
        assert_eq!(full.alarm_id, "alarm-1");
        assert_eq!(references[0].name(), Some(full.name.as_str()));
    }
}

mod fallback_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2.0/floatingips/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "NeutronError": {"type": "FloatingIPNotFound", "message": "Floating IP gone could not be found", "detail": ""}
            })))
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();
        assert_eq!(api.get("gone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_is_false() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v2.0/floatingips/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v2.0/floatingips/present"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();
        assert!(!api.delete("gone").await.unwrap());
        assert!(api.delete("present").await.unwrap());
    }

    /// Only not-found is recovered; other failures still surface
    #[tokio::test]
    async fn test_get_server_error_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2.0/floatingips/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();
        let err = api.get("broken").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    /// Writes never recover: 404 and 401/403 surface as typed errors
    #[tokio::test]
    async fn test_create_not_found_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2.0/floatingips"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "NeutronError": {"type": "ExternalNetworkNotFound", "message": "External network net-1 could not be found", "detail": ""}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();
        let err = api.create(&CreateFloatingIp::on_network("net-1")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_unauthorized_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2.0/floatingips"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();
        let err = api.create(&CreateFloatingIp::on_network("net-1")).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_update_not_found_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v2.0/floatingips/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();
        let err = api.update("gone", &UpdateFloatingIp::disassociate()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_forbidden_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v2.0/floatingips/fip-1"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "NeutronError": {"type": "PolicyNotAuthorized", "message": "rule:update_floatingip is disallowed by policy", "detail": ""}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();
        let err = api.update("fip-1", &UpdateFloatingIp::associate("p-1")).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized { status: 403, .. }));
    }

    /// A forbidden delete is an error, not "already gone"
    #[tokio::test]
    async fn test_delete_forbidden_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v2.0/floatingips/fip-1"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();
        let err = api.delete("fip-1").await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized { status: 403, .. }));
    }

    /// Invalid payloads fail before any request is sent
    #[tokio::test]
    async fn test_validation_sends_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2.0/floatingips"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();
        let err = api.create(&CreateFloatingIp::default()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = api.delete("").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}

mod body_tests {
    use super::*;

    /// Only the fields that were set are sent, wrapped under the item key
    #[tokio::test]
    async fn test_sparse_update_body() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v2.0/floatingips/fip-1"))
            .and(body_json(json!({"floatingip": {"port_id": null}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "floatingip": floating_ip("fip-1", "172.24.4.228")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = NeutronApi::new(client_for(&server, Service::Network)).floating_ips();
        let updated = api
            .update("fip-1", &UpdateFloatingIp::disassociate())
            .await
            .unwrap()
            .expect("Neutron returns the updated item");
        assert_eq!(updated.port_id, None);
    }

    /// Heat create bodies are bare and always carry `files`
    #[tokio::test]
    async fn test_heat_create_body() {
        let server = MockServer::start().await;
        let template = "heat_template_version: 2013-05-23\nresources: {}\n";

        Mock::given(method("POST"))
            .and(path("/stacks"))
            .and(body_json(json!({
                "stack_name": "teststack",
                "template": template,
                "disable_rollback": false,
                "files": {}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "stack": {
                    "id": "3095aefc-09fb-4bc7-b1f0-f21a304e864c",
                    "links": [{"href": "http://heat/v1/t/stacks/teststack/3095aefc-09fb-4bc7-b1f0-f21a304e864c", "rel": "self"}]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let heat = HeatApi::new(client_for(&server, Service::Orchestration));
        let stack = heat
            .stacks()
            .create(&CreateStack {
                stack_name: Some("teststack".into()),
                template: Some(template.into()),
                disable_rollback: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(stack.id, "3095aefc-09fb-4bc7-b1f0-f21a304e864c");
        assert_eq!(stack.links.len(), 1);
    }

    /// Untyped access through the registry descriptor sees the same data
    #[tokio::test]
    async fn test_untyped_api() {
        let server = MockServer::start().await;
        mount_two_floating_ip_pages(&server).await;

        let api: ResourceApi<Value> =
            ResourceApi::new(client_for(&server, Service::Network), &FLOATING_IPS);
        let items = api.list().try_collect_all().await.unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[1]["id"], MARKER);
    }
}

mod auth_tests {
    use super::*;
    use osapi::openstack::auth::{AuthMethod, PasswordAuth};

    /// Password auth issues one token and reuses it across requests
    #[tokio::test]
    async fn test_password_token_is_cached() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/auth/tokens"))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("X-Subject-Token", "issued-token")
                    .set_body_json(json!({
                        "token": {"expires_at": "2999-01-01T00:00:00.000000Z", "methods": ["password"]}
                    })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/os-server-groups"))
            .and(header("X-Auth-Token", "issued-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"server_groups": []})))
            .expect(2)
            .mount(&server)
            .await;

        let auth = AuthMethod::Password(PasswordAuth {
            auth_url: format!("{}/v3", server.uri()),
            username: "demo".into(),
            password: "secret".into(),
            project_name: "demo".into(),
            user_domain_name: "Default".into(),
            project_domain_name: "Default".into(),
        });
        let mut endpoints = BTreeMap::new();
        endpoints.insert(Service::Compute, server.uri());
        let nova = osapi::services::NovaApi::new(OpenStackClient::new(auth, endpoints).unwrap());

        for _ in 0..2 {
            let groups = nova.list_server_groups().try_collect_all().await.unwrap();
            assert!(groups.is_empty());
        }
    }

    /// A wrong auth_url is a configuration error, never an absent resource
    #[tokio::test]
    async fn test_missing_token_endpoint_is_not_absence() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/auth/tokens"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(wiremock::matchers::path_regex("^/v2.0/floatingips"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "floatingips": [floating_ip("fip-1", "172.24.4.228")]
            })))
            .expect(0)
            .mount(&server)
            .await;

        let auth = AuthMethod::Password(PasswordAuth {
            auth_url: server.uri(),
            username: "demo".into(),
            password: "secret".into(),
            project_name: "demo".into(),
            user_domain_name: "Default".into(),
            project_domain_name: "Default".into(),
        });
        let mut endpoints = BTreeMap::new();
        endpoints.insert(Service::Network, server.uri());
        let api = NeutronApi::new(OpenStackClient::new(auth, endpoints).unwrap()).floating_ips();

        let listed = api.list().try_collect_all().await;
        assert!(matches!(listed, Err(Error::Config(_))));
        assert!(matches!(api.get("fip-1").await, Err(Error::Config(_))));
        assert!(matches!(api.delete("fip-1").await, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/auth/tokens"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": 401, "title": "Unauthorized", "message": "The request you have made requires authentication."}
            })))
            .mount(&server)
            .await;

        let auth = AuthMethod::Password(PasswordAuth {
            auth_url: server.uri(),
            username: "demo".into(),
            password: "wrong".into(),
            project_name: "demo".into(),
            user_domain_name: "Default".into(),
            project_domain_name: "Default".into(),
        });
        let client = OpenStackClient::new(auth, BTreeMap::new()).unwrap();
        let err = client.get_token().await.unwrap_err();
        assert!(err.is_unauthorized());
    }
}
