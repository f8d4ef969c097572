#![allow(clippy::unwrap_used)]
// Integration tests for the `Region` facade using wiremock.

use std::collections::HashMap;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use armlink_api::ArmClient;
use armlink_api::types::Location;
use armlink_core::capability::{CloudRegion, CloudResource};
use armlink_core::{
    AccountConfig, BackupKind, CoreError, Direction, DiskConfig, PollConfig, Provider, Region,
    RuleAction, SecurityRuleSpec, VmCreateConfig, VmStatus,
};

const SUB: &str = "sub-1";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Region) {
    let server = MockServer::start().await;
    let client = ArmClient::from_reqwest(&server.uri(), SUB, reqwest::Client::new())
        .unwrap()
        .with_poll_config(PollConfig {
            interval: Duration::from_millis(10),
            deadline: Duration::from_secs(2),
        });
    let provider = Provider::with_client(client, &AccountConfig::new(SUB, SecretString::from("t")));
    let region = provider.region_for(Location {
        name: "eastus".into(),
        display_name: "East US".into(),
        ..Default::default()
    });
    (server, region)
}

fn sub_path(suffix: &str) -> String {
    format!("/subscriptions/{SUB}/providers/{suffix}")
}

fn rg_path(group: &str, suffix: &str) -> String {
    format!("/subscriptions/{SUB}/resourceGroups/{group}/providers/{suffix}")
}

async fn mount_json(server: &MockServer, verb: &str, at: String, body: Value) {
    Mock::given(method(verb))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, verb: &str, at: String, status: u16) {
    Mock::given(method(verb))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(json!({"error": {"code": "ResourceNotFound", "message": "nope"}})),
        )
        .mount(server)
        .await;
}

/// Non-GET requests the server saw, as `(method, path)`.
async fn writes(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.to_string() != "GET")
        .map(|r| (r.method.to_string(), r.url.path().to_owned()))
        .collect()
}

// ── Networks ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_vpcs_are_filtered_to_the_region() {
    let (server, region) = setup().await;
    let vnet_id = rg_path("rg1", "Microsoft.Network/virtualNetworks/vnet1");
    mount_json(
        &server,
        "GET",
        sub_path("Microsoft.Network/virtualNetworks"),
        json!({"value": [
            {
                "id": vnet_id,
                "name": "vnet1",
                "location": "East US",
                "properties": {
                    "addressSpace": {"addressPrefixes": ["10.0.0.0/16"]},
                    "subnets": [{
                        "id": format!("{vnet_id}/subnets/Default"),
                        "name": "Default",
                        "properties": {"addressPrefix": "10.0.1.0/24"}
                    }]
                }
            },
            {"id": "x", "name": "far", "location": "westus", "properties": {}}
        ]}),
    )
    .await;

    let vpcs = region.list_vpcs().await.unwrap();
    assert_eq!(vpcs.len(), 1);
    let vpc = &vpcs[0];
    assert_eq!(vpc.name(), "vnet1");
    assert_eq!(vpc.cidr(), "10.0.0.0/16");
    assert_eq!(
        vpc.wire().id(),
        format!("{}/{SUB}/vnet1", region.global_id())
    );

    let networks = vpc.networks().unwrap();
    assert_eq!(networks.len(), 1);
    let range = networks[0].range();
    assert_eq!(range.mask, 24);
    assert_eq!(range.ip_start.to_string(), "10.0.1.4");
    assert_eq!(range.ip_end.to_string(), "10.0.1.254");
    assert_eq!(range.gateway.to_string(), "10.0.1.254");
    assert_eq!(networks[0].global_id(), format!("{vnet_id}/subnets/default").to_lowercase());
}

#[tokio::test]
async fn test_dual_stack_subnets_use_their_ipv4_prefix() {
    let (server, region) = setup().await;
    let vnet_id = rg_path("rg1", "Microsoft.Network/virtualNetworks/vnet1");
    let vnet = json!({
        "id": vnet_id,
        "name": "vnet1",
        "location": "eastus",
        "properties": {
            "addressSpace": {"addressPrefixes": ["10.0.0.0/16", "fd00::/48"]},
            "subnets": [
                {
                    "id": format!("{vnet_id}/subnets/a"),
                    "name": "a",
                    "properties": {"addressPrefix": "10.0.1.0/24"}
                },
                {
                    "id": format!("{vnet_id}/subnets/b"),
                    "name": "b",
                    "properties": {"addressPrefixes": ["10.0.2.0/24", "fd00::/64"]}
                },
                {
                    "id": format!("{vnet_id}/subnets/v6"),
                    "name": "v6",
                    "properties": {"addressPrefixes": ["fd00:0:0:1::/64"]}
                }
            ]
        }
    });
    mount_json(
        &server,
        "GET",
        sub_path("Microsoft.Network/virtualNetworks"),
        json!({"value": [vnet.clone()]}),
    )
    .await;
    mount_json(&server, "GET", vnet_id.clone(), vnet).await;

    let vpcs = region.list_vpcs().await.unwrap();
    let networks = vpcs[0].networks().unwrap();
    let cidrs: Vec<&str> = networks.iter().map(|n| n.cidr()).collect();
    assert_eq!(cidrs, vec!["10.0.1.0/24", "10.0.2.0/24"]);
    assert_eq!(networks[1].range().ip_start.to_string(), "10.0.2.4");

    let b = region
        .get_subnet(&format!("{vnet_id}/subnets/b"))
        .await
        .unwrap();
    assert_eq!(b.name(), "b");
    assert!(
        region
            .get_subnet(&format!("{vnet_id}/subnets/v6"))
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_classic_subnets_are_addressed_through_their_network() {
    let (server, region) = setup().await;
    let vpc_id = rg_path("rg1", "Microsoft.ClassicNetwork/virtualNetworks/old");
    let doc = json!({
        "id": vpc_id,
        "name": "old",
        "location": "eastus",
        "properties": {
            "status": "Created",
            "addressSpace": {"addressPrefixes": ["172.16.0.0/16"]},
            "subnets": [{"name": "Subnet-1", "addressPrefix": "172.16.0.0/16"}]
        }
    });
    mount_json(
        &server,
        "GET",
        sub_path("Microsoft.ClassicNetwork/virtualNetworks"),
        json!({"value": [doc.clone()]}),
    )
    .await;
    mount_json(&server, "GET", vpc_id.clone(), doc).await;

    let classic = region.list_classic_vpcs().await.unwrap();
    assert_eq!(classic.len(), 1);
    assert!(classic[0].wire().id().ends_with("/old-classic"));
    assert_eq!(CloudResource::status(&classic[0]), "available");

    let networks = classic[0].networks().unwrap();
    let subnet_id = format!("{vpc_id}/Subnet-1");
    assert_eq!(networks[0].id(), subnet_id);
    assert!(networks[0].is_classic());
    assert_eq!(networks[0].range().ip_end.to_string(), "172.16.255.254");

    let resolved = region.get_subnet(&subnet_id).await.unwrap();
    assert_eq!(resolved.name(), "Subnet-1");
    assert_eq!(resolved.vpc_id(), vpc_id);
}

#[tokio::test]
async fn test_missing_classic_provider_means_no_classic_wires() {
    let (server, region) = setup().await;
    mount_json(
        &server,
        "GET",
        sub_path("Microsoft.Network/virtualNetworks"),
        json!({"value": []}),
    )
    .await;
    mount_status(&server, "GET", sub_path("Microsoft.ClassicNetwork/virtualNetworks"), 404).await;

    assert!(region.list_classic_vpcs().await.unwrap().is_empty());
    assert!(region.zone().wires().await.unwrap().is_empty());
    assert!(CloudRegion::vpcs(&region).await.unwrap().is_empty());
}

// ── App service plans ───────────────────────────────────────────────

#[tokio::test]
async fn test_plan_cache_lists_plans_once() {
    let (server, region) = setup().await;
    let plan1 = rg_path("rg1", "Microsoft.Web/serverFarms/plan1");
    let plan2 = rg_path("rg2", "Microsoft.Web/serverFarms/plan2");
    let site = |name: &str, farm: &str| {
        json!({
            "id": rg_path("rg1", &format!("Microsoft.Web/sites/{name}")),
            "name": name,
            "kind": "app",
            "location": "East US",
            "properties": {"state": "Running", "serverFarmId": farm}
        })
    };
    mount_json(
        &server,
        "GET",
        sub_path("Microsoft.Web/sites"),
        json!({"value": [
            site("a", &plan1.to_uppercase()),
            site("b", &plan1),
            site("c", &plan2),
        ]}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(sub_path("Microsoft.Web/serverFarms")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [
            {"id": plan1, "name": "plan1", "location": "eastus"}
        ]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(plan2.clone()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": plan2, "name": "plan2", "location": "eastus"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sites = region.list_app_sites().await.unwrap();
    let names: Vec<String> = [
        sites[0].plan_name().await,
        sites[1].plan_name().await,
        sites[2].plan_name().await,
    ]
    .into();
    assert_eq!(names, vec!["plan1", "plan1", "plan2"]);
    assert_eq!(CloudResource::status(&sites[0]), "running");
}

// ── Web apps ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_site_introspection() {
    let (server, region) = setup().await;
    let site_id = rg_path("rg1", "Microsoft.Web/sites/app1");
    mount_json(
        &server,
        "GET",
        site_id.clone(),
        json!({
            "id": site_id,
            "name": "app1",
            "kind": "app,linux",
            "location": "eastus",
            "properties": {
                "state": "Running",
                "defaultHostName": "app1.azurewebsites.net",
                "hostNames": ["app1.azurewebsites.net", "www.example.com"],
                "hostNameSslStates": [
                    {"name": "app1.azurewebsites.net", "sslState": "Disabled"},
                    {"name": "app1.scm.azurewebsites.net", "sslState": "Disabled"},
                    {"name": "www.example.com", "sslState": "Disabled"}
                ]
            }
        }),
    )
    .await;
    mount_json(
        &server,
        "POST",
        format!("{site_id}/config/metadata/list"),
        json!({"properties": {}}),
    )
    .await;
    mount_json(
        &server,
        "GET",
        format!("{site_id}/config"),
        json!({"value": [{"name": "web", "properties": {"nodeVersion": "~18", "linuxFxVersion": "NODE|18-lts"}}]}),
    )
    .await;
    mount_json(
        &server,
        "GET",
        format!("{site_id}/backups"),
        json!({"value": [{"id": "b1", "name": "nightly", "properties": {"status": "Succeeded"}}]}),
    )
    .await;
    mount_json(
        &server,
        "GET",
        format!("{site_id}/snapshots"),
        json!({"value": [{"id": "s1", "name": "snap", "properties": {}}]}),
    )
    .await;
    mount_json(
        &server,
        "GET",
        format!("{site_id}/slots"),
        json!({"value": [{"id": format!("{site_id}/slots/staging"), "name": "app1/staging", "location": "eastus"}]}),
    )
    .await;

    let site = region.get_app_site(&site_id).await.unwrap();
    assert_eq!(site.tech_stack().await, "Node");
    assert_eq!(site.os_type().await.to_string(), "Linux");

    let domains = site.domains().await.unwrap();
    let names: Vec<&str> = domains.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["app1.azurewebsites.net", "www.example.com"]);

    let backups = site.backups().await.unwrap();
    let kinds: Vec<BackupKind> = backups.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BackupKind::Manual, BackupKind::Auto]);

    let envs = site.environments().await.unwrap();
    assert_eq!(envs.len(), 1);
    assert_eq!(envs[0].name(), "staging");
}

#[tokio::test]
async fn test_site_stack_probes_degrade() {
    let (server, region) = setup().await;
    let site_id = rg_path("rg1", "Microsoft.Web/sites/box");
    mount_json(
        &server,
        "GET",
        site_id.clone(),
        json!({"id": site_id, "name": "box", "kind": "app,linux,container", "location": "eastus"}),
    )
    .await;
    mount_status(&server, "POST", format!("{site_id}/config/metadata/list"), 500).await;
    mount_status(&server, "GET", format!("{site_id}/config"), 500).await;

    let site = region.get_app_site(&site_id).await.unwrap();
    assert_eq!(site.tech_stack().await, "Docker container");
    assert_eq!(site.os_type().await.to_string(), "Linux");
    assert_eq!(site.plan_name().await, "");
}

#[tokio::test]
async fn test_site_stack_from_metadata() {
    let (server, region) = setup().await;
    let site_id = rg_path("rg1", "Microsoft.Web/sites/py");
    mount_json(
        &server,
        "GET",
        site_id.clone(),
        json!({"id": site_id, "name": "py", "kind": "app", "location": "eastus"}),
    )
    .await;
    mount_json(
        &server,
        "POST",
        format!("{site_id}/config/metadata/list"),
        json!({"properties": {"CURRENT_STACK": "python"}}),
    )
    .await;

    let site = region.get_app_site(&site_id).await.unwrap();
    assert_eq!(site.tech_stack().await, "Python");
}

#[tokio::test]
async fn test_site_listing_uses_web_api_version() {
    let (server, region) = setup().await;
    Mock::given(method("GET"))
        .and(path(sub_path("Microsoft.Web/sites")))
        .and(query_param("api-version", "2023-12-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{
            "id": rg_path("rg1", "Microsoft.Web/sites/a"),
            "name": "a",
            "location": "East US",
            "properties": {"state": "Stopped"}
        }]})))
        .expect(1)
        .mount(&server)
        .await;

    let sites = region.list_app_sites().await.unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].name(), "a");
}

#[tokio::test]
async fn test_certificates_are_filtered_by_server_farm() {
    let (server, region) = setup().await;
    let farm = rg_path("rg1", "Microsoft.Web/serverFarms/plan1");
    Mock::given(method("GET"))
        .and(path(sub_path("Microsoft.Web/certificates")))
        .and(query_param("$filter", format!("ServerFarmId eq '{farm}'")))
        .and(query_param("api-version", "2023-12-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{
            "id": rg_path("rg1", "Microsoft.Web/certificates/www"),
            "name": "www",
            "location": "eastus",
            "properties": {
                "subjectName": "www.example.com",
                "thumbprint": "ABC123",
                "hostNames": ["www.example.com"],
                "expirationDate": "2027-01-01T00:00:00Z"
            }
        }]})))
        .expect(1)
        .mount(&server)
        .await;

    let certs = region.list_app_certificates(&farm).await.unwrap();
    assert_eq!(certs.len(), 1);
    assert_eq!(certs[0].name, "www");
    assert_eq!(certs[0].subject_name.as_deref(), Some("www.example.com"));
    assert_eq!(certs[0].thumbprint.as_deref(), Some("ABC123"));
    assert_eq!(certs[0].issuer, None);
    assert_eq!(certs[0].host_names, vec!["www.example.com"]);
}

// ── Instances ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_instance_listing_survives_refetch_failures() {
    let (server, region) = setup().await;
    let vm = |name: &str| {
        json!({
            "id": rg_path("rg1", &format!("Microsoft.Compute/virtualMachines/{name}")),
            "name": name,
            "location": "eastus",
            "properties": {"provisioningState": "Succeeded"}
        })
    };
    mount_json(
        &server,
        "GET",
        sub_path("Microsoft.Compute/locations/eastus/virtualMachines"),
        json!({"value": [vm("a"), vm("gone"), vm("locked")]}),
    )
    .await;
    let mut a = vm("a");
    a["properties"]["instanceView"] = json!({"statuses": [{"code": "PowerState/running"}]});
    mount_json(
        &server,
        "GET",
        rg_path("rg1", "Microsoft.Compute/virtualMachines/a"),
        a,
    )
    .await;
    mount_status(
        &server,
        "GET",
        rg_path("rg1", "Microsoft.Compute/virtualMachines/gone"),
        404,
    )
    .await;
    mount_status(
        &server,
        "GET",
        rg_path("rg1", "Microsoft.Compute/virtualMachines/locked"),
        403,
    )
    .await;

    let instances = region.list_instances().await.unwrap();
    let names: Vec<&str> = instances.iter().map(|i| i.name()).collect();
    assert_eq!(names, vec!["a", "locked"]);
    assert_eq!(instances[0].vm_status(), VmStatus::Running);
    assert_eq!(instances[1].vm_status(), VmStatus::Unknown);
    assert_eq!(CloudResource::status(&instances[1]), "available");
}

// ── Security groups ─────────────────────────────────────────────────

#[tokio::test]
async fn test_security_group_delete_detaches_before_delete() {
    let (server, region) = setup().await;
    let nsg_id = rg_path("rg1", "Microsoft.Network/networkSecurityGroups/web");
    let nic1 = rg_path("rg1", "Microsoft.Network/networkInterfaces/nic1");
    let nic2 = rg_path("rg1", "Microsoft.Network/networkInterfaces/nic2");
    let subnet = rg_path("rg1", "Microsoft.Network/virtualNetworks/v/subnets/default");

    mount_json(
        &server,
        "GET",
        sub_path("Microsoft.Network/networkSecurityGroups"),
        json!({"value": [{"id": nsg_id, "name": "web", "location": "eastus", "properties": {}}]}),
    )
    .await;
    mount_json(
        &server,
        "GET",
        nsg_id.clone(),
        json!({
            "id": nsg_id,
            "name": "web",
            "location": "eastus",
            "properties": {
                "networkInterfaces": [{"id": nic1}, {"id": nic2}],
                "subnets": [{"id": subnet}]
            }
        }),
    )
    .await;
    for id in [&nic1, &nic2] {
        let doc = json!({
            "id": id,
            "name": "nic",
            "location": "eastus",
            "properties": {"ipConfigurations": [], "networkSecurityGroup": {"id": nsg_id}}
        });
        mount_json(&server, "GET", id.clone(), doc.clone()).await;
        mount_json(&server, "PUT", id.clone(), doc).await;
    }
    let subnet_doc = json!({
        "id": subnet,
        "name": "default",
        "properties": {"addressPrefix": "10.0.0.0/24", "networkSecurityGroup": {"id": nsg_id}}
    });
    mount_json(&server, "GET", subnet.clone(), subnet_doc.clone()).await;
    mount_json(&server, "PUT", subnet.clone(), subnet_doc).await;
    Mock::given(method("DELETE"))
        .and(path(nsg_id.clone()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let groups = region.list_security_groups().await.unwrap();
    groups[0].delete().await.unwrap();

    assert_eq!(
        writes(&server).await,
        vec![
            ("PUT".to_owned(), nic1),
            ("PUT".to_owned(), nic2),
            ("PUT".to_owned(), subnet),
            ("DELETE".to_owned(), nsg_id),
        ]
    );
    let puts: Vec<Value> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.to_string() == "PUT")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert!(puts.iter().all(|b| b["properties"].get("networkSecurityGroup").is_none()));
}

#[tokio::test]
async fn test_security_group_delete_rereads_attachments() {
    let (server, region) = setup().await;
    let nsg_id = rg_path("rg1", "Microsoft.Network/networkSecurityGroups/web");
    let nic = rg_path("rg1", "Microsoft.Network/networkInterfaces/late");

    // The listing predates the NIC attachment.
    mount_json(
        &server,
        "GET",
        sub_path("Microsoft.Network/networkSecurityGroups"),
        json!({"value": [{
            "id": nsg_id,
            "name": "web",
            "location": "eastus",
            "properties": {"networkInterfaces": [], "subnets": []}
        }]}),
    )
    .await;
    mount_json(
        &server,
        "GET",
        nsg_id.clone(),
        json!({
            "id": nsg_id,
            "name": "web",
            "location": "eastus",
            "properties": {"networkInterfaces": [{"id": nic}], "subnets": []}
        }),
    )
    .await;
    let nic_doc = json!({
        "id": nic,
        "name": "late",
        "location": "eastus",
        "properties": {"ipConfigurations": [], "networkSecurityGroup": {"id": nsg_id}}
    });
    mount_json(&server, "GET", nic.clone(), nic_doc.clone()).await;
    mount_json(&server, "PUT", nic.clone(), nic_doc).await;
    Mock::given(method("DELETE"))
        .and(path(nsg_id.clone()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let groups = region.list_security_groups().await.unwrap();
    groups[0].delete().await.unwrap();

    assert_eq!(
        writes(&server).await,
        vec![("PUT".to_owned(), nic), ("DELETE".to_owned(), nsg_id)]
    );
}

#[tokio::test]
async fn test_missing_rule_update_is_not_found() {
    let (server, region) = setup().await;
    let nsg_id = rg_path("rg1", "Microsoft.Network/networkSecurityGroups/web");
    let doc = json!({
        "id": nsg_id,
        "name": "web",
        "location": "eastus",
        "properties": {"securityRules": []}
    });
    mount_json(&server, "GET", nsg_id.clone(), doc).await;

    let group = region.get_security_group(&nsg_id).await.unwrap();
    let rule = SecurityRuleSpec::new(Direction::In, RuleAction::Allow, 100);
    let err = group.update_rule("ssh", &rule).await.unwrap_err();
    assert!(err.is_not_found());
    // Deleting an absent rule writes nothing.
    group.delete_rule("ssh").await.unwrap();
    assert!(writes(&server).await.is_empty());
}

// ── VM provisioning ─────────────────────────────────────────────────

const IMAGE: &str = "Canonical/UbuntuServer/18.04-LTS/latest";

fn vm_config() -> VmCreateConfig {
    VmCreateConfig {
        name: "web".into(),
        hostname: String::new(),
        image_id: IMAGE.into(),
        instance_type: None,
        cpu: 1,
        memory_mb: 1024,
        sys_disk: DiskConfig::new("Standard_LRS", 30),
        data_disks: Vec::new(),
        network_id: rg_path("rg1", "Microsoft.Network/virtualNetworks/v/subnets/default"),
        ip_addr: None,
        password: None,
        public_key: None,
        user_data: None,
        security_group_ids: Vec::new(),
        resource_group: None,
        tags: HashMap::new(),
    }
}

/// Mocks shared by every provisioning test: resource groups, a free NIC
/// name and VM name, the NIC PUT and the size catalog.
async fn mount_provisioning(server: &MockServer) -> String {
    let nic_id = rg_path("Default", "Microsoft.Network/networkInterfaces/web-ipconfig");
    mount_json(
        server,
        "GET",
        format!("/subscriptions/{SUB}/resourcegroups"),
        json!({"value": [{"id": "rg-default", "name": "Default", "location": "eastus"}]}),
    )
    .await;
    mount_status(server, "GET", nic_id.clone(), 404).await;
    mount_json(
        server,
        "PUT",
        nic_id.clone(),
        json!({"id": nic_id, "name": "web-ipconfig", "location": "eastus", "properties": {}}),
    )
    .await;
    mount_status(
        server,
        "GET",
        rg_path("Default", "Microsoft.Compute/virtualMachines/web"),
        404,
    )
    .await;
    mount_status(
        server,
        "GET",
        sub_path(
            "Microsoft.Compute/locations/eastus/publishers/Canonical/artifacttypes/vmimage/offers/UbuntuServer/skus/18.04-LTS/versions/latest",
        ),
        404,
    )
    .await;
    mount_json(
        server,
        "GET",
        sub_path("Microsoft.Compute/locations/eastus/vmSizes"),
        json!({"value": [
            {"name": "Standard_A1", "numberOfCores": 1, "memoryInMB": 1024},
            {"name": "Standard_B2", "numberOfCores": 2, "memoryInMB": 1024},
            {"name": "Standard_B1", "numberOfCores": 1, "memoryInMB": 1024},
            {"name": "Standard_C1", "numberOfCores": 1, "memoryInMB": 1024}
        ]}),
    )
    .await;
    nic_id
}

async fn mount_vm_put(server: &MockServer, size: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("PUT"))
        .and(path(rg_path("Default", "Microsoft.Compute/virtualMachines/web")))
        .and(body_partial_json(json!({"properties": {"hardwareProfile": {"vmSize": size}}})))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

fn arm_error(status: u16, code: &str) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .set_body_json(json!({"error": {"code": code, "message": format!("{code} happened")}}))
}

#[tokio::test]
async fn test_vm_create_tries_sizes_in_order() {
    let (server, region) = setup().await;
    let nic_id = mount_provisioning(&server).await;
    let vm_id = rg_path("Default", "Microsoft.Compute/virtualMachines/web");

    mount_vm_put(&server, "Standard_A1", arm_error(409, "SkuNotAvailable"), 1).await;
    mount_vm_put(
        &server,
        "Standard_B1",
        ResponseTemplate::new(200).set_body_json(json!({
            "id": vm_id,
            "name": "web",
            "location": "eastus",
            "properties": {"hardwareProfile": {"vmSize": "Standard_B1"}}
        })),
        1,
    )
    .await;
    mount_vm_put(&server, "Standard_C1", ResponseTemplate::new(500), 0).await;
    Mock::given(method("DELETE"))
        .and(path(nic_id))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let vm = region.host().create_vm(&vm_config()).await.unwrap();
    assert_eq!(vm.id(), vm_id);
    assert_eq!(vm.instance_type(), "Standard_B1");
}

#[tokio::test]
async fn test_vm_create_stops_on_nic_in_use_and_removes_nic() {
    let (server, region) = setup().await;
    let nic_id = mount_provisioning(&server).await;

    mount_vm_put(&server, "Standard_A1", arm_error(400, "NicInUse"), 1).await;
    mount_vm_put(&server, "Standard_B1", ResponseTemplate::new(500), 0).await;
    Mock::given(method("DELETE"))
        .and(path(nic_id))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let err = region.host().create_vm(&vm_config()).await.unwrap_err();
    assert!(err.has_arm_code("NicInUse"), "{err}");
}

#[tokio::test]
async fn test_vm_create_stops_on_invalid_parameter_and_removes_nic() {
    let (server, region) = setup().await;
    let nic_id = mount_provisioning(&server).await;

    mount_vm_put(&server, "Standard_A1", arm_error(400, "InvalidParameter"), 1).await;
    mount_vm_put(&server, "Standard_B1", ResponseTemplate::new(500), 0).await;
    mount_vm_put(&server, "Standard_C1", ResponseTemplate::new(500), 0).await;
    Mock::given(method("DELETE"))
        .and(path(nic_id))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let err = region.host().create_vm(&vm_config()).await.unwrap_err();
    assert!(err.has_arm_code("InvalidParameter"), "{err}");
    let vm_puts = writes(&server)
        .await
        .into_iter()
        .filter(|(verb, at)| verb == "PUT" && at.contains("virtualMachines"))
        .count();
    assert_eq!(vm_puts, 1);
}

#[tokio::test]
async fn test_vm_create_without_matching_size() {
    let (server, region) = setup().await;
    let nic_id = mount_provisioning(&server).await;
    Mock::given(method("DELETE"))
        .and(path(nic_id))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = vm_config();
    config.cpu = 64;
    let err = region.host().create_vm(&config).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::InstanceTypeUnavailable { cpu: 64, memory_mb: 1024 }
    ));
}

#[tokio::test]
async fn test_vm_create_rejects_unready_private_image() {
    let (server, region) = setup().await;
    let nic_id = mount_provisioning(&server).await;
    let image_id = rg_path("rg1", "Microsoft.Compute/images/golden");
    mount_json(
        &server,
        "GET",
        image_id.clone(),
        json!({"id": image_id, "name": "golden", "location": "eastus", "properties": {"provisioningState": "Creating"}}),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path(nic_id))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = vm_config();
    config.image_id = image_id;
    let err = region.host().create_vm(&config).await.unwrap_err();
    assert!(matches!(err, CoreError::ImageUnavailable { ref state, .. } if state == "Creating"));
}
