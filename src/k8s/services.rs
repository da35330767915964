//! Tenant services and service port-forwarding

use crate::k8s::client::not_found_or;
use crate::utils::errors::{Result, SgError};
use k8s_openapi::api::core::v1::{Pod, Service};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ListParams;
use kube::{Api, Client, ResourceExt};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// First of `names` shaped `<tenant>-sg-...`
pub fn tenant_service<'a, I>(tenant: &str, names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().find(|name| {
        let mut fields = name.split('-');
        fields.next() == Some(tenant) && fields.next() == Some("sg")
    })
}

/// Name of the storage-group service of a tenant
pub async fn service_name_for_tenant(client: &Client, namespace: &str, tenant: &str) -> Result<String> {
    let api: Api<Service> = Api::namespaced(client.clone(), namespace);
    let services = api.list(&ListParams::default()).await?;
    let names: Vec<String> = services.items.iter().map(|s| s.name_any()).collect();

    tenant_service(tenant, names.iter().map(String::as_str))
        .map(str::to_string)
        .ok_or_else(|| SgError::not_found("service", tenant, namespace))
}

/// Label selector string (`k=v,k2=v2`) of a service
pub fn selector_string(service: &Service) -> Result<String> {
    let selector = service
        .spec
        .as_ref()
        .and_then(|spec| spec.selector.as_ref())
        .filter(|selector| !selector.is_empty())
        .ok_or_else(|| {
            SgError::InvalidResource(format!("service {} has no pod selector", service.name_any()))
        })?;

    Ok(selector
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(","))
}

/// First running pod that is not being deleted
pub fn pick_running_pod(pods: &[Pod]) -> Option<&Pod> {
    pods.iter().find(|pod| {
        pod.metadata.deletion_timestamp.is_none()
            && pod
                .status
                .as_ref()
                .and_then(|s| s.phase.as_deref())
                == Some("Running")
    })
}

/// Container port on `pod` that service port `remote_port` sends traffic to.
///
/// Numeric targets are used as is, named targets are looked up in the pod's
/// container ports, and anything unresolved falls back to `remote_port`.
pub fn resolve_target_port(service: &Service, pod: &Pod, remote_port: u16) -> u16 {
    let target = service
        .spec
        .as_ref()
        .and_then(|spec| spec.ports.as_ref())
        .and_then(|ports| ports.iter().find(|p| p.port == i32::from(remote_port)))
        .and_then(|p| p.target_port.as_ref());

    match target {
        Some(IntOrString::Int(port)) => u16::try_from(*port).unwrap_or(remote_port),
        Some(IntOrString::String(name)) => pod
            .spec
            .iter()
            .flat_map(|spec| spec.containers.iter())
            .flat_map(|c| c.ports.iter().flatten())
            .find(|p| p.name.as_deref() == Some(name.as_str()))
            .and_then(|p| u16::try_from(p.container_port).ok())
            .unwrap_or(remote_port),
        None => remote_port,
    }
}

/// A running port-forward from a local port to a pod behind a service
pub struct PortForward {
    local_addr: SocketAddr,
    pod_name: String,
    pod_port: u16,
    task: JoinHandle<()>,
}

impl PortForward {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn pod_name(&self) -> &str {
        &self.pod_name
    }

    pub fn pod_port(&self) -> u16 {
        self.pod_port
    }

    /// Stop accepting connections
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Wait until the listener stops
    pub async fn wait(self) -> Result<()> {
        match self.task.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(SgError::PortForward(e.to_string())),
        }
    }
}

/// Forward `127.0.0.1:<local_port>` to port `remote_port` of `service`.
///
/// `local_port` 0 binds a free port; see [`PortForward::local_addr`].
pub async fn create_service_port_forwarder(
    client: &Client,
    namespace: &str,
    service_name: &str,
    local_port: u16,
    remote_port: u16,
) -> Result<PortForward> {
    let services: Api<Service> = Api::namespaced(client.clone(), namespace);
    let service = services
        .get(service_name)
        .await
        .map_err(|e| not_found_or(e, "service", service_name, namespace))?;

    let selector = selector_string(&service)?;
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let candidates = pods.list(&ListParams::default().labels(&selector)).await?;
    let pod = pick_running_pod(&candidates.items)
        .ok_or_else(|| SgError::not_found("running pod", service_name, namespace))?;

    let pod_name = pod.name_any();
    let pod_port = resolve_target_port(&service, pod, remote_port);

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, local_port)).await?;
    let local_addr = listener.local_addr()?;
    crate::log_info!(
        "Forwarding {} -> svc/{} (pod {}:{})",
        local_addr,
        service_name,
        pod_name,
        pod_port
    );

    let task = tokio::spawn(accept_loop(listener, pods, pod_name.clone(), pod_port));

    Ok(PortForward {
        local_addr,
        pod_name,
        pod_port,
        task,
    })
}

async fn accept_loop(listener: TcpListener, pods: Api<Pod>, pod_name: String, port: u16) {
    loop {
        let (conn, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                crate::log_error!("port-forward listener failed: {}", e);
                return;
            }
        };
        tracing::debug!("port-forward connection from {}", peer);

        let pods = pods.clone();
        let pod_name = pod_name.clone();
        tokio::spawn(async move {
            if let Err(e) = forward_connection(&pods, &pod_name, port, conn).await {
                crate::log_warn!("port-forward connection from {} ended: {}", peer, e);
            }
        });
    }
}

async fn forward_connection(pods: &Api<Pod>, pod_name: &str, port: u16, mut conn: TcpStream) -> Result<()> {
    let mut forwarder = pods.portforward(pod_name, &[port]).await?;
    let mut upstream = forwarder
        .take_stream(port)
        .ok_or_else(|| SgError::PortForward(format!("no stream for port {}", port)))?;

    tokio::io::copy_bidirectional(&mut conn, &mut upstream).await?;
    drop(upstream);

    forwarder
        .join()
        .await
        .map_err(|e| SgError::PortForward(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> Service {
        serde_json::from_value(json!({
            "metadata": { "name": "acme-sg-svc" },
            "spec": {
                "selector": { "app": "sg", "tenant": "acme" },
                "ports": [
                    { "name": "api", "port": 8080, "targetPort": 18080 },
                    { "name": "admin", "port": 9090, "targetPort": "admin" },
                    { "name": "raw", "port": 7000 }
                ]
            }
        }))
        .unwrap()
    }

    fn pod(name: &str, phase: &str) -> Pod {
        serde_json::from_value(json!({
            "metadata": { "name": name },
            "spec": {
                "containers": [{
                    "name": "storage",
                    "ports": [{ "name": "admin", "containerPort": 19090 }]
                }]
            },
            "status": { "phase": phase }
        }))
        .unwrap()
    }

    #[test]
    fn test_tenant_service() {
        let names = ["other-sg-svc", "acme-web", "acme-sg-svc", "acme-sg-headless"];
        assert_eq!(tenant_service("acme", names), Some("acme-sg-svc"));
        assert_eq!(tenant_service("nobody", names), None);
        assert_eq!(tenant_service("acme", ["acme"]), None);
    }

    #[test]
    fn test_selector_string() {
        assert_eq!(selector_string(&service()).unwrap(), "app=sg,tenant=acme");

        let bare: Service = serde_json::from_value(json!({
            "metadata": { "name": "external" },
            "spec": { "type": "ExternalName", "externalName": "db.example.com" }
        }))
        .unwrap();
        assert!(matches!(selector_string(&bare), Err(SgError::InvalidResource(_))));
    }

    #[test]
    fn test_pick_running_pod() {
        let pods = vec![
            pod("sg-1-host-1-a-b", "Pending"),
            pod("sg-1-host-1-c-d", "Running"),
            pod("sg-1-host-1-e-f", "Running"),
        ];
        assert_eq!(pick_running_pod(&pods).unwrap().name_any(), "sg-1-host-1-c-d");
        assert!(pick_running_pod(&pods[..1]).is_none());
    }

    #[test]
    fn test_resolve_target_port() {
        let svc = service();
        let pod = pod("sg-1-host-1-c-d", "Running");
        assert_eq!(resolve_target_port(&svc, &pod, 8080), 18080);
        assert_eq!(resolve_target_port(&svc, &pod, 9090), 19090);
        assert_eq!(resolve_target_port(&svc, &pod, 7000), 7000);
        assert_eq!(resolve_target_port(&svc, &pod, 6000), 6000);
    }
}
