//! Crate layering rules.
//!
//! - `sidecar-config` knows nothing about HTTP or Kubernetes.
//! - `sidecar-client` knows nothing about Kubernetes or the sync pipeline.
//! - Only the sidecar's `kube_source` and `main` touch the Kubernetes API;
//!   the pipeline sees ConfigMaps through `EventSource` alone.
//! - Only `upstream.rs` in the sidecar names the concrete HTTP client.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

fn workspace_root() -> PathBuf {
    let start = std::env::current_dir().expect("current directory");
    start
        .ancestors()
        .find(|dir| {
            fs::read_to_string(dir.join("Cargo.toml"))
                .is_ok_and(|manifest| manifest.contains("[workspace]"))
        })
        .map(Path::to_path_buf)
        .unwrap_or(start)
}

/// Every `(path, content)` of `.rs` files under `crates/<krate>/src`.
fn sources(krate: &str) -> Vec<(String, String)> {
    let dir = workspace_root().join("crates").join(krate).join("src");
    WalkDir::new(&dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|e| {
            let content = fs::read_to_string(e.path()).unwrap_or_default();
            (e.path().display().to_string(), content)
        })
        .collect()
}

fn offenders(krate: &str, forbidden: &[&str], allowed_files: &[&str]) -> Vec<String> {
    let files = sources(krate);
    assert!(!files.is_empty(), "no sources found for crate {}", krate);

    files
        .into_iter()
        .filter(|(path, _)| !allowed_files.iter().any(|a| path.ends_with(a)))
        .flat_map(|(path, content)| {
            forbidden
                .iter()
                .filter(|needle| content.contains(*needle))
                .map(|needle| format!("{} uses `{}`", path, needle))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn config_crate_has_no_transport_dependencies() {
    let found = offenders("config", &["reqwest::", "kube::", "sidecar_client"], &[]);
    assert!(found.is_empty(), "{}", found.join("\n"));
}

#[test]
fn client_crate_has_no_kubernetes_dependencies() {
    let found = offenders("client", &["kube::", "k8s_openapi", "kibana_sidecar"], &[]);
    assert!(found.is_empty(), "{}", found.join("\n"));
}

#[test]
fn kubernetes_access_is_confined_to_the_adapter() {
    let found = offenders(
        "sidecar",
        &["kube::", "k8s_openapi::"],
        &["src/kube_source.rs", "src/main.rs"],
    );
    assert!(found.is_empty(), "{}", found.join("\n"));
}

#[test]
fn pipeline_uses_the_upstream_trait() {
    let found = offenders(
        "sidecar",
        &["ElasticClient", "reqwest::"],
        &["src/upstream.rs", "src/main.rs"],
    );
    assert!(found.is_empty(), "{}", found.join("\n"));
}
