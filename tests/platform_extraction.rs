//! End-to-end coverage of the extractor → Platform pipeline, exercising
//! the seed scenarios from the readiness/capability algorithms against a
//! real directory tree rather than hand-built resource structs.

use k8s_observability_agent::extractor::{self, ExtractOptions};
use k8s_observability_agent::model::{K8sResourceKind, Readiness};
use tempfile::TempDir;

fn write(dir: &std::path::Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn options() -> ExtractOptions {
    ExtractOptions::default()
}

#[tokio::test]
async fn empty_repository_yields_an_empty_platform_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let platform = extractor::extract(tmp.path(), &options()).await.unwrap();

    assert!(platform.resources.is_empty());
    assert!(platform.relationships.is_empty());
    assert!(platform.parse_errors.is_empty());
}

#[tokio::test]
async fn missing_repo_root_is_the_only_fatal_condition() {
    let err = extractor::extract(std::path::Path::new("/does/not/exist-k8s-obs-agent"), &options())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[tokio::test]
async fn single_replica_postgres_without_exporter_is_not_ready() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "postgres.yaml",
        r#"
apiVersion: apps/v1
kind: StatefulSet
metadata:
  name: postgres
  namespace: data
spec:
  replicas: 1
  selector:
    matchLabels:
      app: postgres
  template:
    metadata:
      labels:
        app: postgres
    spec:
      containers:
      - name: postgres
        image: postgres:15
        env:
        - name: POSTGRES_DB
          value: app
        - name: PGDATA
          value: /var/lib/postgresql/data
        ports:
        - containerPort: 5432
"#,
    );

    let platform = extractor::extract(tmp.path(), &options()).await.unwrap();
    let workload = platform.workloads().next().expect("one workload expected");

    assert_eq!(workload.readiness(), Readiness::NotReady);
    let container = &workload.containers()[0];
    assert_eq!(container.classification.registry_key.as_deref(), Some("postgresql"));
    assert!((container.classification.score - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn three_replica_postgres_with_exporter_sidecar_is_ready() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "postgres.yaml",
        r#"
apiVersion: apps/v1
kind: StatefulSet
metadata:
  name: postgres
  namespace: data
spec:
  replicas: 3
  selector:
    matchLabels:
      app: postgres
  template:
    metadata:
      labels:
        app: postgres
      annotations:
        prometheus.io/scrape: "true"
        prometheus.io/port: "9187"
    spec:
      containers:
      - name: postgres
        image: postgres:15
        ports:
        - containerPort: 5432
      - name: postgres-exporter
        image: prometheuscommunity/postgres-exporter:v0.15.0
        ports:
        - containerPort: 9187
"#,
    );

    let platform = extractor::extract(tmp.path(), &options()).await.unwrap();
    let workload = platform.workloads().next().expect("one workload expected");

    assert_eq!(workload.readiness(), Readiness::Ready);
    assert!(workload.telemetry().iter().any(|c| c == "exporter:postgres_exporter"));
    assert!(workload.telemetry().iter().any(|c| c == "scrape_annotations"));
}

#[tokio::test]
async fn qualified_names_stay_unique_across_a_repository() {
    let tmp = TempDir::new().unwrap();
    for ns in ["a", "b", "c"] {
        write(
            tmp.path(),
            &format!("{ns}/deploy.yaml"),
            &format!(
                r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: {ns}
spec:
  replicas: 1
  template:
    spec:
      containers:
      - name: web
        image: nginx:1.25
"#
            ),
        );
    }

    let platform = extractor::extract(tmp.path(), &options()).await.unwrap();
    let mut qnames: Vec<String> = platform.resources.iter().map(|r| r.qualified_name()).collect();
    qnames.sort();
    let before = qnames.len();
    qnames.dedup();
    assert_eq!(qnames.len(), before, "qualified names must be unique within a Platform");
    assert_eq!(platform.by_kind(K8sResourceKind::Deployment).count(), 3);
}
