//! Static resource-type → archetype/notes lookup tables shared by the four
//! IaC sub-extractors.

/// Terraform/Kubernetes-provider resource type → (archetype, monitoring notes).
pub fn infra_archetype(resource_type: &str) -> (Option<&'static str>, Vec<&'static str>) {
    let table: &[(&str, &str, &[&str])] = &[
        ("aws_db_instance", "database", &["Needs CloudWatch or postgres_exporter/mysqld_exporter", "Monitor replication lag, connections, IOPS"]),
        ("aws_rds_cluster", "database", &["Needs CloudWatch or postgres_exporter/mysqld_exporter", "Monitor replication lag, connections, IOPS"]),
        ("aws_rds_cluster_instance", "database", &["Instance-level monitoring", "Monitor CPU, memory, disk"]),
        ("aws_elasticache_cluster", "cache", &["Needs CloudWatch or redis_exporter/memcached_exporter", "Monitor hit rate, evictions, memory"]),
        ("aws_elasticache_replication_group", "cache", &["Needs redis_exporter", "Monitor replication, failover, memory"]),
        ("aws_mq_broker", "message-queue", &["Needs CloudWatch or rabbitmq_exporter", "Monitor queue depth, consumers, message rates"]),
        ("aws_msk_cluster", "message-queue", &["Needs kafka_exporter or JMX", "Monitor consumer lag, partition count, ISR"]),
        ("aws_elasticsearch_domain", "search-engine", &["Needs CloudWatch or elasticsearch_exporter", "Monitor cluster health, indexing rate, search latency"]),
        ("aws_opensearch_domain", "search-engine", &["Needs CloudWatch or elasticsearch_exporter", "Monitor cluster health, indexing rate, search latency"]),
        ("aws_sqs_queue", "message-queue", &["Needs CloudWatch", "Monitor queue depth, age of oldest message"]),
        ("aws_sns_topic", "message-queue", &["Needs CloudWatch", "Monitor delivery failures, message count"]),
        ("aws_ecs_service", "custom-app", &["Needs CloudWatch Container Insights", "Monitor task count, CPU, memory"]),
        ("aws_lambda_function", "custom-app", &["Needs CloudWatch", "Monitor invocations, errors, duration, throttles"]),
        ("aws_s3_bucket", "custom-app", &["Optional CloudWatch", "Monitor request count, errors, latency if heavily used"]),
        ("google_sql_database_instance", "database", &["Needs Cloud Monitoring or postgres_exporter/mysqld_exporter", "Monitor connections, replication lag, disk"]),
        ("google_redis_instance", "cache", &["Needs Cloud Monitoring or redis_exporter", "Monitor hit rate, evictions, memory"]),
        ("google_pubsub_topic", "message-queue", &["Needs Cloud Monitoring", "Monitor message backlog, delivery latency"]),
        ("google_pubsub_subscription", "message-queue", &["Needs Cloud Monitoring", "Monitor unacked messages, delivery latency"]),
        ("google_container_cluster", "custom-app", &["GKE cluster — needs kube-state-metrics, node-exporter", "Monitor node health, pod scheduling, API server"]),
        ("azurerm_postgresql_server", "database", &["Needs Azure Monitor or postgres_exporter", "Monitor connections, replication, storage"]),
        ("azurerm_postgresql_flexible_server", "database", &["Needs Azure Monitor or postgres_exporter", "Monitor connections, replication, storage"]),
        ("azurerm_mysql_server", "database", &["Needs Azure Monitor or mysqld_exporter", "Monitor connections, replication, storage"]),
        ("azurerm_mysql_flexible_server", "database", &["Needs Azure Monitor or mysqld_exporter", "Monitor connections, replication, storage"]),
        ("azurerm_redis_cache", "cache", &["Needs Azure Monitor or redis_exporter", "Monitor hit rate, evictions, memory, connections"]),
        ("azurerm_cosmosdb_account", "database", &["Needs Azure Monitor", "Monitor RU consumption, latency, availability"]),
        ("azurerm_servicebus_namespace", "message-queue", &["Needs Azure Monitor", "Monitor queue depth, message count, dead letters"]),
        ("azurerm_eventhub_namespace", "message-queue", &["Needs Azure Monitor", "Monitor throughput units, incoming/outgoing messages"]),
        ("azurerm_kubernetes_cluster", "custom-app", &["AKS cluster — needs kube-state-metrics, node-exporter", "Monitor node health, pod scheduling"]),
        ("kubernetes_deployment", "custom-app", &["Standard K8s workload", "Monitor replicas, restarts, CPU/memory"]),
        ("kubernetes_deployment_v1", "custom-app", &["Standard K8s workload", "Monitor replicas, restarts, CPU/memory"]),
        ("kubernetes_stateful_set", "custom-app", &["Stateful workload", "Monitor volume usage, pod identity, restarts"]),
        ("kubernetes_stateful_set_v1", "custom-app", &["Stateful workload", "Monitor volume usage, pod identity, restarts"]),
        ("kubernetes_daemon_set", "custom-app", &["DaemonSet", "Monitor desired vs current, node coverage"]),
        ("kubernetes_daemon_set_v1", "custom-app", &["DaemonSet", "Monitor desired vs current, node coverage"]),
        ("kubernetes_service", "custom-app", &["K8s Service", "Monitor endpoints, latency if behind mesh"]),
        ("kubernetes_service_v1", "custom-app", &["K8s Service", "Monitor endpoints, latency if behind mesh"]),
        ("kubernetes_ingress", "reverse-proxy", &["Ingress controller", "Monitor request rate, error rate, latency"]),
        ("kubernetes_ingress_v1", "reverse-proxy", &["Ingress controller", "Monitor request rate, error rate, latency"]),
        ("kubernetes_namespace", "custom-app", &[]),
        ("kubernetes_namespace_v1", "custom-app", &[]),
        ("kubernetes_config_map", "custom-app", &[]),
        ("kubernetes_config_map_v1", "custom-app", &[]),
        ("kubernetes_secret", "custom-app", &[]),
        ("kubernetes_secret_v1", "custom-app", &[]),
    ];
    for (key, arch, notes) in table {
        if *key == resource_type {
            return (Some(arch), notes.to_vec());
        }
    }
    (None, Vec::new())
}

/// Helm chart/dependency name (substring, case-insensitive) → archetype.
/// First matching pattern wins, scanned in table declaration order.
pub fn helm_chart_archetype(chart_name: &str) -> (Option<&'static str>, Vec<&'static str>) {
    let name = chart_name.to_lowercase();
    let table: &[(&str, &str, &[&str])] = &[
        ("postgresql", "database", &["Deploy postgres_exporter sidecar", "Import dashboard 9628"]),
        ("mysql", "database", &["Deploy mysqld_exporter sidecar", "Import dashboard 7362"]),
        ("mariadb", "database", &["Deploy mysqld_exporter sidecar", "Import dashboard 7362"]),
        ("mongodb", "database", &["Deploy mongodb_exporter sidecar", "Import dashboard 2583"]),
        ("redis", "cache", &["Deploy redis_exporter sidecar", "Import dashboard 11835"]),
        ("memcached", "cache", &["Deploy memcached_exporter sidecar"]),
        ("rabbitmq", "message-queue", &["Built-in Prometheus metrics", "Import dashboard 10991"]),
        ("kafka", "message-queue", &["Deploy kafka_exporter", "Import dashboard 7589"]),
        ("nats", "message-queue", &["Built-in /metrics endpoint", "Import dashboard 2279"]),
        ("elasticsearch", "search-engine", &["Deploy elasticsearch_exporter", "Import dashboard 4358"]),
        ("opensearch", "search-engine", &["Deploy elasticsearch_exporter"]),
        ("nginx-ingress", "reverse-proxy", &["Import NGINX Ingress dashboard 9614"]),
        ("ingress-nginx", "reverse-proxy", &["Import NGINX Ingress dashboard 9614"]),
        ("nginx", "web-server", &["Import dashboard 9614"]),
        ("traefik", "reverse-proxy", &["Built-in /metrics endpoint"]),
        ("prometheus", "monitoring", &["Self-monitoring"]),
        ("grafana", "monitoring", &["Grafana self-monitoring"]),
        ("loki", "logging", &["Loki metrics"]),
        ("argocd", "custom-app", &["Built-in metrics", "Import dashboard 14584"]),
        ("cert-manager", "custom-app", &["Built-in metrics", "Import dashboard 11001"]),
        ("harbor", "custom-app", &["Deploy postgres_exporter, redis_exporter", "Import dashboard 14075"]),
        ("minio", "custom-app", &["Built-in /minio/v2/metrics", "Import dashboard 13502"]),
        ("istio", "reverse-proxy", &["Built-in Envoy metrics", "Import dashboard 7639"]),
        ("consul", "custom-app", &["Built-in /metrics endpoint"]),
        ("vault", "custom-app", &["Built-in /v1/sys/metrics"]),
        ("tekton-pipelines", "custom-app", &["Built-in metrics", "Import dashboard 15698"]),
    ];
    for (pattern, arch, notes) in table {
        if name.contains(pattern) {
            return (Some(arch), notes.to_vec());
        }
    }
    (None, Vec::new())
}

/// Pulumi resource type (e.g. `aws:rds:Instance`) → archetype, matched after
/// normalizing `.`/`/` delimiters to `:` and `k8s:` to `kubernetes:`. Regex/
/// substring false positives are an accepted tradeoff for staying purely
/// static.
pub fn pulumi_archetype(resource_type: &str) -> (Option<&'static str>, Vec<&'static str>) {
    let table: &[(&str, &str, &[&str])] = &[
        ("aws:rds:Instance", "database", &["Needs postgres_exporter/mysqld_exporter"]),
        ("aws:rds:Cluster", "database", &["Needs postgres_exporter/mysqld_exporter"]),
        ("aws:elasticache:Cluster", "cache", &["Needs redis_exporter"]),
        ("aws:elasticache:ReplicationGroup", "cache", &["Needs redis_exporter"]),
        ("aws:mq:Broker", "message-queue", &["Needs rabbitmq_exporter"]),
        ("aws:msk:Cluster", "message-queue", &["Needs kafka_exporter"]),
        ("aws:elasticsearch:Domain", "search-engine", &["Needs elasticsearch_exporter"]),
        ("aws:sqs:Queue", "message-queue", &["Monitor via CloudWatch"]),
        ("gcp:sql:DatabaseInstance", "database", &["Needs postgres_exporter/mysqld_exporter"]),
        ("gcp:redis:Instance", "cache", &["Needs redis_exporter"]),
        ("azure:postgresql:Server", "database", &["Needs postgres_exporter"]),
        ("azure:redis:Cache", "cache", &["Needs redis_exporter"]),
        ("kubernetes:apps/v1:Deployment", "custom-app", &["Standard K8s workload"]),
        ("kubernetes:apps/v1:StatefulSet", "custom-app", &["Stateful workload"]),
        ("kubernetes:apps/v1:DaemonSet", "custom-app", &["DaemonSet"]),
    ];
    let normalised = resource_type.to_lowercase().replace('.', ":").replace('/', ":");
    let normalised_expanded = normalised.replace("k8s:", "kubernetes:");
    for (pulumi_type, arch, notes) in table {
        let key = pulumi_type.to_lowercase().replace('/', ":");
        if normalised.contains(&key) || normalised_expanded.contains(&key) {
            return (Some(arch), notes.to_vec());
        }
    }
    (None, Vec::new())
}
