//! The curated archetype catalog. Each function builds one [`ArchetypeProfile`]
//! value; [`all`] returns the full catalog keyed by registry key.
//! Construction is a pure function with no shared mutable state or
//! import-time side effects.

use crate::model::{AlertSignal, Archetype, ArchetypeProfile, MetricSignal};

fn metric(name: &str, query: &str, description: &str, panel_hint: &str, requires: &str) -> MetricSignal {
    MetricSignal {
        name: name.to_string(),
        query: query.to_string(),
        description: description.to_string(),
        panel_hint: panel_hint.to_string(),
        requires: requires.to_string(),
    }
}

fn alert(
    name: &str,
    expr: &str,
    severity: &str,
    for_duration: &str,
    summary: &str,
    requires: &str,
) -> AlertSignal {
    AlertSignal {
        name: name.to_string(),
        expr: expr.to_string(),
        severity: severity.to_string(),
        for_duration: for_duration.to_string(),
        summary: summary.to_string(),
        requires: requires.to_string(),
    }
}

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn postgresql() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "postgresql".to_string(),
        archetype: Archetype::Database,
        display_name: "PostgreSQL".to_string(),
        description: "Relational database — monitor connections, replication, query performance, and WAL archiving.".to_string(),
        exporter: "postgres_exporter".to_string(),
        exporter_port: 9187,
        golden_metrics: vec![
            metric("pg_active_connections", "pg_stat_activity_count{state=\"active\"}", "Active connections (should stay below max_connections)", "timeseries", "exporter"),
            metric("pg_replication_lag_bytes", "pg_replication_lag_bytes", "Replication lag in bytes (streaming replicas)", "timeseries", "exporter,replicas>1"),
            metric("pg_transactions_per_sec", "rate(pg_stat_database_xact_commit[5m]) + rate(pg_stat_database_xact_rollback[5m])", "Transaction throughput (commits + rollbacks)", "timeseries", "exporter"),
            metric("pg_cache_hit_ratio", "pg_stat_database_blks_hit / (pg_stat_database_blks_hit + pg_stat_database_blks_read)", "Buffer cache hit ratio (should be > 0.99)", "gauge", "exporter"),
            metric("pg_dead_tuples", "pg_stat_user_tables_n_dead_tup", "Dead tuples awaiting vacuum", "timeseries", "exporter"),
        ],
        alerts: vec![
            alert("PostgresTooManyConnections", "pg_stat_activity_count > (pg_settings_max_connections * 0.8)", "warning", "5m", "PostgreSQL connection count exceeds 80% of max_connections", "exporter"),
            alert("PostgresReplicationLagHigh", "pg_replication_lag_bytes > 100 * 1024 * 1024", "critical", "5m", "PostgreSQL replication lag exceeds 100 MB", "exporter,replicas>1"),
            alert("PostgresDeadTuplesHigh", "pg_stat_user_tables_n_dead_tup > 10000", "warning", "15m", "High dead tuple count — autovacuum may be falling behind", "exporter"),
            alert("PostgresCacheHitRatioLow", "(pg_stat_database_blks_hit / (pg_stat_database_blks_hit + pg_stat_database_blks_read)) < 0.95", "warning", "10m", "Buffer cache hit ratio below 95% — consider increasing shared_buffers", "exporter"),
        ],
        dashboard_ids: vec![9628],
        dashboard_tags: strs(&["postgresql", "database"]),
        health_requirements: strs(&[
            "Deploy postgres_exporter sidecar or standalone to expose pg_* metrics",
            "Ensure pg_stat_statements extension is enabled for query-level visibility",
            "Configure WAL archiving for point-in-time recovery monitoring",
        ]),
        recommendations: strs(&[
            "Use a StatefulSet with PVCs for data durability",
            "Set resource limits — PostgreSQL will use all available memory for shared_buffers",
            "Add a readiness probe on port 5432 (pg_isready)",
            "Monitor pg_stat_statements for slow query detection",
        ]),
    }
}

pub fn mysql() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "mysql".to_string(),
        archetype: Archetype::Database,
        display_name: "MySQL".to_string(),
        description: "Relational database — monitor connections, replication, InnoDB buffer pool, and slow queries.".to_string(),
        exporter: "mysqld_exporter".to_string(),
        exporter_port: 9104,
        golden_metrics: vec![
            metric("mysql_connections", "mysql_global_status_threads_connected", "Current open connections", "timeseries", "exporter"),
            metric("mysql_queries_per_sec", "rate(mysql_global_status_queries[5m])", "Query throughput", "timeseries", "exporter"),
            metric("mysql_slow_queries", "rate(mysql_global_status_slow_queries[5m])", "Slow query rate", "timeseries", "exporter"),
            metric("mysql_innodb_buffer_pool_hit_ratio", "1 - (rate(mysql_global_status_innodb_buffer_pool_reads[5m]) / rate(mysql_global_status_innodb_buffer_pool_read_requests[5m]))", "InnoDB buffer pool hit ratio", "gauge", "exporter"),
            metric("mysql_replication_lag", "mysql_slave_status_seconds_behind_master", "Replication lag in seconds", "timeseries", "exporter,replicas>1"),
        ],
        alerts: vec![
            alert("MySQLTooManyConnections", "mysql_global_status_threads_connected > (mysql_global_variables_max_connections * 0.8)", "warning", "5m", "MySQL connection count exceeds 80% of max_connections", "exporter"),
            alert("MySQLReplicationLagHigh", "mysql_slave_status_seconds_behind_master > 30", "critical", "5m", "MySQL replication lag exceeds 30 seconds", "exporter,replicas>1"),
            alert("MySQLSlowQueryRateHigh", "rate(mysql_global_status_slow_queries[5m]) > 0.1", "warning", "10m", "Elevated slow query rate", "exporter"),
        ],
        dashboard_ids: vec![7362],
        dashboard_tags: strs(&["mysql", "database"]),
        health_requirements: strs(&[
            "Deploy mysqld_exporter sidecar to expose mysql_* metrics",
            "Enable performance_schema for query-level monitoring",
        ]),
        recommendations: strs(&[
            "Use a StatefulSet with PVCs for data durability",
            "Set innodb_buffer_pool_size to ~70% of available memory",
            "Add a readiness probe using mysqladmin ping",
        ]),
    }
}

pub fn redis() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "redis".to_string(),
        archetype: Archetype::Cache,
        display_name: "Redis".to_string(),
        description: "In-memory data store — monitor memory usage, evictions, hit rate, and connected clients.".to_string(),
        exporter: "redis_exporter".to_string(),
        exporter_port: 9121,
        golden_metrics: vec![
            metric("redis_memory_used_bytes", "redis_memory_used_bytes", "Current memory usage", "timeseries", "exporter"),
            metric("redis_memory_max_bytes", "redis_memory_max_bytes", "Configured maxmemory limit", "timeseries", "exporter"),
            metric("redis_hit_rate", "rate(redis_keyspace_hits_total[5m]) / (rate(redis_keyspace_hits_total[5m]) + rate(redis_keyspace_misses_total[5m]))", "Cache hit ratio", "gauge", "exporter"),
            metric("redis_evicted_keys", "rate(redis_evicted_keys_total[5m])", "Key eviction rate — nonzero means memory pressure", "timeseries", "exporter"),
            metric("redis_connected_clients", "redis_connected_clients", "Current client connections", "timeseries", "exporter"),
            metric("redis_ops_per_sec", "rate(redis_commands_processed_total[5m])", "Command throughput", "timeseries", "exporter"),
        ],
        alerts: vec![
            alert("RedisMemoryNearMax", "redis_memory_used_bytes / redis_memory_max_bytes > 0.9", "warning", "5m", "Redis memory usage above 90% of maxmemory", "exporter"),
            alert("RedisEvictionsActive", "rate(redis_evicted_keys_total[5m]) > 0", "warning", "10m", "Redis is actively evicting keys — memory pressure", "exporter"),
            alert("RedisHighLatency", "redis_slowlog_length > 10", "warning", "5m", "Redis slowlog growing — possible performance degradation", "exporter"),
        ],
        dashboard_ids: vec![11835],
        dashboard_tags: strs(&["redis", "cache"]),
        health_requirements: strs(&[
            "Deploy redis_exporter sidecar to expose redis_* metrics",
            "Configure maxmemory and maxmemory-policy to prevent OOM kills",
        ]),
        recommendations: strs(&[
            "Set maxmemory-policy (allkeys-lru for cache, noeviction for queues)",
            "Monitor keyspace hit ratio — below 90% indicates poor cache utilization",
            "Use a readiness probe via redis-cli ping",
        ]),
    }
}

/// Memcached gets its own profile — it is not routed to the Redis profile
/// despite sharing a cache archetype.
pub fn memcached() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "memcached".to_string(),
        archetype: Archetype::Cache,
        display_name: "Memcached".to_string(),
        description: "Distributed memory object cache — monitor connection count, hit/miss ratio, and eviction pressure.".to_string(),
        exporter: "memcached_exporter".to_string(),
        exporter_port: 9150,
        golden_metrics: vec![
            metric("memcached_up", "memcached_up", "Exporter-reported reachability", "stat", "exporter"),
            metric("memcached_current_connections", "memcached_current_connections", "Current open connections", "timeseries", "exporter"),
            metric("memcached_hit_ratio", "rate(memcached_commands_total{command=\"get\",status=\"hit\"}[5m]) / rate(memcached_commands_total{command=\"get\"}[5m])", "Cache hit ratio", "gauge", "exporter"),
            metric("memcached_eviction_rate", "rate(memcached_items_evicted_total[5m])", "Item eviction rate — nonzero means memory pressure", "timeseries", "exporter"),
        ],
        alerts: vec![
            alert("MemcachedDown", "memcached_up == 0", "critical", "2m", "Memcached instance is unreachable by the exporter", "exporter"),
            alert("MemcachedHighEvictionRate", "rate(memcached_items_evicted_total[5m]) > 0", "warning", "10m", "Memcached is actively evicting items — memory pressure", "exporter"),
            alert("MemcachedConnectionsNearLimit", "memcached_current_connections > memcached_max_connections * 0.9", "warning", "5m", "Memcached connections approaching configured limit", "exporter"),
        ],
        dashboard_ids: vec![1412],
        dashboard_tags: strs(&["memcached", "cache"]),
        health_requirements: strs(&[
            "Deploy memcached_exporter sidecar to expose memcached_* metrics",
        ]),
        recommendations: strs(&[
            "Size -m (max memory) based on working set, not total node memory",
            "Monitor hit ratio — sustained drops below 80% indicate undersized cache or poor key design",
        ]),
    }
}

pub fn mongodb() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "mongodb".to_string(),
        archetype: Archetype::Database,
        display_name: "MongoDB".to_string(),
        description: "Document database — monitor connections, oplog, replica set health, and WiredTiger cache.".to_string(),
        exporter: "mongodb_exporter".to_string(),
        exporter_port: 9216,
        golden_metrics: vec![
            metric("mongodb_connections_current", "mongodb_ss_connections{conn_type='current'}", "Current connections", "timeseries", "exporter"),
            metric("mongodb_opcounters", "rate(mongodb_ss_opcounters_total[5m])", "Operation counters (insert/query/update/delete)", "timeseries", "exporter"),
            metric("mongodb_repl_lag", "mongodb_mongod_replset_member_optime_date - mongodb_mongod_replset_member_optime_date{state='PRIMARY'}", "Replication lag", "timeseries", "exporter,replicas>1"),
            metric("mongodb_wiredtiger_cache", "mongodb_ss_wt_cache_bytes_currently_in_the_cache", "WiredTiger cache usage", "timeseries", "exporter"),
        ],
        alerts: vec![
            alert("MongoDBReplicationLag", "mongodb_mongod_replset_member_replication_lag > 10", "critical", "5m", "MongoDB replica set member lagging behind primary", "exporter,replicas>1"),
            alert("MongoDBConnectionsHigh", "mongodb_ss_connections{conn_type='current'} > 5000", "warning", "5m", "MongoDB connection count high", "exporter"),
        ],
        dashboard_ids: vec![2583],
        dashboard_tags: strs(&["mongodb", "database"]),
        health_requirements: strs(&["Deploy mongodb_exporter to expose mongodb_* metrics"]),
        recommendations: strs(&[
            "Use a StatefulSet for replica set members",
            "Monitor oplog window size for replication health",
        ]),
    }
}

pub fn elasticsearch() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "elasticsearch".to_string(),
        archetype: Archetype::SearchEngine,
        display_name: "Elasticsearch".to_string(),
        description: "Search and analytics engine — monitor cluster health, JVM heap, indexing rate, and shard allocation.".to_string(),
        exporter: "elasticsearch_exporter".to_string(),
        exporter_port: 9114,
        golden_metrics: vec![
            metric("es_cluster_health", "elasticsearch_cluster_health_status", "Cluster health (green/yellow/red)", "stat", "exporter"),
            metric("es_jvm_heap_used", "elasticsearch_jvm_memory_used_bytes{area='heap'}", "JVM heap usage", "timeseries", "exporter"),
            metric("es_indexing_rate", "rate(elasticsearch_indices_indexing_index_total[5m])", "Document indexing rate", "timeseries", "exporter"),
            metric("es_search_latency", "elasticsearch_indices_search_fetch_time_seconds / elasticsearch_indices_search_fetch_total", "Average search latency", "timeseries", "exporter"),
            metric("es_unassigned_shards", "elasticsearch_cluster_health_unassigned_shards", "Unassigned shard count", "timeseries", "exporter"),
        ],
        alerts: vec![
            alert("ElasticsearchClusterRed", "elasticsearch_cluster_health_status{color=\"red\"} == 1", "critical", "1m", "Elasticsearch cluster health is RED", "exporter"),
            alert("ElasticsearchClusterYellow", "elasticsearch_cluster_health_status{color=\"yellow\"} == 1", "warning", "10m", "Elasticsearch cluster health is YELLOW", "exporter"),
            alert("ElasticsearchJVMHeapHigh", "elasticsearch_jvm_memory_used_bytes{area='heap'} / elasticsearch_jvm_memory_max_bytes{area='heap'} > 0.9", "warning", "5m", "Elasticsearch JVM heap usage above 90%", "exporter"),
        ],
        dashboard_ids: vec![266],
        dashboard_tags: strs(&["elasticsearch", "search"]),
        health_requirements: strs(&[
            "Ensure /_cluster/health endpoint is accessible",
            "elasticsearch_exporter sidecar needed for prometheus metrics",
        ]),
        recommendations: strs(&[
            "Set JVM heap to 50% of available memory (max 31 GB)",
            "Monitor unassigned shards — they indicate capacity or config issues",
        ]),
    }
}

pub fn kafka() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "kafka".to_string(),
        archetype: Archetype::MessageQueue,
        display_name: "Kafka".to_string(),
        description: "Distributed event streaming — monitor consumer lag, under-replicated partitions, and broker throughput.".to_string(),
        exporter: "kafka_exporter / JMX exporter".to_string(),
        exporter_port: 9308,
        golden_metrics: vec![
            metric("kafka_consumer_lag", "kafka_consumergroup_lag", "Consumer group lag (messages behind)", "timeseries", "exporter"),
            metric("kafka_under_replicated_partitions", "kafka_server_replicamanager_underreplicatedpartitions", "Under-replicated partitions", "timeseries", "exporter"),
            metric("kafka_messages_in_per_sec", "rate(kafka_server_brokertopicmetrics_messagesin_total[5m])", "Message ingest rate", "timeseries", "exporter"),
            metric("kafka_isr_shrinks", "rate(kafka_server_replicamanager_isrshrinks_total[5m])", "ISR shrink rate — indicates broker instability", "timeseries", "exporter"),
        ],
        alerts: vec![
            alert("KafkaConsumerLagHigh", "kafka_consumergroup_lag > 10000", "warning", "10m", "Kafka consumer group lag exceeds 10k messages", "exporter"),
            alert("KafkaUnderReplicated", "kafka_server_replicamanager_underreplicatedpartitions > 0", "critical", "5m", "Kafka has under-replicated partitions — risk of data loss", "exporter,replicas>1"),
            alert("KafkaISRShrinking", "rate(kafka_server_replicamanager_isrshrinks_total[5m]) > 0", "warning", "5m", "Kafka ISR is shrinking — broker may be unhealthy", "exporter,replicas>1"),
        ],
        dashboard_ids: vec![7589],
        dashboard_tags: strs(&["kafka", "messaging"]),
        health_requirements: strs(&[
            "Deploy kafka_exporter or enable JMX exporter for kafka_* metrics",
            "Monitor ZooKeeper (or KRaft controller) health separately",
        ]),
        recommendations: strs(&[
            "Set min.insync.replicas >= 2 for durability",
            "Monitor consumer lag per consumer group, not just globally",
        ]),
    }
}

pub fn rabbitmq() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "rabbitmq".to_string(),
        archetype: Archetype::MessageQueue,
        display_name: "RabbitMQ".to_string(),
        description: "Message broker — monitor queue depth, consumer utilization, and node memory.".to_string(),
        exporter: "rabbitmq_prometheus (built-in)".to_string(),
        exporter_port: 15692,
        golden_metrics: vec![
            metric("rabbitmq_queue_messages", "rabbitmq_queue_messages", "Messages ready + unacknowledged per queue", "timeseries", ""),
            metric("rabbitmq_queue_consumers", "rabbitmq_queue_consumers", "Consumer count per queue", "timeseries", ""),
            metric("rabbitmq_node_mem_used", "rabbitmq_process_resident_memory_bytes", "Node resident memory", "timeseries", ""),
            metric("rabbitmq_publish_rate", "rate(rabbitmq_channel_messages_published_total[5m])", "Message publish rate", "timeseries", ""),
        ],
        alerts: vec![
            alert("RabbitMQQueueBacklog", "rabbitmq_queue_messages > 10000", "warning", "10m", "RabbitMQ queue depth exceeds 10k messages", ""),
            alert("RabbitMQNoConsumers", "rabbitmq_queue_consumers == 0 and rabbitmq_queue_messages > 0", "critical", "5m", "RabbitMQ queue has messages but no consumers", ""),
            alert("RabbitMQHighMemory", "rabbitmq_process_resident_memory_bytes / rabbitmq_node_mem_limit > 0.8", "warning", "5m", "RabbitMQ memory usage above 80% of limit", ""),
        ],
        dashboard_ids: vec![10991],
        dashboard_tags: strs(&["rabbitmq", "messaging"]),
        health_requirements: strs(&["Enable the rabbitmq_prometheus plugin (ships with RabbitMQ 3.8+)"]),
        recommendations: strs(&[
            "Set per-queue message TTL and max-length policies",
            "Monitor individual queue depth, not just node-level aggregates",
        ]),
    }
}

pub fn nats() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "nats".to_string(),
        archetype: Archetype::MessageQueue,
        display_name: "NATS".to_string(),
        description: "Cloud-native messaging — monitor connection count, message throughput, and JetStream stream lag.".to_string(),
        exporter: "prometheus-nats-exporter".to_string(),
        exporter_port: 7777,
        golden_metrics: vec![
            metric("nats_connections", "nats_varz_connections", "Active client connections", "timeseries", "exporter"),
            metric("nats_messages_in", "rate(nats_varz_in_msgs[5m])", "Inbound message rate", "timeseries", "exporter"),
            metric("nats_slow_consumers", "nats_varz_slow_consumers", "Slow consumer count", "timeseries", "exporter"),
        ],
        alerts: vec![
            alert("NATSSlowConsumers", "nats_varz_slow_consumers > 0", "warning", "5m", "NATS has slow consumers — messages may be dropped", "exporter"),
        ],
        dashboard_ids: vec![2279],
        dashboard_tags: strs(&["nats", "messaging"]),
        health_requirements: strs(&["Deploy prometheus-nats-exporter sidecar"]),
        recommendations: strs(&["Monitor JetStream consumer ack-pending for delivery guarantees"]),
    }
}

pub fn nginx() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "nginx".to_string(),
        archetype: Archetype::WebServer,
        display_name: "NGINX".to_string(),
        description: "Web server / reverse proxy — monitor active connections, request rate, upstream response times, and error rates.".to_string(),
        exporter: "nginx-prometheus-exporter (stub_status) or nginx-vts-exporter".to_string(),
        exporter_port: 9113,
        golden_metrics: vec![
            metric("nginx_active_connections", "nginx_connections_active", "Currently active client connections", "timeseries", "exporter"),
            metric("nginx_request_rate", "rate(nginx_http_requests_total[5m])", "HTTP request throughput", "timeseries", "exporter"),
            metric("nginx_5xx_rate", "rate(nginx_http_requests_total{status=~\"5..\"}[5m])", "5xx error rate", "timeseries", "exporter"),
            metric("nginx_upstream_response_time", "nginx_upstream_response_time_seconds{quantile=\"0.95\"}", "95th percentile upstream response time", "timeseries", "exporter"),
        ],
        alerts: vec![
            alert("NginxHighErrorRate", "rate(nginx_http_requests_total{status=~\"5..\"}[5m]) / rate(nginx_http_requests_total[5m]) > 0.05", "critical", "5m", "NGINX 5xx error rate exceeds 5%", "exporter"),
            alert("NginxConnectionsNearLimit", "nginx_connections_active > 900", "warning", "5m", "NGINX active connections approaching worker_connections limit", "exporter"),
        ],
        dashboard_ids: vec![12708],
        dashboard_tags: strs(&["nginx", "web"]),
        health_requirements: strs(&[
            "Enable stub_status or the VTS module for metrics exposure",
            "Deploy nginx-prometheus-exporter sidecar",
        ]),
        recommendations: strs(&[
            "Add upstream health checks in nginx.conf",
            "Set worker_connections based on expected concurrent load",
        ]),
    }
}

pub fn envoy() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "envoy".to_string(),
        archetype: Archetype::ReverseProxy,
        display_name: "Envoy".to_string(),
        description: "Service proxy — monitor request latency percentiles, circuit breaker state, and upstream health.".to_string(),
        exporter: "built-in (/stats/prometheus)".to_string(),
        exporter_port: 9901,
        golden_metrics: vec![
            metric("envoy_request_rate", "rate(envoy_http_downstream_rq_total[5m])", "Downstream request rate", "timeseries", ""),
            metric("envoy_5xx_rate", "rate(envoy_http_downstream_rq_xx{envoy_response_code_class=\"5\"}[5m])", "5xx response rate", "timeseries", ""),
            metric("envoy_p99_latency", "histogram_quantile(0.99, rate(envoy_http_downstream_rq_time_bucket[5m]))", "p99 request latency", "timeseries", ""),
            metric("envoy_cx_active", "envoy_http_downstream_cx_active", "Active downstream connections", "timeseries", ""),
        ],
        alerts: vec![
            alert("EnvoyHighLatency", "histogram_quantile(0.99, rate(envoy_http_downstream_rq_time_bucket[5m])) > 1", "warning", "5m", "Envoy p99 latency exceeds 1 second", ""),
            alert("EnvoyCircuitBreakerTripped", "envoy_cluster_circuit_breakers_default_cx_open > 0", "critical", "1m", "Envoy circuit breaker is open — upstream is unhealthy", ""),
        ],
        dashboard_ids: vec![11022],
        dashboard_tags: strs(&["envoy", "proxy", "service-mesh"]),
        health_requirements: strs(&["Ensure /stats/prometheus endpoint is not blocked by network policy"]),
        recommendations: strs(&[
            "Configure circuit breakers per upstream cluster",
            "Monitor retry budgets to avoid retry storms",
        ]),
    }
}

pub fn haproxy() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "haproxy".to_string(),
        archetype: Archetype::ReverseProxy,
        display_name: "HAProxy".to_string(),
        description: "Load balancer — monitor backend health, session rate, and queue depth.".to_string(),
        exporter: "haproxy_exporter or built-in prometheus endpoint".to_string(),
        exporter_port: 8405,
        golden_metrics: vec![
            metric("haproxy_backend_up", "haproxy_backend_up", "Backend server health", "stat", ""),
            metric("haproxy_session_rate", "rate(haproxy_frontend_sessions_total[5m])", "Frontend session rate", "timeseries", ""),
            metric("haproxy_queue_current", "haproxy_backend_current_queue", "Backend queue depth", "timeseries", ""),
        ],
        alerts: vec![
            alert("HAProxyBackendDown", "haproxy_backend_up == 0", "critical", "1m", "HAProxy backend is completely down", ""),
            alert("HAProxyQueueBacklog", "haproxy_backend_current_queue > 100", "warning", "5m", "HAProxy backend queue building up", ""),
        ],
        dashboard_ids: vec![2428],
        dashboard_tags: strs(&["haproxy", "loadbalancer"]),
        health_requirements: strs(&["Enable the Prometheus endpoint in haproxy.cfg"]),
        recommendations: strs(&["Monitor per-backend server health individually"]),
    }
}

pub fn prometheus() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "prometheus".to_string(),
        archetype: Archetype::Monitoring,
        display_name: "Prometheus".to_string(),
        description: "Monitoring system — monitor scrape health, TSDB size, rule evaluation duration, and WAL corruption.".to_string(),
        exporter: "built-in (/metrics)".to_string(),
        exporter_port: 9090,
        golden_metrics: vec![
            metric("prometheus_tsdb_head_series", "prometheus_tsdb_head_series", "Active time series count", "timeseries", ""),
            metric("prometheus_target_scrape_failures", "rate(prometheus_target_scrapes_failed_total[5m])", "Scrape failure rate", "timeseries", ""),
            metric("prometheus_rule_eval_duration", "prometheus_rule_evaluation_duration_seconds", "Rule evaluation latency", "timeseries", ""),
        ],
        alerts: vec![
            alert("PrometheusTargetDown", "up == 0", "critical", "5m", "Prometheus scrape target is down", ""),
            alert("PrometheusTSDBCompactionFailing", "rate(prometheus_tsdb_compactions_failed_total[5m]) > 0", "warning", "15m", "Prometheus TSDB compaction failures", ""),
        ],
        dashboard_ids: vec![3662],
        dashboard_tags: strs(&["prometheus", "monitoring"]),
        health_requirements: strs(&["Prometheus exposes its own /metrics endpoint by default"]),
        recommendations: strs(&[
            "Monitor cardinality — high series counts cause memory issues",
            "Set --storage.tsdb.retention.size to prevent disk exhaustion",
        ]),
    }
}

pub fn grafana() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "grafana".to_string(),
        archetype: Archetype::Monitoring,
        display_name: "Grafana".to_string(),
        description: "Visualization platform — monitor datasource health and API latency.".to_string(),
        exporter: "built-in (/metrics)".to_string(),
        exporter_port: 3000,
        golden_metrics: vec![
            metric("grafana_http_request_duration", "histogram_quantile(0.95, rate(grafana_http_request_duration_seconds_bucket[5m]))", "p95 API latency", "timeseries", ""),
            metric("grafana_datasource_errors", "rate(grafana_datasource_request_total{status='error'}[5m])", "Datasource error rate", "timeseries", ""),
        ],
        alerts: vec![
            alert("GrafanaDatasourceErrors", "rate(grafana_datasource_request_total{status='error'}[5m]) > 0.5", "warning", "5m", "Grafana datasource errors elevated", ""),
        ],
        dashboard_ids: vec![],
        dashboard_tags: strs(&["grafana", "monitoring"]),
        health_requirements: strs(&["Enable built-in Prometheus metrics in grafana.ini"]),
        recommendations: strs(&["Monitor dashboard load times for user experience"]),
    }
}

pub fn fluentd_fluent_bit() -> ArchetypeProfile {
    ArchetypeProfile {
        registry_key: "fluentd_fluent_bit".to_string(),
        archetype: Archetype::Logging,
        display_name: "Fluentd/Fluent Bit".to_string(),
        description: "Log collector — monitor buffer queue length, retry rate, and output errors.".to_string(),
        exporter: "built-in (in_prometheus plugin)".to_string(),
        exporter_port: 24231,
        golden_metrics: vec![
            metric("fluentd_buffer_queue_length", "fluentd_output_status_buffer_queue_length", "Buffer queue depth", "timeseries", ""),
            metric("fluentd_retry_count", "rate(fluentd_output_status_retry_count[5m])", "Output retry rate", "timeseries", ""),
            metric("fluentd_emit_records", "rate(fluentd_output_status_emit_records[5m])", "Record emission rate", "timeseries", ""),
        ],
        alerts: vec![
            alert("FluentdBufferFull", "fluentd_output_status_buffer_queue_length > 256", "critical", "5m", "Fluentd buffer queue is full — logs may be dropped", ""),
            alert("FluentdRetryHigh", "rate(fluentd_output_status_retry_count[5m]) > 1", "warning", "10m", "Fluentd retry rate elevated — output destination may be unhealthy", ""),
        ],
        dashboard_ids: vec![7752],
        dashboard_tags: strs(&["fluentd", "logging"]),
        health_requirements: strs(&["Enable the in_prometheus plugin for fluentd_* metrics"]),
        recommendations: strs(&[
            "Size buffers based on peak log throughput",
            "Monitor retry count per output plugin",
        ]),
    }
}

/// Every profile in the catalog, in registration order.
pub fn all() -> Vec<ArchetypeProfile> {
    vec![
        postgresql(),
        mysql(),
        redis(),
        memcached(),
        mongodb(),
        elasticsearch(),
        kafka(),
        rabbitmq(),
        nats(),
        nginx(),
        envoy(),
        haproxy(),
        prometheus(),
        grafana(),
        fluentd_fluent_bit(),
    ]
}
