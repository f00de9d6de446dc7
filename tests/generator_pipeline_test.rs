use chrono::{TimeZone, Utc};
use port_registry::generators::{run_all, OutputTargets};
use port_registry::Registry;
use std::sync::Arc;
use tempfile::tempdir;

const SAMPLE: &str = r#"
version: "1.0.0"
lastUpdated: "2026-08-01"
ranges:
  core: "3000-3099"
  data: "5400-5499"
services:
  - name: demo-container
    stack: core
    port: 3001
    protocol: http
    owner: platform-team
    description: "Demo service inside the container network"
    container: true
    network: core
    healthcheck:
      endpoint: /health
      expected: 200
  - name: orders-db
    stack: data
    port: 5432
    protocol: postgres
    owner: data-team
    description: "Primary orders database"
    container: true
    network: data
"#;

fn sample_registry() -> Registry {
    serde_yaml::from_str(SAMPLE).expect("sample should parse")
}

#[tokio::test]
async fn run_all_writes_every_artifact() {
    let dir = tempdir().unwrap();
    let targets = OutputTargets::under(dir.path());
    let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();

    run_all(Arc::new(sample_registry()), targets.clone(), now)
        .await
        .expect("generation should succeed");

    // Env file
    let env = std::fs::read_to_string(&targets.env_file).unwrap();
    assert!(env.contains("DEMO_CONTAINER_PORT=3001"));
    assert!(env.contains("DEMO_CONTAINER_HOST=demo-container"));
    assert!(env.contains("DEMO_CONTAINER_URL=http://demo-container:3001"));
    assert!(env.contains("ORDERS_DB_URL=postgres://orders-db:5432"));

    // Docs
    let docs = std::fs::read_to_string(&targets.docs_file).unwrap();
    assert!(docs.contains("# Service Port Registry"));
    assert!(docs.contains("| core | 3000-3099 |"));
    assert!(docs.contains("| demo-container | 3001 |"));

    // Compose dictionary
    let dict = std::fs::read_to_string(&targets.compose_dictionary).unwrap();
    assert!(dict.contains("demo-container:"));
    assert!(dict.contains("env: DEMO_CONTAINER_PORT"));

    // One overlay per stack
    let core_overlay = targets.compose_dir.join("docker-compose.core.ports.yaml");
    let data_overlay = targets.compose_dir.join("docker-compose.data.ports.yaml");
    let core = std::fs::read_to_string(&core_overlay).unwrap();
    assert!(core.contains("stack 'core'"));
    assert!(core.contains("- \"3001:3001\""));
    assert!(std::fs::read_to_string(&data_overlay)
        .unwrap()
        .contains("orders-db:"));

    // Index
    let index: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&targets.index_file).unwrap()).unwrap();
    assert_eq!(index["version"], "1.0.0");
    assert_eq!(index["generatedAt"], "2026-08-01T12:00:00+00:00");
    assert_eq!(index["services"][0]["port"], 3001);
    assert_eq!(index["services"][1]["port"], 5432);

    // Health script: probe for the one declared healthcheck, executable
    let script = std::fs::read_to_string(&targets.health_script).unwrap();
    assert!(script.contains("probe 'demo-container' 'http://demo-container:3001/health' '200'"));
    assert!(!script.contains("probe 'orders-db'"));
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&targets.health_script)
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111, "health script should be executable");
    }
}

#[tokio::test]
async fn generation_is_deterministic_for_a_fixed_timestamp() {
    let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();

    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    let targets_a = OutputTargets::under(dir_a.path());
    let targets_b = OutputTargets::under(dir_b.path());

    run_all(Arc::new(sample_registry()), targets_a.clone(), now)
        .await
        .unwrap();
    run_all(Arc::new(sample_registry()), targets_b.clone(), now)
        .await
        .unwrap();

    for (a, b) in [
        (&targets_a.env_file, &targets_b.env_file),
        (&targets_a.docs_file, &targets_b.docs_file),
        (&targets_a.compose_dictionary, &targets_b.compose_dictionary),
        (&targets_a.index_file, &targets_b.index_file),
        (&targets_a.health_script, &targets_b.health_script),
    ] {
        assert_eq!(
            std::fs::read(a).unwrap(),
            std::fs::read(b).unwrap(),
            "{} differs between runs",
            a.display()
        );
    }
}

#[tokio::test]
async fn a_failing_generator_does_not_suppress_the_others() {
    let dir = tempdir().unwrap();
    let mut targets = OutputTargets::under(dir.path());
    // Point the env file somewhere unwritable so exactly one generator fails.
    targets.env_file = std::path::PathBuf::from("/proc/port-registry-denied/ports.env");
    let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();

    let err = run_all(Arc::new(sample_registry()), targets.clone(), now)
        .await
        .expect_err("env generator should fail");
    assert!(err.to_string().contains("env"));

    // The other artifacts were still written.
    assert!(targets.docs_file.exists());
    assert!(targets.index_file.exists());
    assert!(targets.health_script.exists());
}
