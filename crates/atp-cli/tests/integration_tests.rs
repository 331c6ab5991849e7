//! Integration tests for CLI commands

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Get the fixtures path
fn fixtures_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures")
}

/// Command preconfigured for the file backend over the fixture states
fn atp_command(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_atp"));
    command
        .args(args)
        .env("ATP_BACKEND", "file")
        .env("ATP_STATE_DIR", format!("{}/states", fixtures_path()))
        .env("XDG_CONFIG_HOME", format!("{}/no-such-config-dir", fixtures_path()))
        .env_remove("ARGOCD_ENV_ATP_BACKEND")
        .env_remove("ARGOCD_ENV_ATP_STATE_DIR")
        .env_remove("RUST_LOG");
    command
}

/// Helper to run atp command
fn atp(args: &[&str]) -> Output {
    atp_command(args).output().expect("Failed to execute atp")
}

mod generate_command {
    use super::*;

    #[test]
    fn test_generate_directory() {
        let output = atp(&["generate", &format!("{}/manifests", fixtures_path())]);

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(output.status.success(), "generate failed: {stderr}");

        let stdout = String::from_utf8_lossy(&output.stdout);
        let documents: Vec<&str> = stdout.split("---\n").collect();
        assert_eq!(documents.len(), 3);

        // Deployment
        assert!(documents[0].contains("kind: Deployment"));
        assert!(documents[0].contains("namespace: payments"));
        assert!(documents[0].contains("replicas: 3"));
        assert!(documents[0].contains("image: registry.example.com/payments-api:1.4.2"));
        assert!(documents[0].contains("value: pay.example.com"));

        // Secret
        assert!(documents[1].contains("kind: Secret"));
        assert!(documents[1].contains("API_TOKEN: dG9rZW4="));
        assert!(documents[1].contains("DATABASE_URL: cG9zdGdyZXM6Ly9hZG1pbjpodW50ZXIyQGRiOjU0MzIvYXBw"));
        assert!(documents[1].contains("DB_PASSWORD_B64: aHVudGVyMg=="));

        // Ignored ConfigMap passes through untouched
        assert!(documents[2].contains("kind: ConfigMap"));
        assert!(documents[2].contains("terraform:not_an_output"));
        assert!(!stdout.contains("<terraform:namespace>"));
    }

    #[test]
    fn test_generate_single_file() {
        let output = atp(&[
            "generate",
            &format!("{}/manifests/02-secret.yaml", fixtures_path()),
        ]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("apiVersion: v1"));
        assert!(!stdout.contains("---"));
        assert!(stdout.contains("namespace: payments"));
    }

    #[test]
    fn test_generate_from_stdin() {
        let mut child = atp_command(&["generate", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn atp");

        child
            .stdin
            .take()
            .unwrap()
            .write_all(
                b"kind: ConfigMap\nmetadata:\n  name: reg\ndata:\n  REGISTRY: <terraform:shared.tfstate#registry>\n",
            )
            .unwrap();
        let output = child.wait_with_output().unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("REGISTRY: registry.example.com"));
    }

    #[test]
    fn test_generate_missing_output_fails() {
        let output = atp(&[
            "generate",
            &format!("{}/broken/missing-output.yaml", fixtures_path()),
        ]);

        assert_eq!(output.status.code(), Some(3));
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("placeholders"));
        assert!(stderr.contains("log_level"));
        assert!(stderr.contains("LOG_LEVEL"));
    }

    #[test]
    fn test_generate_remove_missing_on_service_fails() {
        let output = atp(&[
            "generate",
            &format!("{}/broken/remove-missing-service.yaml", fixtures_path()),
        ]);

        assert_eq!(output.status.code(), Some(3));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("atp.kubernetes.io/remove-missing"));
        assert!(stderr.contains("ConfigMap"));
    }

    #[test]
    fn test_generate_without_state_dir_fails() {
        let output = atp_command(&[
            "generate",
            &format!("{}/manifests", fixtures_path()),
        ])
        .env_remove("ATP_STATE_DIR")
        .output()
        .unwrap();

        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("ATP_STATE_DIR"));
    }

    #[test]
    fn test_generate_with_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = dir.path().join("atp.yaml");
        std::fs::write(
            &config,
            format!("backend: file\nstateDir: {}/states\n", fixtures_path()),
        )
        .unwrap();

        let output = atp_command(&[
            "generate",
            "--config-path",
            config.to_str().unwrap(),
            &format!("{}/manifests/01-deployment.yaml", fixtures_path()),
        ])
        .env_remove("ATP_STATE_DIR")
        .env_remove("ATP_BACKEND")
        .output()
        .unwrap();

        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("replicas: 3"));
    }

    #[test]
    fn test_argocd_prefixed_env() {
        let output = atp_command(&[
            "generate",
            &format!("{}/manifests/01-deployment.yaml", fixtures_path()),
        ])
        .env("ATP_STATE_DIR", "/nonexistent")
        .env("ARGOCD_ENV_ATP_STATE_DIR", format!("{}/states", fixtures_path()))
        .output()
        .unwrap();

        assert!(output.status.success());
    }

    #[test]
    fn test_generate_missing_path() {
        let output = atp(&["generate", "/nonexistent/manifests.yaml"]);

        assert_eq!(output.status.code(), Some(5));
    }
}

mod version_command {
    use super::*;

    #[test]
    fn test_version() {
        let output = atp(&["version"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("atp v"));
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    }
}
