//! Generate command - replace placeholders and print the manifests

use atp_backend::AtpConfig;
use atp_kube::{Template, parse_manifests, render_manifests};
use serde_json::Value as JsonValue;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{CliError, Result};

/// Manifest text together with where it came from
struct Input {
    origin: String,
    content: String,
}

pub fn run(path: &Path, config_path: Option<&Path>) -> Result<()> {
    let inputs = read_inputs(path)?;

    let mut documents = Vec::new();
    for input in &inputs {
        let parsed = parse_manifests(&input.content)
            .map_err(|e| CliError::manifest(format!("{}: {}", input.origin, e)))?;
        debug!(origin = %input.origin, documents = parsed.len(), "parsed manifests");
        documents.extend(parsed);
    }

    let config = AtpConfig::load(config_path)?;
    let source = config.build_source()?;

    let mut rendered: Vec<JsonValue> = Vec::with_capacity(documents.len());
    for document in documents {
        let mut template = Template::new(document, Some(Arc::clone(&source)))?;
        template.replace()?;
        rendered.push(template.into_value());
    }

    let output = render_manifests(&rendered)?;
    print!("{}", output);
    Ok(())
}

fn read_inputs(path: &Path) -> Result<Vec<Input>> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::io("failed to read stdin", e))?;
        return Ok(vec![Input {
            origin: "<stdin>".to_string(),
            content,
        }]);
    }

    if path.is_dir() {
        return manifest_files(path)?
            .into_iter()
            .map(|file| read_file(&file))
            .collect();
    }

    Ok(vec![read_file(path)?])
}

/// Every `*.yaml` / `*.yml` file below `dir`, in path order
fn manifest_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| CliError::Io {
            message: format!("failed to walk {}: {}", dir.display(), e),
        })?;
        let is_manifest = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if entry.file_type().is_file() && is_manifest {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn read_file(path: &Path) -> Result<Input> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("failed to read {}", path.display()), e))?;
    Ok(Input {
        origin: path.display().to_string(),
        content,
    })
}
