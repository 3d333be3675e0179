//! Blender subprocess exporter.
//!
//! Spawns Blender in background mode on the saved scene file and hands it an
//! export request and a report path, both as JSON files in a temporary
//! directory. The Python side selects the object, runs the FBX exporter and
//! writes the report.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tempfile::{NamedTempFile, TempDir};

use crate::error::{ExportError, ExportResult};
use crate::exporter::{ExportRequest, MeshExporter};

const EMBEDDED_EXPORT_SCRIPT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../blender/export_fbx.py"
));

/// Default timeout for a Blender export (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable naming the Blender executable.
pub const BLENDER_ENV: &str = "BLENDER_PATH";

/// Environment variable overriding the export script location.
pub const SCRIPT_ENV: &str = "ASSETFORGE_BLENDER_SCRIPT";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct BlenderExporterConfig {
    /// Blender executable; `BLENDER_PATH`, then `PATH` when unset.
    pub blender_path: Option<PathBuf>,
    /// Export script; `ASSETFORGE_BLENDER_SCRIPT`, then the bundled copy when unset.
    pub script_path: Option<PathBuf>,
    pub timeout: Duration,
    /// Keep Blender's stderr for failure reports.
    pub capture_output: bool,
}

impl Default for BlenderExporterConfig {
    fn default() -> Self {
        Self {
            blender_path: None,
            script_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            capture_output: true,
        }
    }
}

impl BlenderExporterConfig {
    pub fn blender_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.blender_path = Some(path.into());
        self
    }

    pub fn script_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_path = Some(path.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Report written by `export_fbx.py`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportReport {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub fbx_path: Option<PathBuf>,
    #[serde(default)]
    pub blender_version: Option<String>,
}

/// [`MeshExporter`] running Blender's FBX exporter in a subprocess.
#[derive(Debug, Default)]
pub struct BlenderExporter {
    config: BlenderExporterConfig,
}

/// Export script on disk. The bundled script lives in a temp file that is
/// removed when this is dropped.
enum ExportScript {
    External(PathBuf),
    Bundled(NamedTempFile),
}

impl ExportScript {
    fn path(&self) -> &Path {
        match self {
            ExportScript::External(path) => path,
            ExportScript::Bundled(file) => file.path(),
        }
    }
}

/// Files exchanged with one Blender run.
struct ExchangeDir {
    dir: TempDir,
}

impl ExchangeDir {
    fn new(request: &ExportRequest) -> ExportResult<Self> {
        let exchange = Self {
            dir: tempfile::tempdir()?,
        };
        let json = serde_json::to_string_pretty(request)
            .map_err(|e| ExportError::mesh_export_failed(&request.fbx_path, e.to_string()))?;
        std::fs::write(exchange.request(), json)?;
        Ok(exchange)
    }

    fn request(&self) -> PathBuf {
        self.dir.path().join("request.json")
    }

    fn report(&self) -> PathBuf {
        self.dir.path().join("report.json")
    }
}

impl BlenderExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BlenderExporterConfig) -> Self {
        Self { config }
    }

    /// Locates Blender: the configured path, `BLENDER_PATH`, then `PATH`.
    pub fn find_blender(&self) -> ExportResult<PathBuf> {
        let configured = self
            .config
            .blender_path
            .clone()
            .or_else(|| std::env::var_os(BLENDER_ENV).map(PathBuf::from));
        if let Some(path) = configured.filter(|p| p.exists()) {
            return Ok(path);
        }
        which::which("blender").map_err(|_| ExportError::BlenderNotFound)
    }

    fn export_script(&self) -> ExportResult<ExportScript> {
        let external = self
            .config
            .script_path
            .clone()
            .or_else(|| std::env::var_os(SCRIPT_ENV).map(PathBuf::from));
        if let Some(path) = external {
            return Ok(ExportScript::External(path));
        }

        let mut file = tempfile::Builder::new()
            .prefix("assetforge_export_fbx_")
            .suffix(".py")
            .tempfile()?;
        file.write_all(EMBEDDED_EXPORT_SCRIPT.as_bytes())?;
        file.flush()?;
        Ok(ExportScript::Bundled(file))
    }

    fn command(&self, blender: &Path, blend_file: &Path, script: &Path, exchange: &ExchangeDir) -> Command {
        let mut cmd = Command::new(blender);
        cmd.arg("--background")
            .arg(blend_file)
            .arg("--python")
            .arg(script)
            .arg("--")
            .arg("--request")
            .arg(exchange.request())
            .arg("--report")
            .arg(exchange.report())
            .stdin(Stdio::null())
            .stdout(Stdio::null());
        cmd.stderr(if self.config.capture_output {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        cmd
    }
}

impl MeshExporter for BlenderExporter {
    fn export_mesh(&self, request: &ExportRequest) -> ExportResult<()> {
        let blend_file = request
            .blend_file
            .as_deref()
            .ok_or(ExportError::MissingBlendFile)?;
        let blender = self.find_blender()?;
        let script = self.export_script()?;
        let exchange = ExchangeDir::new(request)?;

        tracing::debug!(
            blender = %blender.display(),
            scene = %blend_file.display(),
            object = %request.object_name,
            "spawning Blender"
        );
        let child = self
            .command(&blender, blend_file, script.path(), &exchange)
            .spawn()
            .map_err(ExportError::SpawnFailed)?;
        let (status, stderr) = wait_with_timeout(child, self.config.timeout)?;
        if !status.success() {
            return Err(ExportError::process_failed(status.code().unwrap_or(-1), stderr));
        }

        let report = read_report(&exchange.report())?;
        if !report.ok {
            let reason = report
                .error
                .unwrap_or_else(|| "export script reported failure".to_string());
            return Err(ExportError::mesh_export_failed(&request.fbx_path, reason));
        }
        tracing::debug!(
            fbx = %request.fbx_path.display(),
            blender_version = report.blender_version.as_deref().unwrap_or("unknown"),
            "Blender export finished"
        );
        Ok(())
    }
}

fn read_report(path: &Path) -> ExportResult<ExportReport> {
    let failed = |message: String| ExportError::ReportFailed {
        path: path.to_path_buf(),
        message,
    };
    let content = std::fs::read_to_string(path).map_err(|e| failed(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| failed(e.to_string()))
}

/// Reads a child's stderr to the end on its own thread so the child never
/// blocks on a full pipe.
fn drain_stderr(stderr: Option<ChildStderr>) -> Option<JoinHandle<String>> {
    stderr.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut bytes = Vec::new();
            let _ = pipe.read_to_end(&mut bytes);
            String::from_utf8_lossy(&bytes).into_owned()
        })
    })
}

/// Waits for `child`, killing it once `timeout` has passed. Returns the exit
/// status and whatever the child wrote to a piped stderr.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> ExportResult<(ExitStatus, String)> {
    let stderr = drain_stderr(child.stderr.take());
    let deadline = Instant::now() + timeout;

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Ok(status),
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                break Err(ExportError::Timeout {
                    timeout_secs: timeout.as_secs(),
                });
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(e) => break Err(ExportError::SpawnFailed(e)),
        }
    };

    // On timeout the reader is left detached; a grandchild may still hold the pipe.
    let status = status?;
    let output = stderr
        .and_then(|reader| reader.join().ok())
        .unwrap_or_default();
    Ok((status, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetforge_spec::config::ExportOptions;

    #[test]
    fn test_config_builders() {
        let config = BlenderExporterConfig::default()
            .blender_path("/opt/blender/blender")
            .script_path("blender/export_fbx.py")
            .timeout_secs(30);
        assert_eq!(config.blender_path, Some(PathBuf::from("/opt/blender/blender")));
        assert_eq!(config.script_path, Some(PathBuf::from("blender/export_fbx.py")));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.capture_output);
    }

    #[test]
    fn test_embedded_script_uses_request_options() {
        assert!(EMBEDDED_EXPORT_SCRIPT.contains("export_scene.fbx"));
        assert!(EMBEDDED_EXPORT_SCRIPT.contains("--request"));
        assert!(EMBEDDED_EXPORT_SCRIPT.contains("use_mesh_modifiers"));
    }

    #[test]
    fn test_configured_script_path_is_used() {
        let exporter = BlenderExporter::with_config(
            BlenderExporterConfig::default().script_path("custom/export.py"),
        );
        let script = exporter.export_script().unwrap();
        assert_eq!(script.path(), Path::new("custom/export.py"));
    }

    #[test]
    fn test_export_requires_blend_file() {
        let request = ExportRequest {
            object_name: "SM_Crate".to_string(),
            fbx_path: PathBuf::from("out/SM_Crate.fbx"),
            blend_file: None,
            options: ExportOptions::default(),
        };
        let err = BlenderExporter::new().export_mesh(&request).unwrap_err();
        assert!(matches!(err, ExportError::MissingBlendFile));
    }

    #[test]
    fn test_read_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, r#"{"ok": false, "error": "no object"}"#).unwrap();
        let report = read_report(&path).unwrap();
        assert!(!report.ok);
        assert_eq!(report.error.as_deref(), Some("no object"));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(read_report(&path), Err(ExportError::ReportFailed { .. })));
        assert!(matches!(
            read_report(&dir.path().join("missing.json")),
            Err(ExportError::ReportFailed { .. })
        ));
    }

    #[cfg(unix)]
    fn shell(script: &str) -> Child {
        Command::new("sh")
            .arg("-c")
            .arg(script)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_drains_large_stderr() {
        let child = shell("head -c 200000 /dev/zero >&2; exit 3");

        let (status, stderr) = wait_with_timeout(child, Duration::from_secs(20)).unwrap();

        assert_eq!(status.code(), Some(3));
        assert_eq!(stderr.len(), 200_000);
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_kills_on_timeout() {
        let child = shell("exec sleep 30");

        let err = wait_with_timeout(child, Duration::from_millis(200)).unwrap_err();

        assert!(matches!(err, ExportError::Timeout { .. }));
    }
}
