use anyhow::Context as _;
use std::path::Path;
use std::process::{Child, Command};
use std::time::Duration;

pub use plainroute_test_support::{KillOnDrop, pick_unused_port, wait_http_ok};

pub fn spawn_server(config_path: Option<&Path>, port: u16) -> anyhow::Result<Child> {
    let bin = env!("CARGO_BIN_EXE_plainroute-server");
    let mut cmd = Command::new(bin);
    cmd.arg("--bind")
        .arg(format!("127.0.0.1:{port}"))
        .arg("--log-level")
        .arg("info");
    if let Some(path) = config_path {
        cmd.arg("--config").arg(path);
    }
    cmd.spawn().context("spawn plainroute-server")
}

/// Spawn the server and wait until `/health` answers. Returns the guard and the base URL.
pub async fn start_server(config_path: Option<&Path>) -> anyhow::Result<(KillOnDrop, String)> {
    let port = pick_unused_port()?;
    let child = KillOnDrop(spawn_server(config_path, port)?);
    let base_url = format!("http://127.0.0.1:{port}");
    wait_http_ok(&format!("{base_url}/health"), Duration::from_secs(20)).await?;
    Ok((child, base_url))
}
