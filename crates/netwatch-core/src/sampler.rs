// ── Connection sampler ──
//
// Runs the OS connection-listing command (`netstat -tn` by default) and
// parses its table by column position: the remote endpoint is the 5th
// whitespace-separated token, the state is matched by substring.

use std::net::Ipv4Addr;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::CoreError;
use crate::model::Connection;

const ESTABLISHED: &str = "ESTABLISHED";
const REMOTE_ENDPOINT_COLUMN: usize = 4;

/// Lists established TCP connections via an external command.
#[derive(Debug, Clone)]
pub struct ConnectionSampler {
    program: String,
    args: Vec<String>,
}

impl ConnectionSampler {
    /// Build a sampler from `[program, args...]`.
    pub fn new(command: &[String]) -> Result<Self, CoreError> {
        let (program, args) = command.split_first().ok_or_else(|| CoreError::Config {
            message: "connection command must not be empty".into(),
        })?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// The command line as a single display string.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the listing command and return every non-loopback established connection.
    pub async fn sample(&self) -> Result<Vec<Connection>, CoreError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| CoreError::SamplerFailed {
                command: self.command_line(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(CoreError::SamplerFailed {
                command: self.command_line(),
                reason: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let table = String::from_utf8_lossy(&output.stdout);
        let connections = parse_connection_table(&table);
        debug!(count = connections.len(), "sampled established connections");
        Ok(connections)
    }
}

/// Parse a `netstat -tn` style table into established, non-loopback connections.
///
/// Rows without the expected remote-endpoint column, without a port, or
/// with a non-IPv4 remote address are skipped.
pub fn parse_connection_table(table: &str) -> Vec<Connection> {
    table.lines().filter_map(parse_row).collect()
}

fn parse_row(line: &str) -> Option<Connection> {
    if !line.contains(ESTABLISHED) || !line.contains(':') {
        return None;
    }
    let remote = line.split_whitespace().nth(REMOTE_ENDPOINT_COLUMN)?;
    let (address, port) = remote.rsplit_once(':')?;
    let ip: Ipv4Addr = address.parse().ok()?;
    if ip.is_loopback() || port.is_empty() {
        return None;
    }
    Some(Connection::new(address, port))
}
