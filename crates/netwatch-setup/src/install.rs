//! Package installation through apt.

use std::process::{Command, Stdio};

use color_eyre::eyre::{Result, bail, eyre};
use tracing::{debug, info};

/// The commands that install `package`, in order.
pub fn install_commands(package: &str) -> Vec<Vec<String>> {
    vec![
        vec!["sudo".into(), "apt-get".into(), "update".into()],
        vec![
            "sudo".into(),
            "apt-get".into(),
            "install".into(),
            "-y".into(),
            package.into(),
        ],
    ]
}

/// Run the install commands for `package`, stopping at the first failure.
pub fn install(package: &str) -> Result<()> {
    for argv in install_commands(package) {
        let Some((program, args)) = argv.split_first() else {
            continue;
        };
        debug!(command = ?argv, "running");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .status()
            .map_err(|e| eyre!("failed to run {program}: {e}"))?;
        if !status.success() {
            bail!("`{}` exited with {status}", argv.join(" "));
        }
    }
    info!(package, "installed");
    Ok(())
}
