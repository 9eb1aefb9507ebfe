//! Process metadata captured once per process

use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Used when no hostname source yields a value
pub const UNKNOWN_HOST: &str = "unknownhost";

const UNKNOWN_PROGRAM: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    /// Short hostname (up to the first `.`)
    pub host: String,
    pub pid: u32,
    /// Basename of the executable
    pub program: String,
}

impl ProcessInfo {
    /// Metadata for this process, discovered on first use
    pub fn current() -> &'static ProcessInfo {
        static CURRENT: OnceLock<ProcessInfo> = OnceLock::new();
        CURRENT.get_or_init(Self::discover)
    }

    pub fn discover() -> Self {
        Self {
            host: short_hostname(&discover_hostname()),
            pid: std::process::id(),
            program: discover_program(),
        }
    }
}

fn discover_hostname() -> String {
    let from_env = ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty());
    if let Some(host) = from_env {
        return host;
    }

    ["/proc/sys/kernel/hostname", "/etc/hostname"]
        .iter()
        .filter_map(|path| fs::read_to_string(path).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| UNKNOWN_HOST.to_string())
}

/// Truncate a fully qualified hostname at its first `.`
pub fn short_hostname(host: &str) -> String {
    match host.split_once('.') {
        Some((short, _)) if !short.is_empty() => short.to_string(),
        _ => host.to_string(),
    }
}

fn discover_program() -> String {
    env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_PROGRAM.to_string())
}
