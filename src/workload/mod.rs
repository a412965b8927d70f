pub mod cpu2000;
pub mod registry;
pub mod smt;

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::debug;
use serde::Serialize;
use smallvec::SmallVec;

use crate::sim::config::SeOptions;
use crate::sim::error::{ConfigurationError, SeResult};
use crate::workload::registry::{resolve, WorkloadRegistry};

/// A runnable program for one hardware thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessImage {
    pub executable: PathBuf,
    pub argv: Vec<String>,
    pub stdin: Option<PathBuf>,
    pub stdout: Option<PathBuf>,
    pub stderr: Option<PathBuf>,
    /// Working directory; `None` inherits the simulator's.
    pub cwd: Option<PathBuf>,
}

impl ProcessImage {
    /// `argv[0]` is the executable, followed by the whitespace-split `options`.
    pub fn from_command(executable: &str, options: &str) -> Self {
        let argv = std::iter::once(executable.to_string())
            .chain(options.split_whitespace().map(str::to_string))
            .collect();
        Self {
            executable: PathBuf::from(executable),
            argv,
            stdin: None,
            stdout: None,
            stderr: None,
            cwd: None,
        }
    }

    pub fn with_redirects(mut self, redirects: Redirects<'_>) -> Self {
        self.stdin = non_empty(redirects.stdin).or(self.stdin);
        self.stdout = non_empty(redirects.stdout).or(self.stdout);
        self.stderr = non_empty(redirects.stderr).or(self.stderr);
        self
    }
}

fn non_empty(path: &str) -> Option<PathBuf> {
    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// stdin/stdout/stderr specs as given on the command line; empty means "inherit".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Redirects<'a> {
    pub stdin: &'a str,
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl<'a> Redirects<'a> {
    pub fn from_options(options: &'a SeOptions) -> Self {
        Self {
            stdin: &options.system.input,
            stdout: &options.system.output,
            stderr: &options.system.errout,
        }
    }
}

/// Process images sharing the thread contexts of one cpu, in thread order.
pub type SmtGroup = SmallVec<[ProcessImage; 4]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "images")]
pub enum Workload {
    Single(ProcessImage),
    Smt(SmtGroup),
}

impl Workload {
    pub fn thread_count(&self) -> usize {
        match self {
            Workload::Single(_) => 1,
            Workload::Smt(group) => group.len(),
        }
    }

    pub fn images(&self) -> &[ProcessImage] {
        match self {
            Workload::Single(image) => std::slice::from_ref(image),
            Workload::Smt(group) => group.as_slice(),
        }
    }
}

/// Where the per-cpu programs come from. Chosen once from the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkloadSource {
    Benchmarks(Vec<String>),
    Command { cmd: PathBuf, options: String },
}

impl WorkloadSource {
    pub fn from_options(options: &SeOptions) -> Self {
        match options.system.bench.as_deref() {
            Some(bench) if !bench.trim().is_empty() => WorkloadSource::Benchmarks(
                bench
                    .split(|c| c == '-' || c == ';')
                    .map(|name| name.trim().to_string())
                    .collect(),
            ),
            _ => WorkloadSource::Command {
                cmd: options.command(),
                options: options.system.options.clone(),
            },
        }
    }
}

pub type WorkloadMap = BTreeMap<usize, Workload>;

/// Build the workload of every cpu in `[0, num_cpus)`.
///
/// Redirects given without SMT splitting land on the last constructed image only.
pub fn bind_workloads(
    options: &SeOptions,
    registry: &dyn WorkloadRegistry,
) -> SeResult<WorkloadMap> {
    let num_cpus = options.system.num_cpus;
    let redirects = Redirects::from_options(options);

    let mut images = match WorkloadSource::from_options(options) {
        WorkloadSource::Benchmarks(apps) => {
            if apps.len() != num_cpus {
                return Err(ConfigurationError::BenchmarkCountMismatch {
                    benchmarks: apps.len(),
                    cpus: num_cpus,
                }
                .into());
            }
            apps.iter()
                .map(|app| resolve(registry, app, options.build.target_isa))
                .collect::<Result<Vec<_>, _>>()?
        }
        WorkloadSource::Command { cmd, options: args } => {
            let cmd = cmd.to_str().ok_or_else(|| {
                ConfigurationError::invalid("cmd", format!("{} is not valid UTF-8", cmd.display()))
            })?;
            if options.system.cpu_type.supports_smt() {
                let group = smt::partition(cmd, &args, redirects);
                if group.len() > 1 {
                    debug!("{} hardware threads per cpu", group.len());
                    return Ok((0..num_cpus)
                        .map(|id| (id, Workload::Smt(group.clone())))
                        .collect());
                }
            }
            vec![ProcessImage::from_command(cmd, &args); num_cpus]
        }
    };

    if let Some(last) = images.pop() {
        images.push(last.with_redirects(redirects));
    }
    Ok(images
        .into_iter()
        .enumerate()
        .map(|(id, image)| (id, Workload::Single(image)))
        .collect())
}
