#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod smt_tests;

use std::collections::HashMap;

use crate::sim::config::{SeOptions, TargetIsa};
use crate::workload::registry::WorkloadRegistry;
use crate::workload::ProcessImage;

/// Registry serving `/bench/<isa>/<name>` for a fixed set of names.
pub(crate) struct FakeRegistry {
    known: HashMap<&'static str, &'static str>,
}

impl FakeRegistry {
    pub(crate) fn new(names: &[&'static str]) -> Self {
        Self {
            known: names.iter().map(|&name| (name, name)).collect(),
        }
    }
}

impl WorkloadRegistry for FakeRegistry {
    fn lookup(&self, name: &str, isa: TargetIsa) -> Option<ProcessImage> {
        let name = self.known.get(name)?;
        Some(ProcessImage::from_command(
            &format!("/bench/{}/{}", isa, name),
            "ref",
        ))
    }
}

pub(crate) fn options_with(num_cpus: usize) -> SeOptions {
    let mut options = SeOptions::default();
    options.system.num_cpus = num_cpus;
    options.system.cmd = Some("/bin/hello".into());
    options
}
