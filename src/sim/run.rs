use std::io::Write;

use anyhow::Context;
use log::info;
use serde::Serialize;

use crate::sim::config::RunConfig;
use crate::sim::top::SystemTopology;

/// Takes a finished topology and advances simulated time on it.
pub trait SimulationRunner {
    fn run(&mut self, topology: &SystemTopology, run: &RunConfig) -> anyhow::Result<()>;
}

#[derive(Serialize)]
struct RunReport<'a> {
    run: &'a RunConfig,
    system: &'a SystemTopology,
}

/// Does not simulate; writes the topology it was handed as JSON.
pub struct DryRunner<W: Write> {
    out: W,
    pretty: bool,
}

impl<W: Write> DryRunner<W> {
    pub fn new(out: W, pretty: bool) -> Self {
        Self { out, pretty }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SimulationRunner for DryRunner<W> {
    fn run(&mut self, topology: &SystemTopology, run: &RunConfig) -> anyhow::Result<()> {
        let report = RunReport {
            run,
            system: topology,
        };
        let payload = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        }
        .context("cannot serialize topology")?;
        writeln!(self.out, "{}", payload).context("cannot write topology")?;
        info!("handed {} cpus to the dry runner", topology.cpus().len());
        Ok(())
    }
}
