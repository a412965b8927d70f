use std::fs;
use std::io;

use anyhow::Context;
use clap::Parser;
use sesim::sim::config::BuildEnv;
use sesim::sim::run::{DryRunner, SimulationRunner};
use sesim::sim::top::build_system;
use sesim::ui::{make_options, to_level_filter, SeArgs};
use sesim::workload::cpu2000::Cpu2000Registry;

pub fn main() -> anyhow::Result<()> {
    let build = BuildEnv::current();
    build.check_syscall_emulation()?;

    let argv = SeArgs::parse();
    env_logger::Builder::new()
        .filter_level(to_level_filter(argv.log))
        .parse_default_env()
        .init();

    let config = match &argv.config {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?,
        None => String::new(),
    };
    let options = make_options(&config, Some(&argv), build)?;

    let registry = Cpu2000Registry::new(&options.system.spec_root, &options.system.input_set);
    let topology = build_system(&options, &registry)?;

    let mut runner = DryRunner::new(io::stdout().lock(), argv.pretty);
    runner.run(&topology, &options.run)
}
