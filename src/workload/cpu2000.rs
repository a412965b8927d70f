use std::fmt;
use std::path::PathBuf;

use log::debug;
use phf::phf_map;

use crate::sim::config::TargetIsa;
use crate::workload::registry::WorkloadRegistry;
use crate::workload::ProcessImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Int,
    Fp,
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Suite::Int => "CINT2000",
            Suite::Fp => "CFP2000",
        })
    }
}

/// One SPEC CPU2000 benchmark with its reference-input command line.
#[derive(Debug)]
pub struct Benchmark {
    pub number: u16,
    pub name: &'static str,
    pub suite: Suite,
    pub args: &'static [&'static str],
    pub stdin: Option<&'static str>,
    /// Fortran-90 codes only have alpha binaries.
    pub alpha_only: bool,
}

impl Benchmark {
    /// `<number>.<name>`, the benchmark's directory under the SPEC root.
    pub fn dir_name(&self) -> String {
        format!("{}.{}", self.number, self.name)
    }

    pub fn supports(&self, isa: TargetIsa) -> bool {
        !self.alpha_only || isa == TargetIsa::Alpha
    }
}

macro_rules! bench {
    ($number:expr, $name:expr, $suite:ident, [$($arg:expr),*]) => {
        bench!($number, $name, $suite, [$($arg),*], None, false)
    };
    ($number:expr, $name:expr, $suite:ident, [$($arg:expr),*], $stdin:expr) => {
        bench!($number, $name, $suite, [$($arg),*], $stdin, false)
    };
    ($number:expr, $name:expr, $suite:ident, [$($arg:expr),*], $stdin:expr, $alpha_only:expr) => {
        Benchmark {
            number: $number,
            name: $name,
            suite: Suite::$suite,
            args: &[$($arg),*],
            stdin: $stdin,
            alpha_only: $alpha_only,
        }
    };
}

pub static BENCHMARKS: phf::Map<&'static str, Benchmark> = phf_map! {
    "gzip" => bench!(164, "gzip", Int, ["input.source", "60"]),
    "vpr" => bench!(175, "vpr", Int, [
        "net.in", "arch.in", "place.out", "dum.out", "-nodisp", "-place_only", "-init_t", "5",
        "-exit_t", "0.005", "-alpha_t", "0.9412", "-inner_num", "2"
    ]),
    "gcc" => bench!(176, "gcc", Int, ["166.i", "-o", "166.s"]),
    "mcf" => bench!(181, "mcf", Int, ["inp.in"]),
    "crafty" => bench!(186, "crafty", Int, [], Some("crafty.in")),
    "parser" => bench!(197, "parser", Int, ["2.1.dict", "-batch"], Some("ref.in")),
    "eon" => bench!(252, "eon", Int, [
        "chair.control.cook", "chair.camera", "chair.surfaces", "chair.cook.ppm", "ppm",
        "pixels_out.cook"
    ]),
    "perlbmk" => bench!(253, "perlbmk", Int, ["-I./lib", "splitmail.pl", "850", "5", "19", "18", "1500"]),
    "gap" => bench!(254, "gap", Int, ["-l", "./", "-q", "-m", "192M"], Some("ref.in")),
    "vortex" => bench!(255, "vortex", Int, ["lendian1.raw"]),
    "bzip2" => bench!(256, "bzip2", Int, ["input.source", "58"]),
    "twolf" => bench!(300, "twolf", Int, ["ref"]),
    "wupwise" => bench!(168, "wupwise", Fp, []),
    "swim" => bench!(171, "swim", Fp, [], Some("swim.in")),
    "mgrid" => bench!(172, "mgrid", Fp, [], Some("mgrid.in")),
    "applu" => bench!(173, "applu", Fp, [], Some("applu.in")),
    "mesa" => bench!(177, "mesa", Fp, ["-frames", "1000", "-meshfile", "mesa.in", "-ppmfile", "mesa.ppm"]),
    "galgel" => bench!(178, "galgel", Fp, [], Some("galgel.in"), true),
    "art" => bench!(179, "art", Fp, [
        "-scanfile", "c756hel.in", "-trainfile1", "a10.img", "-trainfile2", "hc.img", "-stride", "2",
        "-startx", "110", "-starty", "200", "-endx", "160", "-endy", "240", "-objects", "10"
    ]),
    "equake" => bench!(183, "equake", Fp, [], Some("inp.in")),
    "facerec" => bench!(187, "facerec", Fp, [], Some("ref.in"), true),
    "ammp" => bench!(188, "ammp", Fp, [], Some("ammp.in")),
    "lucas" => bench!(189, "lucas", Fp, [], Some("lucas2.in"), true),
    "fma3d" => bench!(191, "fma3d", Fp, [], None, true),
    "sixtrack" => bench!(200, "sixtrack", Fp, [], Some("inp.in")),
    "apsi" => bench!(301, "apsi", Fp, []),
};

/// SPEC CPU2000 binaries and inputs laid out under one root directory:
/// `<root>/binaries/<isa>/<os>/<name>` and `<root>/<number>.<name>/data/<input_set>/input/`.
#[derive(Debug, Clone)]
pub struct Cpu2000Registry {
    pub root: PathBuf,
    pub input_set: String,
}

impl Cpu2000Registry {
    pub fn new(root: impl Into<PathBuf>, input_set: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            input_set: input_set.into(),
        }
    }
}

impl WorkloadRegistry for Cpu2000Registry {
    fn lookup(&self, name: &str, isa: TargetIsa) -> Option<ProcessImage> {
        let bench = BENCHMARKS.get(name).filter(|bench| bench.supports(isa))?;
        let executable = self
            .root
            .join("binaries")
            .join(isa.as_str())
            .join(isa.os())
            .join(bench.name);
        let input_dir = self
            .root
            .join(bench.dir_name())
            .join("data")
            .join(&self.input_set)
            .join("input");

        debug!("{} is {} benchmark {}", name, bench.suite, bench.dir_name());
        let mut image = ProcessImage::from_command(executable.to_str()?, &bench.args.join(" "));
        image.stdin = bench.stdin.map(|file| input_dir.join(file));
        image.cwd = Some(input_dir);
        Some(image)
    }
}
