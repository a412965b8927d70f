use std::path::PathBuf;

use super::{options_with, FakeRegistry};
use crate::sim::strategy::CpuVariant;
use crate::workload::smt::partition;
use crate::workload::{bind_workloads, ProcessImage, Redirects, Workload};

fn path(p: &str) -> Option<PathBuf> {
    Some(PathBuf::from(p))
}

#[test]
fn one_image_per_segment() {
    let group = partition("a;b;c", "-x 1", Redirects::default());
    assert_eq!(group.len(), 3);
    let names: Vec<_> = group.iter().map(|image| image.executable.clone()).collect();
    assert_eq!(names, vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]);
    for image in &group {
        assert_eq!(&image.argv[1..], &["-x", "1"]);
        assert_eq!(image.stdin, None);
    }
}

#[test]
fn shorter_redirect_list_leaves_tail_inheriting() {
    let redirects = Redirects {
        stdin: "a.in;b.in",
        stdout: "a.out",
        stderr: "",
    };
    let group = partition("a;b;c", "", redirects);
    assert_eq!(group[0].stdin, path("a.in"));
    assert_eq!(group[1].stdin, path("b.in"));
    assert_eq!(group[2].stdin, None);
    assert_eq!(group[0].stdout, path("a.out"));
    assert_eq!(group[1].stdout, None);
    assert!(group.iter().all(|image| image.stderr.is_none()));
}

#[test]
fn empty_and_extra_redirect_entries_are_ignored() {
    let redirects = Redirects {
        stdin: "",
        stdout: "",
        stderr: "a.err;;c.err;d.err",
    };
    let group = partition("a;b;c", "", redirects);
    assert_eq!(group.len(), 3);
    assert_eq!(group[0].stderr, path("a.err"));
    assert_eq!(group[1].stderr, None);
    assert_eq!(group[2].stderr, path("c.err"));
}

#[test]
fn no_separator_matches_plain_construction() {
    let redirects = Redirects {
        stdin: "in.txt",
        stdout: "out.txt",
        stderr: "err.txt",
    };
    let group = partition("/bin/hello", "-v", redirects);
    assert_eq!(group.len(), 1);
    assert_eq!(
        group[0],
        ProcessImage::from_command("/bin/hello", "-v").with_redirects(redirects)
    );
}

#[test]
fn detailed_cpu_gets_an_smt_group() {
    let mut options = options_with(1);
    options.system.cmd = Some("a;b;c".into());
    options.system.cpu_type = CpuVariant::Detailed;
    options.system.output = "a.out;b.out".to_string();
    let workloads = bind_workloads(&options, &FakeRegistry::new(&[])).unwrap();

    assert_eq!(workloads[&0].thread_count(), 3);
    let images = workloads[&0].images();
    assert_eq!(images[0].stdout, path("a.out"));
    assert_eq!(images[1].stdout, path("b.out"));
    assert_eq!(images[2].stdout, None);
}

#[test]
fn every_cpu_gets_its_own_copy_of_the_group() {
    let mut options = options_with(2);
    options.system.cmd = Some("a;b".into());
    options.system.cpu_type = CpuVariant::InOrder;
    let workloads = bind_workloads(&options, &FakeRegistry::new(&[])).unwrap();
    assert_eq!(workloads.len(), 2);
    assert_eq!(workloads[&0], workloads[&1]);
    assert!(matches!(workloads[&1], Workload::Smt(ref group) if group.len() == 2));
}

#[test]
fn simple_cpus_do_not_split() {
    let mut options = options_with(1);
    options.system.cmd = Some("a;b".into());
    options.system.cpu_type = CpuVariant::Timing;
    let workloads = bind_workloads(&options, &FakeRegistry::new(&[])).unwrap();
    assert_eq!(workloads[&0].thread_count(), 1);
    assert_eq!(workloads[&0].images()[0].executable, PathBuf::from("a;b"));
}

#[test]
fn single_segment_on_detailed_cpu_is_not_smt() {
    let mut options = options_with(1);
    options.system.cpu_type = CpuVariant::Detailed;
    options.system.input = "in.txt".to_string();
    let smt = bind_workloads(&options, &FakeRegistry::new(&[])).unwrap();

    options.system.cpu_type = CpuVariant::Atomic;
    let plain = bind_workloads(&options, &FakeRegistry::new(&[])).unwrap();

    assert_eq!(smt, plain);
    assert!(matches!(smt[&0], Workload::Single(_)));
}
