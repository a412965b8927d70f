use crate::workload::{ProcessImage, Redirects, SmtGroup};

/// Separates per-thread commands and per-thread redirects.
pub const SMT_SEPARATOR: char = ';';

/// Positional entries of a redirect spec. An empty spec has no entries.
fn positional(spec: &str) -> Vec<&str> {
    if spec.is_empty() {
        Vec::new()
    } else {
        spec.split(SMT_SEPARATOR).collect()
    }
}

/// Split `command_line` into one image per hardware thread.
///
/// Thread `i` takes entry `i` of each redirect spec when it exists and is non-empty; every thread
/// gets the same `options`. A command line without separators yields exactly one image, identical
/// to `ProcessImage::from_command(..).with_redirects(..)`.
pub fn partition(command_line: &str, options: &str, redirects: Redirects<'_>) -> SmtGroup {
    let inputs = positional(redirects.stdin);
    let outputs = positional(redirects.stdout);
    let errouts = positional(redirects.stderr);

    command_line
        .split(SMT_SEPARATOR)
        .enumerate()
        .map(|(idx, cmd)| {
            ProcessImage::from_command(cmd, options).with_redirects(Redirects {
                stdin: inputs.get(idx).copied().unwrap_or(""),
                stdout: outputs.get(idx).copied().unwrap_or(""),
                stderr: errouts.get(idx).copied().unwrap_or(""),
            })
        })
        .collect()
}
