use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    strayfiles::run()
}
