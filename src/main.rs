use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    cerberus::driver::main()
}
