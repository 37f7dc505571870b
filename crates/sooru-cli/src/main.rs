#![forbid(unsafe_code)]

fn main() -> std::process::ExitCode {
    sooru_cli::main_entry()
}
