//! brokerpnl-report - Per-position gains and account return.
//!
//! Primary binary for analyzing a brokerage account snapshot.

fn main() -> std::process::ExitCode {
    brokerpnl::cmd::report_cmd::main()
}
