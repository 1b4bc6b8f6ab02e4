fn main() -> std::process::ExitCode {
    ops_slip_lib::run()
}
