use lightdeck::cli::run;

fn main() -> std::process::ExitCode {
    run()
}
