#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = mviz_demo::run_from_env() {
        eprintln!("mviz: {error}");
        std::process::exit(error.exit_code());
    }
}
