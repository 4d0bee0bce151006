use tracing_subscriber::EnvFilter;

fn main() {
    // stdout carries command results; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = kilocode_action::cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
