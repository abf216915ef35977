fn main() {
    if let Err(error) = lazyseq_cli::run() {
        // Tracing is initialized inside run() after argument parsing.
        tracing::error!(error = %format!("{error:#}"), "lazyseq failed");
        std::process::exit(1);
    }
}
