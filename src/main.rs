fn main() {
    if let Err(e) = serialmeta::cli::run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
