fn main() {
    if let Err(e) = lexaid::run() {
        tracing::error!("LexAid failed: {e}");
        eprintln!("lexaid: {e}");
        std::process::exit(1);
    }
}
