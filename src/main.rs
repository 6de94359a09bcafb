fn main() {
    #[cfg(feature = "cli")]
    romdiff::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("romdiff: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
