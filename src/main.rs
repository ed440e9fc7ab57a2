fn main() {
    if let Err(err) = cricket_stats::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
