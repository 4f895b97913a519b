fn main() {
    if let Err(e) = water_quality_rs::adapters::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
