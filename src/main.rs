fn main() {
    env_logger::init();

    if let Err(err) = motfix::run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
