use std::process;

use log::LevelFilter;

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = textbook_rsa::ui::app::create_app() {
        eprintln!("Error running application: {:#}", e);
        process::exit(1);
    }
}
