//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Scrapkit");

    let result = scrapkit_app::AppArgs::parse(std::env::args().skip(1))
        .and_then(|args| scrapkit_app::App::open(&args));
    match result {
        Ok(app) => app.report(),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("scrapkit: {}", e);
            std::process::exit(1);
        }
    }
}
