mod app;

use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    if let Err(err) = app::run() {
        // Printed directly so failures stay visible with logging turned off
        eprintln!("{}", error_message(&err));
        process::exit(1);
    }
}

fn error_message(err: &anyhow::Error) -> String {
    format!("Error: {:#}", err)
}
