// cautious-snake server entry point
//
// Reads Snake.toml, opens the decision log when [debug] asks for one and
// serves the four engine callbacks through Rocket.

#[macro_use]
extern crate rocket;

use log::info;
use rocket::fairing::AdHoc;
use std::env;

use cautious_snake::bot::Bot;
use cautious_snake::config::Config;
use cautious_snake::debug_logger::DebugLogger;

mod handler;

/// Maps hosting conventions onto Rocket and env_logger settings.
///
/// `PORT` overrides `ROCKET_PORT`; `RUST_LOG` falls back to `info` when unset.
fn apply_env_defaults() {
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
}

#[launch]
async fn rocket() -> _ {
    apply_env_defaults();
    env_logger::init();

    let config = Config::load_or_default();
    info!("Starting cautious-snake, API version {}", config.appearance.apiversion);

    let debug_logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let server_header = config.server.server_header.clone();
    let bot = Bot::with_debug_logger(config, debug_logger);

    rocket::build()
        .manage(bot)
        .attach(AdHoc::on_response("Server header", move |_, res| {
            let server_header = server_header.clone();
            Box::pin(async move {
                res.set_raw_header("Server", server_header);
            })
        }))
        .mount(
            "/",
            routes![handler::index, handler::start, handler::get_move, handler::end],
        )
}
