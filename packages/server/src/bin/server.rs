//! Line-oriented TCP chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tcp-chat
//! cargo run --bin tcp-chat -- 2525
//! TCP_CHAT_ADMIN_ADDR=127.0.0.1:8080 cargo run --bin tcp-chat
//! ```

use std::sync::Arc;

use clap::Parser;

use tcp_chat_server::{
    bootstrap::Application,
    config::{Launch, ServerConfig, USAGE, parse_positional},
    domain::ChatLogSink,
    infrastructure::log_sink::FileChatLogSink,
};
use tcp_chat_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "tcp-chat")]
#[command(about = "Line-oriented TCP chat server", long_about = None)]
struct Args {
    /// Port number to listen on (default: 8989). `help` prints the usage line.
    #[arg(allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let port = match parse_positional(&args.args) {
        Ok(Launch::Serve(port)) => port,
        Ok(Launch::Usage) => {
            println!("{}", USAGE);
            return;
        }
        Err(e) => {
            tracing::error!("{}", e);
            println!("{}", USAGE);
            std::process::exit(1);
        }
    };

    let config = match ServerConfig::from_env(port) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let log_sink: Arc<dyn ChatLogSink> = Arc::new(FileChatLogSink::new(&config.log_path));
    tracing::info!("Chat log: {}", config.log_path);

    let app = Application::build(&config, clock, log_sink);

    // Run the server
    if let Err(e) = app.server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
