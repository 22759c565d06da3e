use fallback_server::config::{ServerConfig, ServerOptions};
use fallback_server::{logger, server, Server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = ServerOptions::load_from("config")?;
    let cfg = ServerConfig::resolve(options, std::env::args().skip(1));
    logger::init(&cfg.logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let server = Server::bind(cfg)?;
        server.run_until(server::shutdown_signal()).await
    })?;
    Ok(())
}
