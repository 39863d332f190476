use mock_server::ServerConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    let listener = TcpListener::bind(config.addr()).await?;
    println!(
        "acuitydata mock listening on http://{} ({} vehicles)",
        listener.local_addr()?,
        mock_server::catalogue().len()
    );
    mock_server::run(listener, &config.token).await?;
    Ok(())
}
