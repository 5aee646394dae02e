use course_portal::config::AppConfig;
use course_portal::web::start_server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let args: Vec<String> = std::env::args().collect();
    let port = args
        .get(1)
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "1234".to_string()); // Default password, change this!
    let root = std::env::var("PORTAL_ROOT").unwrap_or_else(|_| ".".to_string());

    let config = AppConfig::new(&root, password);
    config.ensure_content_dirs()?;

    log::info!("Starting course portal on port {}...", port);
    log::info!("Access the site at http://localhost:{}", port);

    start_server(port, config).await
}
