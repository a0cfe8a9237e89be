mod api;
mod config;
mod models;
mod services;
mod templates;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    api::run(config::Config::from_env()).await
}
