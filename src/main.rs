use dotenvy::dotenv;
use paint_cart::{build_session, console, AppError, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()?;
    let (mut session, gateway) = build_session(&config)?;

    log::info!(
        "Cart stored in {} under '{}', orders go to {}",
        config.storage_path.display(),
        config.storage_key,
        gateway.base_url()
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    console::run(&mut session, &gateway, stdin.lock(), &mut stdout).await
}
