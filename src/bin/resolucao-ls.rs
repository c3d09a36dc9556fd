use anyhow::Result;
use resolucao_auditor::Config;
use resolucao_auditor::lsp::server::serve;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .target(env_logger::Target::Stderr)
        .init();

    serve(config).await
}
