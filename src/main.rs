use anyhow::{Context, Result};
use clap::Parser;
use qa_reference::cli::Args;
use qa_reference::utils::logging;
use qa_reference::{App, Config, RunRequest};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置：配置文件 < 环境变量 < 命令行
    let mut config = Config::load(args.config.as_deref()).context("加载配置失败")?;
    args.apply_to(&mut config);
    config.validate().context("配置不合法")?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config).await?;
    app.run(&RunRequest::from_args(&args)).await?;

    Ok(())
}
