use std::path::Path;

use anyhow::Result;
use wild_drafter::utils::logging;
use wild_drafter::{App, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载配置：指定了配置文件就先读文件，环境变量始终优先
    let config = match std::env::var("WILD_DRAFTER_CONFIG") {
        Ok(path) => Config::from_toml_file(Path::new(&path))?,
        Err(_) => Config::from_env(),
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
