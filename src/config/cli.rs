use crate::config::toml_config::AppConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "result-portal")]
#[command(about = "Exam result lookup service backed by a Google Sheet")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "portal.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Override server.bind_address from config
    #[arg(long)]
    pub bind: Option<String>,

    /// Fetch the sheet once, print its layout and exit
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// 套用命令列覆蓋設定
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
            tracing::info!("🔧 Bind address overridden to: {}", bind);
        }
    }
}
