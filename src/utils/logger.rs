use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn build_filter(level: &str, verbose: bool) -> EnvFilter {
    let default_directive = if verbose {
        "result_portal=debug,info".to_string()
    } else {
        format!("result_portal={},warn", level)
    };

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

pub fn init_cli_logger(level: &str, verbose: bool) {
    tracing_subscriber::registry()
        .with(build_filter(level, verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(level: &str, verbose: bool) {
    tracing_subscriber::registry()
        .with(build_filter(level, verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // 部署環境使用 JSON 格式方便集中收集
        )
        .init();
}
