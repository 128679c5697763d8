use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 輸出格式：終端機給人看，Lambda 給 CloudWatch 解析
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// 未設定 `RUST_LOG` 時 CLI 使用的過濾規則
pub fn cli_directives(verbose: bool) -> &'static str {
    if verbose {
        "demo_booking=debug,info"
    } else {
        "demo_booking=info"
    }
}

pub const LAMBDA_DIRECTIVES: &str = "demo_booking=info,lambda=info";

/// `RUST_LOG` 優先，否則套用預設規則
fn filter_or(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

pub fn init_logger(format: LogFormat, default_directives: &str) {
    let layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);
    let registry = tracing_subscriber::registry().with(filter_or(default_directives));

    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        // CloudWatch 會自行加上時間戳
        LogFormat::Json => registry.with(layer.without_time().json()).init(),
    }
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(LogFormat::Compact, cli_directives(verbose));
}

pub fn init_lambda_logger() {
    init_logger(LogFormat::Json, LAMBDA_DIRECTIVES);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_enables_crate_debug() {
        assert!(cli_directives(true).contains("demo_booking=debug"));
        assert_eq!(cli_directives(false), "demo_booking=info");
    }

    #[test]
    fn test_default_directives_parse() {
        for directives in [cli_directives(true), cli_directives(false), LAMBDA_DIRECTIVES] {
            assert!(EnvFilter::try_new(directives).is_ok(), "{}", directives);
        }
    }
}
