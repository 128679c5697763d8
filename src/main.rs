use clap::Parser;
use demo_booking::config::{cli::Command, CliConfig};
use demo_booking::core::classifier::{email_domain, is_business_email};
use demo_booking::core::ModalStep;
use demo_booking::domain::ports::ContactSubmitter;
use demo_booking::utils::{logger, validation::Validate};
use demo_booking::{
    BookDemoModal, DemoModalEvents, HubSpotFormSubmitter, ProxySubmitter, SubmitMode,
    TerminalHost, WidgetConfig,
};

struct FormInput {
    first_name: String,
    last_name: String,
    email: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    match config.command.clone() {
        Command::Classify { email } => {
            let email = email.trim().to_lowercase();
            let domain = email_domain(&email).unwrap_or("<none>");
            if is_business_email(&email) {
                println!("✅ {} is a business email (domain: {})", email, domain);
            } else {
                println!("❌ {} is not a business email (domain: {})", email, domain);
                std::process::exit(1);
            }
        }
        Command::Book {
            first_name,
            last_name,
            email,
            mode,
        } => {
            let mut widget = match &config.config {
                Some(path) => WidgetConfig::from_file(path)?,
                None => WidgetConfig::default(),
            };
            if let Some(mode) = mode {
                widget.widget.mode = mode.into();
            }

            // 驗證配置
            if let Err(e) = widget.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }

            let input = FormInput {
                first_name,
                last_name,
                email,
            };

            let booked = match widget.widget.mode {
                SubmitMode::Proxy => {
                    let submitter = ProxySubmitter::new(&widget.proxy.endpoint, widget.timeout())?;
                    book_demo(submitter, input).await
                }
                SubmitMode::Direct => {
                    let submitter = HubSpotFormSubmitter::new(&widget)?;
                    book_demo(submitter, input).await
                }
            };

            if !booked {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}

/// 在終端機跑一次完整的 modal 流程：開啟 → 填表 → 送出 → 顯示排程連結
async fn book_demo<S: ContactSubmitter>(submitter: S, input: FormInput) -> bool {
    let events = DemoModalEvents::new();
    let mut open_signals = events.subscribe();
    let mut modal = BookDemoModal::new(submitter, TerminalHost::new());

    events.open_demo_modal();
    modal.listen(&mut open_signals);

    modal.set_first_name(input.first_name);
    modal.set_last_name(input.last_name);
    modal.set_email(input.email);

    let booked = match modal.submit().await {
        ModalStep::Scheduler => {
            println!("✅ Thanks! Pick a time for your demo:");
            println!("📅 {}", modal.meeting_url().unwrap_or_default());
            true
        }
        step => {
            tracing::debug!("Modal finished in {:?}", step);
            eprintln!("❌ {}", modal.error().unwrap_or("Submission failed."));
            false
        }
    };

    modal.close();
    booked
}
