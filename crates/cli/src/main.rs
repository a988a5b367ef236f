//! nextcrm-intake: register a customer through a chat in the terminal

mod interrupt;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nextcrm_agent::IntakeAgent;
use nextcrm_config::{IntakePrompts, Settings};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use interrupt::Interrupts;
use session::{Input, Session};

#[derive(Parser)]
#[command(name = "nextcrm-intake", version, about = "Register a new customer by chatting")]
struct Cli {
    /// Settings file (YAML); defaults to config/nextcrm.yaml when present
    #[arg(long, env = "NEXTCRM_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    init_logging(&settings.logging.level, cli.json_logs || settings.logging.json);

    let prompts = IntakePrompts::load_or_default(settings.intake.prompts_path.as_deref())
        .context("failed to load intake prompts")?;
    let chat = nextcrm_llm::build_chat_client(&settings.llm)
        .context("no chat provider configured; set DOUBAO_API_KEY or DEEPSEEK_API_KEY")?;

    tracing::info!(provider = chat.provider(), "Intake session starting");
    let agent = IntakeAgent::with_prompts(chat, prompts);

    run(&agent).await
}

/// `RUST_LOG` wins over the configured level
fn init_logging(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(agent: &IntakeAgent) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = Session::new();
    let mut interrupts = Interrupts::listen();

    println!("您好！我来帮您新建客户。请告诉我客户的姓名、公司和联系方式。");
    println!("(/fields 查看已收集字段, /reset 重新开始, /quit 退出)");

    while let Some(line) = interrupts
        .read_line(&mut lines)
        .await
        .context("failed to read stdin")?
    {
        let text = match Input::parse(&line) {
            Input::Blank => continue,
            Input::Quit => break,
            Input::Reset => {
                session.reset();
                println!("已重新开始。");
                continue;
            }
            Input::Fields => {
                println!("{}", serde_json::to_string_pretty(session.fields())?);
                continue;
            }
            Input::Confirm if session.is_ready() => {
                let draft = session.draft()?;
                println!("{}", serde_json::to_string_pretty(&draft)?);
                tracing::info!(
                    name = %draft.name,
                    company = %draft.company,
                    messages = session.turns(),
                    "Customer draft confirmed"
                );
                break;
            }
            Input::Confirm => line.trim().to_string(),
            Input::Message(text) => text,
        };

        let history = session.history_with(&text);
        let cancel = CancellationToken::new();
        let result = interrupts
            .cancel_on_interrupt(
                &cancel,
                agent.handle_turn_cancellable(&history, session.fields(), &cancel),
            )
            .await;
        match result {
            Ok(result) => {
                println!("{}", result.reply);
                if let Some(summary) = &result.summary {
                    if !result.reply.contains(summary.as_str()) {
                        println!("\n{}", summary);
                    }
                }
                session.apply(&text, &result);
            }
            Err(e) => {
                tracing::warn!(code = e.code(), error = %e, "Intake turn failed");
                if e.is_retryable() {
                    println!("[{}] 请稍后重新发送这条消息。", e);
                } else {
                    println!("[{}]", e);
                }
            }
        }
    }

    println!();
    tracing::info!(messages = session.turns(), "Intake session ended");
    Ok(())
}
