use std::process;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use social_client::{
    ApiClient, ClientConfig, ClientResult, PromptEditor, SocialPlatform, SubmitOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

mod logging;

use logging::init_logging;

#[derive(Debug, Parser)]
#[command(
    name = "social-cli",
    version,
    about = "CLI клиент для генерации постов через backend"
)]
struct Cli {
    /// Адрес backend; по умолчанию берётся из API_BASE_URL.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Генерация одного поста по промпту.
    Generate {
        #[arg(long)]
        prompt: String,
        /// Целевая платформа: linkedin, twitter, instagram, facebook.
        #[arg(long)]
        target: Option<SocialPlatform>,
    },
    /// Интерактивный режим: каждая строка stdin отправляется как промпт.
    ///
    /// Пустые строки пропускаются. Выход: EOF (Ctrl+D).
    Interactive {
        #[arg(long)]
        target: Option<SocialPlatform>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    init_logging(&log_level)?;

    let env_config = ClientConfig::from_env().context("некорректная конфигурация backend")?;
    let config = resolve_config(cli.server, env_config).context("некорректный --server")?;
    info!(base_url = config.base_url(), "using backend");

    let client = ApiClient::new(config).context("не удалось создать HTTP-клиент")?;

    match cli.command {
        Command::Generate { prompt, target } => {
            let mut editor = new_editor(target);
            editor.set_prompt(prompt);

            match editor.submit(&client).await {
                SubmitOutcome::Generated(response) => {
                    print_generated(&response.generated_text, &response.timestamp);
                }
                SubmitOutcome::Failed { alert } => return Err(anyhow!(alert)),
                SubmitOutcome::Ignored => return Err(anyhow!("промпт не должен быть пустым")),
            }
        }
        Command::Interactive { target } => {
            let mut editor = new_editor(target);
            println!(
                "Платформа: {}. Введите промпт и нажмите Enter (Ctrl+D для выхода).",
                editor.social_target()
            );

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await.context("не удалось прочитать stdin")? {
                editor.set_prompt(line);

                match editor.submit(&client).await {
                    SubmitOutcome::Generated(response) => {
                        print_generated(&response.generated_text, &response.timestamp);
                    }
                    SubmitOutcome::Failed { alert } => eprintln!("{alert}"),
                    SubmitOutcome::Ignored => debug!("blank line skipped"),
                }
            }
        }
    }

    Ok(())
}

fn new_editor(target: Option<SocialPlatform>) -> PromptEditor {
    match target {
        Some(platform) => PromptEditor::new(platform.as_str()),
        None => PromptEditor::default(),
    }
}

fn resolve_config(server: Option<String>, env_config: ClientConfig) -> ClientResult<ClientConfig> {
    let Some(server) = server else {
        return Ok(env_config);
    };

    let timeout = env_config.request_timeout();
    Ok(ClientConfig::new(normalize_server(server))?.with_request_timeout(timeout))
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn print_generated(text: &str, timestamp: &str) {
    println!("Сгенерированный текст ({timestamp}):");
    println!("{text}");
}
