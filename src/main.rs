use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use taskdeck_client::model::{CreateTaskInput, LoginInput, TaskQuery};
use taskdeck_client::{ApiClient, ApiResult, ClientConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ClientConfig::from_env();

    eprintln!("TaskDeck chat v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Backend: {}",
        if config.use_mock {
            "mock (in-memory)".to_string()
        } else {
            config.base_url.clone()
        }
    );
    eprintln!("   Commands: /login <email> <password>, /tasks, /add <title>, /quit");
    eprintln!("   Anything else is sent to the chatbot.\n");

    let client = ApiClient::new(config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["/quit"] => break,
            ["/login", email, password] => {
                let input = LoginInput {
                    email: (*email).to_string(),
                    password: (*password).to_string(),
                };
                match client.login(&input).await {
                    ApiResult::Data(auth) => eprintln!("Logged in as {}", auth.user.email),
                    ApiResult::Error(err) => eprintln!("Login failed: {err}"),
                }
            }
            ["/tasks"] => match client.get_tasks(&TaskQuery::new()).await {
                ApiResult::Data(tasks) if tasks.is_empty() => eprintln!("No tasks."),
                ApiResult::Data(tasks) => {
                    for task in tasks {
                        let mark = if task.completed { "x" } else { " " };
                        eprintln!("[{mark}] {}  ({})", task.title, task.id);
                    }
                }
                ApiResult::Error(err) => eprintln!("Error: {err}"),
            },
            ["/add", ..] => {
                let title = line.trim_start_matches("/add").trim();
                if title.is_empty() {
                    eprintln!("Usage: /add <title>");
                    continue;
                }
                match client.create_task(&CreateTaskInput::new(title)).await {
                    ApiResult::Data(task) => eprintln!("Created '{}'", task.title),
                    ApiResult::Error(err) => eprintln!("Error: {err}"),
                }
            }
            _ => match client.send_chat_message(&line).await {
                ApiResult::Data(reply) => {
                    eprintln!("{}", reply.message);
                    if !reply.suggestions.is_empty() {
                        eprintln!("   Try: {}", reply.suggestions.join(" | "));
                    }
                }
                ApiResult::Error(err) => eprintln!("Error: {err}"),
            },
        }
    }

    Ok(())
}
