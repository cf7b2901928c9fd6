//! Command-line client. Each subcommand mounts one of the client views,
//! drives it, and prints the result. These are the same code paths a
//! richer UI would use.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use taskdeck::client::http::{ApiClient, ClientError};
use taskdeck::client::task_form::TaskForm;
use taskdeck::client::tasks_view::{FilterStatus, TasksView};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskctl", about = "Talk to a taskdeck server")]
struct Cli {
    /// Server base URL
    #[arg(long, default_value = "http://localhost:3000")]
    server: String,

    /// Session token (falls back to $TASKDECK_TOKEN)
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and print a session token
    Login { username: String, password: String },

    /// List your tasks
    List {
        /// all, pending, or completed
        #[arg(long, default_value = "all")]
        status: String,
    },

    /// Add a new task
    Add {
        description: String,

        /// Create it already completed
        #[arg(long)]
        completed: bool,
    },

    /// Edit an existing task
    Edit {
        id: Uuid,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        completed: Option<bool>,
    },

    /// Flip a task's completion state
    Toggle { id: Uuid },

    /// Delete a task
    Rm { id: Uuid },
}

enum CliError {
    Client(ClientError),
    Usage(String),
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        CliError::Client(e)
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Client(e) => write!(f, "{e}"),
            CliError::Usage(e) => write!(f, "{e}"),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut client = ApiClient::new(&cli.server);
    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("TASKDECK_TOKEN").ok());
    if let Some(token) = token {
        client.set_token(token);
    }

    match cli.command {
        Command::Login { username, password } => {
            let response = client.login(&username, &password).await?;
            println!("{}", response.token);
            eprintln!("logged in as {} (export TASKDECK_TOKEN to reuse)", response.user.username);
        }

        Command::List { status } => {
            let filter: FilterStatus = status.parse().map_err(CliError::Usage)?;

            let mut view = TasksView::new(client);
            view.refresh().await?;
            view.set_filter(filter);

            if !view.tasks().is_empty() {
                println!("Your tasks ({})", view.tasks().len());
            }
            for task in view.visible() {
                let mark = if task.completed { "x" } else { " " };
                println!("[{mark}] {}  {}", task.id, task.description);
            }
            if view.should_prompt_add() {
                println!("No tasks found. Add one with `taskctl add <description>`");
            }
        }

        Command::Add { description, completed } => {
            let mut form = TaskForm::add(client);
            form.set_description(description);
            form.set_completed(completed);
            submit(&mut form).await?;
        }

        Command::Edit { id, description, completed } => {
            let mut form = TaskForm::update(client, id);
            form.load().await?;
            if let Some(description) = description {
                form.set_description(description);
            }
            if let Some(completed) = completed {
                form.set_completed(completed);
            }
            submit(&mut form).await?;
        }

        Command::Toggle { id } => {
            let mut view = TasksView::new(client);
            view.refresh().await?;
            view.toggle_completed(id).await?;
        }

        Command::Rm { id } => {
            let mut view = TasksView::new(client);
            view.delete(id).await?;
            println!("deleted {id}");
        }
    }

    Ok(())
}

async fn submit(form: &mut TaskForm) -> Result<(), ClientError> {
    if form.submit().await? {
        println!("saved");
    } else {
        for error in form.errors() {
            eprintln!("{}: {}", error.field, error.err);
        }
    }
    Ok(())
}
