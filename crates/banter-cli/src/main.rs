use std::io::{self, BufRead, Write};

use banter::session::{
    ChatOptionsBuilder, ChatSession, DEFAULT_ENDPOINT, DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_PORT,
};
use banter::transport::TcpTransport;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

/// Interactive terminal chat against an Ollama-style AI server.
#[derive(Debug, Parser)]
#[command(name = "banter", version, about)]
struct Args {
    /// AI model to use
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Host the AI server listens on
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port the AI server listens on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Chat endpoint path
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Ask for the whole reply at once instead of streaming it
    #[arg(long)]
    no_stream: bool,

    /// Enable debug logs (wire traffic, framing decisions)
    #[arg(short, long)]
    debug: bool,
}

fn filter_for(debug: bool) -> EnvFilter {
    let directives = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

fn show_chat_help() {
    println!("{}", "Help".blue());
    println!(
        "{}",
        "Enter a question for the AI, the following special commands are supported:".blue()
    );
    println!("{}", "  /bye   - exit".blue());
    println!(
        "{}",
        "  /new   - start a new conversation and clear the chat context".blue()
    );
    println!("{}", "  /debug - toggle debug logs".blue());
    println!("{}", "  /help  - this help text".blue());
}

fn run_turn(session: &mut ChatSession, prompt: &str) -> anyhow::Result<()> {
    let host = session.options().host.clone();
    let port = session.options().port;
    let mut transport = TcpTransport::connect(&host, port)?;

    print!("{}", "AI: ".green());
    io::stdout().flush()?;

    let mut streamed = false;
    let answer = session.send(&mut transport, prompt, &mut |fragment: &str| {
        streamed = true;
        print!("{}", fragment.green());
        let _ = io::stdout().flush();
    })?;

    // a fixed-length reply was not rendered incrementally
    if streamed {
        println!();
    } else {
        println!("{}", answer.green());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut debug = args.debug;

    let (filter, reload_handle) = reload::Layer::new(filter_for(debug));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    if args.model != DEFAULT_MODEL {
        println!("{}", format!("Selected Model: {}", args.model).blue());
    }

    let options = ChatOptionsBuilder::default()
        .host(args.host)
        .port(args.port)
        .endpoint(args.endpoint)
        .model(args.model)
        .stream(!args.no_stream)
        .build()?;
    let mut session = ChatSession::new(options);

    println!(
        "{}{}{}{}{}",
        "Please enter a prompt for the AI or ".blue(),
        "/help".yellow(),
        " for help, ".blue(),
        "/bye".red(),
        " to exit".blue()
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("PROMPT: ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "" => continue,
            "/help" => show_chat_help(),
            "/new" => {
                println!(
                    "{}",
                    "Starting a new conversation, clearing previous chat context".blue()
                );
                session.reset();
            }
            "/debug" => {
                debug = !debug;
                reload_handle.reload(filter_for(debug))?;
                println!("{}", format!("Toggled debug, now {debug}").red());
            }
            "/bye" => {
                println!("{}", "Exiting Chat...".red());
                break;
            }
            prompt => run_turn(&mut session, prompt)?,
        }
    }

    Ok(())
}
