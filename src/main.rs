use std::io::BufRead;

use log::{info, warn};
use tokio::sync::mpsc;

use crate::controller::{FormController, FormEvent, Status};
use crate::record::Field;
use crate::storage::FileStore;
use crate::viacep::ViaCepClient;

mod controller;
mod format;
mod record;
mod storage;
mod validate;
mod viacep;

const DEFAULT_STORE_PATH: &str = "data/form.json";

#[tokio::main]
async fn main() {
    env_logger::init();

    match run().await {
        Err(e) => {
            log::error!("Error: {:?}", e);
            std::process::exit(1);
        }
        _ => {}
    }
}

async fn run() -> color_eyre::Result<()> {
    let store_path = std::env::var("FORM_STORE_PATH")
        .unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());
    info!("form state persists to [{store_path}]");

    let store = FileStore::open(store_path);
    let client = ViaCepClient::new()?;
    let controller = FormController::new(store, client);

    println!("commands: set <field> <value> | submit | clear | show | quit");

    let (tx, rx) = mpsc::channel(32);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if matches!(line.trim(), "quit" | "exit") {
                break;
            }
            if let Some(event) = parse_command(&line) {
                if tx.blocking_send(event).is_err() {
                    break;
                }
            }
        }
    });

    let controller = controller.run(rx, print_status).await;

    let filled = Field::ALL
        .iter()
        .filter(|field| !controller.record().get(**field).is_empty())
        .count();
    info!("session closed with [{}/{}] fields filled", filled, Field::ALL.len());
    if let Status::Error(message) = controller.status() {
        warn!("last status was an error: [{message}]");
    }
    Ok(())
}

fn print_status(status: &Status) {
    match status {
        Status::Hidden => {}
        Status::Success(message) => println!("ok: {message}"),
        Status::Error(message) => println!("error: {message}"),
    }
}

fn parse_command(line: &str) -> Option<FormEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim_start()),
        None => (line, ""),
    };
    match command {
        "set" => {
            let (name, value) = match rest.split_once(' ') {
                Some((name, value)) => (name, value),
                None => (rest, ""),
            };
            match Field::from_name(name) {
                Some(field) => Some(FormEvent::Input {
                    field,
                    value: value.to_string(),
                }),
                None => {
                    warn!("unknown field [{name}]");
                    None
                }
            }
        }
        "submit" => Some(FormEvent::Submit),
        "clear" => Some(FormEvent::Clear),
        "show" => Some(FormEvent::Show),
        _ => {
            warn!("unknown command [{command}]");
            None
        }
    }
}
