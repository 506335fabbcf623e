use crate::services::{BinanceGateway, ExchangeApi, LeverageService};
use crate::types::{Config, Credentials};
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// One named user action, parsed from an input line.
enum Action {
    Init,
    List,
    Select(String),
    Show,
    Check,
    Set(String),
    SetAll(String),
    Help,
    Exit,
    Empty,
    Unknown(String),
}

fn parse_action(line: &str) -> Action {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Action::Empty;
    }
    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (trimmed, ""),
    };
    match command.to_ascii_lowercase().as_str() {
        "init" => Action::Init,
        "list" => Action::List,
        "select" => Action::Select(rest.to_string()),
        "show" => Action::Show,
        "check" => Action::Check,
        "set" => Action::Set(rest.to_string()),
        "set-all" | "setall" => Action::SetAll(rest.to_string()),
        "help" => Action::Help,
        "exit" | "quit" => Action::Exit,
        other => Action::Unknown(other.to_string()),
    }
}

pub async fn run_shell(config: Config) -> Result<()> {
    let gateway = BinanceGateway::new(config.clone())?;
    run_loop(gateway, config).await
}

/// The interaction loop proper: one action is read, dispatched to the
/// service and fully rendered before the next line is read. Terminates on
/// an explicit exit action or end of input.
async fn run_loop<G: ExchangeApi>(gateway: G, config: Config) -> Result<()> {
    let mut service = LeverageService::new(gateway, config.limits.clone());
    let mut listed: Vec<String> = Vec::new();
    let mut selected = String::new();
    let mut current_leverage = String::new();

    print_banner(&config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match parse_action(&line) {
            Action::Exit => break,
            Action::Empty => {}
            Action::Help => print_help(),
            Action::Unknown(command) => println!("Unknown command {:?}, try `help`", command),
            Action::Init => {
                let api_key =
                    rpassword::prompt_password("API key: ").context("Failed to read API key")?;
                let api_secret = rpassword::prompt_password("API secret: ")
                    .context("Failed to read API secret")?;
                match service
                    .initialize(Credentials::new(api_key, api_secret))
                    .await
                {
                    Ok(markets) => println!("Exchange initialized, {} markets loaded", markets),
                    Err(err) => println!("Failed to initialize exchange: {}", err),
                }
            }
            Action::List => match service.list_with_leverage().await {
                Ok(entries) => {
                    for (index, entry) in entries.iter().enumerate() {
                        println!("{:>4}  {}", index + 1, entry);
                    }
                    println!("Got {} perpetual futures", entries.len());
                    listed = entries;
                }
                Err(err) => println!("{}", err),
            },
            Action::Select(argument) => {
                if argument.is_empty() {
                    println!("Usage: select <number|symbol>");
                    continue;
                }
                match resolve_selection(&listed, &argument) {
                    Some(entry) => {
                        selected = entry;
                        current_leverage.clear();
                        println!("Selected: {}", selected);
                    }
                    None => println!("No listed contract at position {}", argument),
                }
            }
            Action::Show => {
                let symbol = if selected.is_empty() {
                    "<none>"
                } else {
                    selected.as_str()
                };
                let leverage = if current_leverage.is_empty() {
                    "<not checked>"
                } else {
                    current_leverage.as_str()
                };
                println!("Selected contract: {}", symbol);
                println!("Current leverage:  {}", leverage);
            }
            Action::Check => match service.check_leverage(&selected).await {
                Ok(reading) => {
                    current_leverage = reading.to_string();
                    println!("Current leverage for {}: {}", selected, reading);
                }
                Err(err) => println!("{}", err),
            },
            Action::Set(leverage_text) => match service.set_one(&selected, &leverage_text).await {
                Ok(message) => println!("{}", message),
                Err(err) => println!("{}", err),
            },
            Action::SetAll(leverage_text) => match service.set_all(&leverage_text).await {
                Ok(messages) => {
                    for message in &messages {
                        println!("{}", message);
                    }
                    println!("Applied to {} contracts", messages.len());
                }
                Err(err) => println!("{}", err),
            },
        }
    }

    println!("Session closed.");
    Ok(())
}

/// A numeric argument picks from the last listing; anything else is taken
/// as a symbol, preferring the full listed entry (with its leverage
/// annotation) when one matches.
fn resolve_selection(listed: &[String], argument: &str) -> Option<String> {
    if let Ok(index) = argument.parse::<usize>() {
        if index >= 1 && index <= listed.len() {
            return Some(listed[index - 1].clone());
        }
        return None;
    }
    let found = listed
        .iter()
        .find(|entry| entry.split_whitespace().next() == Some(argument) || *entry == argument);
    Some(found.cloned().unwrap_or_else(|| argument.to_string()))
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("Failed to flush prompt")?;
    Ok(())
}

fn print_banner(config: &Config) {
    let network = if config.rest_url.contains("testnet") {
        "TESTNET"
    } else {
        "MAINNET"
    };
    println!("═══════════════════════════════════════════════");
    println!("  BINANCE {} PERPETUALS - LEVERAGE DESK", network);
    println!("═══════════════════════════════════════════════");
    print_help();
}

fn print_help() {
    println!("Commands:");
    println!("  init             - Enter API credentials and initialize the exchange");
    println!("  list             - List linear perpetual contracts with current leverage");
    println!("  select <n|sym>   - Select a contract from the list (or type a symbol)");
    println!("  show             - Show the selected contract and last checked leverage");
    println!("  check            - Check current leverage for the selected contract");
    println!("  set <leverage>   - Set leverage for the selected contract");
    println!("  set-all <lev>    - Set leverage for every perpetual contract");
    println!("  exit             - Quit");
}

#[cfg(test)]
mod tests {
    use super::{Action, parse_action, resolve_selection};

    #[test]
    fn parses_commands_with_arguments() {
        assert!(matches!(parse_action("list"), Action::List));
        assert!(matches!(parse_action("  exit  "), Action::Exit));
        assert!(matches!(parse_action(""), Action::Empty));
        match parse_action("set-all 20") {
            Action::SetAll(arg) => assert_eq!(arg, "20"),
            _ => panic!("expected set-all"),
        }
        match parse_action("select BTC/USDT:USDT (Leverage: 10)") {
            Action::Select(arg) => assert_eq!(arg, "BTC/USDT:USDT (Leverage: 10)"),
            _ => panic!("expected select"),
        }
    }

    #[test]
    fn selection_by_index_and_symbol() {
        let listed = vec![
            "BTC/USDT:USDT (Leverage: 10)".to_string(),
            "ETH/USDT:USDT (Leverage: no data)".to_string(),
        ];
        assert_eq!(
            resolve_selection(&listed, "2").as_deref(),
            Some("ETH/USDT:USDT (Leverage: no data)")
        );
        assert_eq!(resolve_selection(&listed, "3"), None);
        // a symbol match pulls in the full listed entry, annotation included
        assert_eq!(
            resolve_selection(&listed, "BTC/USDT:USDT").as_deref(),
            Some("BTC/USDT:USDT (Leverage: 10)")
        );
        // free-form symbols pass through untouched
        assert_eq!(
            resolve_selection(&listed, "SOL/USDT:USDT").as_deref(),
            Some("SOL/USDT:USDT")
        );
    }
}
