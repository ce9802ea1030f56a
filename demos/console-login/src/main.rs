//! Console front end for the Latchkey login controller.
//!
//! Reads one command per line from stdin and prints the resulting state.
//! Accepts the demo account `anne` / `anne`.
//!
//! ```text
//! user <name>        set the username
//! pass <password>    set the password
//! remember on|off    toggle remember-me
//! online on|off      simulate connectivity (the probe overrides it)
//! submit             try to sign in
//! refresh            re-evaluate the lockout against the clock
//! reset              sign out and forget stored credentials
//! state              print the current state
//! quit               exit
//! ```
//!
//! Environment:
//!
//! - `LATCHKEY_CONFIG`: path to a JSON `LoginConfig`
//! - `LATCHKEY_LOCKOUT_SECS`: overrides `lockout_secs`
//! - `LATCHKEY_STORE`: credentials file (default `latchkey-credentials.json`)
//! - `LATCHKEY_PROBE`: `host:port` to probe for connectivity
//! - `RUST_LOG`: log filter (default `info`)

use std::error::Error;

use latchkey::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_STORE: &str = "latchkey-credentials.json";

fn load_config() -> Result<LoginConfig, Box<dyn Error>> {
    let mut config = match std::env::var("LATCHKEY_CONFIG") {
        Ok(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        Err(_) => LoginConfig::default(),
    };
    if let Ok(secs) = std::env::var("LATCHKEY_LOCKOUT_SECS") {
        config.lockout_secs = secs.parse()?;
    }
    Ok(config)
}

fn print_state(state: &LoginState) {
    println!(
        "user={:?} remember={} loading={} failures={} locked={} enabled={}",
        state.username(),
        state.remember_me(),
        state.is_loading(),
        state.failure_count(),
        state.is_locked_out(),
        state.is_login_enabled(),
    );
    for hint in [state.username_error(), state.password_error()]
        .into_iter()
        .flatten()
    {
        println!("  hint: {hint}");
    }
    if let Some(error) = state.error_message() {
        println!("  error: {error}");
    }
}

fn parse_switch(arg: &str) -> Option<bool> {
    match arg {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    latchkey::init_tracing();

    let config = load_config()?;
    tracing::info!(config = %serde_json::to_string(&config)?, "starting console login");

    let network = ConnectivityMonitor::default();
    let _probe = match std::env::var("LATCHKEY_PROBE") {
        Ok(target) => Some(TcpProbe::spawn(
            ProbeConfig {
                target,
                ..ProbeConfig::default()
            },
            network.clone(),
        )?),
        Err(_) => None,
    };

    let store_path = std::env::var("LATCHKEY_STORE").unwrap_or_else(|_| DEFAULT_STORE.to_string());
    let (login, mut navigation) = LoginController::builder(
        StaticAuthService::demo(),
        FileStore::new(store_path),
        network.clone(),
    )
    .config(config)
    .spawn();

    tokio::spawn(async move {
        while let Some(event) = navigation.next().await {
            match event.reason {
                NavigationReason::SignedIn => println!(">> welcome, you are signed in"),
                NavigationReason::RememberedToken => {
                    println!(">> welcome back (remembered session)");
                }
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let (command, arg) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));

        match command {
            "" => continue,
            "user" => login.set_username(arg).await?,
            "pass" => login.set_password(arg).await?,
            "remember" => match parse_switch(arg) {
                Some(value) => login.set_remember_me(value).await?,
                None => println!("usage: remember on|off"),
            },
            "online" => match parse_switch(arg) {
                Some(value) => network.set_online(value),
                None => println!("usage: online on|off"),
            },
            "submit" => {
                let outcome = login.submit().await?;
                println!("submit: {outcome:?}");
                login.settled().await?;
            }
            "refresh" => login.refresh().await?,
            "reset" => login.reset().await?,
            "state" => {}
            "quit" | "exit" => break,
            other => {
                println!("unknown command {other:?}");
                continue;
            }
        }
        print_state(&login.state());
    }

    login.shutdown().await?;
    Ok(())
}
