//! CLI for inspecting and exercising bridged components.
//!
//! Usage:
//!   just-bridge [--server] [--config <file>] list
//!   just-bridge [--server] [--config <file>] call <name[.member]> [args...]
//!   just-bridge [--server] [--config <file>] new <name> [args...]

use just_bridge::runner::ds::capability::primary_role;
use just_bridge::runner::ds::error::BridgeError;
use just_bridge::runner::ds::value::HostValue;
use just_bridge::runner::plugin::gateway::{instantiate, invoke, invoke_member};
use just_bridge::runner::plugin::{
    BindingsScope, BridgeConfig, ComponentRegistry, ExecutionContext, GlobalScope,
    HostBindingGateway, Resources,
};
use just_bridge::runner::std_lib::json::from_json;
use std::env;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

enum Command {
    List,
    Call { target: String, args: Vec<String> },
    New { target: String, args: Vec<String> },
}

struct Options {
    server: bool,
    config: Option<String>,
    command: Command,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Some(options) => options,
        None => {
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("{}", e.to_script_message());
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!("just-bridge - host capability bridge");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  just-bridge [--server] [--config <file>] list");
    eprintln!("  just-bridge [--server] [--config <file>] call <name[.member]> [args...]");
    eprintln!("  just-bridge [--server] [--config <file>] new <name> [args...]");
}

fn parse_args(args: &[String]) -> Option<Options> {
    let mut server = false;
    let mut config = None;
    let mut rest = args.iter();

    let command = loop {
        match rest.next()?.as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "--server" => server = true,
            "--config" => config = Some(rest.next()?.clone()),
            "list" => break Command::List,
            "call" => {
                let target = rest.next()?.clone();
                break Command::Call {
                    target,
                    args: rest.cloned().collect(),
                };
            }
            "new" => {
                let target = rest.next()?.clone();
                break Command::New {
                    target,
                    args: rest.cloned().collect(),
                };
            }
            _ => return None,
        }
    };

    Some(Options {
        server,
        config,
        command,
    })
}

/// Arguments are read as JSON when they parse, as plain strings otherwise.
fn parse_value(arg: &str) -> HostValue {
    match serde_json::from_str(arg) {
        Ok(json) => from_json(json),
        Err(_) => HostValue::String(arg.to_string()),
    }
}

fn run(options: Options) -> Result<(), BridgeError> {
    let mut config = match &options.config {
        Some(path) => BridgeConfig::load(Path::new(path))?,
        None => BridgeConfig::new(),
    };
    if options.server {
        config.runtime.server_mode = true;
    }

    let registry = ComponentRegistry::with_standard(config)?;
    registry.hooks().run_startup();

    let resources = Resources::new()
        .with_bindings(Arc::new(BindingsScope::new()))
        .with_context(Arc::new(ExecutionContext::new()));
    let mut scope = GlobalScope::new("global");
    let report = HostBindingGateway::new(&registry).install(&mut scope, &resources)?;
    for (name, reason) in &report.skipped {
        tracing::info!(component = %name, ?reason, "not installed");
    }

    let result = execute(options.command, &scope);

    registry.hooks().run_shutdown();
    result
}

fn execute(command: Command, scope: &GlobalScope) -> Result<(), BridgeError> {
    match command {
        Command::List => {
            for name in scope.names() {
                if let Ok(HostValue::Object(o)) = scope.lookup(name) {
                    println!("{}\t{}", name, primary_role(o.as_ref()));
                }
            }
        }
        Command::Call { target, args } => {
            let args = args.iter().map(|a| parse_value(a)).collect::<Vec<_>>();
            let value = match target.split_once('.') {
                Some((base, member)) => invoke_member(&scope.lookup(base)?, member, args)?,
                None => invoke(&scope.lookup(&target)?, HostValue::Undefined, args)?,
            };
            println!("{}", value);
        }
        Command::New { target, args } => {
            let args = args.iter().map(|a| parse_value(a)).collect::<Vec<_>>();
            println!("{}", instantiate(&scope.lookup(&target)?, args)?);
        }
    }
    Ok(())
}
