use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use parcom::calc::{self, Variables};
use parcom::config::DiagnosticConfig;
use parcom::json;

/// Parse arithmetic expressions or JSON documents and show what came out.
#[derive(Debug, Parser)]
#[command(name = "parcom", version)]
struct Cli {
    /// Characters of context shown on each side of a parse error.
    #[arg(long, global = true, default_value_t = DiagnosticConfig::DEFAULT_CONTEXT)]
    context: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse and evaluate integer arithmetic.
    Calc {
        /// A variable binding, e.g. `--var x=3`. May be repeated.
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_variable)]
        vars: Vec<(String, i64)>,
        /// Expression to evaluate; read from stdin when absent.
        expression: Option<String>,
    },
    /// Parse a JSON document and print it back.
    Json {
        /// Indent the output instead of printing it on one line.
        #[arg(long)]
        pretty: bool,
        /// Document to parse; read from stdin when absent.
        document: Option<String>,
    },
}

fn parse_variable(binding: &str) -> Result<(String, i64), String> {
    let (name, value) = binding
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{binding}`"))?;
    let value = value
        .trim()
        .parse()
        .map_err(|err| format!("invalid value for `{name}`: {err}"))?;
    Ok((name.trim().to_string(), value))
}

/// Lines of stdin up to the first blank line or the end of input.
fn read_lines() -> impl Iterator<Item = io::Result<String>> {
    io::stdin()
        .lock()
        .lines()
        .take_while(|line| line.as_ref().map_or(true, |line| !line.trim().is_empty()))
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

fn run_calc(
    variables: &Variables,
    expression: Option<String>,
    config: &DiagnosticConfig,
) -> anyhow::Result<()> {
    if let Some(expression) = expression {
        let expr = calc::parse_expression_with(&expression, config).into_result()?;
        let value = expr
            .eval(variables)
            .with_context(|| format!("evaluating {expr}"))?;
        println!("{value}");
        return Ok(());
    }

    println!("Variables:");
    for (name, value) in variables {
        println!("  {name} = {value}");
    }

    prompt()?;
    for line in read_lines() {
        let line = line?;
        let report = calc::parse_expression_with(&line, config);
        match report.value {
            Some(expr) => {
                println!("Parsed: {line}");
                println!("as: {expr}");
                match expr.eval(variables) {
                    Ok(value) => println!("eval: {value}"),
                    Err(err) => println!("eval: error: {err}"),
                }
            }
            None => println!("{}", report.message),
        }
        prompt()?;
    }
    println!();
    Ok(())
}

fn run_json(pretty: bool, document: Option<String>, config: &DiagnosticConfig) -> anyhow::Result<()> {
    let render = |value: &json::JsonValue| {
        if pretty {
            value.pretty()
        } else {
            value.to_string()
        }
    };

    if let Some(document) = document {
        let value = json::parse_json_with(&document, config).into_result()?;
        println!("{}", render(&value));
        return Ok(());
    }

    prompt()?;
    for line in read_lines() {
        let line = line?;
        let report = json::parse_json_with(&line, config);
        match report.value {
            Some(value) => println!("{}", render(&value)),
            None => println!("{}", report.message),
        }
        prompt()?;
    }
    println!();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = DiagnosticConfig::default().with_context(cli.context);
    info!("running {:?}", cli.command);

    match cli.command {
        Command::Calc { vars, expression } => {
            let variables: Variables = vars.into_iter().collect();
            run_calc(&variables, expression, &config)
        }
        Command::Json { pretty, document } => run_json(pretty, document, &config),
    }
}
