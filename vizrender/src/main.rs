//! # vizrender
//!
//! Command-line front end for vizrenderlib: reads a data table document and
//! writes it out as a visualization data source response.
//!
//! ## Overview
//!
//! The input is a table document in the same shape the JSON renderer
//! produces for its `table` member. The response status, request id, JSONP
//! callback and attachment name are taken from flags, so the tool can
//! reproduce any response a data source would send.
//!
//! ## Usage
//!
//! ```bash
//! # JSON response (default) for a table document
//! vizrender table.json
//!
//! # JSONP with a custom callback, echoing a request id
//! vizrender table.json --out jsonp --response-handler my.callback --req-id 7
//!
//! # CSV attachment, showing the response headers
//! vizrender table.json --out csv --out-file-name report --headers
//!
//! # Error envelope, no table needed
//! vizrender --status error --reason access_denied
//!
//! # Read from stdin, write to a file
//! cat table.json | vizrender - --out tsv_excel --output-path report.xls
//! ```
//!
//! Set `RUST_LOG=debug` to see what the renderer does.

mod input;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use vizrenderlib::{
    OutputFormat, ReasonType, RenderOptions, RenderedResponse, ResponseStatus, ResponseWriter,
    Table,
};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("vizrender")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Render a data table as a visualization data source response")
        .arg(
            Arg::new("input")
                .help("Table document to render (`-` reads stdin)")
                .default_value("-"),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .default_value("json")
                .value_parser(["json", "jsonp", "csv", "tsv", "tsv_excel", "html"])
                .help("Output format"),
        )
        .arg(
            Arg::new("req-id")
                .long("req-id")
                .help("Request id echoed back as reqId"),
        )
        .arg(
            Arg::new("response-handler")
                .long("response-handler")
                .help("JSONP callback name"),
        )
        .arg(
            Arg::new("out-file-name")
                .long("out-file-name")
                .help("Attachment file name for csv, tsv and tsv_excel"),
        )
        .arg(
            Arg::new("sig")
                .long("sig")
                .help("Signature of the table the client already holds"),
        )
        .arg(
            Arg::new("status")
                .short('s')
                .long("status")
                .default_value("ok")
                .value_parser(["ok", "warning", "error"])
                .help("Response status"),
        )
        .arg(
            Arg::new("reason")
                .short('r')
                .long("reason")
                .help("Reason for a warning or error status (e.g. access_denied)"),
        )
        .arg(
            Arg::new("message")
                .short('m')
                .long("message")
                .help("Message replacing the reason's default text"),
        )
        .arg(
            Arg::new("headers")
                .long("headers")
                .action(ArgAction::SetTrue)
                .help("Print the content type and headers before the body"),
        )
        .arg(
            Arg::new("output-path")
                .short('O')
                .long("output-path")
                .help("Write the response to a file instead of stdout"),
        )
}

/// Build render options from matches
fn build_options(matches: &ArgMatches) -> Result<RenderOptions> {
    let format: OutputFormat = matches
        .get_one::<String>("out")
        .map(|s| s.as_str())
        .unwrap_or("json")
        .parse()?;

    let mut options = RenderOptions::new().format(format);
    if let Some(id) = matches.get_one::<String>("req-id") {
        options = options.request_id(id);
    }
    if let Some(handler) = matches.get_one::<String>("response-handler") {
        options = options.response_handler(handler);
    }
    if let Some(name) = matches.get_one::<String>("out-file-name") {
        options = options.out_file_name(name);
    }
    if let Some(sig) = matches.get_one::<String>("sig") {
        options = options.signature(sig);
    }
    Ok(options)
}

/// Build the response status from matches
fn build_status(matches: &ArgMatches) -> Result<ResponseStatus> {
    let reason = matches
        .get_one::<String>("reason")
        .map(|s| s.parse::<ReasonType>())
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let message = matches.get_one::<String>("message").cloned();

    let status = matches
        .get_one::<String>("status")
        .map(|s| s.as_str())
        .unwrap_or("ok");
    match status {
        "ok" => {
            if reason.is_some() {
                bail!("--reason needs --status warning or --status error");
            }
            Ok(ResponseStatus::ok())
        }
        "warning" => Ok(ResponseStatus::warning(
            reason.unwrap_or(ReasonType::Other),
            message,
        )),
        "error" => Ok(ResponseStatus::error(
            reason.unwrap_or(ReasonType::InternalError),
            message,
        )),
        other => bail!("Unknown status: {}", other),
    }
}

/// Read the input document from a path or stdin
fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read table document from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
    }
}

/// Load the table unless the status is an error, which renders without one
fn load_table(matches: &ArgMatches, status: &ResponseStatus) -> Result<Option<Table>> {
    let path = matches
        .get_one::<String>("input")
        .map(|s| s.as_str())
        .unwrap_or("-");

    if status.is_error() && path == "-" {
        log::debug!("error status, not reading a table from stdin");
        return Ok(None);
    }

    let text = read_input(path)?;
    let table = input::parse_table(&text).with_context(|| format!("Failed to load {}", path))?;
    Ok(Some(table))
}

/// Serialize the response, optionally preceded by its headers
fn response_bytes(response: &RenderedResponse, with_headers: bool) -> Vec<u8> {
    let mut bytes = Vec::new();
    if with_headers {
        let mut head = format!("Content-Type: {}\n", response.content_type);
        for (name, value) in &response.headers {
            head.push_str(&format!("{}: {}\n", name, value));
        }
        head.push('\n');
        bytes.extend_from_slice(head.as_bytes());
    }
    bytes.extend_from_slice(&response.body);
    bytes
}

fn run(matches: &ArgMatches) -> Result<()> {
    let options = build_options(matches)?;
    let status = build_status(matches)?;
    let table = load_table(matches, &status)?;

    let response = ResponseWriter::instance().render(&options, &status, table.as_ref())?;
    let bytes = response_bytes(&response, matches.get_flag("headers"));

    match matches.get_one::<String>("output-path") {
        Some(path) => {
            fs::write(Path::new(path), &bytes)
                .with_context(|| format!("Failed to write {}", path))?;
            log::info!("wrote {} bytes to {}", bytes.len(), path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = build_command().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["vizrender"];
        argv.extend(args);
        build_command().get_matches_from(argv)
    }

    #[test]
    fn test_command_is_well_formed() {
        build_command().debug_assert();
    }

    #[test]
    fn test_default_options() {
        let options = build_options(&matches(&[])).unwrap();
        assert_eq!(options, RenderOptions::new());
    }

    #[test]
    fn test_all_options() {
        let m = matches(&[
            "--out",
            "tsv_excel",
            "--req-id",
            "42",
            "--response-handler",
            "cb",
            "--out-file-name",
            "report",
            "--sig",
            "123",
        ]);
        let options = build_options(&m).unwrap();
        assert_eq!(
            options,
            RenderOptions::new()
                .format(OutputFormat::TsvExcel)
                .request_id("42")
                .response_handler("cb")
                .out_file_name("report")
                .signature("123")
        );
    }

    #[test]
    fn test_status_defaults() {
        assert_eq!(build_status(&matches(&[])).unwrap(), ResponseStatus::ok());
        assert_eq!(
            build_status(&matches(&["--status", "error"])).unwrap(),
            ResponseStatus::error(ReasonType::InternalError, None)
        );
        assert_eq!(
            build_status(&matches(&["--status", "warning"])).unwrap(),
            ResponseStatus::warning(ReasonType::Other, None)
        );
    }

    #[test]
    fn test_status_with_reason_and_message() {
        let status = build_status(&matches(&[
            "--status",
            "error",
            "--reason",
            "access_denied",
            "--message",
            "Go away",
        ]))
        .unwrap();
        assert_eq!(
            status,
            ResponseStatus::error(ReasonType::AccessDenied, Some("Go away".to_string()))
        );
    }

    #[test]
    fn test_unknown_reason() {
        let err = build_status(&matches(&["--status", "error", "--reason", "nope"])).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_reason_requires_non_ok_status() {
        assert!(build_status(&matches(&["--reason", "timeout"])).is_err());
    }

    #[test]
    fn test_response_bytes_with_headers() {
        let response = RenderedResponse {
            content_type: "text/csv; charset=UTF-8",
            headers: vec![(
                "Content-Disposition",
                "attachment; filename=data.csv".to_string(),
            )],
            body: b"a\n".to_vec(),
        };
        assert_eq!(
            response_bytes(&response, true),
            b"Content-Type: text/csv; charset=UTF-8\nContent-Disposition: attachment; filename=data.csv\n\na\n"
                .to_vec()
        );
        assert_eq!(response_bytes(&response, false), b"a\n".to_vec());
    }
}
