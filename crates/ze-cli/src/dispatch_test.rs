// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};
use ze::{MemoryBackend, PropertyMap, PropertyValue};

use super::*;

/// Records the arguments it was called with and returns a fixed code.
struct Recorder {
    calls: RefCell<Vec<Vec<String>>>,
    code: i32,
}

impl Recorder {
    fn new(code: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            code,
        }
    }
}

impl Handler for Rc<Recorder> {
    fn run(
        &self,
        _ctx: &Context,
        args: &[String],
        _out: &mut dyn Write,
        _err: &mut dyn Write,
    ) -> Result<i32> {
        self.calls.borrow_mut().push(args.to_vec());
        Ok(self.code)
    }
}

struct Failing;

impl Handler for Failing {
    fn run(
        &self,
        _ctx: &Context,
        _args: &[String],
        _out: &mut dyn Write,
        _err: &mut dyn Write,
    ) -> Result<i32> {
        Err(miette::miette!("backend exploded"))
    }
}

struct Output {
    code: i32,
    out: String,
    err: String,
}

fn run_with(table: &CommandTable, ctx: &Context, argv: &[&str]) -> Output {
    let argv: Vec<String> = argv.iter().map(|a| a.to_string()).collect();
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = dispatch(table, ctx, &argv, &mut out, &mut err);
    Output {
        code,
        out: String::from_utf8(out).unwrap(),
        err: String::from_utf8(err).unwrap(),
    }
}

fn run(ctx: &Context, argv: &[&str]) -> Output {
    let table = CommandTable::standard().expect("standard table is valid");
    run_with(&table, ctx, argv)
}

fn props(mountpoint: &str, creation: &str) -> PropertyMap {
    let mut map = PropertyMap::new();
    map.insert("mountpoint", PropertyValue::sourced(mountpoint, "local"));
    map.insert("creation", PropertyValue::sourced(creation, "-"));
    map
}

#[fixture]
fn system() -> Context {
    let backend = MemoryBackend::new()
        .with_mount("/", "zroot/ROOT/default")
        .with_bootfs("zroot/ROOT/next")
        .with_dataset("zroot/ROOT", props("none", "1546300800"))
        .with_dataset("zroot/ROOT/default", props("/", "1546387200"))
        .with_dataset("zroot/ROOT/next", props("/", "1546473600"));
    Context::new(ze::Config::default(), backend)
}

#[fixture]
fn unconfigured() -> Context {
    Context::new(ze::Config::default(), MemoryBackend::new())
}

#[rstest]
fn test_no_command_prints_usage(unconfigured: Context) {
    let output = run(&unconfigured, &[]);
    assert_ne!(output.code, 0);
    assert!(output.err.contains("please enter a command"));
    assert!(output.err.contains("Usage:"));
    assert!(output.out.is_empty());
}

#[rstest]
#[case("frobnicate")]
#[case("LIST")]
#[case("")]
fn test_unknown_command(unconfigured: Context, #[case] name: &str) {
    let output = run(&unconfigured, &[name]);
    assert_ne!(output.code, 0);
    assert!(output.err.contains("no match found"));
    assert!(output.err.contains("zectl list"));
}

#[rstest]
fn test_declared_commands_without_handler(unconfigured: Context) {
    for name in DECLARED_COMMANDS.iter().filter(|name| **name != "list") {
        let output = run(&unconfigured, &[*name, "default"]);
        assert_eq!(output.code, EXIT_FAILURE, "{name} should not resolve");
        assert!(output.err.contains("no match found"), "{name}");
    }
}

#[rstest]
fn test_usage_lists_every_declared_command(unconfigured: Context) {
    let output = run(&unconfigured, &[]);
    for name in DECLARED_COMMANDS {
        assert!(output.err.contains(&format!("zectl {name}")), "{name}");
    }
}

#[rstest]
fn test_duplicate_command_rejected() {
    let result = CommandTable::new([
        ("list", Box::new(ListHandler) as Box<dyn Handler>),
        ("list", Box::new(Rc::new(Recorder::new(0))) as Box<dyn Handler>),
    ]);
    assert!(matches!(result, Err(DispatchError::DuplicateCommand(ref name)) if name == "list"));
}

#[rstest]
fn test_handler_receives_remaining_args(unconfigured: Context) {
    let recorder = Rc::new(Recorder::new(3));
    let table =
        CommandTable::new([("get", Box::new(Rc::clone(&recorder)) as Box<dyn Handler>)]).unwrap();

    let output = run_with(&table, &unconfigured, &["get", "mountpoint", "-H"]);
    assert_eq!(output.code, 3);
    assert_eq!(
        *recorder.calls.borrow(),
        vec![vec!["mountpoint".to_string(), "-H".to_string()]]
    );
}

#[rstest]
fn test_handler_failure_is_reported(unconfigured: Context) {
    let table = CommandTable::new([("destroy", Box::new(Failing) as Box<dyn Handler>)]).unwrap();
    let output = run_with(&table, &unconfigured, &["destroy"]);
    assert_eq!(output.code, EXIT_FAILURE);
    assert!(output.err.contains("Failed to run 'zectl destroy'"));
    assert!(output.err.contains("backend exploded"));
}

#[rstest]
fn test_list_without_backend_succeeds(unconfigured: Context) {
    let output = run(&unconfigured, &["list"]);
    assert_eq!(output.code, 0);
    assert!(output.err.contains("no boot environments to list"));
    assert!(output.out.is_empty());
}

/// Collects formatted log lines for assertions.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[rstest]
fn test_list_without_backend_reports_reason_once(unconfigured: Context) {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let output = tracing::subscriber::with_default(subscriber, || run(&unconfigured, &["list"]));
    assert_eq!(output.code, 0);
    assert_eq!(output.err.lines().count(), 2, "{}", output.err);

    let logged = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(logged.is_empty(), "{logged}");
}

#[rstest]
fn test_list_scripted(system: Context) {
    let output = run(&system, &["list", "-H"]);
    assert_eq!(output.code, 0, "{}", output.err);
    assert_eq!(
        output.out,
        "default\tN\t/\t2019-01-02 00:00\nnext\tR\t/\t2019-01-03 00:00\n"
    );
}

#[rstest]
fn test_list_table(system: Context) {
    let output = run(&system, &["list"]);
    assert_eq!(output.code, 0, "{}", output.err);
    let lines: Vec<&str> = output.out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("Name"));
    assert!(lines[0].contains("Creation"));
    assert!(lines[1].contains("default"));
    assert!(lines[2].contains("next"));
}

#[rstest]
fn test_list_single_boot_environment(system: Context) {
    let output = run(&system, &["list", "-H", "next"]);
    assert_eq!(output.code, 0, "{}", output.err);
    assert!(output.out.starts_with("next\tR\t"));
    assert_eq!(output.out.lines().count(), 1);
}

#[rstest]
fn test_list_yaml(system: Context) {
    let output = run(&system, &["list", "--format", "yaml"]);
    assert_eq!(output.code, 0, "{}", output.err);
    assert!(output.out.contains("name: default"));
    assert!(output.out.contains("dataset: zroot/ROOT/next"));
    assert!(output.out.contains("active: true"));
}

#[rstest]
fn test_list_handle_diagnostics(system: Context) {
    let output = run(&system, &["list", "-H", "--handle"]);
    assert_eq!(output.code, 0, "{}", output.err);
    assert!(output.out.starts_with("ZPOOL\tzroot\nBE ROOT\tzroot/ROOT\nBOOTFS\tzroot/ROOT/next\nROOT\tzroot/ROOT/default\n"));
}

#[rstest]
fn test_list_missing_boot_environment_fails(system: Context) {
    let output = run(&system, &["list", "gone"]);
    assert_eq!(output.code, EXIT_FAILURE);
    assert!(output.err.contains("Failed to run 'zectl list'"));
}

#[rstest]
fn test_list_bad_flag(system: Context) {
    let output = run(&system, &["list", "--bogus"]);
    assert_ne!(output.code, 0);
    assert!(output.err.contains("--bogus"));
}

#[rstest]
#[case("json")]
#[case("yml")]
fn test_list_unknown_format(system: Context, #[case] format: &str) {
    let output = run(&system, &["list", "--format", format]);
    assert_ne!(output.code, 0);
    assert!(output.err.contains(format), "{}", output.err);
    assert!(output.out.is_empty());
}

#[rstest]
fn test_list_help_goes_to_stdout(system: Context) {
    let output = run(&system, &["list", "--help"]);
    assert_eq!(output.code, 0);
    assert!(output.out.contains("--scripted"));
}
