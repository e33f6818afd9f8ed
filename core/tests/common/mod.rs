// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;
use valpipe::{Args, MethodTable, PipeError};

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)] // Clone, PartialEq, Eq for assertions
pub enum TestError {
  #[error("valpipe error: {0}")]
  Pipe(String), // Store as String for Eq comparison

  #[error("Test step failed: {0}")]
  Step(String),

  #[error("Type error: {0}")]
  Type(String),
}

impl From<PipeError> for TestError {
  fn from(pe: PipeError) -> Self {
    TestError::Pipe(format!("{:?}", pe))
  }
}

pub type StrResult = Result<Option<String>, TestError>;
pub type JsonResult = Result<Option<Value>, TestError>;

// --- String steps ---

/// `str_replace(search, replace, subject)`: all three arguments are positional,
/// so the threaded value must sit at index 2 to act as the subject.
pub fn str_replace(args: &mut Args<String>) -> StrResult {
  HANDLER_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
  let search = args.get(0)?.clone();
  let replace = args.get(1)?.clone();
  let subject = args.get(2)?.clone();
  Ok(Some(subject.replace(&search, &replace)))
}

pub fn uppercase(args: &mut Args<String>) -> StrResult {
  HANDLER_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
  Ok(Some(args.data().to_uppercase()))
}

/// Records the full argument list it received and passes the threaded value through.
pub fn record_args(log: Arc<parking_lot::Mutex<Vec<Vec<String>>>>) -> impl Fn(&mut Args<String>) -> StrResult + Send + Sync + 'static {
  move |args: &mut Args<String>| {
    log.lock().push(args.iter().cloned().collect());
    Ok(Some(args.data().clone()))
  }
}

pub fn failing_step(message: &'static str) -> impl Fn(&mut Args<String>) -> StrResult + Send + Sync + 'static {
  move |_args: &mut Args<String>| {
    HANDLER_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    tracing::warn!(target: "test_steps", "failing with: '{}'", message);
    Err(TestError::Step(message.to_string()))
  }
}

pub fn string_table() -> MethodTable<String, TestError> {
  MethodTable::new("Str")
    .with_method("replace", str_replace)
    .with_method("upper", uppercase)
}

// --- Array steps over JSON values ---

pub fn sample_list() -> Value {
  serde_json::json!([{ "foo": "bar" }, { "baz": "test" }])
}

fn as_array(value: &Value) -> Result<&Vec<Value>, TestError> {
  value
    .as_array()
    .ok_or_else(|| TestError::Type(format!("expected array, got {}", value)))
}

/// First element of an array.
pub fn reset(args: &mut Args<Value>) -> JsonResult {
  Ok(as_array(args.data())?.first().cloned())
}

/// Last element of an array.
pub fn end(args: &mut Args<Value>) -> JsonResult {
  Ok(as_array(args.data())?.last().cloned())
}

/// Key of the first entry: the first field name of an object, or `0` for a
/// non-empty array.
pub fn key(args: &mut Args<Value>) -> JsonResult {
  match args.data() {
    Value::Object(map) => Ok(map.keys().next().map(|k| Value::String(k.clone()))),
    Value::Array(items) if !items.is_empty() => Ok(Some(Value::from(0))),
    Value::Array(_) => Ok(None),
    other => Err(TestError::Type(format!("expected array or object, got {}", other))),
  }
}

/// Appends its extra arguments to the threaded array in place and returns nothing.
pub fn push(args: &mut Args<Value>) -> JsonResult {
  let extras: Vec<Value> = args.extras().cloned().collect();
  match args.data_mut() {
    Value::Array(items) => {
      items.extend(extras);
      Ok(None)
    }
    other => Err(TestError::Type(format!("expected array, got {}", other))),
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::TRACE)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counter for checking execution counts ---
pub static HANDLER_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  HANDLER_EXEC_COUNTER.store(0, Ordering::SeqCst);
}

pub fn exec_count() -> usize {
  HANDLER_EXEC_COUNTER.load(Ordering::SeqCst)
}
