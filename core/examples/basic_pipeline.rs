// valpipe/examples/basic_pipeline.rs

use valpipe::{Args, MethodTable, PipeError, PipeResult, Pipeline};
use tracing::info;

// 1. Define the step callables. Each receives the assembled arguments, with the
//    threaded value spliced in at the step's data position.
fn str_replace(args: &mut Args<String>) -> PipeResult<Option<String>> {
  let search = args.get(0)?;
  let replace = args.get(1)?;
  let subject = args.get(2)?;
  Ok(Some(subject.replace(search.as_str(), replace)))
}

fn trim(args: &mut Args<String>) -> PipeResult<Option<String>> {
  let trimmed = args.data().trim().to_string();
  if trimmed.is_empty() {
    // No usable result: the step's fallback takes over.
    return Ok(None);
  }
  Ok(Some(trimmed))
}

fn main() -> Result<(), PipeError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 2. A scope: the method table that method-name steps resolve against.
  let strings = MethodTable::new("Str")
    .with_method("replace", str_replace)
    .with_method("trim", trim);

  // 3. Build the pipeline. Every step puts the threaded value at index 2 unless
  //    told otherwise.
  let mut pipeline = Pipeline::<String, PipeError>::new("  Hello World  ".to_string())
    .with_scope(strings)
    .with_data_position(2);

  pipeline
    .pipe_method("trim", [])
    .pipe_method("replace", ["World".to_string(), "Narnia".to_string()])
    .pipe(
      |args: &mut Args<String>| Ok(Some(format!("{}{}", args.get(0)?, args.data()))),
      [">> ".to_string()],
    )
    .data_position(1)?;

  // 4. Run it
  info!("Starting pipeline processing...");
  let result = pipeline.process()?;
  info!("Final value: {}", result);
  assert_eq!(result, ">> Hello Narnia");

  // 5. A step with nothing to return falls back to its default
  let mut blank = Pipeline::<String, PipeError>::new("   ".to_string()).with_functions(
    MethodTable::new("global").with_method("trim", trim),
  );
  blank.pipe_method("trim", []).default("(blank)".to_string())?;
  info!("Blank input becomes: {}", blank.process()?);

  Ok(())
}
