// jackc: compiles class sources to stack VM code

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use jackc::driver::{self, DriverError, FileReport};
use jackc::parser::Parser;
use jackc::ui::App;
use jackc::CompileOptions;

/// Command-line settings
struct Options {
    input: PathBuf,
    emit_trace: bool,
    view: bool,
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} <file.jack | directory> [--xml] [--view]", program_name);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --xml     also write the parse trace to <Class>.xml");
    eprintln!("  --view    browse the generated code next to the source (single file)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} Main.jack          # Compile one class", program_name);
    eprintln!("  {} Pong/              # Compile every class in a directory", program_name);
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut input = None;
    let mut emit_trace = false;
    let mut view = false;

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--xml" => emit_trace = true,
            "--view" => view = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option '{}'", flag)),
            path => {
                if input.is_some() {
                    return Err(format!("Unexpected extra argument '{}'", path));
                }
                input = Some(PathBuf::from(path));
            }
        }
    }

    let input = input.ok_or_else(|| "No input file or directory provided".to_string())?;
    Ok(Options {
        input,
        emit_trace,
        view,
    })
}

fn report_success(report: &FileReport) {
    eprintln!(
        "Compiled {} ({} instructions) -> {}",
        report.class_name,
        report.instructions,
        report.vm_path.display()
    );
    if let Some(trace) = &report.trace_path {
        eprintln!("Parse trace -> {}", trace.display());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("jackc");

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage(program_name);
            std::process::exit(1);
        }
    };

    if !options.input.exists() {
        eprintln!("Error: '{}' not found", options.input.display());
        print_usage(program_name);
        std::process::exit(1);
    }

    let compile_options = CompileOptions {
        emit_trace: options.emit_trace,
    };

    if options.view {
        if !options.input.is_file() {
            eprintln!("Error: --view needs a single source file");
            std::process::exit(1);
        }
        return view(&options.input, compile_options);
    }

    eprintln!("Compiling {}...", options.input.display());
    let results = match driver::compile_path(&options.input, compile_options) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut failed: Vec<&Path> = Vec::new();
    for result in &results {
        match result {
            Ok(report) => report_success(report),
            Err(e) => {
                eprintln!("error: {}", e);
                failed.push(e.path());
            }
        }
    }

    if !failed.is_empty() {
        eprintln!(
            "{} of {} file(s) failed to compile:",
            failed.len(),
            results.len()
        );
        for path in failed {
            eprintln!("  {}", path.display());
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Compile one file and open the viewer on the result. When compilation
/// fails the viewer shows the partial output with the error.
fn view(path: &Path, options: CompileOptions) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(path)?;

    eprintln!("Compiling {}...", path.display());
    let (instructions, error) = match Parser::with_options(&source, options) {
        Err(e) => (Vec::new(), Some(e)),
        Ok(mut parser) => match parser.compile_class() {
            Ok(()) => {
                let compiled = parser.into_output();
                let report = driver::write_outputs(path, &compiled)?;
                report_success(&report);
                (compiled.instructions, None)
            }
            Err(e) => (parser.output().to_vec(), Some(e)),
        },
    };

    let failed = error.is_some();
    if let Some(e) = &error {
        let e = DriverError::Compile {
            path: path.to_path_buf(),
            error: e.clone(),
        };
        eprintln!("error: {}", e);
        eprintln!("Entering viewer with partial output...");
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, instructions, error);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    if failed {
        std::process::exit(1);
    }

    Ok(())
}
