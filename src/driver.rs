//! Batch compilation of source files
//!
//! The driver turns a path (a single `.jack` file or a directory holding
//! several) into a sorted list of sources and compiles them one after another.
//! Each file is independent: its own parser, symbol table and label counter.
//! Output files are written only once their source has compiled completely,
//! so a failed file never leaves a truncated `.vm` behind.

use crate::constants::{SOURCE_EXTENSION, TRACE_EXTENSION, VM_EXTENSION};
use crate::errors::CompileError;
use crate::parser::{CompileOptions, CompiledClass};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while locating, reading, compiling or writing files
#[derive(Debug)]
pub enum DriverError {
    Io { path: PathBuf, source: io::Error },

    /// The input path holds no `.jack` sources
    NoSources(PathBuf),

    Compile { path: PathBuf, error: CompileError },
}

impl DriverError {
    pub fn path(&self) -> &Path {
        match self {
            DriverError::Io { path, .. }
            | DriverError::NoSources(path)
            | DriverError::Compile { path, .. } => path,
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            DriverError::NoSources(path) => {
                write!(f, "{}: no .{} files found", path.display(), SOURCE_EXTENSION)
            }
            DriverError::Compile { path, error } => write!(f, "{}: {}", path.display(), error),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Io { source, .. } => Some(source),
            DriverError::Compile { error, .. } => Some(error),
            DriverError::NoSources(_) => None,
        }
    }
}

/// What a successful compile wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub source: PathBuf,
    pub class_name: String,
    pub instructions: usize,
    pub vm_path: PathBuf,
    pub trace_path: Option<PathBuf>,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> DriverError + '_ {
    move |source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn is_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Sources named by `input`: the file itself, or the `.jack` files directly
/// inside a directory in name order. Subdirectories are not searched.
pub fn collect_sources(input: &Path) -> Result<Vec<PathBuf>, DriverError> {
    let metadata = fs::metadata(input).map_err(io_error(input))?;

    if metadata.is_file() {
        return if is_source(input) {
            Ok(vec![input.to_path_buf()])
        } else {
            Err(DriverError::NoSources(input.to_path_buf()))
        };
    }

    let mut sources = Vec::new();
    for entry in fs::read_dir(input).map_err(io_error(input))? {
        let path = entry.map_err(io_error(input))?.path();
        if path.is_file() && is_source(&path) {
            sources.push(path);
        }
    }

    if sources.is_empty() {
        return Err(DriverError::NoSources(input.to_path_buf()));
    }

    sources.sort();
    Ok(sources)
}

/// `dir/Main.jack` → `dir/Main.<extension>`
pub fn output_path(source: &Path, extension: &str) -> PathBuf {
    source.with_extension(extension)
}

/// Compile one file and write its outputs beside it.
pub fn compile_file(source: &Path, options: CompileOptions) -> Result<FileReport, DriverError> {
    let text = fs::read_to_string(source).map_err(io_error(source))?;

    let compiled =
        crate::compile_with_options(&text, options).map_err(|error| DriverError::Compile {
            path: source.to_path_buf(),
            error,
        })?;

    write_outputs(source, &compiled)
}

/// Write the `.vm` file, and the `.xml` trace if one was recorded, beside `source`.
pub fn write_outputs(source: &Path, compiled: &CompiledClass) -> Result<FileReport, DriverError> {
    let vm_path = output_path(source, VM_EXTENSION);
    fs::write(&vm_path, compiled.vm_code()).map_err(io_error(&vm_path))?;

    let trace_path = match &compiled.trace {
        Some(trace) => {
            let path = output_path(source, TRACE_EXTENSION);
            fs::write(&path, trace).map_err(io_error(&path))?;
            Some(path)
        }
        None => None,
    };

    Ok(FileReport {
        source: source.to_path_buf(),
        class_name: compiled.class_name.clone(),
        instructions: compiled.instructions.len(),
        vm_path,
        trace_path,
    })
}

/// Compile every source under `input`. A failing file does not stop the
/// others; the per-file outcomes come back in source order.
pub fn compile_path(
    input: &Path,
    options: CompileOptions,
) -> Result<Vec<Result<FileReport, DriverError>>, DriverError> {
    let sources = collect_sources(input)?;
    Ok(sources
        .iter()
        .map(|source| compile_file(source, options))
        .collect())
}
