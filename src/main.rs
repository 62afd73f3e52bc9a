use std::{
    ffi::OsStr,
    ffi::OsString,
    fs,
    io::Read,
    path::{Path, PathBuf},
    process,
};

use clap::{ArgGroup, Parser as ClapParser};
use oxc_span::SourceType;

use protoclass::{ConvertOptions, Protoclass};

#[derive(Debug, ClapParser)]
#[command(name = "protoclass", about = "Rewrites prototype-based JavaScript into native class syntax")]
#[command(group(
    ArgGroup::new("verbosity")
        .args(["quiet", "verbose"])
        .multiple(false)
))]
struct Cli {
    /// The JS/TS file to convert
    input_filename: PathBuf,

    /// Suppress output to stdout. Output result only to stdout if the -o option is not set
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Show more progress messages while converting
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Write converted script to output filename. <input_filename>-classy.js is used if no filename is provided
    #[arg(short = 'o', long = "output", num_args = 0..=1, default_missing_value = "")]
    output: Option<OsString>,

    /// Run at most M conversion passes
    #[arg(short = 'm', long = "max-iterations")]
    max_iterations: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    let input_path = cli.input_filename;
    let source_text = match read_file_to_string_with_capacity(&input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[-] Critical Error: Failed to read {}: {e}", input_path.display());
            process::exit(1);
        }
    };

    let source_type = match SourceType::from_path(&input_path) {
        Ok(st) => st,
        Err(e) => {
            eprintln!(
                "[-] Critical Error: Failed to determine source type for {}: {e}",
                input_path.display()
            );
            process::exit(1);
        }
    };

    if !cli.quiet {
        eprintln!("[!] Converting {}...", input_path.display());
        if let Some(m) = cli.max_iterations {
            eprintln!("[!] Running at most {m} passes");
        }
    }

    let mut protoclass = Protoclass::default();
    if let Some(m) = cli.max_iterations {
        protoclass.set_max_iterations(m);
    }
    let result = match protoclass.convert(
        &source_text,
        ConvertOptions {
            max_iterations: cli.max_iterations,
            source_type: Some(source_type),
            filename_for_source_type: None,
        },
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("[-] Critical Error: {e}");
            process::exit(1);
        }
    };

    if cli.verbose && !result.modified {
        eprintln!("[!] No convertible functions found");
    }

    let output_text = result.code;

    let output_path = resolve_output_path(&input_path, cli.output.as_deref());
    let output_to_file = cli.output.is_some();

    if output_to_file {
        if let Err(e) = fs::write(&output_path, output_text.as_bytes()) {
            eprintln!("[-] Critical Error: Failed to write {}: {e}", output_path.display());
            process::exit(1);
        }
        if !cli.quiet {
            eprintln!("[+] Saved {}", output_path.display());
        }
    } else {
        print!("{output_text}");
    }
}

fn read_file_to_string_with_capacity(path: &Path) -> std::io::Result<String> {
    let mut file = fs::File::open(path)?;
    let cap = file.metadata().ok().and_then(|m| usize::try_from(m.len()).ok()).unwrap_or(0);
    let mut s = String::with_capacity(cap.saturating_add(1));
    file.read_to_string(&mut s)?;
    Ok(s)
}

fn resolve_output_path(input_path: &Path, output: Option<&OsStr>) -> PathBuf {
    match output {
        None => input_path.with_file_name(format!(
            "{}-classy.js",
            input_path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("output")
        )),
        Some(v) if v.is_empty() => input_path.with_file_name(format!(
            "{}-classy.js",
            input_path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("output")
        )),
        Some(v) => PathBuf::from(v),
    }
}
