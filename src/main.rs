mod components;
mod errors;
mod parser;
mod syntax;
mod tokenizer;

use clap::Parser;
use errors::ConvertError;
use parser::{parse_document, ParseOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const SOURCE_EXTENSION: &str = "tex";

#[derive(Parser, Debug)]
#[command(name = "tex2html")]
#[command(version, about = "Render LaTeX book manuscripts as standalone HTML pages")]
struct Cli {
    /// LaTeX sources to convert; defaults to every .tex file in the current directory
    paths: Vec<PathBuf>,

    /// Extra title-page phrase marking the subtitle line (repeatable)
    #[arg(long = "subtitle-phrase", value_name = "PHRASE")]
    subtitle_phrases: Vec<String>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let options = ParseOptions::default().with_phrases(cli.subtitle_phrases);
    exit_code(&run(&cli.paths, &options, Path::new(".")))
}

/// Reports a fatal error; missing-file skips never reach here
fn exit_code<T>(result: &Result<T, ConvertError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Converts every resolved source, skipping missing ones; returns the written pages
fn run(paths: &[PathBuf], options: &ParseOptions, dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let sources = if paths.is_empty() {
        discover_sources(dir)?
    } else {
        paths.to_vec()
    };
    let mut written = Vec::with_capacity(sources.len());
    for src in sources {
        if !src.exists() {
            eprintln!("Skipping missing {}", src.display());
            continue;
        }
        let out = convert_file(&src, options)?;
        println!("Wrote {}", out.display());
        written.push(out);
    }
    Ok(written)
}

fn discover_sources(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let list_err = |source| ConvertError::ListDir {
        dir: dir.to_path_buf(),
        source,
    };
    let mut sources = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_err)? {
        let path = entry.map_err(list_err)?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == SOURCE_EXTENSION) {
            sources.push(path);
        }
    }
    if sources.is_empty() {
        return Err(ConvertError::NoSources {
            dir: dir.to_path_buf(),
        });
    }
    sources.sort();
    debug!(count = sources.len(), "discovered sources");
    Ok(sources)
}

/// Sibling page with the same base name
fn output_path(src: &Path) -> PathBuf {
    src.with_extension("html")
}

fn convert_file(src: &Path, options: &ParseOptions) -> Result<PathBuf, ConvertError> {
    let contents = std::fs::read_to_string(src).map_err(|source| ConvertError::Read {
        path: src.to_path_buf(),
        source,
    })?;
    let doc = parse_document(&contents, options);
    let stem = src
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out = output_path(src);
    doc.to_html(&out, &stem).map_err(|source| ConvertError::Write {
        path: out.clone(),
        source,
    })?;
    info!(
        books = doc.books.len(),
        sayings = doc.sayings().count(),
        "converted {}",
        src.display()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    const MANUSCRIPT: &str = r"\documentclass{book}
\begin{titlepage}
{\Huge \textsc{The Living Way}}
\end{titlepage}
\mainmatter
\chapter{Book One}
\section{On Silence}
Be still.

Listen well.
";

    #[rstest]
    #[case("The_Living_Way.tex", "The_Living_Way.html")]
    #[case("drafts/book.v2.tex", "drafts/book.v2.html")]
    #[case("notes", "notes.html")]
    fn output_path_test(#[case] src: &str, #[case] out: &str) {
        assert_eq!(output_path(Path::new(src)), PathBuf::from(out));
    }

    #[test]
    fn converts_explicit_paths() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("way.tex");
        fs::write(&src, MANUSCRIPT).unwrap();

        let written = run(&[src], &ParseOptions::default(), dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("way.html")]);
        let html = fs::read_to_string(&written[0]).unwrap();
        assert!(html.contains("<title>The Living Way</title>"));
        assert!(html.contains("<h2>Book One</h2>"));
        assert!(html.contains("<h3 id=\"s1-on-silence\">1. On Silence</h3>"));
        assert!(html.contains("<p>Be still.</p>\n<p>Listen well.</p>"));
    }

    #[test]
    fn untitled_source_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Sayings.tex");
        fs::write(&src, "\\mainmatter\n\\section{Alone}\ntext\n").unwrap();

        let out = convert_file(&src, &ParseOptions::default()).unwrap();
        let html = fs::read_to_string(out).unwrap();
        assert!(html.contains("<title>Sayings</title>"));
        assert!(html.contains("<h1>Sayings</h1>"));
    }

    #[test]
    fn missing_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("here.tex");
        fs::write(&present, MANUSCRIPT).unwrap();
        let missing = dir.path().join("gone.tex");

        let written = run(&[missing, present], &ParseOptions::default(), dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("here.html")]);
        assert!(!dir.path().join("gone.html").exists());
    }

    #[test]
    fn only_missing_paths_still_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let written = run(
            &[dir.path().join("nothing.tex")],
            &ParseOptions::default(),
            dir.path(),
        )
        .unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn discovers_sources_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.tex", "a.tex", "notes.txt"] {
            fs::write(dir.path().join(name), MANUSCRIPT).unwrap();
        }
        fs::create_dir(dir.path().join("c.tex")).unwrap();

        let written = run(&[], &ParseOptions::default(), dir.path()).unwrap();
        assert_eq!(
            written,
            vec![dir.path().join("a.html"), dir.path().join("b.html")]
        );
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), "hi").unwrap();
        let err = run(&[], &ParseOptions::default(), dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::NoSources { .. }));
    }

    fn io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
    }

    #[rstest]
    #[case(Ok(vec![]), ExitCode::SUCCESS)]
    #[case(Ok(vec![PathBuf::from("a.html")]), ExitCode::SUCCESS)]
    #[case(Err(ConvertError::NoSources { dir: PathBuf::from(".") }), ExitCode::FAILURE)]
    #[case(Err(ConvertError::ListDir { dir: PathBuf::from("."), source: io_err() }), ExitCode::FAILURE)]
    #[case(Err(ConvertError::Read { path: PathBuf::from("a.tex"), source: io_err() }), ExitCode::FAILURE)]
    #[case(Err(ConvertError::Write { path: PathBuf::from("a.html"), source: io_err() }), ExitCode::FAILURE)]
    fn exit_code_test(#[case] result: Result<Vec<PathBuf>, ConvertError>, #[case] code: ExitCode) {
        assert_eq!(exit_code(&result), code);
    }

    #[test]
    fn missing_only_run_exits_successfully() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(&[dir.path().join("gone.tex")], &ParseOptions::default(), dir.path());
        assert_eq!(exit_code(&result), ExitCode::SUCCESS);
    }

    #[test]
    fn empty_directory_exits_with_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(&[], &ParseOptions::default(), dir.path());
        assert_eq!(exit_code(&result), ExitCode::FAILURE);
    }

    #[test]
    fn existing_output_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("way.tex");
        fs::write(&src, MANUSCRIPT).unwrap();
        fs::write(dir.path().join("way.html"), "old page").unwrap();

        let out = convert_file(&src, &ParseOptions::default()).unwrap();
        assert!(!fs::read_to_string(out).unwrap().contains("old page"));
    }

    #[test]
    fn cli_collects_phrases() {
        let cli = Cli::parse_from([
            "tex2html",
            "-vv",
            "--subtitle-phrase",
            "Notes from",
            "a.tex",
            "b.tex",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.paths, vec![PathBuf::from("a.tex"), PathBuf::from("b.tex")]);
        assert_eq!(cli.subtitle_phrases, vec!["Notes from"]);
    }
}
