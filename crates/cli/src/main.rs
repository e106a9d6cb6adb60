//! CLI tool for extracting ebook content and exporting it as a slide deck,
//! a Word document, and a print copy.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ebook_core::segment::{DEFAULT_FALLBACK_CHARS, DEFAULT_MIN_PARAGRAPHS};
use ebook_core::{validate_upload, ChapterSegmenter, Ebook};
use ebook_reader::{PdfExtractor, SourceReader};
use ebook_render::{Artifact, DocumentRenderer, PresentationRenderer, PrintHost, PrintRenderer};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Export ebooks (.pdf, .txt, .epub, .mobi) as PPTX, DOC, and print copies.
#[derive(Parser, Debug)]
#[command(name = "ebook-export")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input ebook file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Formats to export (default: all)
    #[arg(short, long, value_enum)]
    format: Vec<ExportFormat>,

    /// Book name used for titles and artifact names instead of the file name
    #[arg(long)]
    name: Option<String>,

    /// Maximum characters per content slide
    #[arg(long, default_value_t = ebook_render::presentation::DEFAULT_SLIDE_CHARS)]
    slide_chars: usize,

    /// Maximum chapters rendered into the slide deck
    #[arg(long, default_value_t = ebook_render::presentation::DEFAULT_MAX_CHAPTERS)]
    max_chapters: usize,

    /// Chunk size used to split PDF text that has no chapter structure
    #[arg(long, default_value_t = DEFAULT_FALLBACK_CHARS)]
    fallback_chars: usize,

    /// Paragraph count PDF text must exceed to split on blank lines
    #[arg(long, default_value_t = DEFAULT_MIN_PARAGRAPHS)]
    min_paragraphs: usize,

    /// Write a manifest.json describing every processed book
    #[arg(short, long)]
    manifest: bool,

    /// Open the print copy with the system viewer after writing it
    #[arg(short, long)]
    print: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportFormat {
    Pptx,
    Doc,
    Pdf,
}

/// One book in the manifest, with the artifacts written for it.
///
/// The book is stored as a list record, so its chapters are reduced to a
/// count instead of repeating the text.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry {
    #[serde(flatten)]
    book: Ebook,
    chapter_count: usize,
    artifacts: Vec<Artifact>,
}

/// Opens a written artifact with the platform's default viewer.
struct SystemPrintHost {
    dir: PathBuf,
}

impl PrintHost for SystemPrintHost {
    fn print(&self, document: &Artifact) -> ebook_core::Result<()> {
        let path = self.dir.join(&document.file_name);

        #[cfg(target_os = "linux")]
        let result = std::process::Command::new("xdg-open").arg(&path).spawn();
        #[cfg(target_os = "macos")]
        let result = std::process::Command::new("open").arg(&path).spawn();
        #[cfg(target_os = "windows")]
        let result = std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.to_string_lossy()])
            .spawn();
        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        let result: std::io::Result<std::process::Child> = Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "no system viewer on this platform",
        ));

        result.map(|_| ())?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let reader = SourceReader::new()
        .with_pdf_extractor(PdfExtractor::new().with_segmenter(segmenter_from(&args)));
    let presentation = PresentationRenderer::new()
        .with_max_chapters(args.max_chapters)
        .with_slide_chars(args.slide_chars);

    let mut entries = Vec::new();
    let mut failed = 0usize;

    for (index, input_path) in args.input.iter().enumerate() {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(index, input_path, &args, &reader, &presentation) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                failed += 1;
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
                if let Some(entry) = unfinished_entry(index, input_path, &e) {
                    entries.push(entry);
                }
            }
        }
    }

    if args.manifest {
        let dir = output_dir(args.input.first().map(PathBuf::as_path), args.output.as_ref())?;
        let path = dir.join("manifest.json");
        let json = serde_json::to_vec_pretty(&entries).context("Failed to serialize manifest")?;
        write_atomic(&path, &json)?;
        if args.verbose {
            eprintln!("Manifest written to: {}", path.display());
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, args.input.len());
    }

    Ok(())
}

/// Validate, extract, and export a single ebook.
fn process_file(
    index: usize,
    input_path: &Path,
    args: &Args,
    reader: &SourceReader,
    presentation: &PresentationRenderer,
) -> Result<ManifestEntry> {
    let metadata = fs::metadata(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;
    let file_name = file_name_of(input_path);

    validate_upload(file_name, metadata.len())?;

    let book = Ebook::processing(book_id(index), file_name, metadata.len(), now_secs());
    let content = reader
        .read_path(input_path)
        .with_context(|| format!("Failed to extract {}", input_path.display()))?;

    if args.verbose {
        eprintln!(
            "  Extracted {} chars in {} chapters, {} images",
            content.text.chars().count(),
            content.chapters.len(),
            content.images.len()
        );
    }

    let chapter_count = content.chapters.len();
    let book = book.mark_ready(content);
    let book_name = args.name.as_deref().unwrap_or(&book.name);
    // An explicit name wins over the uploaded file name for artifact naming.
    let original = if args.name.is_some() { None } else { Some(book.file_name.as_str()) };
    let content = book.extracted_content.as_ref();

    let dir = output_dir(Some(input_path), args.output.as_ref())?;
    let mut artifacts = Vec::new();

    if wants(args, ExportFormat::Pptx) {
        let deck = presentation.render(book_name, content, original)?;
        write_artifact(&dir, &deck, args.verbose)?;
        artifacts.push(deck);
    }

    if wants(args, ExportFormat::Doc) {
        let doc = DocumentRenderer::new().render(book_name, content, original)?;
        write_artifact(&dir, &doc, args.verbose)?;
        artifacts.push(doc);
    }

    if wants(args, ExportFormat::Pdf) || args.print {
        let mut job = PrintRenderer::new().render(book_name, content, original)?;
        write_artifact(&dir, &job.document, args.verbose)?;
        write_artifact(&dir, &job.text, args.verbose)?;

        if args.print {
            let host = SystemPrintHost { dir: dir.clone() };
            if !job.send_to(&host) {
                eprintln!(
                    "Could not open the print copy; the text is saved as {}",
                    dir.join(&job.text.file_name).display()
                );
            }
        }

        artifacts.push(job.document);
        artifacts.push(job.text);
    }

    Ok(ManifestEntry {
        book: book.to_list_record(),
        chapter_count,
        artifacts,
    })
}

/// A manifest record for a book whose extraction failed after upload.
///
/// Such a book stays in the processing state. Rejected uploads get no record.
fn unfinished_entry(index: usize, input_path: &Path, error: &anyhow::Error) -> Option<ManifestEntry> {
    let stays_processing = error
        .downcast_ref::<ebook_core::Error>()
        .map(ebook_core::Error::is_extraction_failure)
        .unwrap_or(false);
    if !stays_processing {
        return None;
    }

    let size = fs::metadata(input_path).map(|m| m.len()).unwrap_or(0);
    let book = Ebook::processing(book_id(index), file_name_of(input_path), size, now_secs());
    Some(ManifestEntry {
        book,
        chapter_count: 0,
        artifacts: Vec::new(),
    })
}

/// Chapter segmentation settings from the command line.
fn segmenter_from(args: &Args) -> ChapterSegmenter {
    ChapterSegmenter::new()
        .with_fallback_chars(args.fallback_chars)
        .with_min_paragraphs(args.min_paragraphs)
}

fn wants(args: &Args, format: ExportFormat) -> bool {
    args.format.is_empty() || args.format.contains(&format)
}

fn file_name_of(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
}

fn book_id(index: usize) -> String {
    format!("{}-{}", now_secs(), index + 1)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Determine the directory artifacts are written to.
fn output_dir(input_path: Option<&Path>, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    match output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            Ok(dir.clone())
        }
        None => Ok(input_path
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default()),
    }
}

fn write_artifact(dir: &Path, artifact: &Artifact, verbose: bool) -> Result<()> {
    let path = dir.join(&artifact.file_name);
    write_atomic(&path, &artifact.bytes)?;
    if verbose {
        eprintln!("Written to: {} ({} bytes)", path.display(), artifact.len());
    }
    Ok(())
}

/// Write to a sibling temp file, then rename it into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid output path: {}", path.display()))?;
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let result = (|| -> Result<()> {
        let mut file = File::create(&temp_path)
            .with_context(|| format!("Failed to create {}", temp_path.display()))?;
        file.write_all(bytes)
            .with_context(|| format!("Failed to write to {}", temp_path.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to flush {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move output into {}", path.display()))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn run(input: &Path, extra: &[&str]) -> Result<ManifestEntry> {
        let mut argv = vec!["ebook-export", input.to_str().unwrap()];
        argv.extend_from_slice(extra);
        let args = Args::parse_from(argv);
        process_file(0, input, &args, &SourceReader::new(), &PresentationRenderer::new())
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.doc");

        write_atomic(&path, b"hello").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hello");
        assert!(!dir.path().join(".book.doc.tmp").exists());
    }

    #[test]
    fn test_write_atomic_failure_cleans_up() {
        let dir = tempdir().unwrap();
        // Renaming a file onto an existing directory fails.
        let path = dir.path().join("occupied");
        fs::create_dir_all(path.join("inner")).unwrap();

        assert!(write_atomic(&path, b"data").is_err());
        assert!(!dir.path().join(".occupied.tmp").exists());
    }

    #[test]
    fn test_default_formats_are_all() {
        let args = Args::parse_from(["ebook-export", "book.txt"]);
        assert!(wants(&args, ExportFormat::Pptx));
        assert!(wants(&args, ExportFormat::Doc));
        assert!(wants(&args, ExportFormat::Pdf));

        let args = Args::parse_from(["ebook-export", "book.txt", "-f", "doc"]);
        assert!(!wants(&args, ExportFormat::Pptx));
        assert!(wants(&args, ExportFormat::Doc));
    }

    #[test]
    fn test_segmenter_flags() {
        let args = Args::parse_from(["ebook-export", "book.pdf"]);
        assert_eq!(segmenter_from(&args), ChapterSegmenter::new());

        let args = Args::parse_from([
            "ebook-export",
            "book.pdf",
            "--fallback-chars",
            "500",
            "--min-paragraphs",
            "1",
        ]);
        assert_eq!(
            segmenter_from(&args),
            ChapterSegmenter::new().with_fallback_chars(500).with_min_paragraphs(1)
        );
    }

    #[test]
    fn test_process_text_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("My Notes.txt");
        fs::write(&input, "Chapter 1\nIt begins.\nChapter 2\nIt ends.").unwrap();

        let entry = run(&input, &[]).unwrap();

        assert!(entry.book.is_consistent());
        let names: Vec<&str> = entry.artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, ["My_Notes.pptx", "My_Notes.doc", "My_Notes_print.html", "My_Notes.txt"]);
        for name in names {
            assert!(dir.path().join(name).exists(), "missing {}", name);
        }
    }

    #[test]
    fn test_manifest_entry_does_not_repeat_text() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, "Alpha paragraph.\n\nBeta paragraph.").unwrap();

        let entry = run(&input, &["-f", "doc"]).unwrap();
        assert_eq!(entry.chapter_count, 2);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"chapterCount\":2"));
        assert!(json.contains("\"fileName\":\"notes.txt\""));
        assert!(!json.contains("\"chapters\""));
        assert_eq!(json.matches("Beta paragraph.").count(), 1);
    }

    #[test]
    fn test_empty_text_stays_processing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("blank.txt");
        fs::write(&input, "").unwrap();

        let err = run(&input, &[]).unwrap_err();
        let entry = unfinished_entry(0, &input, &err).unwrap();

        assert!(entry.book.extracted_content.is_none());
        assert!(entry.artifacts.is_empty());
        assert!(!dir.path().join("blank.pptx").exists());
    }

    #[test]
    fn test_rejected_upload_has_no_entry() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("slides.pptx");
        fs::write(&input, "x").unwrap();

        let err = run(&input, &[]).unwrap_err();
        assert!(unfinished_entry(0, &input, &err).is_none());
    }
}
