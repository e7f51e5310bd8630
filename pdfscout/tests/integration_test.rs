mod common;

use anyhow::Result;
use common::write_pdf;
use pdfscout::{
    build_corpus, BuildOutcome, Corpus, CorpusBuilder, CorpusSearcher, IndexConfig, SearchMatch,
};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn create_config(dir: &TempDir, threads: usize) -> IndexConfig {
    IndexConfig {
        root_path: dir.path().join("downloads"),
        index_path: dir.path().join("corpus_index.json"),
        thread_count: NonZeroUsize::new(threads).unwrap(),
        ignore_patterns: vec![],
        log_level: "warn".to_string(),
    }
}

fn create_court_records(root: &Path) -> Result<()> {
    write_pdf(
        &root.join("Court Records/case-1/001.pdf"),
        &["Deposition transcript", "", "The Court record shows a flight log"],
    )?;
    write_pdf(
        &root.join("Court Records/case-2/001.pdf"),
        &["Exhibit list", "flight manifest attached"],
    )?;
    write_pdf(&root.join("Court Records/case-2/002.PDF"), &["Docket entry"])?;
    Ok(())
}

#[test]
fn test_build_then_search_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let config = create_config(&dir, 4);
    create_court_records(&config.root_path)?;

    let outcome = build_corpus(&config, |_| {})?;
    assert!(outcome.is_success());
    assert_eq!(outcome.file_count(), 3);

    let report = CorpusSearcher::new(&config.index_path).search("FLIGHT");
    assert_eq!(
        report.matches,
        vec![
            SearchMatch {
                path: "Court Records/case-1/001.pdf".to_string(),
                pages: vec![3],
            },
            SearchMatch {
                path: "Court Records/case-2/001.pdf".to_string(),
                pages: vec![2],
            },
        ]
    );
    assert_eq!(report.documents_searched, 3);
    Ok(())
}

#[test]
fn test_blank_pages_stay_absent_after_reload() -> Result<()> {
    let dir = tempdir()?;
    let config = create_config(&dir, 2);
    create_court_records(&config.root_path)?;

    build_corpus(&config, |_| {})?;
    let corpus = Corpus::load_from(&config.index_path)?;

    let document = corpus.get("Court Records/case-1/001.pdf").unwrap();
    let pages: Vec<u32> = document.pages().map(|(page, _)| *page).collect();
    assert_eq!(pages, vec![1, 3]);
    assert_eq!(document.page(2), None);
    Ok(())
}

#[test]
fn test_only_documents_with_text_are_indexed() -> Result<()> {
    let dir = tempdir()?;
    let config = create_config(&dir, 3);
    let root = &config.root_path;
    write_pdf(&root.join("a/text.pdf"), &["some text"])?;
    write_pdf(&root.join("b/more.pdf"), &["", "late text"])?;
    write_pdf(&root.join("c/blank.pdf"), &["", ""])?;
    fs::write(root.join("c/not-really.pdf"), "plain text with a pdf extension")?;

    let outcome = CorpusBuilder::new(config.clone()).build(|_| {})?;
    let BuildOutcome::Indexed(summary) = outcome else {
        panic!("expected a successful build");
    };
    assert_eq!(summary.files_found, 4);
    assert_eq!(summary.documents_indexed, 2);
    assert_eq!(
        summary.skipped,
        vec!["c/blank.pdf".to_string(), "c/not-really.pdf".to_string()]
    );

    let corpus = Corpus::load_from(&config.index_path)?;
    assert_eq!(corpus.len(), 2);
    assert!(corpus.get("c/blank.pdf").is_none());
    assert_eq!(corpus.get("b/more.pdf").unwrap().page_count(), 1);
    Ok(())
}

#[test]
fn test_truncated_and_valid_pdf() -> Result<()> {
    let dir = tempdir()?;
    let config = create_config(&dir, 2);
    let valid = config.root_path.join("valid.pdf");
    write_pdf(&valid, &["hello world"])?;
    let bytes = fs::read(&valid)?;
    fs::write(config.root_path.join("truncated.pdf"), &bytes[..bytes.len() / 3])?;

    let outcome = build_corpus(&config, |_| {})?;
    assert!(outcome.is_success());

    let corpus = Corpus::load_from(&config.index_path)?;
    assert_eq!(corpus.len(), 1);
    assert!(corpus.get("valid.pdf").is_some());

    let report = CorpusSearcher::new(&config.index_path).search("Hello");
    assert_eq!(report.pages_for("valid.pdf"), Some(&[1][..]));
    Ok(())
}

#[test]
fn test_rebuild_is_idempotent() -> Result<()> {
    let dir = tempdir()?;
    let config = create_config(&dir, 4);
    create_court_records(&config.root_path)?;

    build_corpus(&config, |_| {})?;
    let first = fs::read(&config.index_path)?;
    build_corpus(&config, |_| {})?;
    let second = fs::read(&config.index_path)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_worker_count_does_not_change_corpus() -> Result<()> {
    let dir = tempdir()?;
    let single = create_config(&dir, 1);
    create_court_records(&single.root_path)?;
    let mut parallel = create_config(&dir, 8);
    parallel.index_path = dir.path().join("parallel.json");

    build_corpus(&single, |_| {})?;
    build_corpus(&parallel, |_| {})?;

    assert_eq!(
        fs::read(&single.index_path)?,
        fs::read(&parallel.index_path)?
    );
    Ok(())
}

#[test]
fn test_rebuild_replaces_previous_index() -> Result<()> {
    let dir = tempdir()?;
    let config = create_config(&dir, 2);
    create_court_records(&config.root_path)?;
    build_corpus(&config, |_| {})?;

    fs::remove_file(config.root_path.join("Court Records/case-2/001.pdf"))?;
    build_corpus(&config, |_| {})?;

    let corpus = Corpus::load_from(&config.index_path)?;
    assert_eq!(corpus.len(), 2);
    assert!(corpus.get("Court Records/case-2/001.pdf").is_none());
    Ok(())
}

#[test]
fn test_empty_directory_keeps_previous_index() -> Result<()> {
    let dir = tempdir()?;
    let config = create_config(&dir, 2);
    create_court_records(&config.root_path)?;
    build_corpus(&config, |_| {})?;
    let before = fs::read(&config.index_path)?;

    fs::remove_dir_all(&config.root_path)?;
    fs::create_dir_all(&config.root_path)?;
    let outcome = build_corpus(&config, |_| {})?;

    assert!(matches!(outcome, BuildOutcome::NothingToIndex));
    assert_eq!(fs::read(&config.index_path)?, before);
    Ok(())
}

#[test]
fn test_search_before_build() -> Result<()> {
    let dir = tempdir()?;
    let config = create_config(&dir, 1);

    let searcher = CorpusSearcher::new(&config.index_path);
    assert!(searcher.search("court").is_empty());
    assert!(searcher.search("").is_empty());
    Ok(())
}

#[test]
fn test_progress_reaches_one() -> Result<()> {
    let dir = tempdir()?;
    let config = create_config(&dir, 3);
    create_court_records(&config.root_path)?;

    let mut fractions = Vec::new();
    build_corpus(&config, |p| fractions.push(p.fraction()))?;

    assert_eq!(fractions.len(), 3);
    assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(fractions.last().copied(), Some(1.0));
    Ok(())
}
