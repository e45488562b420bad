//! End-to-end tests for the materials → context → prompt flow.
//!
//! Each test builds a throwaway course materials tree and drives the public
//! API the way the server and CLI do.

use std::fs;
use std::path::Path;

use futures::{stream, StreamExt};
use spark_assistant::{
    assemble, compose, summary, Config, ConfigUpdate, Mode, MAX_CONTEXT_CHARS, TRUNCATION_MARKER,
};

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(path, contents).expect("Failed to write fixture file");
}

/// A small course: root FAQ files, one assignment and two lectures.
fn sample_course(root: &Path) {
    write(root, "README.md", "Put your course files in this folder.");
    write(root, "syllabus.md", "# Syllabus\nMidterm in week 7.");
    write(root, "policies.txt", "Late work loses 10% per day.");
    write(root, "assignments/hw1.md", "Implement gradient descent.");
    write(root, "lectures/week1/intro.txt", "Agents perceive and act.");
    write(root, "lectures/week2/search.md", "BFS explores level by level.");
}

fn config_for(root: &Path, mode: Mode) -> Config {
    Config {
        mode,
        materials_dir: root.to_path_buf(),
        ..Config::default()
    }
}

#[test]
fn test_prompt_per_mode_uses_only_that_modes_materials() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    sample_course(dir.path());

    let faq = compose(&config_for(dir.path(), Mode::Faq));
    assert!(faq.contains("--- policies.txt ---\nLate work loses 10% per day."));
    assert!(faq.contains("--- syllabus.md ---\n# Syllabus"));
    assert!(!faq.contains("README.md"), "README must never reach the model");
    assert!(!faq.contains("gradient descent"));

    let assignment = compose(&config_for(dir.path(), Mode::Assignment));
    assert!(assignment.contains("COURSE MATERIALS (Assignment Help):"));
    assert!(assignment.contains("--- hw1.md ---\nImplement gradient descent."));
    assert!(!assignment.contains("Midterm"));

    let lecture = assemble(dir.path(), Mode::Lecture);
    assert_eq!(
        lecture,
        "--- intro.txt ---\nAgents perceive and act.\n\n--- search.md ---\nBFS explores level by level."
    );
}

#[test]
fn test_reload_sees_new_files_without_restart() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    sample_course(dir.path());
    let config = config_for(dir.path(), Mode::Assignment);

    let before = summary(dir.path());
    assert_eq!(before.files(Mode::Assignment), ["hw1.md"]);
    assert!(!compose(&config).contains("Dynamic programming"));

    write(dir.path(), "assignments/hw2.txt", "Dynamic programming drills.");

    let after = summary(dir.path());
    assert_eq!(after.files(Mode::Assignment), ["hw1.md", "hw2.txt"]);
    assert_eq!(after.files(Mode::Faq), before.files(Mode::Faq));
    assert!(compose(&config).contains("--- hw2.txt ---\nDynamic programming drills."));
}

#[test]
fn test_missing_mode_directory_falls_back() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write(dir.path(), "syllabus.md", "Week 1: intro.");

    assert_eq!(assemble(dir.path(), Mode::Lecture), "");

    let prompt = compose(&config_for(dir.path(), Mode::Lecture));
    assert!(prompt.contains("COURSE MATERIALS (Lecture Q&A):\nNo materials loaded."));
    assert!(prompt.contains("specific course materials aren't available yet"));
}

#[test]
fn test_missing_materials_root_falls_back() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = config_for(&dir.path().join("does-not-exist"), Mode::Faq);

    let prompt = compose(&config);
    assert!(prompt.contains("No materials loaded."));
    assert_eq!(summary(&config.materials_dir).total_files(), 0);
}

#[test]
fn test_compose_is_byte_identical_for_same_inputs() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    sample_course(dir.path());
    let config = Config::default()
        .apply(&ConfigUpdate {
            mode: Some("lecture".to_string()),
            custom_instructions: Some("Remind students about the project.".to_string()),
            ..ConfigUpdate::default()
        });
    let config = Config {
        materials_dir: dir.path().to_path_buf(),
        ..config
    };

    let first = compose(&config);
    let second = compose(&config);
    assert_eq!(first.as_bytes(), second.as_bytes());
    assert!(first.contains("EDUCATOR INSTRUCTIONS:\nRemind students about the project."));
}

#[test]
fn test_large_course_is_truncated_within_budget() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for week in 1..=9 {
        write(
            dir.path(),
            &format!("lectures/week{week}.md"),
            &"Gradient descent follows the slope downhill. ".repeat(60),
        );
    }

    let block = assemble(dir.path(), Mode::Lecture);
    assert!(block.chars().count() <= MAX_CONTEXT_CHARS);
    assert!(block.ends_with(TRUNCATION_MARKER));
    assert!(block.starts_with("--- week1.md ---"));
    assert!(!block.contains("week9.md"));
}

#[test]
fn test_broken_document_does_not_block_others() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write(dir.path(), "assignments/a_broken.docx", "this is not a zip archive");
    write(dir.path(), "assignments/b_notes.md", "Show your work.");

    let block = assemble(dir.path(), Mode::Assignment);
    assert_eq!(block, "--- b_notes.md ---\nShow your work.");
}

#[test]
fn test_invalid_utf8_is_decoded_lossily() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("notes.txt"), b"caf\xe9 hours").expect("Failed to write fixture");

    let block = assemble(dir.path(), Mode::Faq);
    assert_eq!(block, "--- notes.txt ---\ncaf\u{FFFD} hours");
}

#[tokio::test]
async fn test_generated_answer_is_voice_safe() {
    let fragments = stream::iter(vec![
        "**Great question!** ".to_string(),
        "## ".to_string(),
        "According to syllabus.md, the midterm is in *week 7*.".to_string(),
        "- Bring `pencils`".to_string(),
    ]);

    let spoken: Vec<String> = spark_voice::voice_safe(fragments).collect().await;
    assert_eq!(
        spoken,
        [
            "Great question!",
            "According to syllabus, the midterm is in week 7.",
            "Bring pencils",
        ]
    );

    for line in &spoken {
        assert_eq!(&spark_voice::normalize(line), line);
    }
}
