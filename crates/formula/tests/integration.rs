//! Integration tests for the formula crate

use keg_formula::{Formula, FormulaStore};

const AI_BOT: &str = r#"
[formula]
name = "ai-bot"
desc = "AI Bot Agent - intelligent command line assistant"
homepage = "https://github.com/thiennp/cli-smart"
license = "MIT"

[source]
url = "https://github.com/thiennp/cli-smart/archive/refs/tags/v1.1.0.tar.gz"
sha256 = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"

[head]
url = "https://github.com/thiennp/cli-smart.git"
branch = "main"

[install]
dependencies = ["python3"]
entry_point = "ai-bot"
command = "ai"
"#;

#[tokio::test]
async fn test_store_load() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("ai-bot.toml"), AI_BOT).unwrap();

    let store = FormulaStore::new(temp.path().to_path_buf());
    let formula = store.load("ai-bot").await.unwrap();

    assert_eq!(formula.name(), "ai-bot");
    assert_eq!(
        formula.formula.desc,
        "AI Bot Agent - intelligent command line assistant"
    );
    assert_eq!(formula.formula.license, "MIT");
    assert_eq!(formula.install.dependencies, vec!["python3"]);
    assert_eq!(formula.install.entry_point, "ai-bot");
    assert_eq!(formula.install.command, "ai");
    assert_eq!(formula.head().unwrap().url, "https://github.com/thiennp/cli-smart.git");
    // A well-formed digest parses
    formula.archive_digest().unwrap();
}

#[tokio::test]
async fn test_store_unknown_name() {
    let temp = tempfile::tempdir().unwrap();
    let store = FormulaStore::new(temp.path().to_path_buf());
    assert!(matches!(
        store.load("nope").await,
        Err(keg_errors::Error::Formula(
            keg_errors::FormulaError::NotFound { .. }
        ))
    ));
}

#[tokio::test]
async fn test_store_rejects_traversal_names() {
    let temp = tempfile::tempdir().unwrap();
    let store = FormulaStore::new(temp.path().to_path_buf());
    assert!(store.load("../etc/passwd").await.is_err());
    assert!(store.path_for("../x").is_err());
}

#[tokio::test]
async fn test_store_rejects_mismatched_name() {
    let temp = tempfile::tempdir().unwrap();
    // File named other.toml but declares ai-bot
    std::fs::write(temp.path().join("other.toml"), AI_BOT).unwrap();

    let store = FormulaStore::new(temp.path().to_path_buf());
    assert!(store.load("other").await.is_err());
}

#[tokio::test]
async fn test_store_list() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("ai-bot.toml"), AI_BOT).unwrap();
    std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

    let store = FormulaStore::new(temp.path().to_path_buf());
    assert_eq!(store.list().await.unwrap(), vec!["ai-bot"]);
}

#[test]
fn test_missing_head_section_is_allowed() {
    let without_head: String = AI_BOT
        .lines()
        .filter(|l| !l.starts_with("[head]") && !l.starts_with("url = \"https://github.com/thiennp/cli-smart.git\"") && !l.starts_with("branch"))
        .collect::<Vec<_>>()
        .join("\n");
    let formula = Formula::from_toml(&without_head).unwrap();
    assert!(formula.head.is_none());
}
