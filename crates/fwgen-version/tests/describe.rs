use fwgen_core::config::VersionConfig;
use fwgen_version::{BuildInfo, VersionError, describe};
use git2::{Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn commit_file(repo: &Repository, root: &Path, content: &str, message: &str) -> git2::Oid {
    fs::write(root.join("main.cpp"), content).unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("main.cpp")).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = Signature::now("Test", "test@example.com").unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

fn tagged_repo(tag: &str) -> (TempDir, Repository) {
    let tmp = TempDir::new().unwrap();
    let repo = Repository::init(tmp.path()).unwrap();
    let oid = commit_file(&repo, tmp.path(), "int main() {}\n", "initial");
    {
        let obj = repo.find_object(oid, None).unwrap();
        repo.tag_lightweight(tag, &obj, false).unwrap();
    }
    (tmp, repo)
}

#[test]
fn test_clean_tree_is_tag_name() {
    let (tmp, _repo) = tagged_repo("v1.2");
    assert_eq!(describe(tmp.path(), "-dev").unwrap(), "v1.2");
}

#[test]
fn test_dirty_tree_gets_suffix() {
    let (tmp, _repo) = tagged_repo("v1.2");
    fs::write(tmp.path().join("main.cpp"), "int main() { return 1; }\n").unwrap();
    assert_eq!(describe(tmp.path(), "-dev").unwrap(), "v1.2-dev");
}

#[test]
fn test_untracked_file_keeps_clean_version() {
    let (tmp, _repo) = tagged_repo("v1.2");
    fs::write(tmp.path().join("untracked.o"), "obj").unwrap();
    assert_eq!(describe(tmp.path(), "-dev").unwrap(), "v1.2");
}

#[test]
fn test_commits_after_tag_still_report_tag() {
    let (tmp, repo) = tagged_repo("v0.9");
    commit_file(&repo, tmp.path(), "int main() { return 2; }\n", "second");
    assert_eq!(describe(tmp.path(), "-dev").unwrap(), "v0.9");
}

#[test]
fn test_untagged_repo_is_no_tag() {
    let tmp = TempDir::new().unwrap();
    let repo = Repository::init(tmp.path()).unwrap();
    commit_file(&repo, tmp.path(), "int main() {}\n", "initial");

    let err = describe(tmp.path(), "-dev").unwrap_err();
    assert!(matches!(err, VersionError::NoTag(_)), "got {err:?}");
}

#[test]
fn test_not_a_repository() {
    let tmp = TempDir::new().unwrap();
    let err = describe(tmp.path(), "-dev").unwrap_err();
    assert!(matches!(err, VersionError::Git(_)));
}

#[test]
fn test_collect_flags() {
    let (tmp, _repo) = tagged_repo("fw-3.0");
    let config = VersionConfig::default();
    let info = BuildInfo::collect(tmp.path(), &config).unwrap();
    assert_eq!(info.version, "fw-3.0");
    assert_eq!(info.build_date.len(), 8);
    assert!(info.build_date.chars().all(|c| c.is_ascii_digit()));

    let flags = info.flags(&config);
    assert_eq!(flags[0], r#"-D __FW_VERSION__=\"fw-3.0\""#);
    assert!(flags[1].starts_with("-D __BUILD_DATE__="));
}
