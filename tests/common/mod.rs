//! Common test utilities for Prompt Registry integration tests

use std::path::PathBuf;
use std::process::Stdio;
use tempfile::TempDir;

/// A test repository for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to repository root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a new test repository (git-initialized)
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();

        let status = std::process::Command::new("git")
            .args(["init"])
            .current_dir(&path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .expect("Failed to run git init");
        assert!(status.success(), "git init failed");

        Self { temp, path }
    }

    /// Create a bare temp directory without a git repository
    pub fn without_git() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the repository
    #[allow(dead_code)]
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the repository
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in the repository
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Stage a bundle directory with the given files, outside the repository
    #[allow(dead_code)]
    pub fn stage_bundle(&self, files: &[(&str, &str)]) -> TempDir {
        let staged = TempDir::new().expect("Failed to create staged directory");
        for (path, content) in files {
            let full = staged.path().join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create parent directory");
            }
            std::fs::write(&full, content).expect("Failed to write staged file");
        }
        staged
    }
}
