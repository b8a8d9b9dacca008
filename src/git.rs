//! Git command runner
//!
//! Uses the `git` binary to produce unified diff text for the viewer.

use anyhow::{Context, Result};
use git2::Repository;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Diff mode - what to compare
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffMode {
    /// Working tree vs index (unstaged changes) - `git diff`
    Unstaged,
    /// Index vs HEAD (staged changes) - `git diff --staged`
    Staged,
    /// Between two revisions - `git diff <from> <to>`
    Commits { from: String, to: String },
    /// One commit against its parent - `git show <commit>`
    Show { commit: String },
}

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs git against one repository
#[derive(Clone)]
pub struct GitRunner {
    repo_path: PathBuf,
    context_lines: u32,
}

impl GitRunner {
    pub fn new(repo_path: PathBuf, context_lines: u32) -> Self {
        Self {
            repo_path,
            context_lines,
        }
    }

    /// Arguments after `git -C <repo>` for a diff in `mode`
    pub fn diff_args(&self, mode: &DiffMode, paths: &[String]) -> Vec<String> {
        let mut args: Vec<String> = match mode {
            DiffMode::Show { .. } => vec!["show".into(), "--format=".into()],
            _ => vec!["diff".into()],
        };
        args.push("--no-color".into());
        args.push(format!("-U{}", self.context_lines));

        match mode {
            DiffMode::Unstaged => {}
            DiffMode::Staged => args.push("--staged".into()),
            DiffMode::Commits { from, to } => {
                args.push(from.clone());
                args.push(to.clone());
            }
            DiffMode::Show { commit } => args.push(commit.clone()),
        }

        let paths: Vec<&String> = paths.iter().filter(|p| !p.is_empty()).collect();
        if !paths.is_empty() {
            args.push("--".into());
            args.extend(paths.into_iter().cloned());
        }

        args
    }

    /// Run git with `args` and capture its output
    pub fn run(&self, args: &[String]) -> Result<CommandOutput> {
        log::debug!("git -C {} {}", self.repo_path.display(), args.join(" "));

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_path)
            .args(args)
            .output()
            .context("Failed to run git")?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Unified diff text for `mode`, limited to `paths` when given
    pub fn diff(&self, mode: &DiffMode, paths: &[String]) -> Result<String> {
        let output = self.run(&self.diff_args(mode, paths))?;
        if !output.success() {
            anyhow::bail!("git diff failed: {}", output.stderr.trim());
        }
        Ok(output.stdout)
    }
}

/// Find the git repository root from a path
pub fn find_repo_root(start: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(start).context("Not in a git repository")?;

    repo.workdir()
        .map(PathBuf::from)
        .context("Repository has no working directory")
}
