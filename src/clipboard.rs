//! Clipboard access for the copy-link action.
//!
//! The session only needs "put this string on the clipboard, tell me if it
//! worked", so that is the whole [`Clipboard`] trait. [`SystemClipboard`]
//! shells out to whichever platform tool is installed.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("no clipboard tool available")]
    Unavailable,
    #[error("failed to start clipboard tool: {0}")]
    Spawn(#[source] io::Error),
    #[error("clipboard tool failed: {0}")]
    Failed(String),
}

pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<(), CopyError>;
}

/// Candidate tools, tried in order until one can be started.
const TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// Clipboard backed by the first available system tool.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), CopyError> {
        for (program, args) in TOOLS {
            match pipe_to(program, args, text) {
                Err(CopyError::Spawn(e)) if e.kind() == io::ErrorKind::NotFound => continue,
                other => return other,
            }
        }
        Err(CopyError::Unavailable)
    }
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<(), CopyError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(CopyError::Spawn)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| CopyError::Failed(format!("{program}: {e}")))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| CopyError::Failed(format!("{program}: {e}")))?;
    if output.status.success() {
        log::debug!("copied {} bytes via {program}", text.len());
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(CopyError::Failed(format!("{program}: {}", stderr.trim())))
    }
}
