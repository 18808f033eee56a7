//! Fuzzy picker integration
//!
//! Hands a newline-joined candidate list to an external picker (fzf by
//! default) and reads back at most one choice. A missing picker or an
//! aborted pick both yield `None`.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Maps a list of candidates to zero or one selection
#[async_trait]
pub trait Picker: Send + Sync {
    async fn pick(&self, candidates: &[String]) -> Option<String>;
}

/// Runs an fzf-compatible program
#[derive(Debug, Clone)]
pub struct FzfPicker {
    program: String,
    prompt: String,
    height: String,
}

impl FzfPicker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prompt: "Project: ".to_string(),
            height: "90%".to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_height(mut self, height: impl Into<String>) -> Self {
        self.height = height.into();
        self
    }

    fn args(&self) -> [&str; 5] {
        ["--height", &self.height, "--reverse", "--prompt", &self.prompt]
    }
}

impl Default for FzfPicker {
    fn default() -> Self {
        Self::new("fzf")
    }
}

#[async_trait]
impl Picker for FzfPicker {
    #[instrument(skip(self, candidates), fields(program = %self.program, count = candidates.len()))]
    async fn pick(&self, candidates: &[String]) -> Option<String> {
        // The picker draws on the terminal itself, so only stdin/stdout are piped
        let mut child = match Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                debug!("Picker unavailable: {}", e);
                return None;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            let input = candidates.join("\n");
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                debug!("Failed to feed picker: {}", e);
            }
            // Dropping stdin closes it so the picker sees EOF
        }

        let output = child.wait_with_output().await.ok()?;
        let choice = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!choice.is_empty()).then_some(choice)
    }
}
