//! Text runner behind `/ai/echo`

use async_trait::async_trait;

/// Turns a piece of text into a result string
#[async_trait]
pub trait TextRunner: Send + Sync {
    async fn run_text(&self, text: &str) -> String;
}

/// Prefixes the input with `echo: `
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleEchoRunner;

#[async_trait]
impl TextRunner for SimpleEchoRunner {
    async fn run_text(&self, text: &str) -> String {
        format!("echo: {}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo() {
        assert_eq!(SimpleEchoRunner.run_text("hi").await, "echo: hi");
    }
}
