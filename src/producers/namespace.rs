//! Namespace producer
//!
//! Namespaces are listed by an external tool that prints a table:
//!
//! ```text
//! NAME          STATUS   AGE
//! default       Active   12d
//! kube-system   Active   12d
//! ```
//!
//! The header line is dropped and the first column of every other non-empty
//! line is a namespace name.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use crate::error::{ProducerError, Result};

/// Anything that can print the namespace table
#[async_trait]
pub trait NamespaceSource: Send + Sync {
    /// Raw table text, header included
    async fn list(&self) -> Result<String>;
}

/// Runs `<command> --kubeconfig <path> get namespaces`
pub struct KubectlNamespaces {
    command: String,
    kubeconfig: PathBuf,
}

impl KubectlNamespaces {
    pub fn new(command: impl Into<String>, kubeconfig: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            kubeconfig: kubeconfig.into(),
        }
    }
}

#[async_trait]
impl NamespaceSource for KubectlNamespaces {
    async fn list(&self) -> Result<String> {
        trace!(
            "Running {} with kubeconfig {}",
            self.command,
            self.kubeconfig.display()
        );
        let output = Command::new(&self.command)
            .arg("--kubeconfig")
            .arg(&self.kubeconfig)
            .args(["get", "namespaces"])
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ProducerError::CommandFailed {
                command: self.command.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        String::from_utf8(output.stdout).map_err(|e| {
            ProducerError::MalformedPayload(format!("{} output: {}", self.command, e)).into()
        })
    }
}

/// Extract namespace names from the listing table.
pub fn parse_namespaces(table: &str) -> Vec<String> {
    table
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// List and parse the namespaces.
pub async fn fetch_namespaces(source: &dyn NamespaceSource) -> Result<Vec<String>> {
    let table = source.list().await?;
    Ok(parse_namespaces(&table))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::SumoqError;

    /// Returns a fixed table, or fails like a broken cluster connection
    pub(crate) struct FakeNamespaces(pub(crate) Option<&'static str>);

    #[async_trait]
    impl NamespaceSource for FakeNamespaces {
        async fn list(&self) -> Result<String> {
            match self.0 {
                Some(table) => Ok(table.to_string()),
                None => Err(ProducerError::CommandFailed {
                    command: "kubectl".to_string(),
                    code: Some(1),
                    stderr: "Unable to connect to the server".to_string(),
                }
                .into()),
            }
        }
    }

    #[test]
    fn test_parse_skips_header_and_blank_lines() {
        let table = "NAME          STATUS   AGE\n\
                     default       Active   12d\n\
                     \n\
                     kube-system   Active   12d\n";
        assert_eq!(parse_namespaces(table), vec!["default", "kube-system"]);
    }

    #[test]
    fn test_parse_header_only() {
        assert!(parse_namespaces("NAME   STATUS   AGE\n").is_empty());
        assert!(parse_namespaces("").is_empty());
    }

    #[test]
    fn test_parse_tabs_and_crlf() {
        let table = "NAME\tSTATUS\r\nmonitoring\tActive\r\n";
        assert_eq!(parse_namespaces(table), vec!["monitoring"]);
    }

    #[tokio::test]
    async fn test_fetch_with_fake() {
        let source = FakeNamespaces(Some("NAME STATUS\nprod Active\nstaging Active\n"));
        assert_eq!(
            fetch_namespaces(&source).await.unwrap(),
            vec!["prod", "staging"]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let err = fetch_namespaces(&FakeNamespaces(None)).await.unwrap_err();
        assert!(matches!(
            err,
            SumoqError::Producer(ProducerError::CommandFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_executable_is_an_error() {
        let source = KubectlNamespaces::new("sumoq-no-such-kubectl", "/nonexistent/kubeconfig");
        assert!(matches!(source.list().await, Err(SumoqError::Io(_))));
    }
}
