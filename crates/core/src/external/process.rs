//! Running external command line tools.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::error::ToolError;

/// Runs `binary` with `args` to completion, capturing stderr for errors.
pub(crate) async fn run_tool(binary: &Path, args: &[String]) -> Result<(), ToolError> {
    debug!(binary = %binary.display(), ?args, "Running external tool");

    let output = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ToolError::NotFound {
                    path: binary.to_path_buf(),
                }
            } else {
                ToolError::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ToolError::Failed {
            tool: tool_name(binary),
            code: output.status.code(),
            stderr: (!stderr.is_empty()).then_some(stderr),
        });
    }

    Ok(())
}

fn tool_name(binary: &Path) -> String {
    binary
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| binary.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary() {
        let result = run_tool(Path::new("/nonexistent/bin/tool"), &[]).await;
        assert!(matches!(result, Err(ToolError::NotFound { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_tool() {
        let result = run_tool(Path::new("false"), &[]).await;
        assert!(matches!(result, Err(ToolError::Failed { code: Some(1), .. })));
    }

    #[test]
    fn test_tool_name() {
        assert_eq!(tool_name(Path::new("/usr/bin/ffmpeg")), "ffmpeg");
        assert_eq!(tool_name(Path::new("youtube-dl")), "youtube-dl");
    }
}
