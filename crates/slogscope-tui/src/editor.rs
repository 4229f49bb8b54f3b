//! Opening stack-trace frames in an external editor.

use std::process::{Command, Stdio};

use slogscope_logs::StackFrame;

use crate::error::{Result, TuiError};

/// Expand an editor template into program arguments
///
/// The template is split shell-style; `{path}` and `{line}` are substituted in
/// each argument after splitting, so paths with spaces stay one argument.
pub fn editor_command(template: &str, frame: &StackFrame) -> Result<Vec<String>> {
    let parts = shlex::split(template)
        .filter(|parts| !parts.is_empty())
        .ok_or_else(|| TuiError::EditorTemplate(template.to_string()))?;

    let line = frame.line.to_string();
    Ok(parts
        .into_iter()
        .map(|part| part.replace("{path}", &frame.path).replace("{line}", &line))
        .collect())
}

/// Launch the editor on `frame` without waiting for it
pub fn open_frame(template: &str, frame: &StackFrame) -> Result<()> {
    let args = editor_command(template, frame)?;
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| TuiError::EditorTemplate(template.to_string()))?;

    tracing::debug!(%program, path = %frame.path, line = frame.line, "opening frame");
    Command::new(program)
        .args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| TuiError::EditorSpawn {
            program: program.clone(),
            source,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(path: &str, line: u32) -> StackFrame {
        StackFrame {
            path: path.to_string(),
            line,
        }
    }

    #[test]
    fn test_substitutes_placeholders() {
        let args = editor_command("code --goto {path}:{line}", &frame("Assets/Net.cs", 12)).unwrap();
        assert_eq!(args, vec!["code", "--goto", "Assets/Net.cs:12"]);
    }

    #[test]
    fn test_path_with_spaces_stays_one_argument() {
        let args = editor_command("vim +{line} {path}", &frame("My Project/A.cs", 3)).unwrap();
        assert_eq!(args, vec!["vim", "+3", "My Project/A.cs"]);
    }

    #[test]
    fn test_quoted_template() {
        let args = editor_command(r#""/opt/My Editor/bin" {path}"#, &frame("a.cs", 1)).unwrap();
        assert_eq!(args, vec!["/opt/My Editor/bin", "a.cs"]);
    }

    #[test]
    fn test_bad_templates() {
        assert!(matches!(
            editor_command("", &frame("a.cs", 1)),
            Err(TuiError::EditorTemplate(_))
        ));
        assert!(matches!(
            editor_command("code \"unterminated", &frame("a.cs", 1)),
            Err(TuiError::EditorTemplate(_))
        ));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let result = open_frame("/definitely/not/an/editor {path}", &frame("a.cs", 1));
        assert!(matches!(result, Err(TuiError::EditorSpawn { .. })));
    }
}
