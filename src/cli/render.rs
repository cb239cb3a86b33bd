//! Render command implementation.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::cli::args::RenderArgs;
use crate::config::XpcConfig;
use crate::pipeline::{Bindings, Renderer};
use crate::{debug, log};

/// Name used for stdin input when writing to an output directory.
const STDIN_NAME: &str = "stdin.html";

/// Execute render command
pub async fn run_render(args: &RenderArgs, config: &XpcConfig) -> Result<()> {
    if args.output.is_none() && args.inputs.len() > 1 {
        bail!("rendering several inputs requires --output <DIR>");
    }

    let bindings = match &args.data {
        Some(path) => Bindings::from_path(path)?,
        None => Bindings::new(),
    };
    debug!("render"; "{} image bindings", bindings.len());

    let renderer = Renderer::new(config)
        .with_bindings(bindings)
        .with_strict(args.strict || config.render.strict);

    for input in &args.inputs {
        let source = read_input(input)?;
        let html = renderer
            .render(&source)
            .await
            .with_context(|| format!("failed to render {}", display_name(input)))?;

        match &args.output {
            Some(dir) => {
                let target = output_path(dir, input)?;
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
                fs::write(&target, html)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                log!("render"; "{} -> {}", display_name(input), target.display());
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.flush()?;
            }
        }
    }

    Ok(())
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn display_name(path: &Path) -> String {
    if is_stdin(path) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// `dir/<file name of input>`
fn output_path(dir: &Path, input: &Path) -> Result<PathBuf> {
    if is_stdin(input) {
        return Ok(dir.join(STDIN_NAME));
    }
    let Some(name) = input.file_name() else {
        bail!("input {} has no file name", input.display());
    };
    Ok(dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let dir = Path::new("out");
        assert_eq!(
            output_path(dir, Path::new("templates/page.html")).unwrap(),
            PathBuf::from("out/page.html")
        );
        assert_eq!(
            output_path(dir, Path::new("-")).unwrap(),
            PathBuf::from("out/stdin.html")
        );
        assert!(output_path(dir, Path::new("..")).is_err());
    }

    #[tokio::test]
    async fn test_render_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.html");
        let data = dir.path().join("data.json");
        let out = dir.path().join("out");
        fs::write(
            &input,
            r#"<main xpc-class-if='[true, "on"]'><img xpc-image="hero"></main>"#,
        )
        .unwrap();
        fs::write(&data, r#"{"hero": {"relativePath": "/hero.webp", "altText": "H"}}"#).unwrap();

        let args = RenderArgs {
            inputs: vec![input],
            output: Some(out.clone()),
            data: Some(data),
            strict: true,
        };
        run_render(&args, &XpcConfig::default()).await.unwrap();

        let html = fs::read_to_string(out.join("page.html")).unwrap();
        assert_eq!(
            html,
            r#"<main class="on"><img src="/hero.webp" alt="H" loading="lazy"></main>"#
        );
    }

    #[tokio::test]
    async fn test_strict_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.html");
        fs::write(&input, r#"<p xpc-attr-if="nope"></p>"#).unwrap();

        let args = RenderArgs {
            inputs: vec![input],
            output: Some(dir.path().join("out")),
            data: None,
            strict: true,
        };
        let err = run_render(&args, &XpcConfig::default()).await.unwrap_err();
        assert!(err.to_string().starts_with("failed to render"), "{err}");
        assert!(!dir.path().join("out/bad.html").exists());
    }

    #[tokio::test]
    async fn test_several_inputs_need_output_dir() {
        let args = RenderArgs {
            inputs: vec!["a.html".into(), "b.html".into()],
            output: None,
            data: None,
            strict: false,
        };
        assert!(run_render(&args, &XpcConfig::default()).await.is_err());
    }
}
