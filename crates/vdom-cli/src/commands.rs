use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;
use tracing::info;
use vdom_host::{HostTree, InMemoryHost, Mutation, NodeId};
use vdom_patch::{create_element, PatchConfig, Reconciler, VNodeCache};
use vdom_types::VNode;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    let output = match &cli.command {
        Command::Render(args) => cmd_render(args, cli.format)?,
        Command::Patch(args) => cmd_patch(args, &config, cli.format)?,
        Command::Check(args) => cmd_check(args, &config, cli.format)?,
    };
    println!("{output}");
    Ok(())
}

/// Outcome of patching one vnode file toward another.
#[derive(Debug, Serialize)]
struct PatchReport {
    before: String,
    after: String,
    replaced_root: bool,
    mutations: Vec<Mutation>,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PatchConfig> {
    let Some(path) = path else {
        return Ok(PatchConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn load_vnode(path: &Path) -> anyhow::Result<VNode> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading vnode file {}", path.display()))?;
    VNode::from_json(&raw).with_context(|| format!("parsing vnode file {}", path.display()))
}

fn render_html(vnode: &VNode) -> anyhow::Result<String> {
    let mut host = InMemoryHost::new();
    let mut cache = VNodeCache::new();
    let node = create_element(&mut host, &mut cache, vnode, false)?;
    Ok(host.to_html(node)?)
}

fn run_patch(args: &PatchArgs, config: &PatchConfig) -> anyhow::Result<(PatchReport, VNode)> {
    let old = load_vnode(&args.old)?;
    let new = load_vnode(&args.new)?;

    let mut host = InMemoryHost::new();
    let mut reconciler = Reconciler::new(config.clone());
    let body = host.create_element("body")?;
    let node = reconciler.mount(&mut host, body, &old)?;
    let before = host.to_html(node)?;
    host.take_mutations();

    let prev = args.explicit_prev.then_some(&old);
    let out: NodeId = reconciler.patch(&mut host, node, Some(&new), prev)?;
    let mutations = host.take_mutations();
    info!(mode = ?config.mode, mutations = mutations.len(), "patch applied");

    let report = PatchReport {
        before,
        after: host.to_html(out)?,
        replaced_root: out != node,
        mutations,
    };
    Ok((report, new))
}

fn cmd_render(args: &RenderArgs, format: OutputFormat) -> anyhow::Result<String> {
    let vnode = load_vnode(&args.file)?;
    let html = render_html(&vnode)?;
    match format {
        OutputFormat::Text => Ok(html),
        OutputFormat::Json => {
            Ok(serde_json::json!({ "html": html, "nodes": vnode.node_count() }).to_string())
        }
    }
}

fn cmd_patch(
    args: &PatchArgs,
    config: &PatchConfig,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let (report, _) = run_patch(args, config)?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => Ok(format_report(&report)),
    }
}

fn cmd_check(
    args: &PatchArgs,
    config: &PatchConfig,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let (report, new) = run_patch(args, config)?;
    let expected = render_html(&new)?;
    if report.after != expected {
        bail!(
            "patched tree does not match a fresh render\n  patched:  {}\n  expected: {}",
            report.after,
            expected
        );
    }
    match format {
        OutputFormat::Json => Ok(serde_json::json!({
            "ok": true,
            "html": report.after,
            "mutations": report.mutations.len(),
        })
        .to_string()),
        OutputFormat::Text => Ok(format!(
            "{} Patched tree matches a fresh render ({} mutations)",
            "✓".green().bold(),
            report.mutations.len()
        )),
    }
}

fn format_report(report: &PatchReport) -> String {
    let mut lines = vec![
        format!("{} {}", "before:".dimmed(), report.before),
        format!("{} {}", "after: ".green(), report.after),
    ];
    if report.replaced_root {
        lines.push(format!("{}", "root node replaced".yellow()));
    }
    if report.mutations.is_empty() {
        lines.push("No mutations.".to_string());
    } else {
        lines.push(format!("{} mutations:", report.mutations.len().to_string().bold()));
        lines.extend(
            report
                .mutations
                .iter()
                .map(|m| format!("  {} {}", m.op().cyan(), describe(m))),
        );
    }
    lines.join("\n")
}

fn describe(mutation: &Mutation) -> String {
    match mutation {
        Mutation::CreateElement { node, tag } => format!("{node} <{tag}>"),
        Mutation::CreateText { node, text } => format!("{node} {text:?}"),
        Mutation::SetProperty { node, name, value } => format!("{node} {name}={value}"),
        Mutation::DeleteProperty { node, name } | Mutation::RemoveAttribute { node, name } => {
            format!("{node} {name}")
        }
        Mutation::ClearChildren { node } | Mutation::Remove { node } => node.to_string(),
        Mutation::AppendChild { parent, child } => format!("{child} -> {parent}"),
        Mutation::ReplaceWith { old, new } => format!("{old} => {new}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn patch_args(dir: &TempDir, old: &str, new: &str) -> PatchArgs {
        PatchArgs {
            old: write(dir, "old.json", old),
            new: write(dir, "new.json", new),
            explicit_prev: false,
        }
    }

    #[test]
    fn render_text_and_json() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "tree.json", r#"{"tag":"p","props":{"id":"x"},"children":["hi"]}"#);
        let args = RenderArgs { file };

        assert_eq!(cmd_render(&args, OutputFormat::Text).unwrap(), "<p id=\"x\">hi</p>");
        let json: serde_json::Value =
            serde_json::from_str(&cmd_render(&args, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["nodes"], 2);
    }

    #[test]
    fn render_reports_bad_json() {
        let dir = TempDir::new().unwrap();
        let args = RenderArgs { file: write(&dir, "bad.json", "{") };
        let err = cmd_render(&args, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("parsing vnode file"));
    }

    #[test]
    fn patch_reports_mutations() {
        let dir = TempDir::new().unwrap();
        let args = patch_args(
            &dir,
            r#"{"tag":"ul","children":["a"]}"#,
            r#"{"tag":"ul","children":["a","b"]}"#,
        );
        let (report, _) = run_patch(&args, &PatchConfig::default()).unwrap();

        assert_eq!(report.before, "<ul>a</ul>");
        assert_eq!(report.after, "<ul>ab</ul>");
        assert!(!report.replaced_root);
        let ops: Vec<_> = report.mutations.iter().map(Mutation::op).collect();
        assert_eq!(ops, vec!["create_text", "append_child"]);

        let json: serde_json::Value = serde_json::from_str(
            &cmd_patch(&args, &PatchConfig::default(), OutputFormat::Json).unwrap(),
        )
        .unwrap();
        assert_eq!(json["mutations"][1]["op"], "append_child");
    }

    #[test]
    fn patch_with_explicit_prev() {
        let dir = TempDir::new().unwrap();
        let mut args = patch_args(&dir, r#""a""#, r#""b""#);
        args.explicit_prev = true;
        let (report, _) = run_patch(&args, &PatchConfig::default()).unwrap();
        assert!(report.replaced_root);
        assert_eq!(report.after, "b");
    }

    #[test]
    fn check_passes_in_exact_mode() {
        let dir = TempDir::new().unwrap();
        let args = patch_args(
            &dir,
            r#"{"tag":"div","props":{"a":"1","b":"2"}}"#,
            r#"{"tag":"div","props":{"a":"1","b":"3"}}"#,
        );
        assert!(cmd_check(&args, &PatchConfig::default(), OutputFormat::Text).is_ok());
    }

    #[test]
    fn check_flags_compat_divergence() {
        let dir = TempDir::new().unwrap();
        let args = patch_args(
            &dir,
            r#"{"tag":"div","props":{"a":"1","b":"2"}}"#,
            r#"{"tag":"div","props":{"a":"1","b":"3"}}"#,
        );
        let err = cmd_check(&args, &PatchConfig::compat(), OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "vdom.toml", "mode = \"compat\"\n");
        assert_eq!(load_config(Some(&path)).unwrap(), PatchConfig::compat());
        assert_eq!(load_config(None).unwrap(), PatchConfig::default());
    }

    #[test]
    fn missing_config_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/vdom.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn text_report_lists_operations() {
        colored::control::set_override(false);
        let report = PatchReport {
            before: "a".into(),
            after: "b".into(),
            replaced_root: true,
            mutations: vec![Mutation::Remove { node: NodeId::new(1) }],
        };
        let text = format_report(&report);
        assert!(text.contains("root node replaced"));
        assert!(text.contains("remove #1"));
    }
}
