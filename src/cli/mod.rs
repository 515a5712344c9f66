//! Handlers behind `sekolah-cli`. Each returns the text to print so the
//! binary stays a thin shell around argument parsing and prompts.

use std::fmt::Write as _;

use anyhow::Result;
use sekolah_client::OverrideStore;
use sekolah_core::{AccessLevel, Permission};
use tracing::info;

use crate::modules::access::PermissionResolver;
use crate::modules::menu::MenuResource;
use crate::modules::overrides::{OverrideEditor, OverrideRow, SaveReport};

/// The sidebar as the resolver's role sees it.
pub fn format_menu(resolver: &PermissionResolver) -> String {
    let mut out = String::new();
    if let Some(notice) = resolver.notice() {
        let _ = writeln!(out, "⚠️  {}\n", notice);
    }
    for node in resolver.visible_menu() {
        write_menu_node(&mut out, resolver, &node, 0);
        for child in &node.children {
            write_menu_node(&mut out, resolver, child, 1);
        }
    }
    out
}

fn write_menu_node(out: &mut String, resolver: &PermissionResolver, node: &MenuResource, depth: usize) {
    let indent = "  ".repeat(depth);
    match &node.resource_key {
        Some(key) => {
            let _ = writeln!(
                out,
                "{}{} [{}] {}",
                indent,
                node.label,
                resolver.effective_permission(key),
                node.path.as_deref().unwrap_or("")
            );
        }
        None => {
            let _ = writeln!(out, "{}{}", indent, node.label);
        }
    }
}

/// Every gated resource with its effective permission and where it came from.
pub fn format_effective(resolver: &PermissionResolver) -> String {
    let mut out = String::new();
    if let Some(notice) = resolver.notice() {
        let _ = writeln!(out, "⚠️  {}\n", notice);
    }
    let _ = writeln!(out, "Role: {}", resolver.role().display_name());
    for (key, permission) in resolver.effective_map() {
        let source = if resolver.is_overridden(&key) {
            "override"
        } else {
            "base"
        };
        let _ = writeln!(
            out,
            "  {:<20} {:<6} {:<16} {}",
            key,
            permission.to_string(),
            AccessLevel::from_permission(&permission).label(),
            source
        );
    }
    out
}

/// The admin override matrix.
pub fn format_rows(rows: &[OverrideRow]) -> String {
    let mut out = String::new();
    let mut group: Option<&str> = None;
    for row in rows {
        if row.group.as_deref() != group {
            group = row.group.as_deref();
            if let Some(label) = group {
                let _ = writeln!(out, "{}", label);
            }
        }
        let marker = if row.is_dirty() {
            "*"
        } else if row.is_overridden() {
            "!"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            "{} {:<20} base {:<6} now {:<6} {}",
            marker,
            row.resource_key,
            row.base.to_string(),
            row.current.to_string(),
            row.level.label()
        );
    }
    out
}

pub fn format_report(report: &SaveReport) -> String {
    if report.is_empty() {
        return "Tidak ada perubahan.\n".to_string();
    }
    let mut out = String::new();
    for (key, outcome) in report.succeeded() {
        let _ = writeln!(out, "✅ {}: {}", key, outcome.label());
    }
    for (key, err) in report.failed() {
        let _ = writeln!(out, "❌ {}: {}", key, err);
    }
    out
}

pub async fn load_editor<S: OverrideStore>(mut editor: OverrideEditor<S>) -> Result<OverrideEditor<S>> {
    editor.refresh().await?;
    Ok(editor)
}

pub async fn set_override<S: OverrideStore>(
    editor: &mut OverrideEditor<S>,
    resource_key: &str,
    level: AccessLevel,
) -> Result<SaveReport> {
    editor
        .stage_level(resource_key, level)
        .map_err(|e| e.error)?;
    info!(override_target = %editor.target(), resource_key, level = %level, "Setting override");
    Ok(editor.save().await)
}

pub async fn set_custom_override<S: OverrideStore>(
    editor: &mut OverrideEditor<S>,
    resource_key: &str,
    permission: Permission,
) -> Result<SaveReport> {
    editor
        .stage_permission(resource_key, permission)
        .map_err(|e| e.error)?;
    Ok(editor.save().await)
}

pub async fn reset_override<S: OverrideStore>(
    editor: &mut OverrideEditor<S>,
    resource_key: &str,
) -> Result<SaveReport> {
    editor.stage_reset(resource_key).map_err(|e| e.error)?;
    Ok(editor.save().await)
}

/// Stage every overridden resource back to its base and save.
pub async fn reset_all_overrides<S: OverrideStore>(editor: &mut OverrideEditor<S>) -> Result<SaveReport> {
    let keys: Vec<String> = editor
        .rows()
        .into_iter()
        .filter(OverrideRow::is_overridden)
        .map(|row| row.resource_key)
        .collect();
    for key in &keys {
        editor.stage_reset(key).map_err(|e| e.error)?;
    }
    info!(override_target = %editor.target(), count = keys.len(), "Resetting overrides");
    Ok(editor.save().await)
}
