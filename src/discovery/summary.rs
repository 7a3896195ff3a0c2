//! Project summaries: one generated node per cluster of same-project memories.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::lock_db;
use crate::memory::search::search_nodes;
use crate::memory::store::{find_project_summary, store_node_with_type, summary_prefix};
use crate::memory::truncate_preview;
use crate::memory::types::{Context, ContextValue, MemoryNode, NodeType};

const RECENT_ACTIVITIES: usize = 5;
const ACTIVITY_PREVIEW_CHARS: usize = 50;

/// Working-set and grouping limits for one summary pass.
#[derive(Debug, Clone, Copy)]
pub struct SummaryOptions {
    pub sample_size: usize,
    pub min_group_size: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            sample_size: 100,
            min_group_size: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    /// Groups that met the minimum size.
    pub groups_considered: usize,
    pub summaries_created: usize,
    /// Eligible groups that already had a summary.
    pub summaries_skipped: usize,
}

/// Group the working set by rendered `context.project`. Summary nodes and nodes
/// without a project are left out. Groups keep working-set order.
pub fn group_by_project(nodes: &[MemoryNode]) -> BTreeMap<String, Vec<&MemoryNode>> {
    let mut groups: BTreeMap<String, Vec<&MemoryNode>> = BTreeMap::new();
    for node in nodes {
        if node.node_type == NodeType::Summary {
            continue;
        }
        if let Some(project) = node.context_value("project") {
            groups.entry(project.render()).or_default().push(node);
        }
    }
    groups
}

/// Render the summary body for `project`.
pub fn build_summary_content(project: &str, members: &[&MemoryNode], now: DateTime<Utc>) -> String {
    let mut out = format!(
        "{}\n\nTotal memories: {}\nRecent activities:\n",
        summary_prefix(project),
        members.len()
    );

    let skip = members.len().saturating_sub(RECENT_ACTIVITIES);
    for member in &members[skip..] {
        out.push_str("- ");
        out.push_str(&truncate_preview(&member.content, ACTIVITY_PREVIEW_CHARS));
        out.push('\n');
    }

    out.push_str("\nThis summary was generated automatically by background discovery.\n");
    out.push_str(&format!("Last updated: {}", now.format("%Y-%m-%d %H:%M:%S UTC")));
    out
}

/// `project` is the group's original context value, so a numeric project stays numeric.
fn summary_context(project: ContextValue, summarized_count: usize) -> Context {
    let mut context = Context::new();
    context.insert("type".into(), ContextValue::from("summary"));
    context.insert("project".into(), project);
    context.insert("source".into(), ContextValue::from("discovery"));
    context.insert(
        "summarized_count".into(),
        ContextValue::Integer(summarized_count as i64),
    );
    context
}

/// Create a summary node for every sufficiently large project group that
/// doesn't already have one.
///
/// The lock is taken once to read the working set, then once per group so
/// the existence check and the insert can't interleave with another writer.
pub fn create_project_summaries(
    db: &Mutex<Connection>,
    options: SummaryOptions,
) -> Result<SummaryReport> {
    let nodes = {
        let conn = lock_db(db)?;
        search_nodes(&conn, "", options.sample_size).context("failed to load summary working set")?
    };

    let mut report = SummaryReport::default();
    for (project, members) in group_by_project(&nodes) {
        if members.len() < options.min_group_size {
            continue;
        }
        report.groups_considered += 1;

        let conn = lock_db(db)?;
        if let Some(existing) = find_project_summary(&conn, &project)? {
            tracing::debug!(project = %project, summary_id = %existing, "summary exists, skipping");
            report.summaries_skipped += 1;
            continue;
        }

        // Groups are keyed by the rendered value; the first member supplies the typed one.
        let project_value = members
            .first()
            .and_then(|m| m.context_value("project"))
            .cloned()
            .unwrap_or_else(|| ContextValue::from(project.as_str()));

        let content = build_summary_content(&project, &members, Utc::now());
        let id = store_node_with_type(
            &conn,
            &content,
            &summary_context(project_value, members.len()),
            NodeType::Summary,
        )
        .with_context(|| format!("failed to store summary for project {project}"))?;

        tracing::info!(project = %project, summary_id = %id, members = members.len(), "project summary created");
        report.summaries_created += 1;
    }

    Ok(report)
}
