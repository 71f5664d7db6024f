//! Plain-text summary of a report for terminal output.

use crate::parser::schema::AnalyticsReport;

const LABEL_WIDTH: usize = 28;
const BAR_WIDTH: u64 = 40;

/// Shorten a label to `width` characters, keeping its tail
fn fit(label: &str, width: usize) -> String {
    let count = label.chars().count();
    if count <= width {
        label.to_string()
    } else {
        let tail: String = label.chars().skip(count - (width - 3)).collect();
        format!("...{}", tail)
    }
}

/// Render the timeline, top flows and health metrics as text
///
/// **Public** - used by `analyze --summary`
///
/// # Arguments
/// * `report` - Report to summarize
/// * `max_edges` - Number of heaviest flow edges to list
pub fn render_summary(report: &AnalyticsReport, max_edges: usize) -> String {
    let mut lines = Vec::new();

    lines.push("  REQUEST TIMELINE".to_string());
    lines.push("  ┏━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┳━━━━━━━━━━┳━━━━━━━━━━┓".to_string());
    lines.push(format!("  ┃ {:<28} ┃ {:^8} ┃ {:^8} ┃", "Bucket", "REQ", "ERR"));
    lines.push("  ┣━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╋━━━━━━━━━━╋━━━━━━━━━━┫".to_string());

    let busiest = report
        .timeline
        .iter()
        .map(|b| b.request_count)
        .max()
        .unwrap_or(0)
        .max(1);

    for bucket in &report.timeline {
        lines.push(format!(
            "  ┃ {:<28} ┃ {:>8} ┃ {:>8} ┃",
            fit(&bucket.label, LABEL_WIDTH),
            bucket.request_count,
            bucket.error_count
        ));
    }
    lines.push("  ┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┻━━━━━━━━━━┻━━━━━━━━━━┛".to_string());

    for bucket in &report.timeline {
        let bar = "█".repeat((bucket.request_count * BAR_WIDTH / busiest) as usize);
        lines.push(format!("  {:<28} {}", fit(&bucket.label, LABEL_WIDTH), bar));
    }

    lines.push(String::new());
    lines.push(format!(
        "  TOP FLOWS ({} nodes, {} edges)",
        report.flow.nodes.len(),
        report.flow.edges.len()
    ));

    let mut edges: Vec<_> = report.flow.edges.iter().collect();
    edges.sort_by(|a, b| b.weight.cmp(&a.weight));

    let label = |index: usize| {
        report
            .flow
            .nodes
            .get(index)
            .map(|n| n.label.as_str())
            .unwrap_or("?")
    };

    for edge in edges.into_iter().take(max_edges) {
        lines.push(format!(
            "  {:>8}  {} -> {}",
            edge.weight,
            fit(label(edge.source_index), LABEL_WIDTH),
            fit(label(edge.target_index), LABEL_WIDTH)
        ));
    }

    lines.push(String::new());
    lines.push("  HEALTH".to_string());
    for metric in &report.health {
        lines.push(format!(
            "  {:<10} {:>8.1} / {:<6.0} {}",
            metric.subject, metric.value, metric.cap, metric.actual_display
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{FlowGraph, GraphEdge, GraphNode, ReportWindow};

    #[test]
    fn test_fit_keeps_tail() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("/a/very/long/path/name", 10), "...th/name");
    }

    #[test]
    fn test_render_lists_heaviest_edge_first() {
        let node = |label: &str, index| GraphNode {
            label: label.to_string(),
            index,
        };
        let report = AnalyticsReport {
            version: "1.0.0".to_string(),
            window: ReportWindow {
                period: "hourly".to_string(),
                start: 0,
                end: 1,
                hostname: None,
                record_count: 3,
            },
            timeline: vec![],
            flow: FlowGraph {
                nodes: vec![node("a", 0), node("HTTP", 1), node("b", 2)],
                edges: vec![
                    GraphEdge {
                        source_index: 0,
                        target_index: 1,
                        weight: 1,
                    },
                    GraphEdge {
                        source_index: 1,
                        target_index: 2,
                        weight: 7,
                    },
                ],
            },
            health: vec![],
            generated_at: String::new(),
        };

        let text = render_summary(&report, 1);

        assert!(text.contains("TOP FLOWS (3 nodes, 2 edges)"));
        assert!(text.contains("HTTP -> b"));
        assert!(!text.contains("a -> HTTP"));
    }
}
