use crate::attestation_graph::domain::{
    AttestationGraph, ReportMetadata, SecurityAssessment, Severity,
};
use crate::attestation_graph::policies::SecurityKnowledge;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// Markdown table header for graph components
const COMPONENT_TABLE_HEADER: &str = "| ID | Type | Name | Advice |\n";

/// Markdown table separator line
const COMPONENT_TABLE_SEPARATOR: &str = "|----|------|------|--------|\n";

/// Markdown table header for security issues
const ISSUE_TABLE_HEADER: &str = "| Severity | Type | Component | Description |\n";

/// Markdown table separator line for issue table
const ISSUE_TABLE_SEPARATOR: &str = "|----------|------|-----------|-------------|\n";

/// MarkdownFormatter adapter for the human-readable report
///
/// This adapter implements the ReportFormatter port for Markdown format,
/// rendering the verdict, issues, recommendations and component inventory.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn severity_badge(severity: Severity) -> &'static str {
        match severity {
            Severity::Critical => "🔴 critical",
            Severity::High => "🟠 high",
            Severity::Medium => "🟡 medium",
            Severity::Low => "🟢 low",
        }
    }

    fn render_header(output: &mut String, metadata: &ReportMetadata) {
        output.push_str("# Supply Chain Attestation Report\n\n");
        output.push_str(&format!("- **Image**: `{}`\n", metadata.image()));
        output.push_str(&format!("- **Platform**: `{}`\n", metadata.platform()));
        output.push_str(&format!("- **Generated**: {}\n", metadata.timestamp()));
        output.push_str(&format!("- **Serial**: {}\n\n", metadata.serial_number()));
    }

    fn render_verdict(output: &mut String, assessment: &SecurityAssessment) {
        output.push_str("## Trust Assessment\n\n");
        output.push_str(&format!(
            "**{}** · **{}** · score **{}/100**\n\n",
            assessment.trust_level.label(),
            assessment.risk_level.label(),
            assessment.score
        ));
    }

    fn render_coverage(output: &mut String, metadata: &ReportMetadata) {
        let counts = metadata.attestation_counts();
        output.push_str("## Attestation Coverage\n\n");
        for (label, count) in [
            ("SLSA provenance", counts.slsa),
            ("SPDX SBOM", counts.sbom),
            ("Build configuration", counts.apko),
        ] {
            let mark = if count > 0 { "✅" } else { "❌" };
            output.push_str(&format!("- {} {}\n", mark, label));
        }
        output.push('\n');
    }

    fn render_issues(output: &mut String, assessment: &SecurityAssessment) {
        if assessment.issues.is_empty() {
            return;
        }

        output.push_str("## Security Issues\n\n");
        output.push_str(ISSUE_TABLE_HEADER);
        output.push_str(ISSUE_TABLE_SEPARATOR);
        for issue in &assessment.issues {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                Self::severity_badge(issue.severity),
                serde_json::to_string(&issue.kind)
                    .unwrap_or_default()
                    .trim_matches('"'),
                Self::escape_markdown_table_cell(issue.component.as_deref().unwrap_or("-")),
                Self::escape_markdown_table_cell(&issue.description),
            ));
        }
        output.push('\n');
    }

    fn render_vulnerabilities(output: &mut String, assessment: &SecurityAssessment) {
        let Some(summary) = &assessment.vulnerability_summary else {
            return;
        };

        output.push_str("## Vulnerability Summary\n\n");
        output.push_str(&format!(
            "{} known vulnerability/ies (critical: {}, high: {}, medium: {}, low: {}), overall risk {}/100\n\n",
            summary.total_vulnerabilities,
            summary.critical_count,
            summary.high_count,
            summary.medium_count,
            summary.low_count,
            summary.overall_risk_score,
        ));
    }

    fn render_recommendations(output: &mut String, assessment: &SecurityAssessment) {
        if assessment.recommendations.is_empty() {
            return;
        }

        output.push_str("## Recommendations\n\n");
        for (index, recommendation) in assessment.recommendations.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", index + 1, recommendation));
        }
        output.push('\n');
    }

    fn render_components(output: &mut String, graph: &AttestationGraph) {
        output.push_str("## Components\n\n");
        output.push_str(COMPONENT_TABLE_HEADER);
        output.push_str(COMPONENT_TABLE_SEPARATOR);
        for node in &graph.nodes {
            output.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&node.id),
                node.node_type.label(),
                Self::escape_markdown_table_cell(&node.name),
                SecurityKnowledge::advice_for(node.node_type),
            ));
        }
        output.push('\n');
    }

    fn render_relationships(output: &mut String, graph: &AttestationGraph) {
        if graph.edges.is_empty() {
            return;
        }

        output.push_str("## Relationships\n\n");
        for edge in &graph.edges {
            output.push_str(&format!(
                "- `{}` {} `{}`\n",
                Self::escape_markdown_table_cell(&edge.from),
                edge.label,
                Self::escape_markdown_table_cell(&edge.to),
            ));
        }
        output.push('\n');
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(
        &self,
        graph: &AttestationGraph,
        assessment: &SecurityAssessment,
        metadata: &ReportMetadata,
    ) -> Result<String> {
        let mut output = String::new();

        Self::render_header(&mut output, metadata);
        Self::render_verdict(&mut output, assessment);
        Self::render_coverage(&mut output, metadata);
        Self::render_issues(&mut output, assessment);
        Self::render_vulnerabilities(&mut output, assessment);
        Self::render_recommendations(&mut output, assessment);
        Self::render_components(&mut output, graph);
        Self::render_relationships(&mut output, graph);

        Ok(output)
    }
}
