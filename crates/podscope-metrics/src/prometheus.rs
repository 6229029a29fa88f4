//! Prometheus text exposition format.
//!
//! Renders a registry snapshot into the text format scraped by Prometheus
//! or a compatible agent.

use crate::registry::MetricsSnapshot;

/// Content type for the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render a snapshot into Prometheus text format.
///
/// Produces `http_requests_total{path,status}` and `configmap_read_total`
/// counters. Help and type lines are always present, even with no samples.
pub fn render_prometheus(snapshot: &MetricsSnapshot) -> String {
    let mut out = String::new();

    out.push_str("# HELP http_requests_total Total number of HTTP requests\n");
    out.push_str("# TYPE http_requests_total counter\n");
    for r in &snapshot.requests {
        out.push_str(&format!(
            "http_requests_total{{path=\"{}\",status=\"{}\"}} {}\n",
            escape_label(&r.path),
            r.status,
            r.count
        ));
    }

    out.push_str("# HELP configmap_read_total Total number of configmap reads\n");
    out.push_str("# TYPE configmap_read_total counter\n");
    out.push_str(&format!("configmap_read_total {}\n", snapshot.configmap_reads));

    out
}

/// Escape a label value: backslash, double quote and newline.
fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RequestCount;

    fn count(path: &str, status: u16, count: u64) -> RequestCount {
        RequestCount {
            path: path.to_string(),
            status,
            count,
        }
    }

    #[test]
    fn render_empty() {
        let output = render_prometheus(&MetricsSnapshot::default());
        // Should still have type declarations.
        assert!(output.contains("# HELP http_requests_total"));
        assert!(output.contains("# TYPE http_requests_total counter"));
        assert!(output.contains("# TYPE configmap_read_total counter"));
        assert!(output.contains("configmap_read_total 0\n"));
    }

    #[test]
    fn render_request_counters() {
        let snapshot = MetricsSnapshot {
            requests: vec![count("/config", 200, 7), count("/config", 500, 2)],
            configmap_reads: 7,
        };
        let output = render_prometheus(&snapshot);

        assert!(output.contains("http_requests_total{path=\"/config\",status=\"200\"} 7\n"));
        assert!(output.contains("http_requests_total{path=\"/config\",status=\"500\"} 2\n"));
        assert!(output.contains("configmap_read_total 7\n"));
    }

    #[test]
    fn label_values_are_escaped() {
        assert_eq!(escape_label(r#"/a"b\c"#), r#"/a\"b\\c"#);
        assert_eq!(escape_label("x\ny"), "x\\ny");
    }

    #[test]
    fn render_format_is_prometheus_compatible() {
        let snapshot = MetricsSnapshot {
            requests: vec![count("/", 200, 1), count("/health", 200, 3)],
            configmap_reads: 0,
        };
        let output = render_prometheus(&snapshot);

        // Every sample line is `name[{labels}] value`.
        for line in output.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (_, value) = line.rsplit_once(' ').expect("sample has a value");
            assert!(value.parse::<u64>().is_ok(), "bad value in: {line}");
        }
    }
}
