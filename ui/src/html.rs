use model::Stop;

/// Hover text: every display attribute, then the size metric.
pub fn tooltip(stop: &Stop, size_column: &str) -> String {
    let mut lines = Vec::new();
    for (column, value) in stop.display_attributes() {
        lines.push(format!("<b>{}</b>: {}", escape(column), escape(value)));
    }
    lines.push(size_line(stop, size_column));
    lines.join("<br>")
}

/// Click text: the stop name bolded up top, the remaining attributes, the
/// size metric, and a Street View link.
pub fn popup(stop: &Stop, size_column: &str) -> String {
    let mut lines = Vec::new();
    if let Some(name) = &stop.name {
        lines.push(format!("<b>{}</b>", escape(name)));
    }
    for (column, value) in stop.display_attributes() {
        if column != "StopName" {
            lines.push(format!("<b>{}</b>: {}", escape(column), escape(value)));
        }
    }
    lines.push(size_line(stop, size_column));
    lines.push(format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">Open Google Street View</a>",
        stop.streetview_url()
    ));
    lines.join("<br>")
}

fn size_line(stop: &Stop, size_column: &str) -> String {
    let label = stop.size_label.as_deref().unwrap_or("missing");
    format!("<b>{}</b>: {}", escape(size_column), escape(label))
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
