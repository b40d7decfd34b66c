//! Renders a dry-run's captured terminal output as a monospace SVG snapshot,
//! published as a gist so the check run summary can embed it as an image.

const FONT_SIZE: u32 = 14;
const LINE_HEIGHT: u32 = 18;
const CHAR_WIDTH: u32 = 8;
const PADDING: u32 = 10;

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Strips ANSI escape sequences, then renders the remaining plain text as an
/// SVG document: one `<tspan>` per line on a dark background.
pub fn render(combined_output: &str) -> String {
    let stripped = strip_ansi_escapes::strip(combined_output.as_bytes());
    let plain = String::from_utf8_lossy(&stripped);
    let lines: Vec<&str> = plain.lines().collect();

    let width = lines.iter().map(|l| l.len()).max().unwrap_or(0) as u32 * CHAR_WIDTH + PADDING * 2;
    let height = lines.len() as u32 * LINE_HEIGHT + PADDING * 2;

    let mut body = String::new();
    for (i, line) in lines.iter().enumerate() {
        let y = PADDING + (i as u32 + 1) * LINE_HEIGHT - 4;
        body.push_str(&format!(
            "<tspan x=\"{PADDING}\" y=\"{y}\">{}</tspan>",
            escape_xml(line)
        ));
    }

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">\
<rect width=\"100%\" height=\"100%\" fill=\"#0d1117\"/>\
<text font-family=\"monospace\" font-size=\"{FONT_SIZE}\" fill=\"#c9d1d9\">{body}</text>\
</svg>"
    )
}
