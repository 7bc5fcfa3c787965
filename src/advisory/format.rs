//! Advisory text post-processing.
//!
//! Strips markdown emphasis markers and renumbers pesticide entries so
//! generated advice renders cleanly in the client UI. Deterministic and
//! side-effect free.

/// Line prefixes reformatted around their first colon.
const KEYWORD_PREFIXES: [&str; 6] = [
    "remedy",
    "fertilizer",
    "tips",
    "water",
    "crop duration",
    "best pesticide",
];

/// Maximum number of pesticide lines that receive a number.
const MAX_PESTICIDE_LINES: usize = 3;

/// Clean generated advisory text for display.
///
/// Removes `*` and `#` characters, reformats known `label: value` lines,
/// and numbers the first three lines mentioning a pesticide as `1)`, `2)`,
/// `3)`. Lines are matched against the keyword prefixes before the
/// pesticide subset, so a "Best Pesticide: ..." line is colon-formatted,
/// not numbered.
pub fn clean_advisory(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| *c != '*' && *c != '#').collect();
    let stripped = stripped.trim();

    let lines: Vec<&str> = stripped.split('\n').collect();

    // Indices of the first three lines mentioning a pesticide.
    let pesticide_lines: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.to_lowercase().contains("pesticide"))
        .map(|(i, _)| i)
        .take(MAX_PESTICIDE_LINES)
        .collect();

    let mut formatted = Vec::with_capacity(lines.len());
    let mut pesticide_count = 1;

    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if KEYWORD_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
            match line.split_once(':') {
                Some((label, rest)) => {
                    formatted.push(format!("{}: {}", label.trim(), rest.trim()));
                }
                None => formatted.push(line.trim().to_string()),
            }
        } else if pesticide_lines.contains(&i) {
            formatted.push(format!("{pesticide_count}) {}", line.trim()));
            pesticide_count += 1;
        } else {
            formatted.push(line.trim().to_string());
        }
    }

    formatted.join("\n").trim().to_string()
}
