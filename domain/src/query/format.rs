//! Answer and context shaping for the response.

use super::request::Platform;
use crate::util::truncate_chars;

/// Replacement for URLs stripped from the web search context
pub const URL_PLACEHOLDER: &str = "[URL_REMOVED]";

/// Default cap on the `webSearchContext` excerpt, in characters.
pub const DEFAULT_CONTEXT_MAX_CHARS: usize = 1000;

/// Adapt a model answer to the rendering of the target platform.
///
/// Messaging apps understand `*bold*` but not `**bold**` or headings, so for
/// those channels:
/// - `**text**` becomes `*text*`
/// - `# Heading` (any level) becomes `*Heading*`
/// - 3+ consecutive newlines collapse to a single blank line
///
/// Other platforms only get surrounding whitespace trimmed.
pub fn normalize_answer(answer: &str, platform: &Platform) -> String {
    if !platform.is_messaging() {
        return answer.trim().to_string();
    }

    let bolded = answer.replace("**", "*");
    let lines: Vec<String> = bolded.lines().map(heading_to_bold).collect();
    collapse_blank_lines(&lines.join("\n")).trim().to_string()
}

fn heading_to_bold(line: &str) -> String {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return line.to_string();
    }
    let rest = &trimmed[level..];
    if !rest.starts_with(char::is_whitespace) {
        return line.to_string();
    }
    let title = rest.trim().trim_end_matches('#').trim().trim_matches('*').trim();
    if title.is_empty() {
        return String::new();
    }
    format!("*{}*", title)
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(c);
    }
    out
}

/// Replace every `http://` / `https://` URL with [`URL_PLACEHOLDER`].
pub fn redact_urls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = find_url_start(rest) {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let end = tail
            .find(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '\''))
            .unwrap_or(tail.len());
        out.push_str(URL_PLACEHOLDER);
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

fn find_url_start(s: &str) -> Option<usize> {
    [s.find("http://"), s.find("https://")]
        .into_iter()
        .flatten()
        .min()
}

/// Build the `webSearchContext` excerpt: URLs redacted, capped at
/// `max_chars` characters with a trailing `...` when cut.
pub fn web_context_excerpt(context: &str, max_chars: usize) -> String {
    let redacted = redact_urls(context.trim());
    if redacted.chars().count() > max_chars {
        format!("{}...", truncate_chars(&redacted, max_chars))
    } else {
        redacted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_answer_only_trimmed() {
        let answer = "\n## Resposta\n\n**4**\n";
        assert_eq!(normalize_answer(answer, &Platform::Web), "## Resposta\n\n**4**");
    }

    #[test]
    fn test_whatsapp_bold_and_headings() {
        let answer = "## Fotossíntese\nÉ o processo **principal** das plantas.\n### Etapas ###\n# **Resumo**";
        assert_eq!(
            normalize_answer(answer, &Platform::Whatsapp),
            "*Fotossíntese*\nÉ o processo *principal* das plantas.\n*Etapas*\n*Resumo*"
        );
    }

    #[test]
    fn test_hashtag_is_not_heading() {
        assert_eq!(
            normalize_answer("#escola rocks", &Platform::Discord),
            "#escola rocks"
        );
    }

    #[test]
    fn test_collapse_newlines() {
        assert_eq!(
            normalize_answer("a\n\n\n\n\nb\n\nc", &Platform::Whatsapp),
            "a\n\nb\n\nc"
        );
    }

    #[test]
    fn test_redact_urls() {
        let text = "Fonte: https://pt.wikipedia.org/wiki/Lisboa e <http://example.com/x?y=1> fim";
        assert_eq!(
            redact_urls(text),
            "Fonte: [URL_REMOVED] e <[URL_REMOVED]> fim"
        );
        assert_eq!(redact_urls("sem links"), "sem links");
    }

    #[test]
    fn test_web_context_excerpt_truncates() {
        let long = "á".repeat(20);
        assert_eq!(web_context_excerpt(&long, 5), "ááááá...");
        assert_eq!(web_context_excerpt("curto", 5), "curto");
    }
}
