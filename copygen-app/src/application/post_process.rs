//! Turns raw model output into clean copy rows.
//!
//! Every step is a pure function so it can be checked without a model.

use crate::domain::{CopyRow, TextLimits, COPY_COLUMNS};
use copygen_errors::AppError;
use regex_lite::Regex;
use std::sync::OnceLock;

pub const AD_PREFIX: &str = "(광고)";
pub const OPT_OUT_SUFFIX: &str = "*수신거부:설정>변경";

const ELLIPSIS: char = '…';

fn code_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```[A-Za-z]*").expect("static pattern"))
}

fn separator_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\|?(\s*:?-{3,}:?\s*\|?)+$").expect("static pattern"))
}

pub fn strip_code_fences(text: &str) -> String {
    code_fence().replace_all(text, "").trim().to_string()
}

/// Splits `|`-delimited lines into trimmed cells. Lines without a
/// delimiter and Markdown separator lines are skipped. Outer pipes are
/// dropped when the line is wrapped in them Markdown-style, or when they only
/// add empty cells beyond the column count; otherwise a leading `|` marks an
/// empty first cell.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains('|'))
        .filter(|line| !separator_line().is_match(line))
        .map(|line| {
            let mut cells: Vec<&str> = line.split('|').collect();
            let wrapped = line.len() > 1 && line.starts_with('|') && line.ends_with('|');

            if wrapped {
                cells.remove(0);
                cells.pop();
            } else {
                if cells.len() > COPY_COLUMNS.len() && line.starts_with('|') {
                    cells.remove(0);
                }
                if cells.len() > COPY_COLUMNS.len() && line.ends_with('|') {
                    cells.pop();
                }
            }

            cells.into_iter().map(|cell| cell.trim().to_string()).collect()
        })
        .collect()
}

pub fn normalize_arity(mut cells: Vec<String>, arity: usize) -> Vec<String> {
    cells.truncate(arity);
    cells.resize(arity, String::new());
    cells
}

/// True when at least two cells name their own column, e.g. `제목` and `내용`.
pub fn is_header_row(cells: &[String]) -> bool {
    cells
        .iter()
        .zip(COPY_COLUMNS)
        .filter(|(cell, column)| !cell.is_empty() && cell.contains(*column))
        .count()
        >= 2
}

fn is_disallowed(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'       // hiragana
        | '\u{30A0}'..='\u{30FF}'     // katakana
        | '\u{31F0}'..='\u{31FF}'
        | '\u{FF66}'..='\u{FF9F}'     // halfwidth katakana
        | '\u{3400}'..='\u{4DBF}'     // CJK ideographs
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2FA1F}'
        | '\u{200B}'..='\u{200D}'     // zero width
        | '\u{2060}'
        | '\u{FEFF}'
    ) || (c.is_control() && !c.is_whitespace())
}

fn is_emoji_part(c: char) -> bool {
    matches!(c,
        '\u{1F000}'..='\u{1FAFF}'
        | '\u{2600}'..='\u{27BF}'
        | '\u{2B00}'..='\u{2BFF}'
        | '\u{FE0F}'                 // emoji presentation selector
    )
}

/// Drops Han and kana characters, zero-width and control characters, then
/// collapses whitespace. Hangul, ASCII, punctuation and emoji survive,
/// including joiner sequences such as 👨‍👩‍👧.
pub fn strip_disallowed(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let kept: String = chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            if c == '\u{200D}' {
                let joins_emoji = i > 0
                    && is_emoji_part(chars[i - 1])
                    && chars.get(i + 1).is_some_and(|&next| is_emoji_part(next));
                return joins_emoji;
            }
            !is_disallowed(c)
        })
        .map(|(_, &c)| c)
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut cut: String = text.chars().take(max - 1).collect();
    cut.truncate(cut.trim_end().len());
    cut.push(ELLIPSIS);
    cut
}

/// Removes compliance text the model may have added on its own.
pub fn strip_compliance(body: &str) -> &str {
    let body = body.trim();
    let body = body.strip_prefix(AD_PREFIX).unwrap_or(body).trim_start();
    body.strip_suffix(OPT_OUT_SUFFIX).unwrap_or(body).trim_end()
}

pub fn apply_compliance(body: &str) -> String {
    match strip_compliance(body) {
        "" => format!("{}\n{}", AD_PREFIX, OPT_OUT_SUFFIX),
        body => format!("{} {}\n{}", AD_PREFIX, body, OPT_OUT_SUFFIX),
    }
}

pub fn post_process(raw: &str, limits: TextLimits) -> Result<Vec<CopyRow>, AppError> {
    let text = strip_code_fences(raw);

    let rows: Vec<CopyRow> = parse_rows(&text)
        .into_iter()
        .map(|cells| normalize_arity(cells, COPY_COLUMNS.len()))
        .filter(|cells| !is_header_row(cells))
        .filter_map(|cells| {
            let [category, campaign, target, content_name, title, body]: [String; 6] =
                cells.try_into().ok()?;

            let title = truncate_chars(&strip_disallowed(&title), limits.title_max_chars);
            let body = strip_disallowed(&body);
            let body = truncate_chars(strip_compliance(&body), limits.body_max_chars);
            if title.is_empty() && body.is_empty() {
                return None;
            }

            Some(CopyRow::from_cells([
                strip_disallowed(&category),
                strip_disallowed(&campaign),
                strip_disallowed(&target),
                strip_disallowed(&content_name),
                title,
                apply_compliance(&body),
            ]))
        })
        .collect();

    if rows.is_empty() {
        return Err(AppError::MalformedOutput(
            "no '|'-separated rows in model output".to_string(),
        ));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "```csv
대분류|캠페인|상세타겟_상세타깃_상세설명|추천 콘텐츠|제목|내용
---|---|---|---|---|---
예능|런칭알림|30대 직장인|환승연애4|💘 드디어 공개!|지금 바로 확인하세요 🔥
예능|런칭알림|20대|환승연애4|다시 만난 그들|X의 마음을 확인해보세요
```";

    #[test]
    fn test_post_process_sample() {
        let rows = post_process(SAMPLE, TextLimits::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "예능");
        assert_eq!(rows[0].title, "💘 드디어 공개!");
        assert_eq!(
            rows[0].body,
            "(광고) 지금 바로 확인하세요 🔥\n*수신거부:설정>변경"
        );
        assert_eq!(rows[1].target, "20대");
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```csv\na|b\n```"), "a|b");
        assert_eq!(strip_code_fences("```\na|b\n```\n"), "a|b");
    }

    #[test]
    fn test_parse_rows_tolerates_markdown_pipes() {
        let rows = parse_rows("| a | b |\n|:---|---:|\nnot a row\n\nc|d");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_leading_pipe_marks_empty_category() {
        let rows = post_process("|런칭알림|20대|쇼|제목입니다|본문입니다", TextLimits::default())
            .unwrap();
        assert_eq!(rows[0].category, "");
        assert_eq!(rows[0].campaign, "런칭알림");
        assert_eq!(rows[0].title, "제목입니다");
        assert_eq!(rows[0].body, "(광고) 본문입니다\n*수신거부:설정>변경");
    }

    #[test]
    fn test_outer_pipes_only_dropped_when_extra() {
        assert_eq!(
            parse_rows("a|b|c|d|e|f|"),
            vec![vec!["a", "b", "c", "d", "e", "f"]]
        );
        assert_eq!(
            parse_rows("|a|b|c|d|e|f"),
            vec![vec!["a", "b", "c", "d", "e", "f"]]
        );
        assert_eq!(
            parse_rows("|b|c|d|e|f"),
            vec![vec!["", "b", "c", "d", "e", "f"]]
        );
    }

    #[test]
    fn test_uneven_columns_padded_or_truncated() {
        let rows = post_process(
            "a|b|c|d|title|body|extra|more\na|b|t|c|short",
            TextLimits::default(),
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "title");
        assert!(rows[0].body.contains("body"));
        assert!(!rows[0].body.contains("extra"));
        assert_eq!(rows[1].target, "t");
        assert_eq!(rows[1].title, "short");
        assert_eq!(rows[1].body, format!("{}\n{}", AD_PREFIX, OPT_OUT_SUFFIX));
    }

    #[test]
    fn test_header_detection() {
        let header: Vec<String> = ["대분류", "캠페인", "상세타겟", "추천 콘텐츠", "제목", "내용"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(is_header_row(&header));

        let row: Vec<String> = ["예능", "런칭", "20대", "쇼", "제목이 좋아", "본문"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(!is_header_row(&row));
    }

    #[test]
    fn test_strip_disallowed() {
        assert_eq!(strip_disallowed("新 상품\u{200B} 출시 ですね!  🎉"), "상품 출시 ! 🎉");
        assert_eq!(strip_disallowed("line\nbreak\ttab"), "line break tab");
    }

    #[test]
    fn test_joined_emoji_survive() {
        assert_eq!(strip_disallowed("가족 👨\u{200D}👩\u{200D}👧 여행"), "가족 👨\u{200D}👩\u{200D}👧 여행");
        assert_eq!(strip_disallowed("❤\u{FE0F}\u{200D}🔥 특가"), "❤\u{FE0F}\u{200D}🔥 특가");
        assert_eq!(strip_disallowed("가\u{200D}나 a\u{200D}🔥"), "가나 a🔥");
    }

    #[test]
    fn test_empty_body_has_no_dangling_space() {
        assert_eq!(apply_compliance("  "), "(광고)\n*수신거부:설정>변경");
        assert_eq!(apply_compliance(&apply_compliance("")), "(광고)\n*수신거부:설정>변경");
    }

    #[test]
    fn test_truncate_respects_budget() {
        assert_eq!(truncate_chars("가나다", 3), "가나다");
        assert_eq!(truncate_chars("가나다라", 3), "가나…");
        assert_eq!(truncate_chars("ab  cd", 4), "ab…");
        assert_eq!(truncate_chars("abc", 0), "");

        let long = "가".repeat(100);
        for max in [1, 22, 60] {
            assert!(truncate_chars(&long, max).chars().count() <= max);
        }
    }

    #[test]
    fn test_budgets_hold_after_processing() {
        let raw = format!("a|b|c|d|{}|{}", "제".repeat(40), "본".repeat(200));
        let limits = TextLimits {
            title_max_chars: 22,
            body_max_chars: 60,
        };
        let rows = post_process(&raw, limits).unwrap();
        assert!(rows[0].title.chars().count() <= 22);
        assert!(strip_compliance(&rows[0].body).chars().count() <= 60);
    }

    #[test]
    fn test_compliance_applied_once() {
        let once = apply_compliance("할인 중!");
        assert_eq!(once, "(광고) 할인 중!\n*수신거부:설정>변경");
        assert_eq!(apply_compliance(&once), once);

        let rows = post_process("a|b|c|d|t|(광고) 이미 붙음 *수신거부:설정>변경", TextLimits::default())
            .unwrap();
        assert_eq!(rows[0].body.matches(AD_PREFIX).count(), 1);
        assert_eq!(rows[0].body.matches(OPT_OUT_SUFFIX).count(), 1);
    }

    #[test]
    fn test_no_rows_is_malformed() {
        assert!(matches!(
            post_process("Sorry, I cannot help with that.", TextLimits::default()),
            Err(AppError::MalformedOutput(_))
        ));
        assert!(matches!(
            post_process("대분류|캠페인|상세타겟|추천 콘텐츠|제목|내용", TextLimits::default()),
            Err(AppError::MalformedOutput(_))
        ));
    }
}
