use crate::domain::CopyRequest;
use copygen_errors::AppError;

const MAX_TOPIC_CHARS: usize = 100;
const MAX_FIELD_CHARS: usize = 200;
const MAX_CONTEXT_CHARS: usize = 4000;

const BLOCKED_KEYWORDS: &[&str] = &[
    "ignore previous",
    "ignore all",
    "disregard",
    "forget your",
    "new instructions",
    "system prompt",
    "you are now",
    "pretend to be",
    "jailbreak",
    "developer mode",
    "이전 지시",
    "지시를 무시",
    "지시사항을 무시",
    "시스템 프롬프트",
    "새로운 지시",
];

pub struct InputSanitizer;

impl InputSanitizer {
    /// Trims every field and rejects requests that cannot be used to build a prompt.
    pub fn validate_request(request: CopyRequest) -> Result<CopyRequest, AppError> {
        let topic = request.topic.trim().to_string();
        if topic.is_empty() {
            return Err(AppError::InvalidInput("주제를 입력해주세요.".to_string()));
        }
        if topic.chars().count() > MAX_TOPIC_CHARS {
            return Err(AppError::InvalidInput(format!(
                "주제는 {}자 이내로 입력해주세요.",
                MAX_TOPIC_CHARS
            )));
        }

        let mut fields = Vec::with_capacity(3);
        for (label, value) in [
            ("캠페인", &request.campaign),
            ("타겟", &request.target),
            ("요청사항", &request.note),
        ] {
            let value = value.trim().to_string();
            if value.chars().count() > MAX_FIELD_CHARS {
                return Err(AppError::InvalidInput(format!(
                    "{}은(는) {}자 이내로 입력해주세요.",
                    label, MAX_FIELD_CHARS
                )));
            }
            fields.push(value);
        }

        if std::iter::once(&topic)
            .chain(fields.iter())
            .any(|v| Self::contains_injection_attempt(v))
        {
            tracing::warn!("Potential prompt injection detected in request for {}", topic);
            return Err(AppError::InvalidInput(
                "허용되지 않는 문구가 포함되어 있습니다.".to_string(),
            ));
        }

        let sheet_id = request
            .sheet_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(id) = &sheet_id {
            let valid = id.len() <= 128
                && id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(AppError::InvalidInput("시트 ID 형식이 올바르지 않습니다.".to_string()));
            }
        }

        let sheet_gid = request
            .sheet_gid
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(gid) = &sheet_gid {
            if gid.len() > 20 || !gid.chars().all(|c| c.is_ascii_digit()) {
                return Err(AppError::InvalidInput("시트 GID는 숫자여야 합니다.".to_string()));
            }
        }

        let [campaign, target, note]: [String; 3] = fields
            .try_into()
            .map_err(|_| AppError::Internal("field count mismatch".to_string()))?;

        Ok(CopyRequest {
            topic,
            campaign,
            target,
            note,
            sheet_id,
            sheet_gid,
        })
    }

    /// Filters instructions out of fetched text before it reaches the prompt.
    pub fn sanitize_context(content: &str) -> String {
        Self::filter_context(content)
            .chars()
            .take(MAX_CONTEXT_CHARS)
            .collect()
    }

    /// Like `sanitize_context`, but for a Markdown table whose newest rows
    /// sit at the bottom: the header and separator lines stay, and data rows
    /// are dropped from the top until the table fits.
    pub fn sanitize_table(table: &str) -> String {
        let filtered = Self::filter_context(table);
        if filtered.chars().count() <= MAX_CONTEXT_CHARS {
            return filtered;
        }

        let lines: Vec<&str> = filtered.lines().collect();
        let (head, rows) = lines.split_at(lines.len().min(2));
        let mut budget = head
            .iter()
            .map(|line| line.chars().count() + 1)
            .fold(MAX_CONTEXT_CHARS, usize::saturating_sub);

        let mut tail: Vec<&str> = Vec::new();
        for row in rows.iter().rev() {
            let len = row.chars().count() + 1;
            if len > budget {
                break;
            }
            budget -= len;
            tail.push(*row);
        }
        tail.reverse();

        tracing::debug!(
            "Sheet table trimmed to its last {} of {} rows",
            tail.len(),
            rows.len()
        );

        head.iter()
            .chain(tail.iter())
            .copied()
            .collect::<Vec<_>>()
            .join("\n")
            .chars()
            .take(MAX_CONTEXT_CHARS)
            .collect()
    }

    fn filter_context(content: &str) -> String {
        let mut sanitized = content.to_string();

        for keyword in BLOCKED_KEYWORDS {
            let Ok(re) = regex_lite::Regex::new(&format!("(?i){}", regex_lite::escape(keyword)))
            else {
                continue;
            };
            sanitized = re.replace_all(&sanitized, "[FILTERED]").to_string();
        }

        sanitized
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect()
    }

    fn contains_injection_attempt(input: &str) -> bool {
        let lower = input.to_lowercase();
        BLOCKED_KEYWORDS.iter().any(|kw| lower.contains(kw))
    }
}
