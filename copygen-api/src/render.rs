use copygen_app::domain::{CopyPlan, COPY_COLUMNS};
use copygen_app::infrastructure::export::{csv_data_uri, download_file_name};

const FAVICON: &str = "data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>📣</text></svg>";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a cell and keeps its line breaks visible.
fn render_cell(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

/// Full result page: the copy table plus a download link carrying the CSV
/// inline, so the download needs no second request.
pub fn render_result_page(plan: &CopyPlan, csv: &[u8]) -> String {
    let header: String = COPY_COLUMNS
        .iter()
        .map(|column| format!("<th>{}</th>", escape_html(column)))
        .collect();

    let body: String = plan
        .rows
        .iter()
        .map(|row| {
            let cells: String = row
                .cells()
                .iter()
                .map(|cell| format!("<td>{}</td>", render_cell(cell)))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();

    let topic = escape_html(&plan.topic);

    format!(r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>생성 결과: {topic}</title>
    <link rel="icon" href="{FAVICON}">
    <style>{CSS}</style>
    <script>history.replaceState(null, '', '/');</script>
</head>
<body>
    <main class="container container--wide">
        <div class="result">
            <h2 class="result__title">생성 결과: {topic}</h2>
            <p class="result__meta">모델 {model} · {generated_at} · {count}건</p>
            <div class="result__scroll">
                <table class="result__table">
                    <thead><tr>{header}</tr></thead>
                    <tbody>{body}</tbody>
                </table>
            </div>
            <div class="result__actions">
                <a href="{data_uri}" download="{file_name}" class="result__button result__button--primary">CSV 다운로드</a>
                <a href="/" class="result__button">다시 만들기</a>
            </div>
        </div>
    </main>
</body>
</html>"#,
        topic = topic,
        FAVICON = FAVICON,
        CSS = CSS,
        model = escape_html(&plan.model),
        generated_at = plan.generated_at.format("%Y-%m-%d %H:%M UTC"),
        count = plan.rows.len(),
        header = header,
        body = body,
        data_uri = csv_data_uri(csv),
        file_name = escape_html(&download_file_name(&plan.topic)),
    )
}

pub fn render_error_page(message: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>오류 - 마케팅 카피 생성기</title>
    <link rel="icon" href="{FAVICON}">
    <style>{CSS}</style>
</head>
<body>
    <main class="container">
        <div class="error">
            <p class="error__title">생성에 실패했습니다</p>
            <p class="error__message">{message}</p>
            <a href="/" class="error__retry">다시 시도</a>
        </div>
    </main>
</body>
</html>"#, FAVICON = FAVICON, message = escape_html(message), CSS = CSS)
}

pub const CSS: &str = r#"
:root {
    --base: #faf4ed;
    --surface: #fffaf3;
    --overlay: #f2e9e1;
    --muted: #9893a5;
    --subtle: #797593;
    --text: #575279;
    --love: #b4637a;
    --gold: #ea9d34;
    --pine: #286983;
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
    font-family: 'Pretendard', 'Noto Sans KR', -apple-system, sans-serif;
    background: var(--base);
    color: var(--text);
    min-height: 100vh;
}
.container { max-width: 800px; margin: 0 auto; padding: 1.5rem; }
.container--wide { max-width: 1200px; }
.hero { text-align: center; padding: 3rem 0 2rem; }
.hero__title { font-size: clamp(2rem, 5vw, 2.75rem); color: var(--pine); font-weight: 800; margin-bottom: 0.75rem; }
.hero__subtitle { color: var(--subtle); font-size: 1.05rem; max-width: 520px; margin: 0 auto; }
.hint { color: var(--muted); font-size: 0.9rem; text-align: center; }
.copy-form { display: flex; flex-direction: column; gap: 1rem; margin: 2rem 0; }
.copy-form__field { display: flex; flex-direction: column; gap: 0.35rem; }
.copy-form__label { font-weight: 600; font-size: 0.95rem; }
.copy-form__required { color: var(--love); }
.copy-form__input {
    padding: 0.85rem 1rem; border: 2px solid var(--overlay); border-radius: 8px;
    background: var(--surface); color: var(--text); font-size: 1rem; font-family: inherit;
}
.copy-form__input:focus { outline: none; border-color: var(--pine); }
.copy-form__input::placeholder { color: var(--muted); }
.copy-form__advanced { display: flex; flex-direction: column; gap: 0.75rem; }
.copy-form__advanced summary { cursor: pointer; color: var(--subtle); margin-bottom: 0.75rem; }
.copy-form__button {
    padding: 1rem 2rem; background: var(--pine); color: var(--base);
    border: none; border-radius: 8px; font-size: 1rem; font-weight: 600; cursor: pointer;
}
.copy-form__button:hover { opacity: 0.9; }
.copy-form__button:disabled { background: var(--muted); cursor: wait; }
.result {
    background: var(--surface); border: 2px solid var(--overlay);
    border-radius: 12px; padding: 1.5rem; margin: 2rem 0;
}
.result__title { color: var(--pine); font-size: 1.4rem; margin-bottom: 0.5rem; }
.result__meta { color: var(--muted); font-size: 0.9rem; margin-bottom: 1rem; }
.result__scroll { overflow-x: auto; }
.result__table { width: 100%; border-collapse: collapse; font-size: 0.95rem; }
.result__table th, .result__table td { border: 1px solid var(--overlay); padding: 0.5rem 0.75rem; text-align: left; vertical-align: top; }
.result__table th { background: var(--overlay); white-space: nowrap; }
.result__actions { display: flex; gap: 0.75rem; margin-top: 1.5rem; padding-top: 1rem; border-top: 2px solid var(--overlay); }
.result__button { padding: 0.75rem 1.5rem; border: 2px solid var(--pine); color: var(--pine); border-radius: 8px; font-weight: 600; text-decoration: none; }
.result__button--primary { background: var(--pine); color: var(--base); }
.error { background: #fce8ec; border: 2px solid var(--love); border-radius: 8px; padding: 1.25rem; margin: 2rem 0; }
.error__title { color: var(--love); font-weight: 700; margin-bottom: 0.5rem; }
.error__message { color: #8b3d4d; }
.error__retry { display: inline-block; margin-top: 1rem; padding: 0.5rem 1rem; background: var(--love); color: var(--base); border-radius: 4px; text-decoration: none; }
"#;
