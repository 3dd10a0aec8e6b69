use leptos::prelude::*;

/// Labelled text input. Multi-line fields render as a textarea.
#[component]
pub fn FormField(
    #[prop(into)] name: String,
    #[prop(into)] label: String,
    #[prop(into)] placeholder: String,
    #[prop(optional)] required: bool,
    #[prop(optional)] multiline: bool,
) -> impl IntoView {
    let input = if multiline {
        view! {
            <textarea
                id=name.clone()
                name=name.clone()
                class="copy-form__input copy-form__input--multiline"
                placeholder=placeholder
                rows="3"
            ></textarea>
        }
        .into_any()
    } else {
        view! {
            <input
                type="text"
                id=name.clone()
                name=name.clone()
                class="copy-form__input"
                placeholder=placeholder
                required=required
            />
        }
        .into_any()
    };

    view! {
        <label class="copy-form__field" for=name>
            <span class="copy-form__label">
                {label}
                {required.then(|| view! { <span class="copy-form__required">" *"</span> })}
            </span>
            {input}
        </label>
    }
}

/// Plain HTML form; the server answers `POST /generate` with a full result page.
#[component]
pub fn CopyForm(#[prop(into)] action: String) -> impl IntoView {
    view! {
        <form action=action method="post" class="copy-form">
            <FormField
                name="topic"
                label="주제 / 콘텐츠명"
                placeholder="예: 환승연애4"
                required=true
            />
            <FormField name="campaign" label="캠페인" placeholder="예: 런칭알림"/>
            <FormField name="target" label="타겟" placeholder="예: 30대 직장인"/>
            <FormField
                name="note"
                label="요청사항"
                placeholder="예: 이모지 많이, 궁금증 유발"
                multiline=true
            />

            <details class="copy-form__advanced">
                <summary>"레퍼런스 시트 지정"</summary>
                <FormField name="sheet_id" label="시트 ID" placeholder="비워두면 기본 시트 사용"/>
                <FormField name="sheet_gid" label="시트 GID" placeholder="0"/>
            </details>

            <button type="submit" class="copy-form__button">"카피 생성"</button>
        </form>
    }
}
