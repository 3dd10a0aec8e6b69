use crate::components::CopyForm;
use copygen_app::domain::CopyPlan;
use leptos::prelude::*;
use server_fn::ServerFnError;

#[server(GenerateCopyFn, "/api", endpoint = "generate_copy")]
pub async fn generate_copy(
    topic: String,
    campaign: Option<String>,
    target: Option<String>,
    note: Option<String>,
    sheet_id: Option<String>,
    sheet_gid: Option<String>,
) -> Result<CopyPlan, ServerFnError> {
    use axum::extract::ConnectInfo;
    use copygen_app::domain::CopyRequest;
    use copygen_app::AppContext;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    let ctx = expect_context::<AppContext>();

    let client_ip = leptos_axum::extract::<ConnectInfo<SocketAddr>>()
        .await
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    let request = CopyRequest::new(topic)
        .with_campaign(campaign.unwrap_or_default())
        .with_target(target.unwrap_or_default())
        .with_note(note.unwrap_or_default())
        .with_sheet(sheet_id, sheet_gid);

    ctx.generate(client_ip, request).await.map_err(|e| {
        tracing::warn!("generate_copy failed: {}", e);
        ServerFnError::new(e.user_message())
    })
}

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="hero">
            <h1 class="hero__title">"마케팅 카피 생성기"</h1>
            <p class="hero__subtitle">
                "레퍼런스 시트와 최신 뉴스를 참고해 푸시 알림용 제목과 내용을 만들어 드립니다"
            </p>
        </div>

        <CopyForm action="/generate"/>

        <p class="hint">
            "생성된 문구에는 (광고) 표기와 수신거부 안내가 자동으로 붙습니다. 결과는 CSV로 내려받을 수 있습니다."
        </p>
    }
}
