mod render;

use axum::{
    extract::{ConnectInfo, Query},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use copygen_app::config::Settings;
use copygen_app::domain::{CopyPlan, CopyRequest};
use copygen_app::infrastructure::export::{download_file_name, to_csv_bytes};
use copygen_app::AppContext;
use copygen_errors::AppError;
use copygen_ui::pages::GenerateCopyFn;
use copygen_ui::App;
use leptos::prelude::*;
use leptos_axum::{generate_route_list, handle_server_fns_with_context, LeptosRoutes};
use render::{render_error_page, render_result_page, CSS};
use serde::Deserialize;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;

#[derive(Deserialize)]
struct GenerateForm {
    #[serde(default)]
    topic: String,
    #[serde(default)]
    campaign: String,
    #[serde(default)]
    target: String,
    #[serde(default)]
    note: String,
    sheet_id: Option<String>,
    sheet_gid: Option<String>,
}

impl From<GenerateForm> for CopyRequest {
    fn from(form: GenerateForm) -> Self {
        CopyRequest::new(form.topic)
            .with_campaign(form.campaign)
            .with_target(form.target)
            .with_note(form.note)
            .with_sheet(form.sheet_id, form.sheet_gid)
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let conf = get_configuration(Some("Cargo.toml")).expect("Failed to load Leptos config");
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    let app_context = match AppContext::from_settings(&settings) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Using {:?} backend, model candidates: {}",
        settings.llm.provider,
        settings.llm.candidates.as_slice().join(", ")
    );

    let routes = generate_route_list(App);

    server_fn::axum::register_explicit::<GenerateCopyFn>();
    tracing::info!("Registered server function: GenerateCopyFn");

    let app = Router::new()
        .route("/generate", get({
            let ctx = app_context.clone();
            move |ConnectInfo(peer): ConnectInfo<SocketAddr>, query: Query<GenerateForm>| {
                let ctx = ctx.clone();
                async move {
                    handle_generate_form(ctx, peer, query.0).await
                }
            }
        }).post({
            let ctx = app_context.clone();
            move |ConnectInfo(peer): ConnectInfo<SocketAddr>, form: Form<GenerateForm>| {
                let ctx = ctx.clone();
                async move {
                    handle_generate_form(ctx, peer, form.0).await
                }
            }
        }))
        .route("/export", post(export_csv))
        .route("/api/{*fn_name}", post({
            let ctx = app_context.clone();
            move |req| {
                let ctx = ctx.clone();
                async move {
                    handle_server_fns_with_context(
                        move || provide_context(ctx.clone()),
                        req
                    ).await
                }
            }
        }))
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let ctx = app_context.clone();
                move || provide_context(ctx.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(leptos_options);

    tracing::info!("Listening on http://{}", addr);
    tracing::info!(
        "Security: Rate limit {}/min, {}/hour. Daily limit: {} requests, {} cents",
        settings.guard.per_minute,
        settings.guard.per_hour,
        app_context.cost_tracker.get_remaining_requests(),
        settings.guard.daily_cost_cents
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}

async fn handle_generate_form(ctx: AppContext, peer: SocketAddr, form: GenerateForm) -> Response {
    let plan = match ctx.generate(peer.ip(), form.into()).await {
        Ok(plan) => plan,
        Err(e) => return error_page(e),
    };

    match to_csv_bytes(&plan) {
        Ok(csv) => Html(render_result_page(&plan, &csv)).into_response(),
        Err(e) => error_page(e),
    }
}

fn error_page(error: AppError) -> Response {
    tracing::warn!("Generation request failed: {}", error);
    (error.status_code(), Html(render_error_page(&error.user_message()))).into_response()
}

/// Re-exports an already generated plan, e.g. one returned by the server function.
async fn export_csv(Json(plan): Json<CopyPlan>) -> Result<Response, AppError> {
    let csv = to_csv_bytes(&plan)?;
    let file_name = download_file_name(&plan.topic);
    let disposition = format!(
        "attachment; filename=\"copy_plan.csv\"; filename*=UTF-8''{}",
        urlencoding::encode(&file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

fn shell(_options: LeptosOptions) -> impl IntoView {
    use leptos::prelude::*;
    use leptos_meta::*;

    let submit_script = r#"
        document.addEventListener('DOMContentLoaded', function() {
            const form = document.querySelector('.copy-form');
            const topic = document.querySelector('#topic');
            const button = document.querySelector('.copy-form__button');

            function updateButton() {
                button.disabled = topic.value.trim().length === 0;
            }

            form.addEventListener('submit', function() {
                button.disabled = true;
                button.textContent = '생성 중... (최대 1분)';
            });

            topic.addEventListener('input', updateButton);
            updateButton();
        });
    "#;

    view! {
        <!DOCTYPE html>
        <html lang="ko">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>"마케팅 카피 생성기"</title>
                <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>📣</text></svg>"/>
                <style>{CSS}</style>
                <MetaTags/>
            </head>
            <body>
                <App/>
                <script>{submit_script}</script>
            </body>
        </html>
    }
}
