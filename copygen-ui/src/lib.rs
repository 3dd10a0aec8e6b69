pub mod components;
pub mod pages;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use pages::HomePage;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="마케팅 카피 생성기"/>
        <Meta name="description" content="시트 레퍼런스와 최신 뉴스로 푸시 마케팅 카피를 만듭니다"/>
        <Stylesheet id="leptos" href="/pkg/copygen.css"/>

        <Router>
            <main class="container">
                <Routes fallback=|| "페이지를 찾을 수 없습니다">
                    <Route path=path!("/") view=HomePage/>
                </Routes>
            </main>
        </Router>
    }
}

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
