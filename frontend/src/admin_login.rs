use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;
use crate::{api, storage, styles::*, Route};

#[function_component(AdminLogin)]
pub fn admin_login() -> Html {
    let secret = use_state(String::new);
    let error = use_state(|| None::<String>);
    let submitting = use_state(|| false);
    let navigator = use_navigator();

    {
        let navigator = navigator.clone();
        use_effect_with_deps(move |_| {
            if storage::admin_token().is_some() {
                if let Some(navigator) = navigator {
                    navigator.replace(&Route::Admin);
                }
            }
            || ()
        }, ());
    }

    let oninput = {
        let secret = secret.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            secret.set(input.value());
        })
    };

    let onsubmit = {
        let secret = secret.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting || secret.trim().is_empty() {
                return;
            }
            submitting.set(true);

            let candidate = (*secret).clone();
            let secret = secret.clone();
            let error = error.clone();
            let submitting = submitting.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::admin_login(candidate).await {
                    Ok(session) => {
                        storage::store_admin_token(&session.token);
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Admin);
                        }
                    }
                    Err(e) => {
                        error.set(Some(e));
                        secret.set(String::new());
                        submitting.set(false);
                    }
                }
            });
        })
    };

    html! {
        <div class={PAGE_NARROW}>
            <div class={DIALOG}>
                <h1 class={TITLE}>{"Admin Sign In"}</h1>
                {if let Some(error) = &*error {
                    html! { <div class={alert(Tone::Error)}>{error}</div> }
                } else { html! {} }}
                <form {onsubmit} class={STACK_LG}>
                    <div class={FIELD}>
                        <label class={LABEL}>{"Admin secret"}</label>
                        <input type="password" class={INPUT} value={(*secret).clone()}
                            autocomplete="current-password" {oninput} />
                    </div>
                    <button type="submit" class={combine_classes(&button(ButtonKind::Primary), "w-full py-3 mt-8")}
                        disabled={*submitting || secret.trim().is_empty()}>
                        {if *submitting { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
