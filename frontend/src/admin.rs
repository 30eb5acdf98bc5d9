use yew::prelude::*;
use yew_router::prelude::*;
use shared::results::summarize;
use shared::{Party, ResetSummary};
use uuid::Uuid;
use web_sys::window;
use crate::party_card::party_badge;
use crate::party_form::PartyForm;
use crate::results::render_summary;
use crate::{api, storage, styles::*, Route};

fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub enum Msg {
    SessionChecked(Result<(), String>),
    Refresh,
    PartiesLoaded(Result<Vec<Party>, String>),
    Saved(Party),
    Edit(Party),
    CancelEdit,
    Delete(Party),
    Deleted(Result<Party, String>),
    Reset(Party),
    ResetDone(Result<Party, String>),
    ResetAll,
    ResetAllDone(Result<ResetSummary, String>),
    Logout,
}

/// Party management for a signed-in admin. Every call carries the session
/// token; a rejected token sends the admin back to the sign-in page.
pub struct AdminPanel {
    token: Option<String>,
    verified: bool,
    parties: Vec<Party>,
    editing: Option<Party>,
    notice: Option<String>,
    error: Option<String>,
    busy: bool,
}

impl Component for AdminPanel {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let token = storage::admin_token();
        match token.clone() {
            Some(token) => ctx.link().send_future(async move {
                Msg::SessionChecked(api::check_session(&token).await)
            }),
            None => Self::to_login(ctx),
        }

        Self {
            token,
            verified: false,
            parties: Vec::new(),
            editing: None,
            notice: None,
            error: None,
            busy: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SessionChecked(Ok(())) => {
                self.verified = true;
                ctx.link().send_message(Msg::Refresh);
                true
            }
            Msg::SessionChecked(Err(_)) => {
                storage::clear_admin_token();
                Self::to_login(ctx);
                false
            }
            Msg::Refresh => {
                ctx.link().send_future(async {
                    Msg::PartiesLoaded(api::fetch_parties_by_votes().await)
                });
                false
            }
            Msg::PartiesLoaded(result) => {
                match result {
                    Ok(parties) => self.parties = parties,
                    Err(e) => self.fail(ctx, e),
                }
                true
            }
            Msg::Saved(party) => {
                self.notice = Some(format!("Saved {}", party.name));
                self.error = None;
                self.editing = None;
                ctx.link().send_message(Msg::Refresh);
                true
            }
            Msg::Edit(party) => {
                self.editing = Some(party);
                true
            }
            Msg::CancelEdit => {
                self.editing = None;
                true
            }
            Msg::Delete(party) => {
                if !confirm(&format!("Delete {} and its {} votes?", party.name, party.votes)) {
                    return false;
                }
                self.run(ctx, move |token| async move {
                    Msg::Deleted(api::delete_party(&token, party.id).await)
                })
            }
            Msg::Deleted(result) => self.finish(ctx, result.map(|p| format!("Deleted {}", p.name))),
            Msg::Reset(party) => {
                if !confirm(&format!("Reset the votes of {}?", party.name)) {
                    return false;
                }
                self.run(ctx, move |token| async move {
                    Msg::ResetDone(api::reset_party(&token, party.id).await)
                })
            }
            Msg::ResetDone(result) => self.finish(ctx, result.map(|p| format!("Votes reset for {}", p.name))),
            Msg::ResetAll => {
                if !confirm("Reset the votes of every party? This cannot be undone.") {
                    return false;
                }
                self.run(ctx, |token| async move {
                    Msg::ResetAllDone(api::reset_all(&token).await)
                })
            }
            Msg::ResetAllDone(result) => {
                self.finish(ctx, result.map(|s| format!("Votes reset for {} parties", s.parties_reset)))
            }
            Msg::Logout => {
                if let Some(token) = self.token.take() {
                    wasm_bindgen_futures::spawn_local(async move {
                        let _ = api::admin_logout(&token).await;
                    });
                }
                storage::clear_admin_token();
                Self::to_login(ctx);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(token) = self.token.clone().filter(|_| self.verified) else {
            return html! {
                <div class={LOADING}>{"Checking session..."}</div>
            };
        };

        let editing_id = self.editing.as_ref().map(|p| p.id);

        html! {
            <div class={PAGE}>
                <div class={combine_classes(ROW, "mb-6")}>
                    <h1 class={combine_classes(TITLE, "mb-0")}>{"Admin Panel"}</h1>
                    <button type="button" onclick={ctx.link().callback(|_| Msg::Logout)}
                        class={button(ButtonKind::Secondary)}>
                        {"Sign Out"}
                    </button>
                </div>

                {if let Some(notice) = &self.notice {
                    html! { <div class={alert(Tone::Success)}>{notice}</div> }
                } else { html! {} }}
                {if let Some(error) = &self.error {
                    html! { <div class={alert(Tone::Error)}>{error}</div> }
                } else { html! {} }}

                <div class={STACK_LG}>
                    <PartyForm
                        token={token}
                        editing={self.editing.clone()}
                        on_saved={ctx.link().callback(Msg::Saved)}
                        on_cancel={ctx.link().callback(|_| Msg::CancelEdit)}
                    />

                    <div class={PANEL}>
                        <div class={combine_classes(ROW, "mb-4")}>
                            <h2 class={combine_classes(SECTION_TITLE, "mb-0")}>{"Parties"}</h2>
                            <button type="button" disabled={self.busy || self.parties.is_empty()}
                                onclick={ctx.link().callback(|_| Msg::ResetAll)}
                                class={button(ButtonKind::Danger)}>
                                {"Reset All Votes"}
                            </button>
                        </div>
                        {if self.parties.is_empty() {
                            html! { <p class={MUTED}>{"No parties yet. Add one above."}</p> }
                        } else {
                            html! {
                                <div class={STACK}>
                                    {for self.parties.iter().map(|party| self.render_row(ctx, party, editing_id))}
                                </div>
                            }
                        }}
                    </div>

                    <div class={PANEL}>
                        <h2 class={SECTION_TITLE}>{"Results"}</h2>
                        {render_summary(&summarize(&self.parties))}
                    </div>
                </div>
            </div>
        }
    }
}

impl AdminPanel {
    fn to_login(ctx: &Context<Self>) {
        if let Some(navigator) = ctx.link().navigator() {
            navigator.replace(&Route::AdminLogin);
        }
    }

    fn fail(&mut self, ctx: &Context<Self>, error: String) {
        if storage::admin_token().is_none() {
            Self::to_login(ctx);
        }
        self.notice = None;
        self.error = Some(error);
    }

    fn run<F, Fut>(&mut self, ctx: &Context<Self>, call: F) -> bool
    where
        F: FnOnce(String) -> Fut,
        Fut: std::future::Future<Output = Msg> + 'static,
    {
        let Some(token) = self.token.clone() else {
            return false;
        };
        self.busy = true;
        ctx.link().send_future(call(token));
        true
    }

    fn finish(&mut self, ctx: &Context<Self>, result: Result<String, String>) -> bool {
        self.busy = false;
        match result {
            Ok(notice) => {
                self.notice = Some(notice);
                self.error = None;
                ctx.link().send_message(Msg::Refresh);
            }
            Err(e) => self.fail(ctx, e),
        }
        true
    }

    fn render_row(&self, ctx: &Context<Self>, party: &Party, editing_id: Option<Uuid>) -> Html {
        let on_edit = {
            let party = party.clone();
            ctx.link().callback(move |_| Msg::Edit(party.clone()))
        };
        let on_reset = {
            let party = party.clone();
            ctx.link().callback(move |_| Msg::Reset(party.clone()))
        };
        let on_delete = {
            let party = party.clone();
            ctx.link().callback(move |_| Msg::Delete(party.clone()))
        };

        html! {
            <div key={party.id.to_string()} class={classes!(
                "flex", "items-center", "gap-4", "p-3", "rounded-lg", "bg-gray-900",
                (editing_id == Some(party.id)).then_some("ring-2 ring-blue-500")
            )}>
                {party_badge(party, "w-10 h-10")}
                <div class="flex-1 min-w-0">
                    <p class="text-gray-100 font-semibold break-words">{&party.name}</p>
                    <p class={MUTED}>{format!("{} votes", party.votes)}</p>
                </div>
                <div class="flex gap-2">
                    <button type="button" disabled={self.busy} onclick={on_edit}
                        class={button(ButtonKind::Primary)}>{"Edit"}</button>
                    <button type="button" disabled={self.busy} onclick={on_reset}
                        class={button(ButtonKind::Warning)}>{"Reset"}</button>
                    <button type="button" disabled={self.busy} onclick={on_delete}
                        class={button(ButtonKind::Danger)}>{"Delete"}</button>
                </div>
            </div>
        }
    }
}
