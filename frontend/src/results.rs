use std::rc::Rc;
use yew::prelude::*;
use gloo_timers::callback::Interval;
use shared::results::format_percentage;
use shared::ResultsSummary;
use time::OffsetDateTime;
use time::macros::format_description;
use crate::api;
use crate::config::CONFIG;
use crate::party_card::party_badge;
use crate::styles::*;

#[derive(Clone, Default)]
pub struct ResultsState {
    summary: Option<ResultsSummary>,
    error: Option<String>,
    last_fetch: Option<OffsetDateTime>,
}

impl Reducible for ResultsState {
    type Action = Msg;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            Msg::Received(summary) => {
                next.summary = Some(summary);
                next.error = None;
                next.last_fetch = Some(OffsetDateTime::now_utc());
            },
            Msg::Error(error) => {
                next.error = Some(error);
            },
        }
        Rc::new(next)
    }
}

pub enum Msg {
    Received(ResultsSummary),
    Error(String),
}

pub fn render_standings(summary: &ResultsSummary) -> Html {
    if summary.standings.is_empty() {
        return html! { <p class={combine_classes(MUTED, "text-center")}>{"No parties yet."}</p> };
    }

    html! {
        <div class={STACK}>
            {summary.standings.iter().map(|standing| {
                let party = &standing.party;
                html! {
                    <div key={party.id.to_string()} class={PANEL}>
                        <div class={combine_classes(ROW, "mb-2")}>
                            <div class="flex items-center gap-3 min-w-0">
                                {party_badge(party, "w-10 h-10")}
                                <span class="text-gray-100 font-semibold break-words">{&party.name}</span>
                            </div>
                            <span class="text-gray-300 font-mono whitespace-nowrap">
                                {format!("{} · {}", party.votes, format_percentage(standing.percentage))}
                            </span>
                        </div>
                        <div class={BAR_TRACK}>
                            <div class={BAR_FILL}
                                style={format!("width: {:.1}%; background-color: {}", standing.percentage, party.color)}></div>
                        </div>
                    </div>
                }
            }).collect::<Html>()}
        </div>
    }
}

pub fn render_summary(summary: &ResultsSummary) -> Html {
    html! {
        <>
            <div class={combine_classes(STATS_GRID, "mb-6")}>
                <div class={STAT_TOTAL}>
                    <p class={CAPTION}>{"Total votes"}</p>
                    <p class="text-3xl font-bold">{summary.total_votes}</p>
                </div>
                <div class={STAT_LEADER}>
                    <p class={CAPTION}>{"Leading"}</p>
                    <p class="text-2xl font-bold break-words">
                        {summary.leader.as_ref().map_or("No votes yet".to_string(), |p| p.name.clone())}
                    </p>
                </div>
            </div>
            {render_standings(summary)}
        </>
    }
}

#[function_component]
pub fn Results() -> Html {
    let state = use_reducer(ResultsState::default);

    use_effect_with_deps({
        let state = state.clone();
        move |_| {
            let fetch = move || {
                let state = state.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match api::fetch_results().await {
                        Ok(summary) => state.dispatch(Msg::Received(summary)),
                        Err(e) => state.dispatch(Msg::Error(e)),
                    }
                });
            };
            fetch();
            let interval = Interval::new(CONFIG.results_refresh_ms, fetch);

            move || drop(interval)
        }
    }, ());

    let updated = state.last_fetch
        .and_then(|at| at.format(format_description!("[hour]:[minute]:[second] UTC")).ok());

    html! {
        <div class={PAGE}>
            <h1 class={TITLE}>{"Live Results"}</h1>
            {if let Some(updated) = updated {
                html! { <p class={combine_classes(MUTED, "text-center mb-6")}>{"Updated "}{updated}</p> }
            } else { html! {} }}

            {if let Some(error) = &state.error {
                html! { <div class={alert(Tone::Error)}>{error}</div> }
            } else { html! {} }}

            {match &state.summary {
                Some(summary) => render_summary(summary),
                None if state.error.is_none() => html! {
                    <div class={LOADING}>{"Loading results..."}</div>
                },
                None => html! {},
            }}
        </div>
    }
}
