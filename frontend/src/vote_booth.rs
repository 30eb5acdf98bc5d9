use yew::prelude::*;
use yew_router::prelude::*;
use gloo_timers::callback::{Interval, Timeout};
use shared::gate::GateChange;
use shared::{
    EligibilityGate, FlowState, GateState, Party, PartyDirectory, PendingVote, SubmissionFlow,
    VoteFailure, VoteMark,
};
use time::OffsetDateTime;
use crate::api::HttpDirectory;
use crate::config::CONFIG;
use crate::party_card::{party_badge, PartyCard};
use crate::storage::LocalStorageMark;
use crate::styles::*;
use crate::Route;

pub enum Msg {
    Load,
    Loaded(Result<Vec<Party>, VoteFailure>),
    Tick,
    Select(Party),
    Cancel,
    Confirm,
    Resolved(PendingVote, Result<Party, VoteFailure>),
    Finished,
}

pub struct VoteBooth {
    directory: HttpDirectory,
    parties: Option<Vec<Party>>,
    load_error: Option<String>,
    flow: SubmissionFlow,
    gate: EligibilityGate,
    mark: LocalStorageMark,
    _ticker: Interval,
    redirect: Option<Timeout>,
}

impl Component for VoteBooth {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mark = LocalStorageMark::default();
        let gate = EligibilityGate::new(mark.read(), OffsetDateTime::now_utc());

        let link = ctx.link().clone();
        let ticker = Interval::new(CONFIG.gate_tick_ms, move || link.send_message(Msg::Tick));
        ctx.link().send_message(Msg::Load);

        Self {
            directory: HttpDirectory,
            parties: None,
            load_error: None,
            flow: SubmissionFlow::new(),
            gate,
            mark,
            _ticker: ticker,
            redirect: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Load => {
                let directory = self.directory;
                ctx.link().send_future(async move {
                    Msg::Loaded(directory.list_parties().await)
                });
                false
            }
            Msg::Loaded(result) => {
                match result {
                    Ok(parties) => {
                        self.parties = Some(parties);
                        self.load_error = None;
                    }
                    Err(e) => self.load_error = Some(e.to_string()),
                }
                true
            }
            Msg::Tick => {
                let change = self.gate.refresh(self.mark.read(), OffsetDateTime::now_utc());
                change != GateChange::Unchanged || !self.gate.state().is_open()
            }
            Msg::Select(party) => self.flow.select_party(party).is_ok(),
            Msg::Cancel => self.flow.cancel().is_ok(),
            Msg::Confirm => {
                // Another tab may have voted since the last tick.
                self.gate.refresh(self.mark.read(), OffsetDateTime::now_utc());
                let Some(pending) = self.flow.confirm_vote(self.gate.state()) else {
                    return false;
                };
                let directory = self.directory;
                let party_id = pending.party_id();
                ctx.link().send_future(async move {
                    let outcome = directory.increment_vote(party_id).await;
                    Msg::Resolved(pending, outcome)
                });
                true
            }
            Msg::Resolved(pending, outcome) => {
                let now = OffsetDateTime::now_utc();
                if !self.flow.resolve(pending, outcome, &mut self.mark, now) {
                    return false;
                }
                self.gate.refresh(self.mark.read(), now);

                match self.flow.state() {
                    FlowState::Succeeded(updated) => {
                        if let Some(parties) = self.parties.as_mut() {
                            if let Some(party) = parties.iter_mut().find(|p| p.id == updated.id) {
                                *party = updated.clone();
                            }
                        }
                        let link = ctx.link().clone();
                        self.redirect = Some(Timeout::new(CONFIG.redirect_delay_ms, move || {
                            link.send_message(Msg::Finished);
                        }));
                    }
                    FlowState::Failed { reason: VoteFailure::NotFound, .. } => {
                        ctx.link().send_message(Msg::Load);
                    }
                    _ => {}
                }
                true
            }
            Msg::Finished => {
                self.redirect = None;
                self.flow.reset();
                if let Some(navigator) = ctx.link().navigator() {
                    navigator.push(&Route::Home);
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class={PAGE}>
                <h1 class={TITLE}>{"Cast Your Vote"}</h1>
                {self.render_gate()}
                {self.render_outcome()}
                {self.render_confirmation(ctx)}
                {self.render_parties(ctx)}
            </div>
        }
    }
}

impl VoteBooth {
    fn render_gate(&self) -> Html {
        let GateState::Closed { remaining_seconds } = self.gate.state() else {
            return html! {};
        };
        if matches!(self.flow.state(), FlowState::Succeeded(_)) {
            return html! {};
        }

        html! {
            <div class={combine_classes(PANEL, "mb-6 text-center")}>
                <p class="text-yellow-300 font-semibold mb-2">{"You voted a moment ago"}</p>
                <p class={combine_classes(MUTED, "mb-3")}>
                    {format!("You can vote again in {} seconds.", remaining_seconds)}
                </p>
                <div class={BAR_TRACK}>
                    <div class={combine_classes(BAR_FILL, "bg-yellow-400")}
                        style={format!("width: {}%", self.gate.state().cooldown_progress())}></div>
                </div>
            </div>
        }
    }

    fn render_outcome(&self) -> Html {
        match self.flow.state() {
            FlowState::Succeeded(party) => html! {
                <div class={SUCCESS_PANEL}>
                    <h3 class="text-xl font-semibold mb-2 text-green-400">{"Vote Recorded!"}</h3>
                    <p class="text-gray-300">
                        {format!("Thank you for voting for {}. It now has {} votes.", party.name, party.votes)}
                    </p>
                    <p class={combine_classes(MUTED, "mt-2 animate-pulse")}>{"Returning home..."}</p>
                </div>
            },
            FlowState::Failed { party, reason } => html! {
                <div class={alert(Tone::Error)}>
                    <p class="font-semibold">{format!("Your vote for {} did not go through.", party.name)}</p>
                    <p>{reason.to_string()}</p>
                    {if reason.is_ambiguous() {
                        html! { <p class="mt-2 text-sm">{"It may still have been counted. Check the results before voting again."}</p> }
                    } else { html! {} }}
                </div>
            },
            _ => html! {},
        }
    }

    fn render_confirmation(&self, ctx: &Context<Self>) -> Html {
        let (party, submitting) = match self.flow.state() {
            FlowState::PartySelected(party) => (party, false),
            FlowState::Submitting(party) => (party, true),
            _ => return html! {},
        };
        let can_confirm = self.flow.can_confirm(self.gate.state());

        html! {
            <div class={MODAL_BACKDROP}>
                <div class={DIALOG}>
                    <h2 class={SECTION_TITLE}>{"Confirm your vote"}</h2>
                    <div class="flex items-center gap-4 mb-6">
                        {party_badge(party, "w-16 h-16")}
                        <span class="text-xl text-gray-100 font-semibold">{&party.name}</span>
                    </div>
                    {if submitting {
                        html! {
                            <div class="flex justify-center">
                                <div class="animate-pulse text-blue-400">{"Submitting vote..."}</div>
                            </div>
                        }
                    } else {
                        html! {
                            <div class="flex flex-col sm:flex-row gap-4">
                                <button
                                    type="button"
                                    disabled={!can_confirm}
                                    onclick={ctx.link().callback(|_| Msg::Confirm)}
                                    class={combine_classes(&button(ButtonKind::Primary), "flex-1 py-3")}
                                >
                                    {if can_confirm { "Confirm Vote".to_string() }
                                     else { format!("Wait {}s", self.gate.state().remaining_seconds()) }}
                                </button>
                                <button
                                    type="button"
                                    onclick={ctx.link().callback(|_| Msg::Cancel)}
                                    class={combine_classes(&button(ButtonKind::Secondary), "flex-1 py-3")}
                                >
                                    {"Cancel"}
                                </button>
                            </div>
                        }
                    }}
                </div>
            </div>
        }
    }

    fn render_parties(&self, ctx: &Context<Self>) -> Html {
        if let Some(error) = &self.load_error {
            return html! {
                <div class={alert(Tone::Error)}>
                    <p>{error}</p>
                    <button type="button" class="underline mt-2" onclick={ctx.link().callback(|_| Msg::Load)}>
                        {"Try again"}
                    </button>
                </div>
            };
        }

        let Some(parties) = &self.parties else {
            return html! {
                <div class={LOADING}>{"Loading parties..."}</div>
            };
        };

        if parties.is_empty() {
            return html! {
                <p class={combine_classes(MUTED, "text-center")}>{"No parties are running yet."}</p>
            };
        }

        let locked = !matches!(self.flow.state(), FlowState::Idle | FlowState::Failed { .. });
        let selected = self.flow.target().map(|p| p.id);
        let onselect = ctx.link().callback(Msg::Select);

        html! {
            <div class="grid gap-4 md:grid-cols-2">
                {parties.iter().map(|party| html! {
                    <PartyCard
                        key={party.id.to_string()}
                        party={party.clone()}
                        selected={selected == Some(party.id)}
                        disabled={locked}
                        onselect={onselect.clone()}
                    />
                }).collect::<Html>()}
            </div>
        }
    }
}
