use yew::prelude::*;
use shared::Party;
use crate::styles::*;

pub fn symbol_icon(symbol: &str) -> &'static str {
    match symbol {
        "sol" => "☀️",
        "agua" => "💧",
        "tierra" => "🌱",
        "aire" => "🌬️",
        "fuego" => "🔥",
        "estrella" => "⭐",
        _ => "🏳️",
    }
}

/// Logo, or the party's initial on its color when there is none.
pub fn party_badge(party: &Party, size: &str) -> Html {
    match &party.logo_url {
        Some(url) => html! {
            <img src={url.clone()} alt={party.name.clone()}
                class={combine_classes(size, "rounded-full object-cover border-2 border-gray-600")} />
        },
        None => html! {
            <div class={combine_classes(size, "rounded-full flex items-center justify-center text-2xl font-bold text-white shadow-md")}
                style={format!("background-color: {}", party.color)}>
                {party.initial()}
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub party: Party,
    pub selected: bool,
    pub disabled: bool,
    pub onselect: Callback<Party>,
}

#[function_component(PartyCard)]
pub fn party_card(props: &Props) -> Html {
    let onclick = {
        let party = props.party.clone();
        let onselect = props.onselect.clone();
        Callback::from(move |_| onselect.emit(party.clone()))
    };
    let party = &props.party;

    html! {
        <button
            type="button"
            disabled={props.disabled}
            onclick={onclick}
            class={classes!(
                PARTY_TILE,
                "disabled:opacity-60", "disabled:cursor-not-allowed", "disabled:hover:translate-y-0",
                props.selected.then_some("ring-4 ring-blue-500")
            )}
            style={format!("border-top-color: {}", party.color)}
        >
            <div class="flex items-center gap-4 mb-3">
                {party_badge(party, "w-16 h-16")}
                <div class="min-w-0">
                    <h2 class={PARTY_NAME}>{&party.name}</h2>
                    {if let Some(symbol) = &party.symbol {
                        html! { <span class={MUTED}>{symbol_icon(symbol)}{" "}{symbol}</span> }
                    } else { html! {} }}
                </div>
            </div>
            {if let Some(slogan) = &party.slogan {
                html! { <p class="italic text-gray-300 mb-2">{format!("\u{201c}{}\u{201d}", slogan)}</p> }
            } else { html! {} }}
            {if let Some(description) = &party.description {
                html! { <p class={MUTED}>{description}</p> }
            } else { html! {} }}
        </button>
    }
}
