use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;
use shared::{
    validate_party_draft, Party, PartyDraft, MAX_DESCRIPTION_LENGTH, MAX_LOGO_URL_LENGTH,
    MAX_NAME_LENGTH, MAX_SLOGAN_LENGTH, PARTY_SYMBOLS,
};
use crate::{api, party_card::symbol_icon, styles::*};

#[derive(Clone, Copy, PartialEq)]
pub enum Field {
    Name,
    Color,
    Symbol,
    Slogan,
    Description,
    LogoUrl,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub token: String,
    #[prop_or_default]
    pub editing: Option<Party>,
    pub on_saved: Callback<Party>,
    pub on_cancel: Callback<()>,
}

pub enum Msg {
    UpdateField(Field, String),
    Submit,
    SubmitResult(Result<Party, String>),
}

pub struct PartyForm {
    draft: PartyDraft,
    error: Option<String>,
    submitting: bool,
}

impl Component for PartyForm {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            draft: ctx.props().editing.as_ref().map(PartyDraft::from_party).unwrap_or_default(),
            error: None,
            submitting: false,
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let editing = ctx.props().editing.as_ref().map(|p| p.id);
        if editing != old_props.editing.as_ref().map(|p| p.id) {
            *self = <PartyForm as Component>::create(ctx);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::UpdateField(field, value) => {
                match field {
                    Field::Name => self.draft.name = value,
                    Field::Color => self.draft.color = value,
                    Field::Symbol => self.draft.symbol = Some(value),
                    Field::Slogan => self.draft.slogan = Some(value),
                    Field::Description => self.draft.description = Some(value),
                    Field::LogoUrl => self.draft.logo_url = Some(value),
                }
                true
            },
            Msg::Submit => {
                if self.submitting {
                    return false;
                }
                let draft = self.draft.clone().normalized();
                if let Err(error) = validate_party_draft(&draft) {
                    self.error = Some(error.to_string());
                    return true;
                }

                self.submitting = true;
                self.error = None;
                let token = ctx.props().token.clone();
                let editing = ctx.props().editing.as_ref().map(|p| p.id);
                ctx.link().send_future(async move {
                    let result = match editing {
                        Some(id) => api::update_party(&token, id, &draft).await,
                        None => api::create_party(&token, &draft).await,
                    };
                    Msg::SubmitResult(result)
                });
                true
            },
            Msg::SubmitResult(result) => {
                self.submitting = false;
                match result {
                    Ok(party) => {
                        if ctx.props().editing.is_none() {
                            self.draft = PartyDraft::default();
                        }
                        ctx.props().on_saved.emit(party);
                    }
                    Err(error) => self.error = Some(error),
                }
                true
            },
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let editing = ctx.props().editing.is_some();
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });
        let oncancel = {
            let on_cancel = ctx.props().on_cancel.clone();
            Callback::from(move |_| on_cancel.emit(()))
        };

        html! {
            <form {onsubmit} class={combine_classes(PANEL, STACK_LG)}>
                <h2 class={SECTION_TITLE}>{if editing { "Edit Party" } else { "New Party" }}</h2>
                {if let Some(error) = &self.error {
                    html! { <div class={alert(Tone::Error)}>{error}</div> }
                } else { html! {} }}

                {self.render_input(ctx, Field::Name, "Name", &self.draft.name, MAX_NAME_LENGTH)}
                <div class="flex flex-col sm:flex-row gap-4">
                    {self.render_color(ctx)}
                    {self.render_symbol(ctx)}
                </div>
                {self.render_input(ctx, Field::Slogan, "Slogan", self.draft.slogan.as_deref().unwrap_or_default(), MAX_SLOGAN_LENGTH)}
                {self.render_textarea(ctx)}
                {self.render_input(ctx, Field::LogoUrl, "Logo URL", self.draft.logo_url.as_deref().unwrap_or_default(), MAX_LOGO_URL_LENGTH)}

                <div class="flex flex-col sm:flex-row gap-4">
                    <button type="submit" class={combine_classes(&button(ButtonKind::Primary), "flex-1 py-3")}
                        disabled={self.submitting}>
                        {match (self.submitting, editing) {
                            (true, _) => "Saving...",
                            (false, true) => "Save Changes",
                            (false, false) => "Add Party",
                        }}
                    </button>
                    {if editing {
                        html! {
                            <button type="button" onclick={oncancel}
                                class={combine_classes(&button(ButtonKind::Secondary), "flex-1 py-3")}>
                                {"Cancel"}
                            </button>
                        }
                    } else { html! {} }}
                </div>
            </form>
        }
    }
}

impl PartyForm {
    fn render_input(&self, ctx: &Context<Self>, field: Field, label: &str, value: &str, max_length: usize) -> Html {
        let oninput = ctx.link().callback(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::UpdateField(field, input.value())
        });

        html! {
            <div class={FIELD}>
                <label class={LABEL}>
                    {format!("{} ({}/{})", label, value.chars().count(), max_length)}
                </label>
                <input type="text" class={INPUT} value={value.to_string()}
                    maxlength={max_length.to_string()} {oninput}
                    placeholder={format!("Enter {}", label.to_lowercase())} />
            </div>
        }
    }

    fn render_textarea(&self, ctx: &Context<Self>) -> Html {
        let value = self.draft.description.clone().unwrap_or_default();
        let oninput = ctx.link().callback(|e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            Msg::UpdateField(Field::Description, input.value())
        });

        html! {
            <div class={FIELD}>
                <label class={LABEL}>
                    {format!("Description ({}/{})", value.chars().count(), MAX_DESCRIPTION_LENGTH)}
                </label>
                <textarea class={INPUT} rows="4"
                    value={value}
                    maxlength={MAX_DESCRIPTION_LENGTH.to_string()}
                    {oninput}
                    placeholder="What does the party stand for?"
                />
            </div>
        }
    }

    fn render_color(&self, ctx: &Context<Self>) -> Html {
        let oninput = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::UpdateField(Field::Color, input.value())
        });

        html! {
            <div class={FIELD}>
                <label class={LABEL}>{"Color"}</label>
                <div class="flex items-center gap-3">
                    // Color inputs only accept lower-case hex.
                    <input type="color" class="h-11 w-16 rounded-md bg-gray-800 border border-gray-600"
                        value={self.draft.color.to_lowercase()} {oninput} />
                    <span class="font-mono text-gray-300">{self.draft.color.to_uppercase()}</span>
                </div>
            </div>
        }
    }

    fn render_symbol(&self, ctx: &Context<Self>) -> Html {
        let current = self.draft.symbol.clone().unwrap_or_default();
        let onchange = ctx.link().callback(|e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            Msg::UpdateField(Field::Symbol, select.value())
        });

        html! {
            <div class={FIELD}>
                <label class={LABEL}>{"Symbol"}</label>
                <select class={INPUT} {onchange}>
                    <option value="" selected={current.is_empty()}>{"None"}</option>
                    {for PARTY_SYMBOLS.iter().map(|symbol| html! {
                        <option value={*symbol} selected={current == *symbol}>
                            {format!("{} {}", symbol_icon(symbol), symbol)}
                        </option>
                    })}
                </select>
            </div>
        }
    }
}
