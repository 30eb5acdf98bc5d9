use yew::prelude::*;
use yew_router::prelude::*;
use shared::COOLDOWN_SECONDS;
use crate::{Route, styles::*};

#[function_component]
pub fn Home() -> Html {
    html! {
        <div class={PAGE}>
            <h1 class={TITLE}>{"Student Council Election"}</h1>

            <div class="space-y-8 max-w-3xl mx-auto">
                <div class="bg-gray-800 p-6 rounded-lg shadow-lg">
                    <p class="text-gray-300">
                        {"Choose the party you want to represent your school this year. Every party
                        made its case with a slogan and a short program, so read through them before
                        you pick. Results update live while the vote is open."}
                    </p>
                </div>

                <div class="bg-gray-800 p-6 rounded-lg shadow-lg">
                    <h2 class="text-xl font-semibold mb-4 text-white">{"How to Vote"}</h2>
                    <ul class="list-disc pl-6 space-y-3 text-gray-300">
                        <li>{"Open the voting booth and tap the party you support"}</li>
                        <li>{"Check your choice and confirm it, or cancel to pick again"}</li>
                        <li>{"Your vote counts as soon as the confirmation appears"}</li>
                        <li>{format!("After voting, this device waits {} seconds before it can vote again", COOLDOWN_SECONDS)}</li>
                    </ul>
                </div>

                <div class="bg-gray-800 p-6 rounded-lg shadow-lg">
                    <h2 class="text-xl font-semibold mb-4 text-white">{"Get Started"}</h2>
                    <div class="flex flex-col sm:flex-row gap-4 justify-center">
                        <Link<Route> to={Route::Vote}
                            classes="bg-blue-600 hover:bg-blue-700 text-white px-8 py-3 rounded-lg text-lg font-semibold text-center transition-colors">
                            {"Vote Now"}
                        </Link<Route>>
                        <Link<Route> to={Route::Results}
                            classes="bg-green-600 hover:bg-green-700 text-white px-8 py-3 rounded-lg text-lg font-semibold text-center transition-colors">
                            {"See Results"}
                        </Link<Route>>
                    </div>
                </div>
            </div>
        </div>
    }
}
