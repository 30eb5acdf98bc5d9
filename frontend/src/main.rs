use yew::prelude::*;
use yew_router::prelude::*;

mod admin;
mod admin_login;
mod api;
mod config;
mod home;
mod party_card;
mod party_form;
mod results;
mod storage;
mod styles;
mod vote_booth;

use crate::{
    admin::AdminPanel,
    admin_login::AdminLogin,
    home::Home,
    results::Results,
    vote_booth::VoteBooth,
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")] Home,
    #[at("/vote")] Vote,
    #[at("/results")] Results,
    #[at("/admin-login")] AdminLogin,
    #[at("/admin")] Admin,
    #[not_found]
    #[at("/404")] NotFound,
}

fn nav_link(to: Route, label: &'static str, current: &Option<Route>) -> Html {
    let active = current.as_ref() == Some(&to);
    html! {
        <Link<Route> to={to} classes={classes!(
            "text-base", "md:text-lg", "font-medium", "px-4", "py-2", "rounded-md",
            "transition-colors", "duration-200", "ease-in-out",
            "text-gray-200", "border", "border-transparent", "hover:border-blue-400", "hover:text-blue-400",
            active.then_some("text-blue-400 border-blue-400 ring-2 ring-blue-500 ring-offset-1 ring-offset-gray-900")
        )}>
            {label}
        </Link<Route>>
    }
}

#[function_component(Navigation)]
fn navigation() -> Html {
    let current_route = use_route::<Route>();

    html! {
        <nav class="bg-gray-900 shadow-lg fixed top-0 w-full z-30">
            <div class="container mx-auto px-6 py-4 flex justify-center space-x-4 md:space-x-8">
                {nav_link(Route::Home, "Home", &current_route)}
                {nav_link(Route::Vote, "Vote", &current_route)}
                {nav_link(Route::Results, "Results", &current_route)}
                {nav_link(Route::Admin, "Admin", &current_route)}
            </div>
        </nav>
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter>
            <div class="min-h-screen bg-gray-900">
                <Navigation />
                <div class="pt-16">
                    <Switch<Route> render={switch} />
                </div>
            </div>
        </BrowserRouter>
    }
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home | Route::NotFound => html! { <Home /> },
        Route::Vote => html! { <VoteBooth /> },
        Route::Results => html! { <Results /> },
        Route::AdminLogin => html! { <AdminLogin /> },
        Route::Admin => html! { <AdminPanel /> },
    }
}

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
