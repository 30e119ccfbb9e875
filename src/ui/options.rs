/// Options page: the list of muted sites
///
/// The page runs its own `Reconciler` against the live browser. Its writes
/// reach the background page through `storage.onChanged`.
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::browser::BrowserHost;
use crate::config::{Config, Settings};
use crate::domain::parse_domain_input;
use crate::muted_set::MutedDomains;
use crate::reconciler::{Reconciler, SweepReport};
use crate::storage::{load_settings, save_settings};

#[derive(Clone, PartialEq)]
enum ViewState {
    Loading,
    Idle,
    Saving(String),
    Error(String),
}

fn report_problem(domain: &str, muted: bool, report: SweepReport) -> Option<String> {
    if report.failed == 0 {
        return None;
    }
    let verb = if muted { "muted" } else { "unmuted" };
    Some(format!(
        "{} of {} tab(s) on {} could not be {}",
        report.failed,
        report.failed + report.updated,
        domain,
        verb
    ))
}

async fn load_domains() -> MutedDomains {
    let mut reconciler = Reconciler::new(BrowserHost, Config::default(), Settings::default());
    reconciler.load().await;
    reconciler.muted().clone()
}

/// Load the current list, apply one change, and sweep that domain's tabs
async fn apply_change(domain: String, muted: bool) -> (MutedDomains, Option<String>) {
    let mut reconciler = Reconciler::new(BrowserHost, Config::default(), Settings::default());
    reconciler.load().await;
    let report = reconciler.set_domain_muted(&domain, muted).await;
    (reconciler.muted().clone(), report_problem(&domain, muted, report))
}

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let state = use_state(|| ViewState::Loading);
    let domains = use_state(MutedDomains::new);
    let settings = use_state(Settings::default);
    let new_domain = use_state(String::new);

    // Load list and settings on mount
    {
        let state = state.clone();
        let domains = domains.clone();
        let settings = settings.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                domains.set(load_domains().await);
                settings.set(load_settings(&BrowserHost, &Config::default().settings_key).await);
                state.set(ViewState::Idle);
            });
            || ()
        });
    }

    let run_change = {
        let state = state.clone();
        let domains = domains.clone();

        Callback::from(move |(domain, muted): (String, bool)| {
            let state = state.clone();
            let domains = domains.clone();
            let verb = if muted { "Muting" } else { "Unmuting" };
            state.set(ViewState::Saving(format!("{} {}...", verb, domain)));

            spawn_local(async move {
                let (updated, problem) = apply_change(domain, muted).await;
                domains.set(updated);
                match problem {
                    Some(msg) => state.set(ViewState::Error(msg)),
                    None => state.set(ViewState::Idle),
                }
            });
        })
    };

    let on_new_domain_input = {
        let new_domain = new_domain.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                new_domain.set(input.value());
            }
        })
    };

    let on_add = {
        let new_domain = new_domain.clone();
        let state = state.clone();
        let run_change = run_change.clone();

        Callback::from(move |_| match parse_domain_input(&new_domain) {
            Some(domain) => {
                new_domain.set(String::new());
                run_change.emit((domain, true));
            }
            None => {
                state.set(ViewState::Error(format!("\"{}\" is not a site address", *new_domain)));
            }
        })
    };

    let on_resync_change = {
        let settings = settings.clone();
        Callback::from(move |e: web_sys::Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let updated = Settings {
                    resync_on_external_change: input.checked(),
                };
                settings.set(updated.clone());
                spawn_local(async move {
                    save_settings(&BrowserHost, &Config::default().settings_key, &updated).await;
                });
            }
        })
    };

    let is_busy = !matches!(*state, ViewState::Idle | ViewState::Error(_));

    html! {
        <div class="container">
            <h1 class="main-title">{"Muted Sites"}</h1>

            {match &*state {
                ViewState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading muted sites..."}</p>
                    </div>
                },
                ViewState::Saving(msg) => html! {
                    <div class="message-container">
                        <Spinner />
                        <p class="message-text">{msg}</p>
                    </div>
                },
                ViewState::Error(err) => html! {
                    <Alert r#type={AlertType::Warning} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                ViewState::Idle => html! {}
            }}

            <div class="search-container">
                <input
                    type="text"
                    placeholder="Site to mute, e.g. www.example.com"
                    value={(*new_domain).clone()}
                    oninput={on_new_domain_input}
                    class="search-input"
                />
                <Button onclick={on_add} disabled={is_busy} variant={ButtonVariant::Primary}>
                    {"Mute Site"}
                </Button>
            </div>

            if domains.is_empty() {
                <div class="empty-state">
                    <p>{"No muted sites."}</p>
                    <p class="empty-state-hint">{"Use the toolbar button or the tab menu to mute a site."}</p>
                </div>
            } else {
                <div class="domains-list">
                    {for domains.as_slice().iter().map(|domain| {
                        let on_unmute = {
                            let run_change = run_change.clone();
                            let domain = domain.clone();
                            Callback::from(move |_| run_change.emit((domain.clone(), false)))
                        };

                        html! {
                            <div class="domain-item">
                                <span class="domain-name">{domain}</span>
                                <Button onclick={on_unmute} disabled={is_busy} variant={ButtonVariant::Secondary}>
                                    {"Unmute"}
                                </Button>
                            </div>
                        }
                    })}
                </div>
            }

            <label class="settings-row">
                <input
                    type="checkbox"
                    checked={settings.resync_on_external_change}
                    onchange={on_resync_change}
                />
                {" Apply synced changes to open tabs immediately"}
            </label>
        </div>
    }
}
