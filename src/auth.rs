use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use web_sys::{HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

use crate::store::{use_app_state, ToastKind};
use crate::types::MIN_ADDRESS_LEN;

/// How long the "passcode sent" state disables the send button before the
/// user may request another email.
pub const SENT_RESET_MS: u32 = 60_000;

/// Outcome state of a request-shaped button (send passcode, verify).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Success,
    Error,
}

impl RequestState {
    pub fn button_class(self) -> &'static str {
        match self {
            RequestState::Idle => "bg-blue-500 hover:bg-blue-600",
            RequestState::Success => "bg-green-500",
            RequestState::Error => "bg-red-600 hover:bg-red-700",
        }
    }
}

/// Registration request for joining the loop.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub sizes: Vec<String>,
    pub newsletter: bool,
}

/// Required signup fields, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    Name,
    Email,
    Address,
    PrivacyPolicy,
}

impl SignupField {
    pub fn label(self) -> &'static str {
        match self {
            SignupField::Name => "name",
            SignupField::Email => "email",
            SignupField::Address => "address",
            SignupField::PrivacyPolicy => "privacy policy",
        }
    }
}

/// Check the signup form in order, reporting the first failing field. The
/// address needs enough characters to plausibly locate a house.
pub fn validate_signup(form: &SignupForm, privacy_accepted: bool) -> Result<(), SignupField> {
    if form.name.trim().is_empty() {
        return Err(SignupField::Name);
    }
    if form.email.trim().is_empty() || !form.email.contains('@') {
        return Err(SignupField::Email);
    }
    if form.address.trim().chars().count() < MIN_ADDRESS_LEN {
        return Err(SignupField::Address);
    }
    if !privacy_accepted {
        return Err(SignupField::PrivacyPolicy);
    }
    Ok(())
}

const SIZE_OPTIONS: [&str; 4] = ["S", "M", "L", "XL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Login,
    Signup,
}

#[derive(Properties, PartialEq)]
pub struct AuthViewProps {
    /// Emails a one-time passcode to the given address.
    pub on_request_token: Callback<(String, Callback<Result<(), String>>)>,
    /// Verifies the passcode; an `Ok` answer means the session is live.
    pub on_verify_token: Callback<(String, Callback<Result<(), String>>)>,
    pub on_signup: Callback<(SignupForm, Callback<Result<(), String>>)>,
}

/// Entry screen shown while logged out: passwordless login (email a
/// passcode, then verify it) or the join-the-loop signup form.
#[function_component(AuthView)]
pub fn auth_view(props: &AuthViewProps) -> Html {
    let mode = use_state(|| AuthMode::Login);

    let switch_mode = {
        let mode = mode.clone();
        Callback::from(move |_: MouseEvent| {
            mode.set(match *mode {
                AuthMode::Login => AuthMode::Signup,
                AuthMode::Signup => AuthMode::Login,
            });
        })
    };

    let (body, switch_label) = match *mode {
        AuthMode::Login => (
            html! {
                <LoginForm
                    on_request_token={props.on_request_token.clone()}
                    on_verify_token={props.on_verify_token.clone()}
                />
            },
            "New here? Join the loop",
        ),
        AuthMode::Signup => (
            html! { <SignupView on_signup={props.on_signup.clone()} /> },
            "Already a member? Log in",
        ),
    };

    html! {
        <div class="h-full flex items-center justify-center p-4">
            <div class="w-full max-w-sm bg-white rounded-xl shadow-sm p-6 space-y-4">
                {body}
                <button onclick={switch_mode} class="text-sm text-blue-600 hover:underline">
                    {switch_label}
                </button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct LoginFormProps {
    on_request_token: Callback<(String, Callback<Result<(), String>>)>,
    on_verify_token: Callback<(String, Callback<Result<(), String>>)>,
}

#[function_component(LoginForm)]
fn login_form(props: &LoginFormProps) -> Html {
    let state = use_app_state();
    let email = use_state(String::new);
    let token = use_state(String::new);
    let sent = use_state(RequestState::default);
    let verify = use_state(RequestState::default);
    let show_token = use_state(|| false);
    let sent_timer = use_mut_ref(|| None::<Timeout>);

    let send = {
        let email = email.clone();
        let sent = sent.clone();
        let show_token = show_token.clone();
        let sent_timer = sent_timer.clone();
        let on_request_token = props.on_request_token.clone();
        let notify = state.notify.clone();
        Callback::from(move |_: ()| {
            // While the lockout runs the button stays disabled.
            if *sent == RequestState::Success {
                return;
            }
            let address = email.trim().to_string();
            if address.is_empty() {
                return;
            }
            let sent = sent.clone();
            let show_token = show_token.clone();
            let sent_timer = sent_timer.clone();
            let notify = notify.clone();
            on_request_token.emit((
                address,
                Callback::from(move |result: Result<(), String>| match result {
                    Ok(()) => {
                        show_token.set(true);
                        sent.set(RequestState::Success);
                        schedule_sent_reset(&sent, &sent_timer);
                    }
                    Err(err) => {
                        log::error!("passcode request failed: {err}");
                        notify.emit((ToastKind::Error, err));
                        sent.set(RequestState::Error);
                    }
                }),
            ));
        })
    };

    let verify_token = {
        let token = token.clone();
        let verify = verify.clone();
        let on_verify_token = props.on_verify_token.clone();
        let notify = state.notify.clone();
        Callback::from(move |_: ()| {
            let code = token.trim().to_string();
            if code.is_empty() {
                return;
            }
            let verify = verify.clone();
            let notify = notify.clone();
            on_verify_token.emit((
                code,
                Callback::from(move |result: Result<(), String>| match result {
                    // The parent flips to the signed-in view; nothing more
                    // to do here.
                    Ok(()) => verify.set(RequestState::Success),
                    Err(err) => {
                        log::error!("passcode verification failed: {err}");
                        notify.emit((ToastKind::Error, err));
                        verify.set(RequestState::Error);
                    }
                }),
            ));
        })
    };

    let on_email_input = text_input(&email);
    let on_token_input = text_input(&token);
    let on_email_keyup = enter_submits(&send);
    let on_token_keyup = enter_submits(&verify_token);
    let on_send_click = {
        let send = send.clone();
        Callback::from(move |_: MouseEvent| send.emit(()))
    };
    let on_verify_click = {
        let verify_token = verify_token.clone();
        Callback::from(move |_: MouseEvent| verify_token.emit(()))
    };

    html! {
        <div class="space-y-3">
            <h2 class="text-lg font-semibold">{"Log in"}</h2>
            <p class="text-sm text-gray-600">{"Enter your email address and we will send you a passcode."}</p>
            <input
                type="email"
                value={(*email).clone()}
                oninput={on_email_input}
                onkeyup={on_email_keyup}
                placeholder="Your email address"
                class="w-full px-2 py-1 border border-gray-300 rounded text-sm"
            />
            <button
                onclick={on_send_click}
                disabled={*sent == RequestState::Success}
                class={classes!(
                    "w-full", "px-4", "py-2", "rounded-lg", "text-sm", "font-medium", "text-white",
                    sent.button_class()
                )}
            >
                {if *sent == RequestState::Success { "Check your email" } else { "Send passcode" }}
            </button>
            if *show_token {
                <p class="text-sm text-gray-600">{"Enter the passcode you received in your email."}</p>
                <input
                    type="number"
                    value={(*token).clone()}
                    oninput={on_token_input}
                    onkeyup={on_token_keyup}
                    placeholder="\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}"
                    class="w-full px-2 py-1 border border-gray-300 rounded text-sm"
                />
                <button
                    onclick={on_verify_click}
                    disabled={*verify == RequestState::Success}
                    class={classes!(
                        "w-full", "px-4", "py-2", "rounded-lg", "text-sm", "font-medium", "text-white",
                        verify.button_class()
                    )}
                >
                    {"Log in"}
                </button>
            }
        </div>
    }
}

fn schedule_sent_reset(
    sent: &UseStateHandle<RequestState>,
    sent_timer: &Rc<RefCell<Option<Timeout>>>,
) {
    let sent = sent.clone();
    let timeout = Timeout::new(SENT_RESET_MS, move || sent.set(RequestState::Idle));
    *sent_timer.borrow_mut() = Some(timeout);
}

fn text_input(value: &UseStateHandle<String>) -> Callback<InputEvent> {
    let value = value.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            value.set(input.value());
        }
    })
}

fn enter_submits(submit: &Callback<()>) -> Callback<KeyboardEvent> {
    let submit = submit.clone();
    Callback::from(move |e: KeyboardEvent| {
        if e.key() == "Enter" {
            submit.emit(());
        }
    })
}

#[derive(Properties, PartialEq)]
struct SignupViewProps {
    on_signup: Callback<(SignupForm, Callback<Result<(), String>>)>,
}

#[function_component(SignupView)]
fn signup_view(props: &SignupViewProps) -> Html {
    let state = use_app_state();
    let form = use_state(SignupForm::default);
    let privacy = use_state(|| false);
    let error = use_state(|| None::<SignupField>);
    let submitted = use_state(|| false);

    let set_field = |apply: fn(&mut SignupForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*form).clone();
                apply(&mut next, input.value());
                form.set(next);
            }
        })
    };
    let on_name = set_field(|form, value| form.name = value);
    let on_email = set_field(|form, value| form.email = value);
    let on_phone = set_field(|form, value| form.phone_number = value);
    let on_address = set_field(|form, value| form.address = value);

    let toggle_size = |size: &'static str| {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let mut next = (*form).clone();
            if input.checked() {
                next.sizes.push(size.to_string());
            } else {
                next.sizes.retain(|existing| existing != size);
            }
            form.set(next);
        })
    };

    let on_privacy = {
        let privacy = privacy.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                privacy.set(input.checked());
            }
        })
    };
    let on_newsletter = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*form).clone();
                next.newsletter = input.checked();
                form.set(next);
            }
        })
    };

    let on_submit = {
        let form = form.clone();
        let privacy = privacy.clone();
        let error = error.clone();
        let submitted = submitted.clone();
        let on_signup = props.on_signup.clone();
        let notify = state.notify.clone();
        Callback::from(move |_: MouseEvent| {
            if let Err(field) = validate_signup(&form, *privacy) {
                error.set(Some(field));
                notify.emit((ToastKind::Error, format!("Required: {}", field.label())));
                return;
            }
            error.set(None);
            let submitted = submitted.clone();
            let notify = notify.clone();
            on_signup.emit((
                (*form).clone(),
                Callback::from(move |result: Result<(), String>| match result {
                    Ok(()) => submitted.set(true),
                    Err(err) => {
                        log::error!("signup failed: {err}");
                        notify.emit((ToastKind::Error, err));
                    }
                }),
            ));
        })
    };

    if *submitted {
        return html! {
            <div class="space-y-2">
                <h2 class="text-lg font-semibold">{"Thank you!"}</h2>
                <p class="text-sm text-gray-600">
                    {"Your registration was sent to the hosts. You will receive an email once it is approved."}
                </p>
            </div>
        };
    }

    let field_class = |field: SignupField| {
        if *error == Some(field) {
            "w-full px-2 py-1 border border-red-500 rounded text-sm"
        } else {
            "w-full px-2 py-1 border border-gray-300 rounded text-sm"
        }
    };

    html! {
        <div class="space-y-3">
            <h2 class="text-lg font-semibold">{"Join the loop"}</h2>
            <input
                type="text"
                value={form.name.clone()}
                oninput={on_name}
                placeholder="Name"
                class={field_class(SignupField::Name)}
            />
            <input
                type="email"
                value={form.email.clone()}
                oninput={on_email}
                placeholder="Email"
                class={field_class(SignupField::Email)}
            />
            <input
                type="tel"
                value={form.phone_number.clone()}
                oninput={on_phone}
                placeholder="Phone number (optional)"
                class="w-full px-2 py-1 border border-gray-300 rounded text-sm"
            />
            <input
                type="text"
                value={form.address.clone()}
                oninput={on_address}
                placeholder="Address"
                class={field_class(SignupField::Address)}
            />
            <div class="flex gap-3 text-sm">
                { SIZE_OPTIONS.iter().map(|&size| html! {
                    <label key={size} class="flex items-center gap-1">
                        <input
                            type="checkbox"
                            checked={form.sizes.iter().any(|existing| existing == size)}
                            onchange={toggle_size(size)}
                        />
                        {size}
                    </label>
                }).collect::<Html>() }
            </div>
            <label class="flex items-center gap-2 text-sm">
                <input type="checkbox" checked={form.newsletter} onchange={on_newsletter} />
                {"Subscribe to the newsletter"}
            </label>
            <label class={classes!(
                "flex", "items-center", "gap-2", "text-sm",
                (*error == Some(SignupField::PrivacyPolicy)).then_some("text-red-600")
            )}>
                <input type="checkbox" checked={*privacy} onchange={on_privacy} />
                {"I accept the privacy policy"}
            </label>
            <button
                onclick={on_submit}
                class="w-full px-4 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded-lg text-sm font-medium"
            >
                {"Join"}
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SignupForm {
        SignupForm {
            name: "Alma Visser".to_string(),
            email: "alma@example.com".to_string(),
            phone_number: String::new(),
            address: "Oudegracht 12 Utrecht".to_string(),
            sizes: vec!["M".to_string()],
            newsletter: false,
        }
    }

    #[test]
    fn test_signup_validation_order() {
        let mut form = filled();
        form.name = "  ".to_string();
        form.email = String::new();
        assert_eq!(validate_signup(&form, true), Err(SignupField::Name));

        form.name = "Alma".to_string();
        assert_eq!(validate_signup(&form, true), Err(SignupField::Email));

        form.email = "no-at-sign".to_string();
        assert_eq!(validate_signup(&form, true), Err(SignupField::Email));

        form.email = "alma@example.com".to_string();
        form.address = "Nr 5".to_string();
        assert_eq!(validate_signup(&form, true), Err(SignupField::Address));
    }

    #[test]
    fn test_signup_requires_privacy_policy() {
        let form = filled();
        assert_eq!(
            validate_signup(&form, false),
            Err(SignupField::PrivacyPolicy)
        );
        assert_eq!(validate_signup(&form, true), Ok(()));
    }
}
