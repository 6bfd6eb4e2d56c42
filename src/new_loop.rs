use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::store::{use_app_state, ToastKind};
use crate::types::MIN_ADDRESS_LEN;

/// Registration request for a new loop. The address is a plain text field;
/// pin placement on a map happens on the hosts' side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewLoopRequest {
    pub name: String,
    pub description: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopField {
    Name,
    Address,
}

impl LoopField {
    pub fn label(self) -> &'static str {
        match self {
            LoopField::Name => "name",
            LoopField::Address => "address",
        }
    }
}

/// A loop needs a name and a locatable address; the description may be empty.
pub fn validate_new_loop(request: &NewLoopRequest) -> Result<(), LoopField> {
    if request.name.trim().is_empty() {
        return Err(LoopField::Name);
    }
    if request.address.trim().chars().count() < MIN_ADDRESS_LEN {
        return Err(LoopField::Address);
    }
    Ok(())
}

#[derive(Properties, PartialEq)]
pub struct NewLoopViewProps {
    pub on_create_loop: Callback<(NewLoopRequest, Callback<Result<(), String>>)>,
}

/// Form for registering a new loop: name, description and the neighbourhood
/// address it centers on.
#[function_component(NewLoopView)]
pub fn new_loop_view(props: &NewLoopViewProps) -> Html {
    let state = use_app_state();
    let request = use_state(NewLoopRequest::default);
    let error = use_state(|| None::<LoopField>);
    let submitted = use_state(|| false);

    let set_field = |apply: fn(&mut NewLoopRequest, String)| {
        let request = request.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*request).clone();
                apply(&mut next, input.value());
                request.set(next);
            }
        })
    };
    let on_name = set_field(|request, value| request.name = value);
    let on_address = set_field(|request, value| request.address = value);
    let on_description = {
        let request = request.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                let mut next = (*request).clone();
                next.description = area.value();
                request.set(next);
            }
        })
    };

    let on_submit = {
        let request = request.clone();
        let error = error.clone();
        let submitted = submitted.clone();
        let on_create_loop = props.on_create_loop.clone();
        let notify = state.notify.clone();
        Callback::from(move |_: MouseEvent| {
            if let Err(field) = validate_new_loop(&request) {
                error.set(Some(field));
                notify.emit((ToastKind::Error, format!("Required: {}", field.label())));
                return;
            }
            error.set(None);
            let submitted = submitted.clone();
            let notify = notify.clone();
            on_create_loop.emit((
                (*request).clone(),
                Callback::from(move |result: Result<(), String>| match result {
                    Ok(()) => submitted.set(true),
                    Err(err) => {
                        log::error!("loop registration failed: {err}");
                        notify.emit((ToastKind::Error, err));
                    }
                }),
            ));
        })
    };

    if *submitted {
        return html! {
            <div class="p-3 bg-green-50 border border-green-300 rounded-lg text-sm">
                {"Your new loop was registered. Invite your neighbours!"}
            </div>
        };
    }

    let field_class = |field: LoopField| {
        if *error == Some(field) {
            "w-full px-2 py-1 border border-red-500 rounded text-sm"
        } else {
            "w-full px-2 py-1 border border-gray-300 rounded text-sm"
        }
    };

    html! {
        <div class="space-y-3">
            <h2 class="text-base font-semibold">{"Start a new loop"}</h2>
            <input
                type="text"
                value={request.name.clone()}
                oninput={on_name}
                placeholder="Loop name"
                class={field_class(LoopField::Name)}
            />
            <textarea
                value={request.description.clone()}
                oninput={on_description}
                placeholder="Description (optional)"
                class="w-full px-2 py-1 border border-gray-300 rounded text-sm"
                rows="3"
            />
            <input
                type="text"
                value={request.address.clone()}
                oninput={on_address}
                placeholder="Neighbourhood address"
                class={field_class(LoopField::Address)}
            />
            <button
                onclick={on_submit}
                class="px-4 py-2 bg-purple-500 hover:bg-purple-600 text-white rounded-lg text-sm font-medium"
            >
                {"Register loop"}
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_validation_order() {
        let mut request = NewLoopRequest {
            name: " ".to_string(),
            description: String::new(),
            address: "Nr 5".to_string(),
        };
        assert_eq!(validate_new_loop(&request), Err(LoopField::Name));

        request.name = "Utrecht East".to_string();
        assert_eq!(validate_new_loop(&request), Err(LoopField::Address));

        request.address = "Oudegracht 12 Utrecht".to_string();
        assert_eq!(validate_new_loop(&request), Ok(()));
    }

    #[test]
    fn test_description_is_optional() {
        let request = NewLoopRequest {
            name: "Utrecht East".to_string(),
            description: String::new(),
            address: "Oudegracht 12 Utrecht".to_string(),
        };
        assert_eq!(validate_new_loop(&request), Ok(()));
    }
}
